//! Generic CRUD resource layer.
//!
//! A resource declares its entity types, its filter descriptors, and its
//! field-visibility table; the default method implementations cover the
//! list/create/fetch/replace operations. Read models are assembled from the
//! persisted row and the current moment, so derived time-sensitive fields
//! are recomputed on every read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    Condition, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryOrder, QuerySelect, entity::prelude::*,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{FieldPolicy, FilterDescriptor};
use crate::validation::Validatable;

/// Full-record replacement of the writable fields.
///
/// Applies every writable field of the payload onto an existing active
/// model, leaving system-owned columns (id, creation timestamp) untouched.
pub trait ReplaceIntoActiveModel<ActiveModelType> {
    /// # Errors
    ///
    /// Propagates any `DbErr` raised while converting payload values.
    fn replace_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

#[async_trait]
pub trait CrudResource: Sized + Send + Sync + Serialize
where
    Self::EntityType: EntityTrait + Sync,
    Self::ActiveModelType: ActiveModelTrait + ActiveModelBehavior + Send + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync + IntoActiveModel<Self::ActiveModelType>,
    <<Self::EntityType as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType:
        From<i32> + Into<i32>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>;
    type CreateModel: Into<Self::ActiveModelType> + Validatable + DeserializeOwned + Send;
    type UpdateModel: ReplaceIntoActiveModel<Self::ActiveModelType>
        + Validatable
        + DeserializeOwned
        + Send
        + Sync;

    const ID_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;

    /// Assemble the read representation of a persisted row at `now`.
    fn from_model(model: <Self::EntityType as EntityTrait>::Model, now: DateTime<Utc>) -> Self;

    /// Declarative query-filter configuration for this resource.
    fn filter_descriptors() -> Vec<FilterDescriptor<Self::ColumnType>>;

    /// Field-visibility table consulted by the projection layer.
    fn field_policies() -> &'static [FieldPolicy];

    /// List records in insertion order (id ascending).
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    async fn get_all(
        db: &DatabaseConnection,
        condition: Condition,
        offset: u64,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<Vec<Self>, DbErr> {
        let models = Self::EntityType::find()
            .filter(condition)
            .order_by_asc(Self::ID_COLUMN)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| Self::from_model(model, now))
            .collect())
    }

    /// Fetch a record by identity.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when the identity does not exist.
    async fn get_one(db: &DatabaseConnection, id: i32, now: DateTime<Utc>) -> Result<Self, DbErr> {
        let model =
            Self::EntityType::find_by_id(id)
                .one(db)
                .await?
                .ok_or(DbErr::RecordNotFound(format!(
                    "{} not found",
                    Self::RESOURCE_NAME_SINGULAR
                )))?;
        Ok(Self::from_model(model, now))
    }

    /// Persist a new record and return its full read representation.
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    async fn create(
        db: &DatabaseConnection,
        create_model: Self::CreateModel,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let active_model: Self::ActiveModelType = create_model.into();
        let result = Self::EntityType::insert(active_model).exec(db).await?;
        Self::get_one(db, result.last_insert_id.into(), now).await
    }

    /// Replace the writable fields of an existing record.
    ///
    /// # Errors
    ///
    /// `DbErr::RecordNotFound` when the identity does not exist.
    async fn replace(
        db: &DatabaseConnection,
        id: i32,
        update_model: Self::UpdateModel,
        now: DateTime<Utc>,
    ) -> Result<Self, DbErr> {
        let model =
            Self::EntityType::find_by_id(id)
                .one(db)
                .await?
                .ok_or(DbErr::RecordNotFound(format!(
                    "{} not found",
                    Self::RESOURCE_NAME_SINGULAR
                )))?;
        let existing: Self::ActiveModelType = model.into_active_model();
        let replaced = update_model.replace_into_activemodel(existing)?;
        let updated = replaced.update(db).await?;
        Ok(Self::from_model(updated, now))
    }

    /// Count all records matching `condition`.
    ///
    /// # Errors
    ///
    /// Propagates database errors.
    async fn total_count(db: &DatabaseConnection, condition: Condition) -> Result<u64, DbErr> {
        let query = Self::EntityType::find().filter(condition);
        PaginatorTrait::count(query, db).await
    }
}
