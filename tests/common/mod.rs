use axum::Router;
use cheese_api::routes::{AppState, router};
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new().nest(
        "/api",
        router(AppState {
            db,
            page_size: cheese_api::pagination::DEFAULT_PAGE_SIZE,
        }),
    )
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCheeseListingTable)]
    }
}

pub struct CreateCheeseListingTable;

#[async_trait::async_trait]
impl MigrationName for CreateCheeseListingTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_cheese_listing_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCheeseListingTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(CheeseListingTable)
            .if_not_exists()
            .col(
                ColumnDef::new(CheeseListingColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(CheeseListingColumn::Title)
                    .string_len(255)
                    .not_null(),
            )
            .col(
                ColumnDef::new(CheeseListingColumn::Description)
                    .text()
                    .not_null(),
            )
            .col(
                ColumnDef::new(CheeseListingColumn::Price)
                    .integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(CheeseListingColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(CheeseListingColumn::IsPublished)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CheeseListingTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum CheeseListingColumn {
    Id,
    Title,
    Description,
    Price,
    CreatedAt,
    IsPublished,
}

impl Iden for CheeseListingColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Title => "title",
                Self::Description => "description",
                Self::Price => "price",
                Self::CreatedAt => "created_at",
                Self::IsPublished => "is_published",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct CheeseListingTable;

impl Iden for CheeseListingTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "cheese_listings").unwrap();
    }
}
