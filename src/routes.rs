//! Axum handlers and router.
//!
//! Handlers are generic over [`CrudResource`]; the router instantiates them
//! for the cheese listing resource at a collection path and an item path.
//! There is no delete endpoint.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;
use hyper::HeaderMap;
use sea_orm::DatabaseConnection;

use crate::cheese_listing::CheeseListing;
use crate::errors::ApiError;
use crate::filter::apply_filters;
use crate::pagination::{page_bounds, pagination_headers, parse_page};
use crate::projection::{project, requested_properties};
use crate::resource::CrudResource;
use crate::validation::Validatable;

/// Shared handler state: the connection pool and the collection page size.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub page_size: u64,
}

/// Build the resource router. Mount it under a prefix such as `/api`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/cheeses",
            get(get_all::<CheeseListing>).post(create_one::<CheeseListing>),
        )
        .route(
            "/cheeses/{id}",
            get(get_one::<CheeseListing>).put(update_one::<CheeseListing>),
        )
        .with_state(state)
}

/// List resources: declarative filters, fixed-size pagination, optional
/// field projection. Records come back in insertion order.
pub async fn get_all<T>(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<(HeaderMap, Json<serde_json::Value>), ApiError>
where
    T: CrudResource,
{
    let now = Utc::now();
    let condition = apply_filters(&params, &T::filter_descriptors());
    let page = parse_page(&params);
    let (offset, limit) = page_bounds(page, state.page_size);

    let items = T::get_all(&state.db, condition.clone(), offset, limit, now).await?;
    let total = T::total_count(&state.db, condition).await?;
    let headers = pagination_headers(offset, limit, total, state.page_size, T::RESOURCE_NAME_PLURAL);

    let properties = requested_properties(&params);
    let body = items
        .iter()
        .map(|item| project(item, &properties, T::field_policies()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((headers, Json(serde_json::Value::Array(body))))
}

/// Fetch one resource by id, optionally projected to requested fields.
pub async fn get_one<T>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    T: CrudResource,
{
    let item = T::get_one(&state.db, id, Utc::now()).await?;
    let properties = requested_properties(&params);
    Ok(Json(project(&item, &properties, T::field_policies())?))
}

/// Create one resource and return its full read representation.
pub async fn create_one<T>(
    State(state): State<AppState>,
    Json(payload): Json<T::CreateModel>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    T: CrudResource,
{
    payload.validate()?;
    let created = T::create(&state.db, payload, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace the writable fields of one resource.
pub async fn update_one<T>(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<T::UpdateModel>,
) -> Result<Json<T>, ApiError>
where
    T: CrudResource,
{
    payload.validate()?;
    let updated = T::replace(&state.db, id, payload, Utc::now()).await?;
    Ok(Json(updated))
}
