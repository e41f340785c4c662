use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use models::{customer, service_location};
use service::customers;
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/customers", post(create).get(list))
        .route("/customers/:id", get(show).put(update).delete(remove))
        .route(
            "/customers/:id/locations",
            post(add_location).get(list_locations),
        )
        .route(
            "/customers/:id/locations/:location_id",
            axum::routing::delete(remove_location),
        )
}

#[utoipa::path(post, path = "/customers", tag = "customers",
    responses((status = 201, description = "Created"),
        (status = 400, description = "Validation failed")))]
pub(crate) async fn create(
    State(state): State<ServerState>,
    Json(input): Json<customer::NewCustomer>,
) -> Result<(StatusCode, Json<customer::Model>), ApiError> {
    let created = customers::create_customer(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/customers", tag = "customers",
    responses((status = 200, description = "Page of customers")))]
pub(crate) async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<customer::Model>>, ApiError> {
    Ok(Json(customers::list_customers(&state.db, page).await?))
}

async fn show(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<customer::Model>, ApiError> {
    let found = customers::get_customer(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("customer not found"))?;
    Ok(Json(found))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<customer::NewCustomer>,
) -> Result<Json<customer::Model>, ApiError> {
    Ok(Json(customers::update_customer(&state.db, id, input).await?))
}

async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    customers::delete_customer(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_location(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(input): Json<service_location::NewServiceLocation>,
) -> Result<(StatusCode, Json<service_location::Model>), ApiError> {
    let created = customers::add_location(&state.db, id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_locations(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<service_location::Model>>, ApiError> {
    Ok(Json(customers::list_locations(&state.db, id).await?))
}

async fn remove_location(
    State(state): State<ServerState>,
    Path((_id, location_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    customers::delete_location(&state.db, location_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
