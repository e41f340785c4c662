use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use models::technician;
use service::technicians;

use crate::errors::ApiError;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/technicians", post(create).get(list))
        .route("/technicians/:id", get(show).put(update).delete(remove))
}

#[derive(Deserialize)]
struct TechnicianBody {
    user_id: Option<Uuid>,
    display_name: String,
    phone: Option<String>,
}

#[utoipa::path(post, path = "/technicians", tag = "technicians",
    responses((status = 201, description = "Created"),
        (status = 400, description = "Validation failed")))]
pub(crate) async fn create(
    State(state): State<ServerState>,
    Json(body): Json<TechnicianBody>,
) -> Result<(StatusCode, Json<technician::Model>), ApiError> {
    let user_id = body
        .user_id
        .ok_or_else(|| ApiError::bad_request("user_id is required"))?;
    let created = technicians::create_technician(
        &state.db,
        user_id,
        &body.display_name,
        body.phone.as_deref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/technicians", tag = "technicians",
    responses((status = 200, description = "All technicians")))]
pub(crate) async fn list(
    State(state): State<ServerState>,
) -> Result<Json<Vec<technician::Model>>, ApiError> {
    Ok(Json(technicians::list_technicians(&state.db).await?))
}

async fn show(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<technician::Model>, ApiError> {
    let found = technicians::get_technician(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("technician not found"))?;
    Ok(Json(found))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TechnicianBody>,
) -> Result<Json<technician::Model>, ApiError> {
    let updated = technicians::update_technician(
        &state.db,
        id,
        &body.display_name,
        body.phone.as_deref(),
    )
    .await?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    technicians::delete_technician(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
