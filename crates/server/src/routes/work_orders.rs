use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use models::{work_note, work_order, work_order_line_item};
use service::auth::tokens::Claims;
use service::work_orders;

use crate::errors::ApiError;
use crate::routes::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/work-orders", post(create).get(list))
        .route("/work-orders/:id", get(show).patch(update).delete(remove))
        .route("/work-orders/:id/assign", post(assign))
        .route("/work-orders/:id/notes", post(add_note).get(list_notes))
        .route(
            "/work-orders/:id/line-items",
            post(add_line_item).get(list_line_items),
        )
        .route(
            "/work-orders/:id/line-items/:item_id",
            delete(remove_line_item),
        )
}

#[utoipa::path(post, path = "/work-orders", tag = "work-orders",
    responses((status = 201, description = "Created"),
        (status = 400, description = "Location does not belong to customer"),
        (status = 404, description = "Customer, location, or technician missing")))]
pub(crate) async fn create(
    State(state): State<ServerState>,
    Json(input): Json<work_order::NewWorkOrder>,
) -> Result<(StatusCode, Json<work_order::Model>), ApiError> {
    let created = work_orders::create_work_order(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/work-orders", tag = "work-orders",
    responses((status = 200, description = "Work orders matching the filter")))]
pub(crate) async fn list(
    State(state): State<ServerState>,
    Query(filter): Query<work_order::WorkOrderFilter>,
) -> Result<Json<Vec<work_order::Model>>, ApiError> {
    Ok(Json(work_orders::list_work_orders(&state.db, filter).await?))
}

async fn show(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<work_order::Model>, ApiError> {
    let found = work_orders::get_work_order(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found("work order not found"))?;
    Ok(Json(found))
}

async fn update(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(changes): Json<work_order::WorkOrderChanges>,
) -> Result<Json<work_order::Model>, ApiError> {
    Ok(Json(work_orders::update_work_order(&state.db, id, changes).await?))
}

#[derive(Deserialize)]
struct AssignBody {
    technician_id: Option<Uuid>,
}

#[utoipa::path(post, path = "/work-orders/{id}/assign", tag = "work-orders",
    responses((status = 200, description = "Assignment updated"),
        (status = 404, description = "Work order or technician missing")))]
pub(crate) async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignBody>,
) -> Result<Json<work_order::Model>, ApiError> {
    let updated = work_orders::assign_technician(&state.db, id, body.technician_id).await?;
    Ok(Json(updated))
}

async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    work_orders::delete_work_order(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct NoteBody {
    body: String,
}

async fn add_note(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(note): Json<NoteBody>,
) -> Result<(StatusCode, Json<work_note::Model>), ApiError> {
    let created = work_orders::add_note(&state.db, id, claims.uid, &note.body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_notes(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<work_note::Model>>, ApiError> {
    Ok(Json(work_orders::list_notes(&state.db, id).await?))
}

#[derive(Deserialize)]
struct LineItemBody {
    description: String,
    quantity: i32,
    unit_price_cents: i64,
}

async fn add_line_item(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(item): Json<LineItemBody>,
) -> Result<(StatusCode, Json<work_order_line_item::Model>), ApiError> {
    let created = work_orders::add_line_item(
        &state.db,
        id,
        &item.description,
        item.quantity,
        item.unit_price_cents,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_line_items(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<work_order_line_item::Model>>, ApiError> {
    Ok(Json(work_orders::list_line_items(&state.db, id).await?))
}

async fn remove_line_item(
    State(state): State<ServerState>,
    Path((_id, item_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    work_orders::delete_line_item(&state.db, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
