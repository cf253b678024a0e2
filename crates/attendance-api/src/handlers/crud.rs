//! Generic CRUD handlers, instantiated once per [`Resource`].

use attendance_domain::PatchDocument;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use super::{Resource, body, created};
use crate::context::ApiContext;
use crate::error::{Action, ApiError, ApiResult, persistence};

/// `GET /api/{collection}`
pub async fn list<E: Resource>(State(ctx): State<ApiContext>) -> ApiResult<Json<Vec<E>>> {
    let all = E::repository(&ctx)
        .get_all()
        .await
        .map_err(persistence(Action::Retrieve, E::NAME))?;

    Ok(Json(all))
}

/// `GET /api/{collection}/{id}`
pub async fn get_by_id<E: Resource>(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<E>> {
    E::repository(&ctx)
        .get_by_id(id)
        .await
        .map_err(persistence(Action::Retrieve, E::NAME))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(E::ENTITY))
}

/// `POST /api/{collection}`
pub async fn create<E: Resource>(
    State(ctx): State<ApiContext>,
    payload: Result<Json<E::Draft>, JsonRejection>,
) -> ApiResult<Response> {
    let draft = body(payload, Action::Create, E::NAME)?;

    let entity = E::repository(&ctx)
        .create(draft)
        .await
        .map_err(persistence(Action::Create, E::NAME))?;

    Ok(created(E::COLLECTION, entity.id(), entity))
}

/// `PUT /api/{collection}/{id}`; the path identifier wins over any in the body
pub async fn update<E: Resource>(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    payload: Result<Json<E::Draft>, JsonRejection>,
) -> ApiResult<Json<E>> {
    let draft = body(payload, Action::Update, E::NAME)?;

    let entity = E::repository(&ctx)
        .update(id, draft)
        .await
        .map_err(persistence(Action::Update, E::NAME))?;

    Ok(Json(entity))
}

/// `PATCH /api/{collection}/{id}`
pub async fn patch<E: Resource>(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let document = body(payload, Action::Update, E::NAME)?;

    E::repository(&ctx)
        .patch(id, document.operations())
        .await
        .map_err(persistence(Action::Update, E::NAME))?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/{collection}/{id}`
pub async fn delete<E: Resource>(
    State(ctx): State<ApiContext>,
    Path(id): Path<i64>,
) -> ApiResult<String> {
    E::repository(&ctx)
        .delete(id)
        .await
        .map_err(persistence(Action::Delete, E::NAME))?;

    Ok(format!("{} deleted successfully.", E::ENTITY))
}
