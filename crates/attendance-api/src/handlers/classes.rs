//! `/api/classes` routes.

use attendance_domain::{Class, NewClass, PatchDocument, PatchOperation};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use super::crud;
use crate::context::ApiContext;
use crate::error::ApiResult;

#[utoipa::path(
    get,
    path = "/api/classes",
    tag = "Classes",
    responses(
        (status = 200, description = "Every class", body = [Class]),
        (status = 400, description = "Store failure", body = String),
    )
)]
pub async fn list(state: State<ApiContext>) -> ApiResult<Json<Vec<Class>>> {
    crud::list::<Class>(state).await
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    tag = "Classes",
    params(("id" = i64, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "The class", body = Class),
        (status = 404, description = "No such class", body = String),
    )
)]
pub async fn get_by_id(state: State<ApiContext>, id: Path<i64>) -> ApiResult<Json<Class>> {
    crud::get_by_id::<Class>(state, id).await
}

/// Reuses the existing row when a class with the same name exists
#[utoipa::path(
    post,
    path = "/api/classes",
    tag = "Classes",
    request_body = NewClass,
    responses(
        (status = 201, description = "Created or reused class", body = Class,
            headers(("Location" = String, description = "URI of the class"))),
        (status = 400, description = "Malformed body or store failure", body = String),
    )
)]
pub async fn create(
    state: State<ApiContext>,
    payload: Result<Json<NewClass>, JsonRejection>,
) -> ApiResult<Response> {
    crud::create::<Class>(state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    tag = "Classes",
    params(("id" = i64, Path, description = "Class identifier")),
    request_body = NewClass,
    responses(
        (status = 200, description = "Updated class", body = Class),
        (status = 400, description = "Malformed body or store failure", body = String),
        (status = 404, description = "No such class", body = String),
    )
)]
pub async fn update(
    state: State<ApiContext>,
    id: Path<i64>,
    payload: Result<Json<NewClass>, JsonRejection>,
) -> ApiResult<Json<Class>> {
    crud::update::<Class>(state, id, payload).await
}

#[utoipa::path(
    patch,
    path = "/api/classes/{id}",
    tag = "Classes",
    params(("id" = i64, Path, description = "Class identifier")),
    request_body = [PatchOperation],
    responses(
        (status = 204, description = "Every operation applied"),
        (status = 400, description = "Invalid operation or value", body = String),
        (status = 404, description = "No such class or property", body = String),
    )
)]
pub async fn patch(
    state: State<ApiContext>,
    id: Path<i64>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> ApiResult<StatusCode> {
    crud::patch::<Class>(state, id, payload).await
}

/// Also removes the class's attendance
#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    tag = "Classes",
    params(("id" = i64, Path, description = "Class identifier")),
    responses(
        (status = 200, description = "Deletion message", body = String),
        (status = 404, description = "No such class", body = String),
    )
)]
pub async fn delete(state: State<ApiContext>, id: Path<i64>) -> ApiResult<String> {
    crud::delete::<Class>(state, id).await
}
