//! `/api/students` routes.

use attendance_domain::{Student, NewStudent, PatchDocument, PatchOperation};
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
    path = "/api/students",
    tag = "Students",
    responses(
        (status = 200, description = "Every student", body = [Student]),
        (status = 400, description = "Store failure", body = String),
    )
)]
pub async fn list(state: State<ApiContext>) -> ApiResult<Json<Vec<Student>>> {
    crud::list::<Student>(state).await
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "The student", body = Student),
        (status = 404, description = "No such student", body = String),
    )
)]
pub async fn get_by_id(state: State<ApiContext>, id: Path<i64>) -> ApiResult<Json<Student>> {
    crud::get_by_id::<Student>(state, id).await
}

/// Reuses the existing row when a student with the same name exists
#[utoipa::path(
    post,
    path = "/api/students",
    tag = "Students",
    request_body = NewStudent,
    responses(
        (status = 201, description = "Created or reused student", body = Student,
            headers(("Location" = String, description = "URI of the student"))),
        (status = 400, description = "Malformed body or store failure", body = String),
    )
)]
pub async fn create(
    state: State<ApiContext>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> ApiResult<Response> {
    crud::create::<Student>(state, payload).await
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = NewStudent,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 400, description = "Malformed body or store failure", body = String),
        (status = 404, description = "No such student", body = String),
    )
)]
pub async fn update(
    state: State<ApiContext>,
    id: Path<i64>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> ApiResult<Json<Student>> {
    crud::update::<Student>(state, id, payload).await
}

#[utoipa::path(
    patch,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = [PatchOperation],
    responses(
        (status = 204, description = "Every operation applied"),
        (status = 400, description = "Invalid operation or value", body = String),
        (status = 404, description = "No such student or property", body = String),
    )
)]
pub async fn patch(
    state: State<ApiContext>,
    id: Path<i64>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> ApiResult<StatusCode> {
    crud::patch::<Student>(state, id, payload).await
}

/// Also removes the student's attendance
#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    tag = "Students",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Deletion message", body = String),
        (status = 404, description = "No such student", body = String),
    )
)]
pub async fn delete(state: State<ApiContext>, id: Path<i64>) -> ApiResult<String> {
    crud::delete::<Student>(state, id).await
}
