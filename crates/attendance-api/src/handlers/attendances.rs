//! `/api/Attendances` routes, including those addressed by
//! `(student_id, class_id)`.

use attendance_domain::{
    Attendance, AttendanceUpdate, NewAttendance, PatchDocument, PatchOperation,
};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;

use super::{body, crud};
use crate::context::ApiContext;
use crate::error::{Action, ApiError, ApiResult, persistence};

#[utoipa::path(
    get,
    path = "/api/Attendances",
    tag = "Attendances",
    responses(
        (status = 200, description = "Every attendance record", body = [Attendance]),
        (status = 400, description = "Store failure", body = String),
    )
)]
pub async fn list(state: State<ApiContext>) -> ApiResult<Json<Vec<Attendance>>> {
    crud::list::<Attendance>(state).await
}

#[utoipa::path(
    get,
    path = "/api/Attendances/{id}",
    tag = "Attendances",
    params(("id" = i64, Path, description = "Attendance identifier")),
    responses(
        (status = 200, description = "The attendance record", body = Attendance),
        (status = 404, description = "No such attendance", body = String),
    )
)]
pub async fn get_by_id(state: State<ApiContext>, id: Path<i64>) -> ApiResult<Json<Attendance>> {
    crud::get_by_id::<Attendance>(state, id).await
}

/// Student and class must exist; an identical record is reused
#[utoipa::path(
    post,
    path = "/api/Attendances",
    tag = "Attendances",
    request_body = NewAttendance,
    responses(
        (status = 201, description = "Created or reused attendance", body = Attendance,
            headers(("Location" = String, description = "URI of the attendance record"))),
        (status = 400, description = "Malformed body, unknown parent or store failure", body = String),
    )
)]
pub async fn create(
    state: State<ApiContext>,
    payload: Result<Json<NewAttendance>, JsonRejection>,
) -> ApiResult<Response> {
    crud::create::<Attendance>(state, payload).await
}

#[utoipa::path(
    patch,
    path = "/api/Attendances/{id}",
    tag = "Attendances",
    params(("id" = i64, Path, description = "Attendance identifier")),
    request_body = [PatchOperation],
    responses(
        (status = 204, description = "Every operation applied"),
        (status = 400, description = "Invalid operation or value", body = String),
        (status = 404, description = "No such attendance or property", body = String),
    )
)]
pub async fn patch(
    state: State<ApiContext>,
    id: Path<i64>,
    payload: Result<Json<PatchDocument>, JsonRejection>,
) -> ApiResult<StatusCode> {
    crud::patch::<Attendance>(state, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/Attendances/{id}",
    tag = "Attendances",
    params(("id" = i64, Path, description = "Attendance identifier")),
    responses(
        (status = 200, description = "Deletion message", body = String),
        (status = 404, description = "No such attendance", body = String),
    )
)]
pub async fn delete(state: State<ApiContext>, id: Path<i64>) -> ApiResult<String> {
    crud::delete::<Attendance>(state, id).await
}

/// `GET /api/Attendances/{student_id}/{class_id}`
#[utoipa::path(
    get,
    path = "/api/Attendances/{id}/{class_id}",
    tag = "Attendances",
    params(
        ("id" = i64, Path, description = "Student identifier"),
        ("class_id" = i64, Path, description = "Class identifier"),
    ),
    responses(
        (status = 200, description = "The attendance record", body = Attendance),
        (status = 404, description = "No such attendance", body = String),
    )
)]
pub async fn get_by_pair(
    State(ctx): State<ApiContext>,
    Path((student_id, class_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Attendance>> {
    ctx.attendances
        .get_by_pair(student_id, class_id)
        .await
        .map_err(persistence(Action::Retrieve, "attendance"))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Attendance"))
}

/// `PUT /api/Attendances/{student_id}/{class_id}`; only the time changes
#[utoipa::path(
    put,
    path = "/api/Attendances/{id}/{class_id}",
    tag = "Attendances",
    params(
        ("id" = i64, Path, description = "Student identifier"),
        ("class_id" = i64, Path, description = "Class identifier"),
    ),
    request_body = AttendanceUpdate,
    responses(
        (status = 200, description = "Updated attendance", body = Attendance),
        (status = 400, description = "Malformed body or store failure", body = String),
        (status = 404, description = "No such attendance", body = String),
    )
)]
pub async fn update_by_pair(
    State(ctx): State<ApiContext>,
    Path((student_id, class_id)): Path<(i64, i64)>,
    payload: Result<Json<AttendanceUpdate>, JsonRejection>,
) -> ApiResult<Json<Attendance>> {
    let update = body(payload, Action::Update, "attendance")?;

    let attendance = ctx
        .attendances
        .update_by_pair(student_id, class_id, update)
        .await
        .map_err(persistence(Action::Update, "attendance"))?;

    Ok(Json(attendance))
}
