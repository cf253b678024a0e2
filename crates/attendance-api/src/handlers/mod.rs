//! # HTTP Handlers
//!
//! CRUD handlers shared by every entity, instantiated per collection in
//! documented modules, plus the attendance routes addressed by
//! `(student_id, class_id)`.

pub mod attendances;
pub mod classes;
pub mod crud;
pub mod students;

use attendance_domain::{Attendance, Class, Student};
use attendance_persistence::{CachedRepository, StoredEntity};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::context::ApiContext;
use crate::error::{Action, ApiError, ApiResult};

/// An entity exposed as a REST collection
pub trait Resource: StoredEntity<Draft: DeserializeOwned> + 'static {
    /// Lower-case name used in failure messages
    const NAME: &'static str;

    /// Collection segment under `/api`
    const COLLECTION: &'static str;

    fn repository(ctx: &ApiContext) -> &CachedRepository<Self>;
}

impl Resource for Student {
    const NAME: &'static str = "student";
    const COLLECTION: &'static str = "students";

    fn repository(ctx: &ApiContext) -> &CachedRepository<Self> {
        &ctx.students
    }
}

impl Resource for Class {
    const NAME: &'static str = "class";
    const COLLECTION: &'static str = "classes";

    fn repository(ctx: &ApiContext) -> &CachedRepository<Self> {
        &ctx.classes
    }
}

impl Resource for Attendance {
    const NAME: &'static str = "attendance";
    const COLLECTION: &'static str = "Attendances";

    fn repository(ctx: &ApiContext) -> &CachedRepository<Self> {
        &ctx.attendances
    }
}

/// Unwrap a JSON body; a malformed one fails the request as `action`
pub(crate) fn body<T>(
    payload: Result<Json<T>, JsonRejection>,
    action: Action,
    entity: &'static str,
) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::failed(action, entity, rejection.body_text()))
}

/// `201 Created` with a `Location` header pointing at the new entity
pub(crate) fn created<T: Serialize>(collection: &str, id: i64, entity: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/{collection}/{id}"))],
        Json(entity),
    )
        .into_response()
}
