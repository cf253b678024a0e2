//! # Student Attendance - Domain Model
//!
//! Entities, request payloads and value helpers shared by the persistence
//! and API layers. JSON field names are PascalCase on the wire
//! (`{"ClassId":1,"ClassName":"Math101"}`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod patch;
pub mod timestamp;

pub use patch::{
    FieldSetter, PatchDocument, PatchError, PatchField, PatchOpKind, PatchOperation, Patchable,
};

// =============================================================================
// ENTITIES
// =============================================================================

/// A student. Owns attendance rows through `Attendance::student_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct Student {
    pub student_id: i64,
    pub student_name: String,
}

/// A class. Owns attendance rows through `Attendance::class_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct Class {
    pub class_id: i64,
    pub class_name: String,
}

/// One student's presence at one class.
///
/// `attendance_id` is the surrogate key; the `(student_id, class_id)` pair is
/// unique in the store as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct Attendance {
    pub attendance_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    #[serde(with = "timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub time: DateTime<Utc>,
}

impl Attendance {
    /// Composite `(student_id, class_id)` pair
    #[must_use]
    pub const fn pair(&self) -> (i64, i64) {
        (self.student_id, self.class_id)
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// Body of a student create or full update. Any `StudentId` in the body is
/// ignored; the store assigns identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct NewStudent {
    pub student_name: String,
}

/// Body of a class create or full update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct NewClass {
    pub class_name: String,
}

/// Body of an attendance create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct NewAttendance {
    pub student_id: i64,
    pub class_id: i64,
    #[serde(with = "timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub time: DateTime<Utc>,
}

/// Body of an attendance full update addressed by `(student_id, class_id)`.
/// Only the time is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "PascalCase")]
pub struct AttendanceUpdate {
    #[serde(with = "timestamp")]
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub time: DateTime<Utc>,
}
