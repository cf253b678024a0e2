//! # Partial Updates
//!
//! Patch documents (`replace`, `add`, `remove`) applied to entities through a
//! per-entity table of field name → typed setter, resolved at compile time.
//!
//! ```text
//! [
//!   { "op": "replace", "path": "/StudentName", "value": "Bob" },
//!   { "op": "remove",  "path": "/StudentName" }
//! ]
//! ```

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::{Attendance, Class, Student, timestamp};

// =============================================================================
// DOCUMENT
// =============================================================================

/// A single patch operation as received on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PatchOperation {
    #[serde(alias = "Op")]
    pub op: String,
    #[serde(alias = "Path")]
    pub path: String,
    #[serde(default, alias = "Value")]
    pub value: Value,
}

impl PatchOperation {
    pub fn new(op: &str, path: &str, value: Value) -> Self {
        Self {
            op: op.to_string(),
            path: path.to_string(),
            value,
        }
    }

    /// Field name with the leading `/` removed
    pub fn field(&self) -> &str {
        self.path.trim_start_matches('/')
    }
}

/// Patch document: either a bare array of operations or an object wrapping
/// them under `Operations`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PatchDocument {
    List(Vec<PatchOperation>),
    Wrapped {
        #[serde(rename = "Operations", alias = "operations")]
        operations: Vec<PatchOperation>,
    },
}

impl PatchDocument {
    pub fn operations(&self) -> &[PatchOperation] {
        match self {
            Self::List(ops) | Self::Wrapped { operations: ops } => ops,
        }
    }
}

impl From<Vec<PatchOperation>> for PatchDocument {
    fn from(ops: Vec<PatchOperation>) -> Self {
        Self::List(ops)
    }
}

/// Supported operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOpKind {
    Replace,
    Add,
    Remove,
}

impl PatchOpKind {
    /// Parse an operation name.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::UnsupportedOperation`] for anything but
    /// `replace`, `add` and `remove`.
    pub fn parse(op: &str) -> Result<Self, PatchError> {
        match op.to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            _ => Err(PatchError::UnsupportedOperation(op.to_string())),
        }
    }
}

// =============================================================================
// FIELD TABLES
// =============================================================================

/// Typed assignment for one field
pub enum FieldSetter<T> {
    Text(fn(&mut T, String)),
    Integer(fn(&mut T, i64)),
    Timestamp(fn(&mut T, DateTime<Utc>)),
    /// Known field that a patch may not touch (identifiers)
    Immutable,
}

/// Entry of an entity's patch table
pub struct PatchField<T> {
    pub name: &'static str,
    pub setter: FieldSetter<T>,
}

/// Entities that accept patch documents.
pub trait Patchable: Sized + 'static {
    /// Entity name used in error messages (`Student`, `Class`, ...)
    const ENTITY: &'static str;

    /// Field name → setter table
    const FIELDS: &'static [PatchField<Self>];

    /// Apply every operation in order, stopping at the first failure.
    ///
    /// On error `self` may hold partially applied changes; callers discard it.
    ///
    /// # Errors
    ///
    /// See [`PatchError`].
    fn apply_patch(&mut self, operations: &[PatchOperation]) -> Result<(), PatchError> {
        for operation in operations {
            apply_one(self, operation)?;
        }
        Ok(())
    }
}

fn apply_one<T: Patchable>(target: &mut T, operation: &PatchOperation) -> Result<(), PatchError> {
    let kind = PatchOpKind::parse(&operation.op)?;
    let name = operation.field();

    let field = T::FIELDS
        .iter()
        .find(|f| f.name == name)
        .ok_or_else(|| PatchError::UnknownField {
            entity: T::ENTITY,
            field: name.to_string(),
        })?;

    if matches!(field.setter, FieldSetter::Immutable) {
        return Err(PatchError::Immutable {
            field: name.to_string(),
        });
    }

    if kind == PatchOpKind::Remove {
        match field.setter {
            FieldSetter::Text(set) => set(target, String::new()),
            FieldSetter::Integer(set) => set(target, 0),
            FieldSetter::Timestamp(set) => set(target, timestamp::zero()),
            FieldSetter::Immutable => {}
        }
        return Ok(());
    }

    if operation.value.is_null() {
        return Err(match kind {
            PatchOpKind::Add => PatchError::NullValue {
                field: name.to_string(),
            },
            _ => PatchError::InvalidType {
                field: name.to_string(),
            },
        });
    }

    let invalid = || PatchError::InvalidType {
        field: name.to_string(),
    };

    match field.setter {
        FieldSetter::Text(set) => set(target, to_text(&operation.value).ok_or_else(invalid)?),
        FieldSetter::Integer(set) => {
            set(target, to_integer(&operation.value).ok_or_else(invalid)?);
        }
        FieldSetter::Timestamp(set) => {
            let parsed = operation
                .value
                .as_str()
                .and_then(timestamp::parse)
                .ok_or_else(invalid)?;
            set(target, parsed);
        }
        FieldSetter::Immutable => {}
    }

    Ok(())
}

fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn to_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl Patchable for Student {
    const ENTITY: &'static str = "Student";
    const FIELDS: &'static [PatchField<Self>] = &[
        PatchField {
            name: "StudentId",
            setter: FieldSetter::Immutable,
        },
        PatchField {
            name: "StudentName",
            setter: FieldSetter::Text(|s, v| s.student_name = v),
        },
    ];
}

impl Patchable for Class {
    const ENTITY: &'static str = "Class";
    const FIELDS: &'static [PatchField<Self>] = &[
        PatchField {
            name: "ClassId",
            setter: FieldSetter::Immutable,
        },
        PatchField {
            name: "ClassName",
            setter: FieldSetter::Text(|c, v| c.class_name = v),
        },
    ];
}

impl Patchable for Attendance {
    const ENTITY: &'static str = "Attendance";
    const FIELDS: &'static [PatchField<Self>] = &[
        PatchField {
            name: "AttendanceId",
            setter: FieldSetter::Immutable,
        },
        PatchField {
            name: "StudentId",
            setter: FieldSetter::Integer(|a, v| a.student_id = v),
        },
        PatchField {
            name: "ClassId",
            setter: FieldSetter::Integer(|a, v| a.class_id = v),
        },
        PatchField {
            name: "Time",
            setter: FieldSetter::Timestamp(|a, v| a.time = v),
        },
    ];
}

// =============================================================================
// ERRORS
// =============================================================================

/// Patch failures. Display strings are user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("Property '{field}' not found on the '{entity}' object.")]
    UnknownField { entity: &'static str, field: String },

    #[error("Invalid data type for the property.")]
    InvalidType { field: String },

    #[error("Value cannot be null for the 'add' operation.")]
    NullValue { field: String },

    #[error("Property '{field}' cannot be modified.")]
    Immutable { field: String },

    #[error("Unsupported patch operation '{0}'.")]
    UnsupportedOperation(String),
}

impl PatchError {
    /// Whether the failure names a field the entity does not have
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownField { .. })
    }
}
