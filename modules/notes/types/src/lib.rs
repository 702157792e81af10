//! Shared types for the notes service and its HTTP clients.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =====================================================
// Domain Types
// =====================================================

/// A stored note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /notes` and `PUT /notes/{id}`.
///
/// Every field is optional on the wire so that a missing field is reported
/// as a validation error on that field rather than as a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotePayload {
    /// Required on create. On replace it defaults to the id in the path.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

// =====================================================
// Response Types
// =====================================================

/// Field name -> human readable violations, ordered by field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// JSON body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl ErrorBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            fields: None,
        }
    }

    pub fn with_fields(msg: impl Into<String>, fields: FieldErrors) -> Self {
        Self {
            error: msg.into(),
            fields: Some(fields),
        }
    }
}

/// Service health status
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub running: bool,
    pub uptime_secs: u64,
    /// Repository backend in use ("memory" or "sqlite")
    pub backend: String,
    pub notes_created: u64,
    pub notes_updated: u64,
    pub notes_deleted: u64,
}
