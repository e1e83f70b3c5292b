//! Shared types for the notes service and its HTTP clients.

use serde::{Deserialize, Deserializer, Serialize};

/// Keeps a key that is present with a `null` value as `Some(None)`, so it can
/// be told apart from a missing key (`None`, via `#[serde(default)]`).
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// =====================================================
// Request Types
// =====================================================

/// Body of `POST /insert2`.
///
/// Outer `None` means the key was missing; `Some(None)` means it was sent as
/// `null`. Only missing keys are rejected by the service.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub note_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub note_description: Option<Option<String>>,
}

/// Body of `PUT /update2/{id}`. Absent fields are written as NULL.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    pub note_name: Option<String>,
    pub note_description: Option<String>,
}

// =====================================================
// Response Types
// =====================================================

/// `201` body of a successful insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// Confirmation body for update/delete, also used for "ID not found"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { message: msg.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

// =====================================================
// Domain Types
// =====================================================

/// A persisted note row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub note_name: String,
    pub note_description: Option<String>,
}
