//! Error taxonomy for note operations and its mapping onto HTTP responses.
//!
//! The `Display` text carries the underlying database error and is meant for
//! the log. Clients only ever see the fixed messages from `public_message`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use notes_types::{ErrorResponse, MessageResponse};
use thiserror::Error;

/// The store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOp {
    Schema,
    Insert,
    Update,
    List,
    Delete,
}

impl NoteOp {
    fn public_message(self) -> &'static str {
        match self {
            NoteOp::Schema => "Failed to create table",
            NoteOp::Insert => "Failed to insert note",
            NoteOp::Update => "Failed to update",
            NoteOp::List => "Failed to retrieve records",
            NoteOp::Delete => "Failed to delete note",
        }
    }
}

pub type NoteResult<T> = Result<T, NoteError>;

#[derive(Debug, Error)]
pub enum NoteError {
    /// Client omitted a required field or sent a body that is not a note
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Note {0} not found")]
    NotFound(i64),

    /// No connection could be obtained from the pool
    #[error("Database connection failed: {0}")]
    StorageUnavailable(#[from] r2d2::Error),

    #[error("Database error during {op:?}: {source}")]
    Storage {
        op: NoteOp,
        #[source]
        source: rusqlite::Error,
    },
}

impl NoteError {
    pub fn storage(op: NoteOp) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| NoteError::Storage { op, source }
    }

    /// Message safe to hand to the client
    pub fn public_message(&self) -> &'static str {
        match self {
            NoteError::Validation(_) => "Missing required fields",
            NoteError::NotFound(_) => "ID not found",
            NoteError::StorageUnavailable(_) => "Database connection failed",
            NoteError::Storage { op, .. } => op.public_message(),
        }
    }
}

impl ResponseError for NoteError {
    fn status_code(&self) -> StatusCode {
        match self {
            NoteError::Validation(_) => StatusCode::BAD_REQUEST,
            NoteError::NotFound(_) => StatusCode::NOT_FOUND,
            NoteError::StorageUnavailable(_) | NoteError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        match self {
            // Not-found answers with a `message` body, like the success paths
            NoteError::NotFound(_) => builder.json(MessageResponse::new(self.public_message())),
            _ => builder.json(ErrorResponse::new(self.public_message())),
        }
    }
}
