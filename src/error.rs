use thiserror::Error;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

pub type ServeResult<T> = Result<T, ServeError>;

/// Everything that can stop a request from being answered normally.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),
    #[error("path escapes web root: {0}")]
    PathTraversal(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServeError {
    /// Traversal attempts share the 404 of a missing file so the
    /// containment check cannot be told apart from an ordinary miss.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServeError::MalformedRequest(_) => StatusCode::BadRequest,
            ServeError::PathTraversal(_) => StatusCode::NotFound,
            ServeError::Forbidden(_) => StatusCode::Forbidden,
            ServeError::NotFound(_) => StatusCode::NotFound,
            ServeError::Io(_) | ServeError::Internal(_) => StatusCode::InternalServerError,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code() == StatusCode::InternalServerError
    }
}
