use std::sync::PoisonError;

use thiserror::Error;

use crate::sections::data::SectionId;

/// Failure taxonomy for the storage engine and application service.
///
/// Missing rows on update/delete are not errors: those operations report a
/// rows-affected count and the caller treats zero as a no-op. The one place a
/// missing row must fail is task creation against an absent parent section.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no section with id {0}")]
    NoSuchSection(SectionId),

    #[error("database error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(e: PoisonError<T>) -> Error {
        Error::Internal(e.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Error {
        Error::Internal(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
