//! The module contains the error the engine can throw.
//!
//! Domain validation errors:
//!
//! - [`InvalidVolume`] thrown when a drink volume is not strictly positive.
//! - [`UnknownDrinkType`] thrown when a drink type name is not recognized.
//! - [`InvalidEventWindow`] thrown when an event ends before (or when) it starts.
//!
//! The remaining variants describe lookups, permissions and storage failures.
//!
//!  [`InvalidVolume`]: EngineError::InvalidVolume
//!  [`UnknownDrinkType`]: EngineError::UnknownDrinkType
//!  [`InvalidEventWindow`]: EngineError::InvalidEventWindow
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),
    #[error("Unknown drink type: \"{0}\"")]
    UnknownDrinkType(String),
    #[error("Invalid event window: {0}")]
    InvalidEventWindow(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidVolume(a), Self::InvalidVolume(b)) => a == b,
            (Self::UnknownDrinkType(a), Self::UnknownDrinkType(b)) => a == b,
            (Self::InvalidEventWindow(a), Self::InvalidEventWindow(b)) => a == b,
            (Self::InvalidInput(a), Self::InvalidInput(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidCredentials, Self::InvalidCredentials) => true,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
