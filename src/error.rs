use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(String),
}

/// Why a catalog could not be initialized. Both variants end the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("invalid cache location: {0}")]
    InvalidCacheLocation(String),
    #[error("cannot create catalog service: {0}")]
    Construction(String),
}

impl InitError {
    pub fn kind(&self) -> InitErrorKind {
        match self {
            InitError::InvalidCacheLocation(_) => InitErrorKind::InvalidCacheLocation,
            InitError::Construction(_) => InitErrorKind::ConstructionError,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InitErrorKind {
    InvalidCacheLocation,
    ConstructionError,
}

impl InitErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            InitErrorKind::InvalidCacheLocation => "invalid_cache_location",
            InitErrorKind::ConstructionError => "construction_error",
        }
    }
}

impl fmt::Display for InitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
