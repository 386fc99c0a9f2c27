//! Error types for the Tabula library.
//!
//! Every error records the source location where it was created. The
//! [`TabulaError`] wrapper collects them so pipeline stages can use `?`
//! across crate boundaries.

mod codec;
mod config;
mod database;
mod entity;
mod request;

pub use codec::CodecError;
pub use config::{ConfigError, ConfigOrigin};
pub use database::{DatabaseError, DatabaseErrorKind, QueryStage};
pub use entity::{InvalidEntityTypeError, UnknownRelationError};
pub use request::{InvalidRequestError, InvalidSortColumnError};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum TabulaErrorKind {
    /// Target type is not a registered record type
    InvalidEntityType(InvalidEntityTypeError),
    /// Eager-load name is not a declared relation
    UnknownRelation(UnknownRelationError),
    /// Sort column index outside the column list
    InvalidSortColumn(InvalidSortColumnError),
    /// Malformed request parameters
    InvalidRequest(InvalidRequestError),
    /// Storage or schema collaborator failure
    Database(DatabaseError),
    /// Output encoding or decoding failure
    Codec(CodecError),
    /// Configuration error
    Config(ConfigError),
}

impl std::fmt::Display for TabulaErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabulaErrorKind::InvalidEntityType(e) => write!(f, "{}", e),
            TabulaErrorKind::UnknownRelation(e) => write!(f, "{}", e),
            TabulaErrorKind::InvalidSortColumn(e) => write!(f, "{}", e),
            TabulaErrorKind::InvalidRequest(e) => write!(f, "{}", e),
            TabulaErrorKind::Database(e) => write!(f, "{}", e),
            TabulaErrorKind::Codec(e) => write!(f, "{}", e),
            TabulaErrorKind::Config(e) => write!(f, "{}", e),
        }
    }
}

/// Tabula error with kind discrimination.
#[derive(Debug)]
pub struct TabulaError(Box<TabulaErrorKind>);

impl TabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: TabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TabulaErrorKind {
        &self.0
    }
}

impl std::fmt::Display for TabulaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tabula Error: {}", self.0)
    }
}

impl std::error::Error for TabulaError {}

// Generic From implementation for any type that converts to TabulaErrorKind
impl<T> From<T> for TabulaError
where
    T: Into<TabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tabula operations.
pub type TabulaResult<T> = std::result::Result<T, TabulaError>;
