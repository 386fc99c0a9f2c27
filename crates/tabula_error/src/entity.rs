//! Entity resolution error types.

/// The requested type reference is not a registered record type.
///
/// Raised before any storage access takes place.
///
/// # Examples
///
/// ```
/// use tabula_error::InvalidEntityTypeError;
///
/// let err = InvalidEntityTypeError::new("NonExistentModel");
/// assert_eq!(err.type_name, "NonExistentModel");
/// assert!(err.to_string().contains("NonExistentModel"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "Invalid Entity Type: '{}' does not exist or is not a registered record type at line {} in {}",
    type_name,
    line,
    file
)]
pub struct InvalidEntityTypeError {
    /// The type reference that failed to resolve
    pub type_name: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvalidEntityTypeError {
    /// Create a new error for the given type reference.
    #[track_caller]
    pub fn new(type_name: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            type_name: type_name.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// An eager-load name that the entity does not declare as a relation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "Unknown Relation: '{}' is not a relation of '{}' at line {} in {}",
    relation,
    entity,
    line,
    file
)]
pub struct UnknownRelationError {
    /// Entity the relation was requested on
    pub entity: String,
    /// The undeclared relation name
    pub relation: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl UnknownRelationError {
    /// Create a new error for a relation missing from an entity.
    #[track_caller]
    pub fn new(entity: impl Into<String>, relation: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            entity: entity.into(),
            relation: relation.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
