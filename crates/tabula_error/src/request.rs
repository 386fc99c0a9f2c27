//! Request validation error types.

/// Malformed table view request parameters.
#[derive(Debug, Clone)]
pub struct InvalidRequestError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvalidRequestError {
    /// Create a new InvalidRequestError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::InvalidRequestError;
    ///
    /// let err = InvalidRequestError::new("length must be -1 or non-negative");
    /// assert!(err.to_string().contains("length"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for InvalidRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid Request: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for InvalidRequestError {}

/// Sort column index outside the entity's column list.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "Invalid Sort Column: index {} out of range for {} columns at line {} in {}",
    index,
    column_count,
    line,
    file
)]
pub struct InvalidSortColumnError {
    /// Requested column index
    pub index: usize,
    /// Number of columns available
    pub column_count: usize,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl InvalidSortColumnError {
    /// Create a new error for an out-of-range sort index.
    #[track_caller]
    pub fn new(index: usize, column_count: usize) -> Self {
        let location = std::panic::Location::caller();
        Self {
            index,
            column_count,
            line: location.line(),
            file: location.file(),
        }
    }
}
