//! Storage backend error types.

/// Which query of the pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum QueryStage {
    /// Row count, filtered or not
    #[display("count")]
    Count,
    /// Page fetch
    #[display("fetch")]
    Fetch,
}

/// Ways a table store can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum DatabaseErrorKind {
    /// Opening a connection failed
    #[display("could not connect: {_0}")]
    Connection(String),
    /// No pooled connection could be checked out
    #[display("connection pool exhausted or broken: {_0}")]
    Pool(String),
    /// A store's shared connection lock was poisoned by a panic
    #[display("connection lock poisoned")]
    LockPoisoned,
    /// The table has no columns in the current schema
    #[display("table '{_0}' not found")]
    TableNotFound(String),
    /// The catalog lookup for a table's columns failed
    #[display("column reflection for '{table}' failed: {message}")]
    Reflection {
        /// Table being reflected
        table: String,
        /// Backend message
        message: String,
    },
    /// A count or fetch statement was rejected
    #[display("{stage} query on '{table}' failed: {message}")]
    Query {
        /// Statement that failed
        stage: QueryStage,
        /// Table being queried
        table: String,
        /// Backend message
        message: String,
    },
    /// A returned row is not a JSON object
    #[display("row {index} is not a JSON object: {message}")]
    RowDecode {
        /// Position of the row in the result
        index: usize,
        /// Decoder message
        message: String,
    },
}

/// Storage failure with source location.
///
/// # Examples
///
/// ```
/// use tabula_error::{DatabaseError, DatabaseErrorKind, QueryStage};
///
/// let err = DatabaseError::new(DatabaseErrorKind::Query {
///     stage: QueryStage::Count,
///     table: "users".to_string(),
///     message: "permission denied".to_string(),
/// });
/// assert!(err.to_string().contains("count query on 'users' failed"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Database Error: {} at line {} in {}", kind, line, file)]
pub struct DatabaseError {
    /// What failed
    pub kind: DatabaseErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl DatabaseError {
    /// Create a new error at the current location.
    #[track_caller]
    pub fn new(kind: DatabaseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// A failed count or fetch against `table`.
    #[track_caller]
    pub fn query(stage: QueryStage, table: &str, message: impl std::fmt::Display) -> Self {
        Self::new(DatabaseErrorKind::Query {
            stage,
            table: table.to_string(),
            message: message.to_string(),
        })
    }
}
