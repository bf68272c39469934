/// Result type alias for paginated query operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for count-then-paginate queries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// The statement could not be split into clauses to build a count query.
   #[error("malformed paginated query: {reason}")]
   MalformedQuery { reason: String },

   /// The count or data statement was rejected by SQLite, or no connection
   /// could be acquired to run it.
   #[error(transparent)]
   Query(#[from] sqlx::Error),

   /// The count statement did not produce a single integer value.
   #[error("count query result could not be read as an integer: {0}")]
   Scan(#[source] sqlx::Error),

   /// The page handler passed to `query_paginated_all` failed.
   ///
   /// The handler's error is kept unchanged as the source and can be
   /// recovered with `downcast_ref`.
   #[error("page callback failed: {0}")]
   Callback(#[source] Box<dyn std::error::Error + Send + Sync>),

   /// Page number must be at least 1.
   #[error("page must be at least 1, got {0}")]
   InvalidPage(i64),

   /// Page size must be greater than zero.
   #[error("page size must be greater than zero, got {0}")]
   InvalidPageSize(i64),

   /// Spill must not be negative.
   #[error("spill must not be negative, got {0}")]
   InvalidSpill(i64),

   /// Count column is interpolated into SQL and must be `*`, an identifier, or
   /// `DISTINCT <identifier>`.
   #[error(
      "invalid count column '{column}': must be '*', an identifier matching [a-zA-Z_][a-zA-Z0-9_.]*, or 'DISTINCT <identifier>'"
   )]
   InvalidCountColumn { column: String },

   /// SQLite type that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// The cancellation token fired before both queries finished.
   #[error("paginated query was cancelled")]
   Cancelled,
}

impl Error {
   pub(crate) fn malformed(reason: impl Into<String>) -> Self {
      Error::MalformedQuery {
         reason: reason.into(),
      }
   }

   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::MalformedQuery { .. } => "MALFORMED_QUERY".to_string(),
         Error::Query(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "QUERY_ERROR".to_string()
         }
         Error::Scan(_) => "SCAN_ERROR".to_string(),
         Error::Callback(_) => "CALLBACK_ERROR".to_string(),
         Error::InvalidPage(_) => "INVALID_PAGE".to_string(),
         Error::InvalidPageSize(_) => "INVALID_PAGE_SIZE".to_string(),
         Error::InvalidSpill(_) => "INVALID_SPILL".to_string(),
         Error::InvalidCountColumn { .. } => "INVALID_COUNT_COLUMN".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::Cancelled => "CANCELLED".to_string(),
      }
   }

   /// Whether this error came from invalid pagination options.
   pub fn is_config_error(&self) -> bool {
      matches!(
         self,
         Error::InvalidPage(_)
            | Error::InvalidPageSize(_)
            | Error::InvalidSpill(_)
            | Error::InvalidCountColumn { .. }
      )
   }
}
