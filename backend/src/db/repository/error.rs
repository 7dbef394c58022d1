//! Error types for repository operations.
//!
//! Every repository failure carries an [`ErrorContext`] describing where it
//! happened. `NotFound` and `Conflict` are outcomes the caller asked about;
//! the remaining variants are storage failures, which the HTTP layer logs and
//! never forwards to the client.

use std::fmt;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Where a repository error happened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Repository operation, e.g. `create_incident`
    pub operation: Option<String>,
    /// Entity kind, e.g. `incident`
    pub entity: Option<String>,
    /// Key of the entity, e.g. a case number
    pub entity_id: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    pub fn with_entity_id(mut self, id: impl ToString) -> Self {
        self.entity_id = Some(id.to_string());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("operation", &self.operation),
            ("entity", &self.entity),
            ("id", &self.entity_id),
            ("details", &self.details),
        ];
        let parts: Vec<String> = fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| format!("{}={}", name, v)))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The pool could not be built or hand out a connection.
    #[error("connection failed: {message} {context}")]
    Connection {
        message: String,
        context: ErrorContext,
    },

    /// SQLite rejected or failed a statement.
    #[error("query failed: {message} {context}")]
    Query {
        message: String,
        context: ErrorContext,
    },

    /// The addressed row does not exist.
    #[error("not found: {message} {context}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// A row with the same unique key already exists.
    #[error("conflict: {message} {context}")]
    Conflict {
        message: String,
        context: ErrorContext,
    },

    /// Unusable settings or a missing database file.
    #[error("invalid configuration: {message} {context}")]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    /// Schema setup, row decoding or a lost blocking task.
    #[error("internal error: {message} {context}")]
    Internal {
        message: String,
        context: ErrorContext,
    },
}

impl RepositoryError {
    pub fn connection(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Connection {
            message: message.into(),
            context,
        }
    }

    pub fn query(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Query {
            message: message.into(),
            context,
        }
    }

    pub fn not_found(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::NotFound {
            message: message.into(),
            context,
        }
    }

    pub fn conflict(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Conflict {
            message: message.into(),
            context,
        }
    }

    pub fn configuration(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Configuration {
            message: message.into(),
            context,
        }
    }

    pub fn internal(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::Internal {
            message: message.into(),
            context,
        }
    }

    fn parts(&self) -> (&str, &ErrorContext) {
        match self {
            Self::Connection { message, context }
            | Self::Query { message, context }
            | Self::NotFound { message, context }
            | Self::Conflict { message, context }
            | Self::Configuration { message, context }
            | Self::Internal { message, context } => (message, context),
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Connection { context, .. }
            | Self::Query { context, .. }
            | Self::NotFound { context, .. }
            | Self::Conflict { context, .. }
            | Self::Configuration { context, .. }
            | Self::Internal { context, .. } => context,
        }
    }

    /// The message without its context suffix.
    pub fn message(&self) -> &str {
        self.parts().0
    }

    pub fn context(&self) -> &ErrorContext {
        self.parts().1
    }

    /// Whether storage itself failed, as opposed to reporting a missing or
    /// duplicate row.
    pub fn is_storage_failure(&self) -> bool {
        !matches!(self, Self::NotFound { .. } | Self::Conflict { .. })
    }

    /// Record the repository operation, replacing any earlier one.
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }
}

#[cfg(feature = "sqlite-repo")]
impl From<diesel::result::Error> for RepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::DatabaseError(kind, info) => {
                let context = ErrorContext::default().with_details(format!("{:?}", kind));
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        RepositoryError::conflict(info.message(), context)
                    }
                    _ => RepositoryError::query(info.message(), context),
                }
            }
            Error::NotFound => RepositoryError::not_found("no matching row", ErrorContext::default()),
            Error::DeserializationError(e) => {
                RepositoryError::internal(format!("row decoding failed: {}", e), ErrorContext::default())
            }
            other => RepositoryError::query(other.to_string(), ErrorContext::default()),
        }
    }
}

#[cfg(feature = "sqlite-repo")]
impl From<diesel::r2d2::PoolError> for RepositoryError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        RepositoryError::connection(err.to_string(), ErrorContext::default().with_details("pool"))
    }
}
