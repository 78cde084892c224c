//! Error types for the to-do core.

/// To-do operation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    /// No item with this id for the calling user.
    #[error("todo not found: {todo_id}")]
    NotFound { todo_id: String },

    /// Request context carries no authorized principal.
    #[error("unauthenticated: {message}")]
    Unauthenticated { message: String },

    /// Request payload rejected.
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// Backend storage failure.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Attachment store could not issue a handle.
    #[error("attachment error: {message}")]
    Attachment { message: String },
}

impl TodoError {
    /// HTTP status the handlers answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Unauthenticated { .. } => 401,
            Self::Validation { .. } => 400,
            Self::Storage { .. } | Self::Attachment { .. } => 500,
        }
    }
}

/// Result type for to-do operations.
pub type TodoResult<T> = Result<T, TodoError>;

/// Missing or invalid deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {name}")]
    Missing { name: &'static str },

    #[error("invalid value for {name}: {message}")]
    Invalid { name: &'static str, message: String },
}
