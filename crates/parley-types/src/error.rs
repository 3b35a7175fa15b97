use thiserror::Error;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to chat operations.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat not found")]
    NotFound,

    #[error("chat belongs to another user")]
    Forbidden,

    #[error("invalid chat input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound,
            other => ChatError::Storage(other.to_string()),
        }
    }
}

/// Errors related to message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,

    #[error("chat not found")]
    ChatNotFound,

    #[error("message belongs to another user's chat")]
    Forbidden,

    #[error("invalid message input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for MessageError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => MessageError::NotFound,
            other => MessageError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_chat_error_from_repository_not_found() {
        let err: ChatError = RepositoryError::NotFound.into();
        assert!(matches!(err, ChatError::NotFound));
    }

    #[test]
    fn test_chat_error_from_repository_query() {
        let err: ChatError = RepositoryError::Query("locked".to_string()).into();
        assert!(matches!(err, ChatError::Storage(_)));
    }

    #[test]
    fn test_message_error_from_repository() {
        let err: MessageError = RepositoryError::NotFound.into();
        assert!(matches!(err, MessageError::NotFound));
        let err: MessageError = RepositoryError::Connection.into();
        assert!(matches!(err, MessageError::Storage(_)));
    }
}
