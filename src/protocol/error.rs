//! Error types for A2A protocol operations

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Closed set of JSON-RPC error codes used by the A2A protocol
///
/// The numeric values are fixed by the protocol and must match exactly for interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Invalid JSON was received
    ParseError,

    /// The JSON sent is not a valid request object
    InvalidRequest,

    /// The method does not exist or is not available
    MethodNotFound,

    /// Invalid method parameters
    InvalidParams,

    /// Internal JSON-RPC error
    InternalError,

    /// The referenced task does not exist
    TaskNotFound,

    /// The task is in a terminal state and cannot be canceled
    TaskNotCancelable,

    /// The agent does not support the requested operation
    UnsupportedOperation,

    /// The request content type is not supported
    ContentTypeNotSupported,

    /// The agent does not support push notifications
    PushNotificationNotSupported,
}

impl ErrorCode {
    /// Every code in the taxonomy
    pub const ALL: [ErrorCode; 10] = [
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::InternalError,
        ErrorCode::TaskNotFound,
        ErrorCode::TaskNotCancelable,
        ErrorCode::UnsupportedOperation,
        ErrorCode::ContentTypeNotSupported,
        ErrorCode::PushNotificationNotSupported,
    ];

    /// Numeric wire value of the code
    pub const fn code(self) -> i64 {
        match self {
            ErrorCode::ParseError => -32700,
            ErrorCode::InvalidRequest => -32600,
            ErrorCode::MethodNotFound => -32601,
            ErrorCode::InvalidParams => -32602,
            ErrorCode::InternalError => -32603,
            ErrorCode::TaskNotFound => -32001,
            ErrorCode::TaskNotCancelable => -32002,
            ErrorCode::UnsupportedOperation => -32003,
            ErrorCode::ContentTypeNotSupported => -32004,
            ErrorCode::PushNotificationNotSupported => -32005,
        }
    }

    /// Look up a code by its numeric wire value
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Short human-readable description
    pub const fn description(self) -> &'static str {
        match self {
            ErrorCode::ParseError => "Parse error",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::MethodNotFound => "Method not found",
            ErrorCode::InvalidParams => "Invalid params",
            ErrorCode::InternalError => "Internal error",
            ErrorCode::TaskNotFound => "Task not found",
            ErrorCode::TaskNotCancelable => "Task not cancelable",
            ErrorCode::UnsupportedOperation => "Unsupported operation",
            ErrorCode::ContentTypeNotSupported => "Content type not supported",
            ErrorCode::PushNotificationNotSupported => "Push notification not supported",
        }
    }

    /// Standard JSON-RPC codes raised by the envelope parser or dispatcher
    ///
    /// The remaining codes are A2A domain errors raised by the task manager.
    pub const fn is_protocol_level(self) -> bool {
        matches!(
            self,
            ErrorCode::ParseError
                | ErrorCode::InvalidRequest
                | ErrorCode::MethodNotFound
                | ErrorCode::InvalidParams
                | ErrorCode::InternalError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.code())
    }
}

/// Main error type for A2A protocol operations
///
/// Every variant maps onto one numeric protocol code through [`A2AError::code`], so callers
/// can branch on `TaskNotFound` vs `InternalError` regardless of where the failure was raised.
#[derive(Debug, Error)]
pub enum A2AError {
    /// Malformed JSON input
    #[error("Parse error: {0}")]
    Parse(String),

    /// Structurally invalid JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown JSON-RPC method
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    /// Parameters missing or of the wrong shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Internal failure (missing handler, bad response, ...)
    #[error("Internal error: {0}")]
    Internal(String),

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// Task is terminal and cannot be canceled
    #[error("Task is in terminal state and cannot be cancelled: {task_id}")]
    TaskNotCancelable { task_id: String },

    /// Operation not supported by this agent
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Request content type not supported
    #[error("Content type not supported: {0}")]
    ContentTypeNotSupported(String),

    /// Push notifications are not supported
    #[error("Push notifications are not supported")]
    PushNotificationNotSupported,

    /// Transport-level error (network, connection, non-2xx status, etc.)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timeout error
    #[error("Request timeout")]
    Timeout,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A JSON-RPC error object returned by a remote agent
    #[error("JSON-RPC error {code}: {message}")]
    Remote {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl A2AError {
    /// Build an error from a remote JSON-RPC error object
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        A2AError::Remote {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Numeric protocol code for this error
    ///
    /// Remote errors keep whatever code the peer sent, even outside the known taxonomy.
    pub fn code(&self) -> i64 {
        match self {
            A2AError::Remote { code, .. } => *code,
            other => other.error_code().map_or(-32603, ErrorCode::code),
        }
    }

    /// Taxonomy entry for this error, if the code is a known one
    pub fn error_code(&self) -> Option<ErrorCode> {
        let code = match self {
            A2AError::Parse(_) => ErrorCode::ParseError,
            A2AError::InvalidRequest(_) => ErrorCode::InvalidRequest,
            A2AError::MethodNotFound { .. } => ErrorCode::MethodNotFound,
            A2AError::InvalidParams(_) => ErrorCode::InvalidParams,
            A2AError::Internal(_)
            | A2AError::Transport(_)
            | A2AError::Timeout
            | A2AError::Serialization(_) => ErrorCode::InternalError,
            A2AError::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            A2AError::TaskNotCancelable { .. } => ErrorCode::TaskNotCancelable,
            A2AError::UnsupportedOperation(_) => ErrorCode::UnsupportedOperation,
            A2AError::ContentTypeNotSupported(_) => ErrorCode::ContentTypeNotSupported,
            A2AError::PushNotificationNotSupported => ErrorCode::PushNotificationNotSupported,
            A2AError::Remote { code, .. } => return ErrorCode::from_code(*code),
        };
        Some(code)
    }

    /// Message suitable for the `message` member of a JSON-RPC error object
    pub fn message(&self) -> String {
        match self {
            A2AError::Remote { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}
