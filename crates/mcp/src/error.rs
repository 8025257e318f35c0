// Protocol-level errors. Each one terminates a single call with a JSON-RPC error.

use crate::protocol::JsonRpcError;

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid Request: {0}")]
    InvalidRequest(String),

    #[error("{0}")]
    MethodNotFound(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl McpError {
    pub fn unknown_tool(name: &str) -> Self {
        Self::MethodNotFound(format!("Unknown tool: {}", name))
    }

    pub fn unknown_method(method: &str) -> Self {
        Self::MethodNotFound(format!("Method not found: {}", method))
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError(_) => JsonRpcError::PARSE_ERROR,
            Self::InvalidRequest(_) => JsonRpcError::INVALID_REQUEST,
            Self::MethodNotFound(_) => JsonRpcError::METHOD_NOT_FOUND,
            Self::InvalidParams(_) => JsonRpcError::INVALID_PARAMS,
            Self::Serialization(_) | Self::Internal(_) => JsonRpcError::INTERNAL_ERROR,
        }
    }
}

impl From<McpError> for JsonRpcError {
    fn from(err: McpError) -> Self {
        JsonRpcError::new(err.code(), err.to_string())
    }
}
