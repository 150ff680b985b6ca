use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid JSON: {message}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("invalid type token '{value}' at '{path}' (expected one of: {allowed})")]
    InvalidTypeToken {
        value: String,
        path: String,
        allowed: String,
    },

    #[error("literal {value} at '{path}' where a type token string was expected")]
    InvalidTemplateValue { value: String, path: String },

    #[error("malformed path '{path}': {reason}")]
    MalformedPath { path: String, reason: String },

    #[error("template root must be an object or an array, found {kind}")]
    ScalarRoot { kind: &'static str },
}

impl CodecError {
    pub(crate) fn from_json(error: serde_json::Error) -> Self {
        CodecError::Parse {
            message: error.to_string(),
            line: error.line(),
            column: error.column(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
