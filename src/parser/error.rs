use thiserror::Error;

/// Syntax error with the line it was detected on.
#[derive(Debug, Clone, Error)]
#[error("syntax error: {message} (line {line})")]
pub struct LuaParseError {
    pub message: String,
    pub line: usize,
}

impl LuaParseError {
    pub(crate) fn new(message: impl Into<String>, line: usize) -> Self {
        LuaParseError {
            message: message.into(),
            line,
        }
    }
}
