// Runtime error taxonomy. Errors unwind through every enclosing construct
// until a pcall boundary or the host; break/return never travel this
// channel (they are control signals, not errors).

use thiserror::Error;

use crate::lua_value::LuaValue;
use crate::parser::LuaParseError;

pub type LuaResult<T> = Result<T, LuaError>;

#[derive(Debug, Clone, Error)]
pub enum LuaError {
    /// Operation applied to an unsupported value type with no metamethod.
    #[error("type error: {0}")]
    TypeError(String),

    /// Indexing or assigning with nil or NaN as a table key.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Numeric coercion failure, e.g. a non-numeric string in `+`.
    #[error("arithmetic error: {0}")]
    ArithmeticError(String),

    /// Attempt to call a non-callable without `__call`.
    #[error("call error: {0}")]
    CallError(String),

    /// Non-numeric start/limit/step in a numeric for.
    #[error("loop error: {0}")]
    LoopError(String),

    /// Call or evaluation nesting exceeded the configured limit.
    #[error("stack overflow")]
    StackOverflow,

    /// Raised by `error(v)` or a host callable; carries an arbitrary value.
    #[error("{value}")]
    UserError {
        value: LuaValue,
        traceback: Option<String>,
    },

    #[error(transparent)]
    Parse(#[from] LuaParseError),
}

impl LuaError {
    pub fn type_error(msg: impl Into<String>) -> Self {
        LuaError::TypeError(msg.into())
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        LuaError::InvalidKey(msg.into())
    }

    pub fn arithmetic(msg: impl Into<String>) -> Self {
        LuaError::ArithmeticError(msg.into())
    }

    pub fn call_error(msg: impl Into<String>) -> Self {
        LuaError::CallError(msg.into())
    }

    pub fn loop_error(msg: impl Into<String>) -> Self {
        LuaError::LoopError(msg.into())
    }

    pub fn user(value: LuaValue) -> Self {
        LuaError::UserError {
            value,
            traceback: None,
        }
    }

    /// The value handed to a protecting `pcall`: the payload of a user
    /// error, or the message string for every other kind.
    pub fn to_value(&self) -> LuaValue {
        match self {
            LuaError::UserError { value, .. } => value.clone(),
            other => LuaValue::str(&other.to_string()),
        }
    }
}
