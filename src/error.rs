//! Error type for model operations.

use thiserror::Error;
use crate::result::ResultCode;

/// Errors returned by model, environment and expression operations.
///
/// Errors originating in the engine carry the numeric result code, its canonical name and the
/// engine's explanation. All other variants are raised locally before anything is passed to the
/// engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The engine returned a non-zero result code.
    #[error("Error: {code}: {name}: {explanation}")]
    Engine {
        code        : i32,
        name        : &'static str,
        explanation : String,
    },

    /// Two arrays that must have the same length did not.
    #[error("Length mismatch for {what}: expected {expected}, got {got}")]
    LengthMismatch {
        what     : &'static str,
        expected : usize,
        got      : usize,
    },

    /// An argument was malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A handle created by another model was passed to this model.
    #[error("The {kind} with index {index} belongs to a different model")]
    ForeignHandle {
        kind  : &'static str,
        index : usize,
    },

    /// A handle was invalidated by a delete or a file read on its model.
    #[error("The {kind} with index {index} is stale")]
    StaleHandle {
        kind  : &'static str,
        index : usize,
    },

    /// The model or environment has been freed.
    #[error("Object has been freed")]
    Freed,

    /// An environment was freed while models created from it were still alive.
    #[error("Environment is still in use by {live} model(s)")]
    EnvInUse {
        live : usize,
    },

    /// A string argument contained an interior NUL byte.
    #[error("String contains NUL byte: {0}")]
    Nul(String),
}

impl Error {
    /// Build an engine error from a result code and the engine's explanation.
    pub fn engine(code : i32, explanation : String) -> Error {
        Error::Engine{
            code,
            name : ResultCode::from_code(code).map(|c| c.name()).unwrap_or("MDO_UNKNOWN_RESULT"),
            explanation,
        }
    }

    /// Returns the engine result code, if this error originated in the engine.
    pub fn code(&self) -> Option<i32> {
        if let Error::Engine { code, .. } = self { Some(*code) } else { None }
    }

    /// Returns the engine result code as a [ResultCode], if known.
    pub fn result_code(&self) -> Option<ResultCode> {
        self.code().and_then(ResultCode::from_code)
    }
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error() {
        let e = Error::engine(-2003,"Invalid column index".to_string());
        assert_eq!(e.code(),Some(-2003));
        assert_eq!(e.result_code(),Some(ResultCode::ModelInvalidColIdx));
        assert_eq!(e.to_string(),"Error: -2003: MDO_MODEL_INVALID_COL_IDX: Invalid column index");

        let e = Error::engine(-77,String::new());
        assert_eq!(e.result_code(),None);
        if let Error::Engine{name,..} = e { assert_eq!(name,"MDO_UNKNOWN_RESULT"); } else { panic!("expected engine error") }

        assert_eq!(Error::Freed.code(),None);
    }
}
