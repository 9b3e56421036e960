//! Error types for reading and compiling.
//!
//! Every failure here is detected before any faulty code runs. Faults that
//! can only be noticed while generated code executes come back as `Error`
//! cells instead (see [`crate::value::ErrorCode`]).

use crate::reader::SourceLoc;
use thiserror::Error;

/// A compile-time failure. The offending top-level expression produces no
/// code; whatever was emitted before the failure is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A builtin was invoked without the sub-expressions it needs.
    #[error("missing argument in {expr}, usage: {usage}")]
    ArgumentCount { usage: &'static str, expr: String },

    /// A symbol with no binding was used where no default can be supplied.
    #[error("undefined symbol: {name}")]
    UndefinedSymbol { name: String },

    /// The value of `expr` cannot be coerced to the required representation.
    #[error("type mismatch in {expr}: got {actual}, required {required}")]
    TypeMismatch {
        expr: String,
        actual: String,
        required: String,
    },

    /// Function literals nested deeper than the context stack allows.
    #[error("function literals nested deeper than {limit}")]
    ContextStackOverflow { limit: usize },

    /// The operator of an application is not something that can be applied.
    #[error("{reason}: {expr}")]
    UnknownOperator { expr: String, reason: String },

    /// Cranelift rejected the generated function.
    #[error("code generation failed: {0}")]
    Codegen(String),
}

impl CompileError {
    pub fn type_mismatch(
        expr: impl ToString,
        actual: impl ToString,
        required: impl ToString,
    ) -> Self {
        CompileError::TypeMismatch {
            expr: expr.to_string(),
            actual: actual.to_string(),
            required: required.to_string(),
        }
    }

    pub fn unknown_operator(expr: impl ToString, reason: impl Into<String>) -> Self {
        CompileError::UnknownOperator {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<cranelift_module::ModuleError> for CompileError {
    fn from(err: cranelift_module::ModuleError) -> Self {
        CompileError::Codegen(err.to_string())
    }
}

/// Malformed source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("{loc}: unexpected `)`")]
    UnexpectedClose { loc: SourceLoc },

    #[error("{loc}: unterminated list")]
    UnterminatedList { loc: SourceLoc },

    #[error("{loc}: unterminated string")]
    UnterminatedString { loc: SourceLoc },

    #[error("{loc}: invalid integer literal `{text}`")]
    InvalidInteger { text: String, loc: SourceLoc },

    #[error("{loc}: quote must be followed by an expression")]
    DanglingQuote { loc: SourceLoc },

    #[error("no input")]
    Empty,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
