//! Errors produced while loading a scene.

use thiserror::Error;

use crate::scene::ValidationError;

/// Malformed scene text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("unknown statement `{0}`")]
    UnknownStatement(String),

    #[error("unknown material type `{0}`")]
    UnknownMaterialType(String),

    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken { expected: String, found: String },

    #[error("expected {0}, found end of input")]
    UnexpectedEof(String),

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),
}

/// Errors that can occur while loading a scene.
///
/// Loading is all-or-nothing: any error discards the whole scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("syntax error at line {line}: {kind}")]
    Syntax { line: usize, kind: SyntaxError },

    #[error("invalid scene at line {line}: {kind}")]
    Validation { line: usize, kind: ValidationError },
}

impl SceneError {
    /// Line of the offending statement, if the error came from scene text.
    pub fn line(&self) -> Option<usize> {
        match self {
            SceneError::Io(_) => None,
            SceneError::Syntax { line, .. } | SceneError::Validation { line, .. } => Some(*line),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SceneError::Validation { .. })
    }
}

/// Result type for scene loading.
pub type SceneResult<T> = Result<T, SceneError>;
