//! Error types for stmtkit.

use thiserror::Error;

use crate::validation::Violations;

/// A defect in an option structure declaration.
///
/// These are programmer errors: an annotation the resolver does not
/// understand. They surface the first time a shape is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The render kind in a `ddl` tag is not one of the known kinds.
    #[error("{structure}.{field}: unknown render kind '{kind}'")]
    UnknownKind {
        structure: &'static str,
        field: &'static str,
        kind: String,
    },

    /// A render option in a `ddl` tag is not recognized.
    #[error("{structure}.{field}: unknown render option '{option}'")]
    UnknownOption {
        structure: &'static str,
        field: &'static str,
        option: String,
    },

    /// The `ddl` tag is empty.
    #[error("{structure}.{field}: missing render kind")]
    MissingKind {
        structure: &'static str,
        field: &'static str,
    },

    /// A static entry has no text to emit.
    #[error("{structure}: static entry #{position} has no SQL text")]
    EmptyStatic {
        structure: &'static str,
        position: usize,
    },

    /// A data field was declared with the `static` kind.
    #[error("{structure}.{field}: data fields cannot use the static kind")]
    StaticField {
        structure: &'static str,
        field: &'static str,
    },
}

/// The main error type for stmtkit operations.
#[derive(Debug, Error)]
pub enum StmtError {
    /// An option structure is declared incorrectly.
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// One or more validation rules failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] Violations),

    /// Failed to parse an identifier or input document.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement execution error.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StmtError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// The aggregated violations, if this is a validation failure.
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::Validation(v) => Some(v),
            _ => None,
        }
    }
}

/// Result type alias for stmtkit operations.
pub type StmtResult<T> = Result<T, StmtError>;
