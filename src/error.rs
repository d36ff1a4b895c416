//! Error types for template parsing, view loading and configuration.

use crate::lexer::Token;
use thiserror::Error;

/// A malformed template. Always aborts the render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: Token },

    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String },

    /// A token that cannot start a template element (e.g. a stray `}}`).
    #[error("unexpected token in template: {found}")]
    UnexpectedTemplateToken { found: Token },

    /// A reserved word where no directive may start (`{{ endif }}` at top
    /// level), or a word followed directly by another word. The second case
    /// names the first word even when it is an ordinary variable:
    /// `{{ name extra }}` reports `name`.
    #[error("unknown directive `{keyword}`")]
    UnknownDirective { keyword: String },

    #[error("expression has an empty property path")]
    EmptyPath,

    #[error("directives nested deeper than {max_depth} levels")]
    NestingTooDeep { max_depth: usize },
}

impl ParseError {
    pub(crate) fn unexpected(expected: impl Into<String>, found: Option<Token>) -> Self {
        let expected = expected.into();
        match found {
            Some(found) => ParseError::UnexpectedToken { expected, found },
            None => ParseError::UnexpectedEof { expected },
        }
    }
}

/// Errors raised while resolving and rendering a named view.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view not found: {name}")]
    NotFound { name: String },

    #[error("failed to read view {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("view {name} is malformed: {source}")]
    Parse {
        name: String,
        #[source]
        source: ParseError,
    },
}

/// Errors loading an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ParseResult<T> = Result<T, ParseError>;
