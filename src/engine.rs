//! Engine entry point and its configuration.

use crate::ast::Template;
use crate::error::{ConfigError, ParseResult};
use crate::lexer::{tokenize, tokens_to_string};
use crate::parser::{Parser, DEFAULT_MAX_DEPTH};
use crate::stream::TokenStream;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings. Missing fields take their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Deepest allowed nesting of `if`/`foreach` directives.
    pub max_nesting_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Lexes, parses and renders templates with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse template source into an immutable tree that can be rendered any
    /// number of times.
    pub fn compile(&self, source: &str) -> ParseResult<Template> {
        let tokens = tokenize(source);
        tracing::debug!(tokens = tokens.len(), "tokenized template");
        tracing::trace!("tokens:\n{}", tokens_to_string(&tokens));

        let mut parser =
            Parser::with_max_depth(TokenStream::new(tokens), self.config.max_nesting_depth);
        let template = parser.parse()?;
        tracing::debug!(nodes = template.nodes.len(), "parsed template");
        tracing::trace!("ast:\n{}", template.pretty_print(""));
        Ok(template)
    }

    /// Compile `source` and render it against `model`.
    pub fn render(&self, source: &str, model: &Value) -> ParseResult<String> {
        let template = self.compile(source)?;
        Ok(template.render(model))
    }
}
