//! tinyview: a minimal view template engine.
//!
//! This crate does one job: take raw template text and a model, and return
//! the rendered text. The language is deliberately small and auditable.
//!
//! Supported:
//! - Literal text, copied verbatim.
//! - `{{ model.user.name }}`: dotted property expressions. The root model is
//!   bound as `model`; each further segment is a field access on a map or
//!   an [`Object`].
//! - `{{ if cond }} ... {{ else }} ... {{ endif }}` (else is optional). The
//!   condition is truthy when it renders to anything other than `""` or
//!   `"false"`. Lists render as `[a, b]`, so a present empty list is truthy.
//! - `{{ foreach item : model.items }} ... {{ endforeach }}`, nestable. Each
//!   iteration binds `item` in its own scope.
//!
//! Not supported:
//! - Includes, partials or custom directives.
//! - Filters, operators or literals inside expressions.
//! - Caching; compile once with [`Engine::compile`] if you need reuse.
//!
//! Failure policy:
//! - A malformed template is a [`ParseError`] and nothing is rendered.
//! - A missing binding or field renders as the empty string, never an error.
//! - `foreach` over something that is not a list renders nothing.
//!
//! # Example
//!
//! ```
//! use tinyview::{render, Value};
//!
//! let model = Value::map([("title", Value::from("Apps")), ("apps", Value::from(vec!["a", "b"]))]);
//! let out = render(
//!     "<h1>{{ model.title }}</h1>{{ foreach app : model.apps }}<p>{{ app }}</p>{{ endforeach }}",
//!     &model,
//! )
//! .unwrap();
//! assert_eq!(out, "<h1>Apps</h1><p>a</p><p>b</p>");
//! ```

pub mod ast;
pub mod context;
pub mod engine;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod value;
pub mod view;

pub use ast::{Expression, ForeachNode, IfNode, Node, PropertyPath, Template};
pub use context::{Context, ScopeGuard};
pub use engine::{Engine, EngineConfig};
pub use error::{ConfigError, ParseError, ViewError};
pub use lexer::{tokenize, tokens_to_string, Token, TokenKind};
pub use parser::{parse_template, Parser};
pub use stream::TokenStream;
pub use value::{Object, Value};
pub use view::{FileSystemViewProvider, MemoryViewProvider, ModelAndView, ViewProvider, ViewRenderer};

/// Render `source` against `model` with the default engine settings.
///
/// Fails only if the template is malformed; unresolvable expressions render
/// as empty text.
pub fn render(source: &str, model: &Value) -> Result<String, ParseError> {
    Engine::new().render(source, model)
}
