//! Named views: loading template source and rendering it against a model.

use crate::engine::Engine;
use crate::error::ViewError;
use crate::value::Value;
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Maps a view name to raw template source.
pub trait ViewProvider {
    fn provide(&self, view_name: &str) -> Result<String, ViewError>;
}

/// Loads views from files below a root directory.
///
/// A view name is a relative path (`"list.html"`, `"apps/detail.html"`);
/// names that would escape the root are reported as not found.
#[derive(Debug, Clone)]
pub struct FileSystemViewProvider {
    root: PathBuf,
}

impl FileSystemViewProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn view_path(&self, view_name: &str) -> Option<PathBuf> {
        let relative = Path::new(view_name.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes || view_name.is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ViewProvider for FileSystemViewProvider {
    fn provide(&self, view_name: &str) -> Result<String, ViewError> {
        let not_found = || ViewError::NotFound {
            name: view_name.to_string(),
        };
        let path = self.view_path(view_name).ok_or_else(not_found)?;
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => not_found(),
            _ => ViewError::Io {
                name: view_name.to_string(),
                source,
            },
        })
    }
}

/// Views held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryViewProvider {
    views: HashMap<String, String>,
}

impl MemoryViewProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> &mut Self {
        self.views.insert(name.into(), source.into());
        self
    }

    pub fn with_views(
        views: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        let mut provider = Self::new();
        for (name, source) in views {
            provider.add(name, source);
        }
        provider
    }
}

impl ViewProvider for MemoryViewProvider {
    fn provide(&self, view_name: &str) -> Result<String, ViewError> {
        self.views
            .get(view_name)
            .cloned()
            .ok_or_else(|| ViewError::NotFound {
                name: view_name.to_string(),
            })
    }
}

/// A view name paired with the model to render it against, as returned by a
/// request handler.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAndView {
    pub view_name: String,
    pub model: Value,
}

impl ModelAndView {
    pub fn new(view_name: impl Into<String>, model: impl Into<Value>) -> Self {
        Self {
            view_name: view_name.into(),
            model: model.into(),
        }
    }
}

/// Loads a view from its provider and renders it.
pub struct ViewRenderer<P> {
    provider: P,
    engine: Engine,
}

impl<P: ViewProvider> ViewRenderer<P> {
    pub fn new(provider: P) -> Self {
        Self::with_engine(provider, Engine::new())
    }

    pub fn with_engine(provider: P, engine: Engine) -> Self {
        Self { provider, engine }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn render(&self, view_name: &str, model: &Value) -> Result<String, ViewError> {
        let source = self.provider.provide(view_name)?;
        let template = self
            .engine
            .compile(&source)
            .map_err(|source| ViewError::Parse {
                name: view_name.to_string(),
                source,
            })?;

        tracing::debug!(view = view_name, "rendering view");
        Ok(template.render(model))
    }

    pub fn render_model_and_view(&self, mav: &ModelAndView) -> Result<String, ViewError> {
        self.render(&mav.view_name, &mav.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;

    #[test]
    fn memory_provider_lookup() {
        let provider = MemoryViewProvider::with_views([("home", "hi")]);
        assert_eq!(provider.provide("home").unwrap(), "hi");
        assert!(matches!(
            provider.provide("away"),
            Err(ViewError::NotFound { name }) if name == "away"
        ));
    }

    #[test]
    fn file_system_provider_rejects_escaping_names() {
        let provider = FileSystemViewProvider::new("/views");
        assert_eq!(provider.view_path("list.html"), Some(PathBuf::from("/views/list.html")));
        assert_eq!(provider.view_path("/list.html"), Some(PathBuf::from("/views/list.html")));
        assert_eq!(provider.view_path("../secret"), None);
        assert_eq!(provider.view_path(""), None);
    }

    #[test]
    fn renders_model_and_view() {
        let renderer = ViewRenderer::new(MemoryViewProvider::with_views([(
            "greeting",
            "Hello, {{ model.name }}!",
        )]));
        let mav = ModelAndView::new("greeting", Value::map([("name", "World")]));
        assert_eq!(renderer.render_model_and_view(&mav).unwrap(), "Hello, World!");
    }

    #[test]
    fn parse_errors_name_the_view() {
        let renderer = ViewRenderer::new(MemoryViewProvider::with_views([("broken", "{{ a")]));
        match renderer.render("broken", &Value::Null) {
            Err(ViewError::Parse { name, source }) => {
                assert_eq!(name, "broken");
                assert_eq!(
                    source,
                    ParseError::UnexpectedEof {
                        expected: "RBRACE2".into()
                    }
                );
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
