// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! String catalog access.
//!
//! A [`StringCatalog`] resolves message keys to raw templates through an
//! injected [`TemplateProvider`] and performs positional substitution:
//! - `{0}`, `{1}`, ... are replaced by the matching argument
//! - `''` renders a single quote
//! - text between single quotes is copied literally (so `'{0}'` is not a placeholder)
//! - a placeholder with no matching argument is left as written

use crate::message::{FormattedMessage, LazyArg};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Embedded default bundle.
const DEFAULT_BUNDLE: &str = include_str!("../resources/messages.toml");

/// Errors raised while resolving or formatting catalog templates.
///
/// These signal a setup defect (bad key, missing file) and are never retried.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown catalog key: {0}")]
    UnknownKey(String),

    #[error("Catalog key must not be empty")]
    EmptyKey,

    #[error("Failed to read catalog file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed template for '{key}': {detail}")]
    Malformed { key: String, detail: String },
}

/// Source of raw, unformatted templates.
pub trait TemplateProvider: Send + Sync {
    /// Look up the template for `key`, failing with
    /// [`CatalogError::UnknownKey`] when the provider has no entry.
    fn template(&self, key: &str) -> Result<String, CatalogError>;
}

/// Formatting function bound into a [`FormattedMessage`].
pub type FormatFn = Arc<dyn Fn(&str, &[String]) -> Result<String, CatalogError> + Send + Sync>;

/// In-memory templates.
#[derive(Clone, Debug, Default)]
pub struct MapProvider {
    templates: HashMap<String, String>,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flat TOML table of `key = "template"` entries
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let templates: HashMap<String, String> = toml::from_str(content)?;
        Ok(Self { templates })
    }

    /// Parse a flat JSON object of `"key": "template"` entries
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let templates: HashMap<String, String> = serde_json::from_str(content)?;
        Ok(Self { templates })
    }

    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(key.into(), template.into());
    }

    /// Add a template (builder form)
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            templates: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl TemplateProvider for MapProvider {
    fn template(&self, key: &str) -> Result<String, CatalogError> {
        self.templates
            .get(key)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownKey(key.to_string()))
    }
}

/// Templates loaded from a TOML or JSON file on first lookup.
///
/// A load failure is reported on every lookup until the file becomes readable.
#[derive(Debug)]
pub struct FileProvider {
    path: PathBuf,
    loaded: RwLock<Option<Arc<MapProvider>>>,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            loaded: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn templates(&self) -> Result<Arc<MapProvider>, CatalogError> {
        if let Some(ref map) = *self.loaded.read() {
            return Ok(Arc::clone(map));
        }

        let mut slot = self.loaded.write();
        if let Some(ref map) = *slot {
            return Ok(Arc::clone(map));
        }
        let content = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.display().to_string(),
            source,
        })?;
        let map = if self.path.extension().is_some_and(|e| e == "json") {
            MapProvider::from_json_str(&content)?
        } else {
            MapProvider::from_toml_str(&content)?
        };
        tracing::debug!(path = %self.path.display(), templates = map.len(), "loaded catalog file");
        let map = Arc::new(map);
        *slot = Some(Arc::clone(&map));
        Ok(map)
    }
}

impl TemplateProvider for FileProvider {
    fn template(&self, key: &str) -> Result<String, CatalogError> {
        self.templates()?.template(key)
    }
}

/// Providers consulted in order; the first one that knows a key wins.
///
/// Only [`CatalogError::UnknownKey`] falls through to the next layer. Any
/// other error stops the lookup.
#[derive(Clone, Default)]
pub struct LayeredProvider {
    layers: Vec<Arc<dyn TemplateProvider>>,
}

impl LayeredProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a lower-priority layer
    pub fn layer(mut self, provider: impl TemplateProvider + 'static) -> Self {
        self.layers.push(Arc::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl TemplateProvider for LayeredProvider {
    fn template(&self, key: &str) -> Result<String, CatalogError> {
        for layer in &self.layers {
            match layer.template(key) {
                Err(CatalogError::UnknownKey(_)) => continue,
                other => return other,
            }
        }
        Err(CatalogError::UnknownKey(key.to_string()))
    }
}

/// The embedded default bundle
pub fn default_bundle() -> Result<MapProvider, CatalogError> {
    MapProvider::from_toml_str(DEFAULT_BUNDLE)
}

/// Catalog handle shared by every message it builds.
#[derive(Clone)]
pub struct StringCatalog {
    provider: Arc<dyn TemplateProvider>,
}

impl StringCatalog {
    pub fn new(provider: impl TemplateProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn from_shared(provider: Arc<dyn TemplateProvider>) -> Self {
        Self { provider }
    }

    /// Catalog backed by the embedded default bundle
    pub fn bundled() -> Result<Self, CatalogError> {
        Ok(Self::new(default_bundle()?))
    }

    /// Raw template for `key`
    pub fn template(&self, key: &str) -> Result<String, CatalogError> {
        if key.is_empty() {
            return Err(CatalogError::EmptyKey);
        }
        self.provider.template(key)
    }

    /// Resolve `key` and substitute `args`.
    ///
    /// With no arguments the template is returned unchanged, quotes included.
    pub fn format(&self, key: &str, args: &[String]) -> Result<String, CatalogError> {
        let template = self.template(key)?;
        if args.is_empty() {
            return Ok(template);
        }
        substitute(key, &template, args)
    }

    /// This catalog's formatting function
    pub fn formatter(&self) -> FormatFn {
        let catalog = self.clone();
        Arc::new(move |key, args| catalog.format(key, args))
    }

    /// Build an argument-free message bound to this catalog
    pub fn message(&self, key: impl Into<String>) -> Result<FormattedMessage, CatalogError> {
        FormattedMessage::new(self.formatter(), key, Vec::new())
    }

    /// Build a lazily evaluated message bound to this catalog
    pub fn build<I>(&self, key: impl Into<String>, args: I) -> Result<FormattedMessage, CatalogError>
    where
        I: IntoIterator,
        I::Item: Into<LazyArg>,
    {
        FormattedMessage::new(
            self.formatter(),
            key,
            args.into_iter().map(Into::into).collect(),
        )
    }
}

impl std::fmt::Debug for StringCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StringCatalog").finish_non_exhaustive()
    }
}

fn substitute(key: &str, template: &str, args: &[String]) -> Result<String, CatalogError> {
    let malformed = |detail: &str| CatalogError::Malformed {
        key: key.to_string(),
        detail: detail.to_string(),
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' if chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\'' => quoted = !quoted,
            _ if quoted => out.push(c),
            '{' => {
                let mut index = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(d) => index.push(d),
                        None => return Err(malformed("unmatched '{'")),
                    }
                }
                let n: usize = index
                    .trim()
                    .parse()
                    .map_err(|_| malformed(&format!("invalid placeholder '{{{}}}'", index)))?;
                match args.get(n) {
                    Some(arg) => out.push_str(arg),
                    None => {
                        out.push('{');
                        out.push_str(&index);
                        out.push('}');
                    }
                }
            }
            _ => out.push(c),
        }
    }

    if quoted {
        return Err(malformed("unterminated quote"));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
