//! Display-name templates.
//!
//! A display name is produced by scanning a template left to right. At each
//! position every registered placeholder is tried in registration order; the
//! first whose pattern matches at exactly that position wins, its
//! replacement is appended, and the scan advances past the match. Text no
//! placeholder claims is copied through verbatim, one character at a time,
//! so matching is total: a template with no placeholders resolves to
//! itself.
//!
//! Registration order is the collision rule. When two patterns could claim
//! the same prefix the one registered first wins, which is why the registry
//! is an ordered map and why the built-in set registers the longer-prefixed
//! placeholders first.
//!
//! The registry is populated before any resolution happens and never
//! mutated afterwards; the process-wide default set sits behind a one-time
//! initialization barrier.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;
use regex::Regex;
use thiserror::Error;

use crate::convert::ArgumentSet;
use crate::types::TestMethod;

pub mod builtin;
pub mod format;

use self::builtin::{
    ArgumentsPlaceholder, ClassNamePlaceholder, IndexPlaceholder, MethodNamePlaceholder,
    NamedArgumentsPlaceholder, RowCountPlaceholder,
};

/// The default display-name template.
pub const DEFAULT_FORMAT: &str = "%m[%i: %a[0..-1]]";

/// Placeholder resolution errors.
#[derive(Debug, Error)]
pub enum PlaceholderError {
    #[error("Argument index {index} is out of bounds for {count} arguments (valid indices are {min}..={max})")]
    IndexOutOfBounds {
        index: i64,
        count: usize,
        min: i64,
        max: i64,
    },

    #[error("Malformed placeholder token '{token}'")]
    Malformed { token: String },
}

/// Everything a placeholder may draw on for one row's display name.
///
/// Immutable per computation; built fresh for every generated invocation.
#[derive(Debug, Clone)]
pub struct ReplacementData {
    /// The test method the invocation belongs to.
    pub method: TestMethod,
    /// The validated argument set of this row.
    pub arguments: ArgumentSet,
    /// The zero-based index of this row.
    pub index: usize,
    /// The total number of rows the provider produced.
    pub row_count: usize,
}

impl ReplacementData {
    /// Create replacement data for one row.
    pub fn new(method: TestMethod, arguments: ArgumentSet, index: usize, row_count: usize) -> Self {
        Self {
            method,
            arguments,
            index,
            row_count,
        }
    }
}

/// A template placeholder: a pattern plus a replacement function.
///
/// Implementations are stateless after construction and shared freely
/// across threads.
pub trait Placeholder: Send + Sync {
    /// The pattern claiming tokens for this placeholder.
    fn pattern(&self) -> &Regex;

    /// Compute the replacement for a matched token.
    fn replacement(&self, token: &str, data: &ReplacementData) -> Result<String, PlaceholderError>;
}

/// An ordered placeholder registry: registration order is match priority.
#[derive(Clone)]
pub struct PlaceholderRegistry {
    placeholders: IndexMap<String, Arc<dyn Placeholder>>,
}

impl Default for PlaceholderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl PlaceholderRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self {
            placeholders: IndexMap::new(),
        }
    }

    /// The built-in placeholder set, in its collision-safe order.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register("named_arguments", Arc::new(NamedArgumentsPlaceholder::new()));
        registry.register("arguments", Arc::new(ArgumentsPlaceholder::new()));
        registry.register("index", Arc::new(IndexPlaceholder::new()));
        registry.register("row_count", Arc::new(RowCountPlaceholder::new()));
        registry.register("method", Arc::new(MethodNamePlaceholder::new()));
        registry.register("class", Arc::new(ClassNamePlaceholder::new()));
        registry
    }

    /// Register a placeholder under a name.
    ///
    /// Re-registering a known name replaces the placeholder in place,
    /// keeping its original priority.
    pub fn register(&mut self, name: impl Into<String>, placeholder: Arc<dyn Placeholder>) {
        self.placeholders.insert(name.into(), placeholder);
    }

    /// The number of registered placeholders.
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    /// Resolve a template against one row's replacement data.
    pub fn resolve(
        &self,
        template: &str,
        data: &ReplacementData,
    ) -> Result<String, PlaceholderError> {
        let mut out = String::with_capacity(template.len());
        let mut pos = 0;
        while pos < template.len() {
            match self.match_at(template, pos) {
                Some((placeholder, end)) => {
                    out.push_str(&placeholder.replacement(&template[pos..end], data)?);
                    pos = end;
                }
                None => {
                    // Verbatim copy of one character; matching is total.
                    let ch = template[pos..].chars().next().expect("pos < len");
                    out.push(ch);
                    pos += ch.len_utf8();
                }
            }
        }
        Ok(out)
    }

    /// The first registered placeholder whose pattern matches at `pos`,
    /// together with the end offset of its match.
    fn match_at(&self, template: &str, pos: usize) -> Option<(&dyn Placeholder, usize)> {
        for placeholder in self.placeholders.values() {
            if let Some(m) = placeholder.pattern().find_at(template, pos) {
                if m.start() == pos {
                    return Some((placeholder.as_ref(), m.end()));
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for PlaceholderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceholderRegistry")
            .field("placeholders", &self.placeholders.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The process-wide default registry, initialized once before first use.
pub fn default_registry() -> &'static PlaceholderRegistry {
    static REGISTRY: OnceLock<PlaceholderRegistry> = OnceLock::new();
    REGISTRY.get_or_init(PlaceholderRegistry::with_builtins)
}

/// A display-name template bound to the registry that resolves it.
#[derive(Debug, Clone)]
pub struct DisplayNameContext {
    template: String,
    registry: PlaceholderRegistry,
}

impl DisplayNameContext {
    /// Bind a template to a registry.
    pub fn new(template: impl Into<String>, registry: PlaceholderRegistry) -> Self {
        Self {
            template: template.into(),
            registry,
        }
    }

    /// Bind a template to the default placeholder set.
    pub fn with_default_placeholders(template: impl Into<String>) -> Self {
        Self::new(template, default_registry().clone())
    }

    /// The template string.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Produce the display name for one row.
    pub fn resolve(&self, data: &ReplacementData) -> Result<String, PlaceholderError> {
        self.registry.resolve(&self.template, data)
    }
}

impl Default for DisplayNameContext {
    fn default() -> Self {
        Self::with_default_placeholders(DEFAULT_FORMAT)
    }
}
