//! The selector engine entry points.
//!
//! An [`EngineConfig`] fixes the pass-through pseudo-class names once; a
//! [`SelectorEngine`] built from it compiles selector text and runs it
//! against documents.

use std::collections::BTreeSet;

use selcov_dom::{DomTree, NodeId};

use crate::error::SelectorError;
use crate::selector::{SelectorList, parse_selector_list};

/// Immutable engine settings.
///
/// ```
/// use selcov_css::EngineConfig;
///
/// let config = EngineConfig::builder().pass_through(["deferred", "Before"]).build();
/// assert!(config.is_pass_through("before"));
/// assert!(!config.is_pass_through("hover"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pass_through: BTreeSet<String>,
}

impl EngineConfig {
    /// Start building a configuration.
    #[must_use]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Whether `name` (without colons) is registered as pass-through.
    /// Names compare ASCII case-insensitively.
    #[must_use]
    pub fn is_pass_through(&self, name: &str) -> bool {
        self.pass_through.contains(&name.to_ascii_lowercase())
    }

    /// The registered pass-through names, lowercase and sorted.
    pub fn pass_through_names(&self) -> impl Iterator<Item = &str> {
        self.pass_through.iter().map(String::as_str)
    }
}

/// Builder for [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    pass_through: BTreeSet<String>,
}

impl EngineConfigBuilder {
    /// Register pseudo-class names that parse with `:` or `::`, with or
    /// without an argument, and match every element.
    #[must_use]
    pub fn pass_through<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pass_through
            .extend(names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()));
        self
    }

    /// Finish the configuration.
    #[must_use]
    pub fn build(self) -> EngineConfig {
        EngineConfig {
            pass_through: self.pass_through,
        }
    }
}

/// Compiles and runs selectors under one [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct SelectorEngine {
    config: EngineConfig,
}

impl SelectorEngine {
    /// Create an engine with the given configuration.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine was built with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse selector text into a reusable [`SelectorList`].
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] if the text is not a valid selector list.
    pub fn compile(&self, text: &str) -> Result<SelectorList, SelectorError> {
        parse_selector_list(text, &self.config)
    }

    /// Every element of `tree` matched by `text`, in document order, each
    /// element once.
    ///
    /// ```
    /// use selcov_css::SelectorEngine;
    /// use selcov_dom::{DomTree, ElementData, NodeId};
    ///
    /// let mut tree = DomTree::new();
    /// let div = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("class", "foo"));
    /// let _ = tree.append_element(div, ElementData::new("span"));
    ///
    /// let engine = SelectorEngine::default();
    /// assert_eq!(engine.select(&tree, "div.foo, .foo").unwrap(), vec![div]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorError`] if the text is not a valid selector list.
    pub fn select(&self, tree: &DomTree, text: &str) -> Result<Vec<NodeId>, SelectorError> {
        let list = self.compile(text)?;
        let matched = list.select(tree);
        tracing::trace!(selector = text, matched = matched.len(), "selected");
        Ok(matched)
    }
}
