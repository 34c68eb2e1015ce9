//! Strategy registry
//!
//! Maps a solver type tag to the constructor of its strategy. Tags without
//! an entry resolve through the fallback constructor.

use std::collections::HashMap;

use super::SolverOptions;
use super::strategy::{
    DEFAULT_INITIAL_OBSERVED, Explainer, QLEARNING_RESOLVER_TYPE, QLearningResolver,
    ResolutionStrategy,
};

/// Builds a strategy from the configured solver options.
pub type StrategyConstructor = fn(&SolverOptions) -> Box<dyn ResolutionStrategy>;

/// Registry mapping solver type tags to strategy constructors.
///
/// # Example
///
/// ```
/// use luet_config::solver::{SolverOptions, StrategyRegistry};
///
/// let registry = StrategyRegistry::with_builtins();
/// assert!(registry.has_strategy("qlearning"));
///
/// let options = SolverOptions::default();
/// assert_eq!(registry.resolve(&options).name(), "explainer");
/// ```
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    constructors: HashMap<String, StrategyConstructor>,
    fallback: StrategyConstructor,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyRegistry {
    /// Create a registry with no tags, falling back to [`Explainer`].
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
            fallback: explainer,
        }
    }

    /// Create a registry with built-in strategies registered.
    ///
    /// Currently registers:
    /// - `qlearning` -> [`QLearningResolver`]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(QLEARNING_RESOLVER_TYPE, qlearning);
        registry
    }

    /// Register a constructor for a tag, replacing any previous one.
    pub fn register(&mut self, tag: impl Into<String>, constructor: StrategyConstructor) {
        self.constructors.insert(tag.into(), constructor);
    }

    /// Replace the constructor used for unregistered tags.
    pub fn set_fallback(&mut self, constructor: StrategyConstructor) {
        self.fallback = constructor;
    }

    pub fn has_strategy(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    /// Registered tags, sorted.
    pub fn list_strategies(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.constructors.keys().cloned().collect();
        tags.sort();
        tags
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Build the strategy selected by `options.resolver_type`.
    pub fn resolve(&self, options: &SolverOptions) -> Box<dyn ResolutionStrategy> {
        let constructor = self
            .constructors
            .get(options.resolver_type.as_str())
            .copied()
            .unwrap_or(self.fallback);
        constructor(options)
    }
}

fn explainer(_: &SolverOptions) -> Box<dyn ResolutionStrategy> {
    Box::new(Explainer)
}

/// Tuned resolver when a learn rate is set, the pre-tuned one otherwise.
fn qlearning(options: &SolverOptions) -> Box<dyn ResolutionStrategy> {
    if options.learn_rate != 0.0 {
        Box::new(QLearningResolver::new(
            options.learn_rate,
            options.discount,
            options.max_attempts,
            DEFAULT_INITIAL_OBSERVED,
        ))
    } else {
        Box::new(QLearningResolver::pretuned())
    }
}
