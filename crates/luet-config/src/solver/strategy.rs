//! Resolution strategies selectable from the configuration
//!
//! The solving algorithms live in the solver subsystem. This module only
//! carries the identity and tuning of each strategy so the solver can
//! instantiate the matching implementation.

use std::fmt;

/// Tag selecting the reinforcement-learning resolver.
pub const QLEARNING_RESOLVER_TYPE: &str = "qlearning";

/// Initial observation count handed to learning resolvers.
pub const DEFAULT_INITIAL_OBSERVED: usize = 999_999;

/// A dependency-resolution strategy picked by [`super::SolverOptions`].
pub trait ResolutionStrategy: fmt::Debug + Send + Sync {
    /// Stable identifier of the strategy family.
    fn name(&self) -> &str;

    /// Tuning parameters, for strategies that learn.
    fn learning(&self) -> Option<&LearningParameters> {
        None
    }
}

/// Tuning of a learning resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LearningParameters {
    pub learn_rate: f32,
    pub discount: f32,
    pub max_attempts: usize,
    pub initial_observed: usize,
}

impl LearningParameters {
    /// Parameters of the pre-tuned learning resolver.
    pub fn pretuned() -> Self {
        Self {
            learn_rate: 0.7,
            discount: 1.0,
            max_attempts: 9000,
            initial_observed: DEFAULT_INITIAL_OBSERVED,
        }
    }
}

/// Default strategy: no learning, explains the first conflict it meets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Explainer;

impl ResolutionStrategy for Explainer {
    fn name(&self) -> &str {
        "explainer"
    }
}

/// Q-learning based resolver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QLearningResolver {
    parameters: LearningParameters,
}

impl QLearningResolver {
    pub fn new(learn_rate: f32, discount: f32, max_attempts: usize, initial_observed: usize) -> Self {
        Self {
            parameters: LearningParameters {
                learn_rate,
                discount,
                max_attempts,
                initial_observed,
            },
        }
    }

    /// Resolver with the pre-tuned parameters.
    pub fn pretuned() -> Self {
        Self {
            parameters: LearningParameters::pretuned(),
        }
    }

    pub fn parameters(&self) -> &LearningParameters {
        &self.parameters
    }
}

impl ResolutionStrategy for QLearningResolver {
    fn name(&self) -> &str {
        QLEARNING_RESOLVER_TYPE
    }

    fn learning(&self) -> Option<&LearningParameters> {
        Some(&self.parameters)
    }
}
