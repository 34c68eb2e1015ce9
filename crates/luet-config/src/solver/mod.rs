//! Solver section and resolution strategy selection

mod registry;
mod strategy;

pub use registry::{StrategyConstructor, StrategyRegistry};
pub use strategy::{
    DEFAULT_INITIAL_OBSERVED, Explainer, LearningParameters, QLEARNING_RESOLVER_TYPE,
    QLearningResolver, ResolutionStrategy,
};

use serde::{Deserialize, Serialize};

use crate::defaults::{DEFAULT_SOLVER_DISCOUNT, DEFAULT_SOLVER_MAX_ATTEMPTS, DEFAULT_SOLVER_RATE};

/// How the solver schedules its work.
///
/// Persisted as its numeric index (`0`, `1`); the snake_case names are
/// accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "ImplementationRepr", into = "u8")]
pub enum SolverImplementation {
    #[default]
    SingleCoreSimple,
    ParallelSimple,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImplementationRepr {
    Index(u64),
    Name(String),
}

impl TryFrom<ImplementationRepr> for SolverImplementation {
    type Error = String;

    fn try_from(repr: ImplementationRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            ImplementationRepr::Index(0) => Ok(Self::SingleCoreSimple),
            ImplementationRepr::Index(1) => Ok(Self::ParallelSimple),
            ImplementationRepr::Name(name) => match name.as_str() {
                "single_core_simple" => Ok(Self::SingleCoreSimple),
                "parallel_simple" => Ok(Self::ParallelSimple),
                _ => Err(format!("unknown solver implementation {name:?}")),
            },
            ImplementationRepr::Index(index) => {
                Err(format!("unknown solver implementation {index}"))
            }
        }
    }
}

impl From<SolverImplementation> for u8 {
    fn from(implementation: SolverImplementation) -> Self {
        match implementation {
            SolverImplementation::SingleCoreSimple => 0,
            SolverImplementation::ParallelSimple => 1,
        }
    }
}

/// Generic solver options shared by every strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolverRuntimeOptions {
    #[serde(default, rename = "type")]
    pub implementation: SolverImplementation,
    #[serde(default)]
    pub concurrency: usize,
}

/// Solver section of the configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverOptions {
    #[serde(default)]
    pub options: SolverRuntimeOptions,
    /// Strategy tag; unknown tags select the default strategy
    #[serde(default, rename = "type")]
    pub resolver_type: String,
    #[serde(default = "default_rate", rename = "rate")]
    pub learn_rate: f32,
    #[serde(default = "default_discount")]
    pub discount: f32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    #[serde(default)]
    pub implementation: SolverImplementation,
}

fn default_rate() -> f32 {
    DEFAULT_SOLVER_RATE as f32
}

fn default_discount() -> f32 {
    DEFAULT_SOLVER_DISCOUNT as f32
}

fn default_max_attempts() -> usize {
    DEFAULT_SOLVER_MAX_ATTEMPTS
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            options: SolverRuntimeOptions::default(),
            resolver_type: String::new(),
            learn_rate: default_rate(),
            discount: default_discount(),
            max_attempts: default_max_attempts(),
            implementation: SolverImplementation::default(),
        }
    }
}

impl SolverOptions {
    /// True if the type tag names a registered built-in strategy.
    pub fn is_resolver_configured(&self) -> bool {
        self.is_resolver_configured_in(&StrategyRegistry::with_builtins())
    }

    pub fn is_resolver_configured_in(&self, registry: &StrategyRegistry) -> bool {
        registry.has_strategy(&self.resolver_type)
    }

    /// Build the strategy selected by the type tag from the built-ins.
    pub fn resolver(&self) -> Box<dyn ResolutionStrategy> {
        self.resolver_in(&StrategyRegistry::with_builtins())
    }

    pub fn resolver_in(&self, registry: &StrategyRegistry) -> Box<dyn ResolutionStrategy> {
        registry.resolve(self)
    }

    /// One-line summary of the solver tuning for diagnostics.
    pub fn compact_string(&self) -> String {
        format!(
            "type: {} rate: {:.6}, discount: {:.6}, attempts: {}, initialobserved: {}",
            self.resolver_type,
            self.learn_rate,
            self.discount,
            self.max_attempts,
            DEFAULT_INITIAL_OBSERVED
        )
    }
}
