//! Finalizer environment variables

use serde::{Deserialize, Serialize};

/// One environment variable injected into build finalizers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizerEnv {
    pub key: String,
    pub value: String,
}

impl FinalizerEnv {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// `KEY=VALUE` form used in child process environments.
    pub fn to_env_string(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}
