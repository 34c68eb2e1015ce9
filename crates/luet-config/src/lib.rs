//! Configuration and runtime-path authority for luet.
//!
//! This crate resolves the layered configuration (built-in defaults, config
//! files, `LUET_*` environment variables, explicit overrides) into a
//! [`LuetConfig`], derives the runtime paths that depend on it, keeps the
//! repository and finalizer registries, and picks the dependency-resolution
//! strategy named by the solver section.
//!
//! # Example
//!
//! ```no_run
//! use luet_config::{ConfigDocument, LuetConfig};
//! use std::path::Path;
//!
//! # fn main() -> luet_config::Result<()> {
//! let mut document = ConfigDocument::new();
//! document.merge_file(Path::new("/etc/luet/luet.yaml"))?;
//! document.read_env()?;
//!
//! let mut config = LuetConfig::new(Some(document))?;
//! config.system_mut().set_rootfs("/mnt/target")?;
//! let db_dir = config.system().repo_database_dir("main")?;
//! let strategy = config.solver_options().resolver();
//! # let _ = (db_dir, strategy);
//! # Ok(())
//! # }
//! ```

pub mod defaults;
pub mod document;
pub mod error;
pub mod fatal;
pub mod finalizer;
pub mod general;
pub mod loader;
pub mod logging;
pub mod protect;
pub mod repository;
pub mod solver;
pub mod store;
pub mod system;

pub use defaults::{HostFacts, gen_default, gen_default_with};
pub use document::{ConfigDocument, Layer};
pub use error::{Error, Result};
pub use finalizer::FinalizerEnv;
pub use general::GeneralConfig;
pub use loader::{load_config_protect, load_repositories};
pub use logging::{LoggingConfig, init_tracing};
pub use protect::ConfigProtectConfFile;
pub use repository::Repository;
pub use solver::{ResolutionStrategy, SolverOptions, StrategyRegistry};
pub use store::LuetConfig;
pub use system::{DatabaseBackend, SystemConfig};
