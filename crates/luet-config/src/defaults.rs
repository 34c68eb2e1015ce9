//! Built-in defaults
//!
//! These values are the lowest configuration layer and must stay
//! byte-compatible with existing luet installations.

use std::path::PathBuf;

use crate::document::ConfigDocument;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_PATH: &str = "/var/log/luet.log";
pub const DEFAULT_SPINNER_MS: u64 = 100;
pub const DEFAULT_SPINNER_CHARSET: u32 = 22;
pub const DEFAULT_DATABASE_ENGINE: &str = "boltdb";
pub const DEFAULT_DATABASE_PATH: &str = "/var/cache/luet";
pub const DEFAULT_ROOTFS: &str = "/";
pub const DEFAULT_TMPDIR_NAME: &str = "tmpluet";
pub const DEFAULT_PKGS_CACHE_PATH: &str = "packages";
pub const DEFAULT_REPOS_CONFDIR: &str = "/etc/luet/repos.conf.d";
pub const DEFAULT_CONFIG_PROTECT_CONFDIR: &str = "/etc/luet/config.protect.d";
pub const DEFAULT_SOLVER_RATE: f64 = 0.7;
pub const DEFAULT_SOLVER_DISCOUNT: f64 = 1.0;
pub const DEFAULT_SOLVER_MAX_ATTEMPTS: usize = 9000;

/// Facts about the executing host that feed into defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFacts {
    /// Number of logical CPUs
    pub cpus: usize,
    /// Uid of the executing user, `None` if the user database lookup failed
    pub uid: Option<u32>,
    /// OS temporary directory
    pub temp_dir: PathBuf,
}

impl HostFacts {
    /// Probe the running process.
    pub fn detect() -> Self {
        Self {
            cpus: num_cpus::get(),
            uid: current_uid(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Default for `general.same_owner`: preserve ownership when running as
    /// the superuser or when the identity is unknown (e.g. scratch containers
    /// without a passwd database).
    pub fn same_owner(&self) -> bool {
        self.uid.is_none_or(|uid| uid == 0)
    }

    pub fn tmpdir_base(&self) -> PathBuf {
        self.temp_dir.join(DEFAULT_TMPDIR_NAME)
    }
}

#[cfg(unix)]
fn current_uid() -> Option<u32> {
    use nix::unistd::{Uid, User};

    match User::from_uid(Uid::current()) {
        Ok(Some(user)) => Some(user.uid.as_raw()),
        Ok(None) => {
            tracing::debug!("Current uid has no user database entry");
            None
        }
        Err(e) => {
            tracing::debug!(error = %e, "User lookup failed");
            None
        }
    }
}

#[cfg(not(unix))]
fn current_uid() -> Option<u32> {
    None
}

/// Seed the defaults layer of `document` using the running host.
pub fn gen_default(document: &mut ConfigDocument) {
    gen_default_with(document, &HostFacts::detect());
}

/// Seed the defaults layer of `document` from explicit host facts.
///
/// Only the defaults layer is written, so values from files, the
/// environment or overrides keep precedence and repeated calls converge.
pub fn gen_default_with(document: &mut ConfigDocument, host: &HostFacts) {
    document.set_default("logging.level", DEFAULT_LOG_LEVEL);
    document.set_default("logging.enable_logfile", false);
    document.set_default("logging.path", DEFAULT_LOG_PATH);
    document.set_default("logging.json_format", false);
    document.set_default("logging.enable_emoji", true);
    document.set_default("logging.color", true);

    document.set_default("general.concurrency", host.cpus);
    document.set_default("general.debug", false);
    document.set_default("general.show_build_output", false);
    document.set_default("general.spinner_ms", DEFAULT_SPINNER_MS);
    document.set_default("general.spinner_charset", DEFAULT_SPINNER_CHARSET);
    document.set_default("general.fatal_warnings", false);
    document.set_default("general.same_owner", host.same_owner());

    document.set_default("system.database_engine", DEFAULT_DATABASE_ENGINE);
    document.set_default("system.database_path", DEFAULT_DATABASE_PATH);
    document.set_default("system.rootfs", DEFAULT_ROOTFS);
    document.set_default(
        "system.tmpdir_base",
        host.tmpdir_base().to_string_lossy().into_owned(),
    );
    document.set_default("system.pkgs_cache_path", DEFAULT_PKGS_CACHE_PATH);

    document.set_default("repos_confdir", vec![DEFAULT_REPOS_CONFDIR]);
    document.set_default(
        "config_protect_confdir",
        vec![DEFAULT_CONFIG_PROTECT_CONFDIR],
    );
    document.set_default("config_protect_skip", false);
    document.set_default("config_from_host", true);

    document.set_default("solver.type", "");
    document.set_default("solver.rate", DEFAULT_SOLVER_RATE);
    document.set_default("solver.discount", DEFAULT_SOLVER_DISCOUNT);
    document.set_default("solver.max_attempts", DEFAULT_SOLVER_MAX_ATTEMPTS);
}
