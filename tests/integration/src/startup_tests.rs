//! End-to-end tests for configuration startup
//!
//! Exercises the full flow against a fixture rootfs: defaults -> config file
//! -> environment -> conf dir loading -> runtime path derivation.

use assert_fs::TempDir;
use assert_fs::prelude::*;
use luet_config::{
    ConfigDocument, DatabaseBackend, Layer, LuetConfig, load_config_protect, load_repositories,
};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/luet")
}

/// Copy the fixture rootfs into a scratch directory.
fn setup_rootfs() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.copy_from(fixture_root(), &["**/*"]).unwrap();
    temp
}

/// Load the configuration the way the CLI does at startup.
fn startup(rootfs: &Path, env: &[(&str, &str)]) -> LuetConfig {
    let mut document = ConfigDocument::new();
    document
        .merge_file(&rootfs.join("etc/luet/luet.yaml"))
        .unwrap();

    let mut config = LuetConfig::new(Some(document)).unwrap();
    config
        .document_mut()
        .set("system.rootfs", rootfs.to_string_lossy().into_owned());
    config
        .document_mut()
        .set("system.tmpdir_base", rootfs.join("tmp/luet").to_string_lossy().into_owned());
    config
        .document_mut()
        .read_env_from(env.iter().copied())
        .unwrap();
    config.reload().unwrap();

    load_repositories(&mut config).unwrap();
    load_config_protect(&mut config).unwrap();
    config
}

#[test]
fn test_startup_resolves_all_layers() {
    let rootfs = setup_rootfs();
    let config = startup(rootfs.path(), &[("LUET_GENERAL__DEBUG", "true")]);

    // file layer
    assert_eq!(config.logging().level, "warning");
    assert!(!config.logging().enable_emoji);
    assert_eq!(config.general().concurrency, 2);
    assert_eq!(config.general().spinner_ms, 200);
    assert!(!config.config_from_host());

    // environment layer
    assert!(config.general().debug);
    assert_eq!(config.document().layer_of("general.debug"), Some(Layer::Env));

    // defaults fill the gaps
    assert_eq!(config.system().database_engine, "boltdb");
    assert!(config.logging().color);
    assert_eq!(
        config.document().layer_of("logging.color"),
        Some(Layer::Default)
    );
}

#[test]
fn test_startup_loads_conf_dirs_from_rootfs() {
    let rootfs = setup_rootfs();
    let config = startup(rootfs.path(), &[]);

    let names: Vec<&str> = config
        .repositories()
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(names, vec!["main", "local"]);

    let main = config.repository("main").unwrap();
    assert!(main.cached);
    assert_eq!(main.urls, vec!["https://packages.example.org/main"]);

    let protect = config.config_protect_conf_files();
    assert_eq!(protect.len(), 1);
    assert_eq!(protect[0].directories, vec!["/etc/"]);

    assert_eq!(config.finalizer_envs(), vec!["LUET_ROOT=/"]);
}

#[test]
fn test_runtime_paths_follow_rootfs() {
    let rootfs = setup_rootfs();
    let mut config = startup(rootfs.path(), &[]);
    let system = config.system_mut();

    let repo_dir = system.repo_database_dir("main").unwrap();
    assert_eq!(repo_dir, rootfs.path().join("var/db/luet/repos/main"));
    rootfs
        .child("var/db/luet/repos/main")
        .assert(predicate::path::is_dir());

    assert_eq!(
        system.system_pkgs_cache_dir().unwrap(),
        rootfs.path().join("var/db/luet/packages")
    );
    assert_eq!(
        system.system_database().unwrap(),
        DatabaseBackend::Bolt {
            path: rootfs.path().join("var/db/luet/luet.db")
        }
    );

    let scratch = system.temp_dir("unpack").unwrap();
    assert!(scratch.starts_with(rootfs.path().join("tmp/luet")));
    system.cleanup_tmp_dir().unwrap();
    rootfs.child("tmp/luet").assert(predicate::path::missing());
}

#[test]
fn test_solver_tuning_from_file_and_env() {
    let rootfs = setup_rootfs();
    let config = startup(rootfs.path(), &[("LUET_SOLVER__MAX_ATTEMPTS", "50")]);

    let strategy = config.solver_options().resolver();
    let learning = strategy.learning().unwrap();

    assert_eq!(strategy.name(), "qlearning");
    assert_eq!(learning.learn_rate, 0.5);
    assert_eq!(learning.discount, 0.9);
    assert_eq!(learning.max_attempts, 50);
}

#[test]
fn test_saved_config_reloads_identically() {
    let rootfs = setup_rootfs();
    let config = startup(rootfs.path(), &[]);
    let saved = rootfs.child("saved.json");
    config.save(saved.path()).unwrap();

    saved.assert(predicate::str::contains("\"rootfs\""));

    let mut document = ConfigDocument::new();
    document.merge_file(saved.path()).unwrap();
    let restored = LuetConfig::new(Some(document)).unwrap();

    assert_eq!(restored.system(), config.system());
    assert_eq!(restored.solver_options(), config.solver_options());
    assert_eq!(restored.repositories(), config.repositories());
    assert_eq!(restored.finalizer_envs(), config.finalizer_envs());
}
