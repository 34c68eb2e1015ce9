//! Tests for default generation and layer precedence

use luet_config::{ConfigDocument, HostFacts, Layer, LuetConfig, gen_default_with};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use std::path::PathBuf;

fn host(uid: Option<u32>) -> HostFacts {
    HostFacts {
        cpus: 8,
        uid,
        temp_dir: PathBuf::from("/tmp"),
    }
}

fn seeded(uid: Option<u32>) -> ConfigDocument {
    let mut document = ConfigDocument::new();
    gen_default_with(&mut document, &host(uid));
    document
}

#[rstest]
#[case("logging.level", json!("info"))]
#[case("logging.enable_logfile", json!(false))]
#[case("logging.path", json!("/var/log/luet.log"))]
#[case("logging.json_format", json!(false))]
#[case("logging.enable_emoji", json!(true))]
#[case("logging.color", json!(true))]
#[case("general.concurrency", json!(8))]
#[case("general.debug", json!(false))]
#[case("general.show_build_output", json!(false))]
#[case("general.spinner_ms", json!(100))]
#[case("general.spinner_charset", json!(22))]
#[case("general.fatal_warnings", json!(false))]
#[case("system.database_engine", json!("boltdb"))]
#[case("system.database_path", json!("/var/cache/luet"))]
#[case("system.rootfs", json!("/"))]
#[case("system.tmpdir_base", json!("/tmp/tmpluet"))]
#[case("system.pkgs_cache_path", json!("packages"))]
#[case("repos_confdir", json!(["/etc/luet/repos.conf.d"]))]
#[case("config_protect_confdir", json!(["/etc/luet/config.protect.d"]))]
#[case("config_protect_skip", json!(false))]
#[case("config_from_host", json!(true))]
#[case("solver.type", json!(""))]
#[case("solver.rate", json!(0.7))]
#[case("solver.discount", json!(1.0))]
#[case("solver.max_attempts", json!(9000))]
fn test_default_values(#[case] key: &str, #[case] expected: Value) {
    let document = seeded(Some(1000));
    assert_eq!(document.get(key), Some(expected));
    assert_eq!(document.layer_of(key), Some(Layer::Default));
}

#[rstest]
#[case::superuser(Some(0), true)]
#[case::lookup_fails(None, true)]
#[case::regular_user(Some(1000), false)]
fn test_same_owner_default(#[case] uid: Option<u32>, #[case] expected: bool) {
    let document = seeded(uid);
    assert_eq!(document.get("general.same_owner"), Some(json!(expected)));

    let config = LuetConfig::from_document(document).unwrap();
    assert_eq!(config.general().same_owner, expected);
}

#[test]
fn test_default_generation_is_idempotent() {
    let once = seeded(None);

    let mut twice = seeded(None);
    gen_default_with(&mut twice, &host(None));

    assert_eq!(once.resolved(), twice.resolved());
}

#[test]
fn test_defaults_do_not_shadow_higher_layers() {
    let mut document = ConfigDocument::new();
    document.merge_value(json!({"system": {"rootfs": "/mnt/target"}}));
    document.set("logging.level", "debug");

    gen_default_with(&mut document, &host(None));
    gen_default_with(&mut document, &host(None));

    assert_eq!(document.get("system.rootfs"), Some(json!("/mnt/target")));
    assert_eq!(document.layer_of("system.rootfs"), Some(Layer::File));
    assert_eq!(document.get("logging.level"), Some(json!("debug")));
    assert_eq!(document.layer_of("logging.level"), Some(Layer::Override));
    // untouched siblings still come from defaults
    assert_eq!(document.get("system.database_path"), Some(json!("/var/cache/luet")));
}

#[test]
fn test_layer_precedence_file_env_override() {
    let mut document = seeded(None);
    document.merge_value(json!({
        "general": {"concurrency": 2, "debug": true},
        "solver": {"type": "qlearning"}
    }));
    document
        .read_env_from([
            ("LUET_GENERAL__CONCURRENCY", "4"),
            ("LUET_SOLVER__RATE", "0.5"),
        ])
        .unwrap();
    document.set("general.concurrency", 6);

    let config = LuetConfig::from_document(document).unwrap();
    assert_eq!(config.general().concurrency, 6);
    assert!(config.general().debug);
    assert_eq!(config.solver_options().resolver_type, "qlearning");
    assert_eq!(config.solver_options().learn_rate, 0.5);
}

#[test]
fn test_env_binding_only_known_keys() {
    let mut document = seeded(None);
    let bound = document
        .read_env_from([
            ("LUET_SYSTEM__ROOTFS", "/mnt/env"),
            ("LUET_REPOS_CONFDIR", "/a /b"),
            ("LUET_NOT__A_KEY", "ignored"),
            ("PATH", "/usr/bin"),
        ])
        .unwrap();

    assert_eq!(bound, 2);
    assert_eq!(document.get("system.rootfs"), Some(json!("/mnt/env")));
    assert_eq!(document.layer_of("system.rootfs"), Some(Layer::Env));
    assert_eq!(document.get("repos_confdir"), Some(json!(["/a", "/b"])));
    assert!(!document.is_set("not.a_key"));
}

#[test]
fn test_env_does_not_bind_record_lists() {
    let mut document = seeded(None);
    document.merge_value(json!({
        "repositories": [{"name": "main", "type": "http", "enable": true}],
        "finalizer_envs": [{"key": "A", "value": "1"}]
    }));

    let bound = document
        .read_env_from([
            ("LUET_REPOSITORIES", "main other"),
            ("LUET_FINALIZER_ENVS", "A=2"),
        ])
        .unwrap();
    assert_eq!(bound, 0);

    let config = LuetConfig::from_document(document).unwrap();
    assert_eq!(config.repository("main").unwrap().repo_type, "http");
    assert_eq!(config.finalizer_env("A").unwrap(), "1");
}

#[test]
fn test_file_keys_are_case_insensitive() {
    let mut document = seeded(None);
    document.merge_value(json!({
        "Logging": {"Level": "debug"},
        "SYSTEM": {"RootFS": "/mnt/target"}
    }));

    assert_eq!(document.get("logging.level"), Some(json!("debug")));
    assert_eq!(document.layer_of("system.rootfs"), Some(Layer::File));

    let config = LuetConfig::from_document(document).unwrap();
    assert_eq!(config.logging().level, "debug");
    assert_eq!(config.system().rootfs, PathBuf::from("/mnt/target"));
}

#[test]
fn test_env_layer_is_rebuilt_on_each_read() {
    let mut document = seeded(None);
    document
        .read_env_from([("LUET_LOGGING__LEVEL", "debug")])
        .unwrap();
    document.read_env_from(Vec::<(String, String)>::new()).unwrap();

    assert_eq!(document.get("logging.level"), Some(json!("info")));
}

#[test]
fn test_invalid_env_value_is_rejected() {
    let mut document = seeded(None);
    let err = document
        .read_env_from([("LUET_GENERAL__DEBUG", "sometimes")])
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("LUET_GENERAL__DEBUG"), "{message}");
    assert!(message.contains("sometimes"), "{message}");
}

#[test]
fn test_resolved_config_from_seeded_document() {
    let config = LuetConfig::from_document(seeded(Some(1000))).unwrap();

    assert_eq!(config.general().concurrency, 8);
    assert_eq!(config.general().spinner_charset, 22);
    assert_eq!(config.system().tmpdir_base, PathBuf::from("/tmp/tmpluet"));
    assert_eq!(config.system().pkgs_cache_path, PathBuf::from("packages"));
    assert_eq!(
        config.config_protect_confdir(),
        &[PathBuf::from("/etc/luet/config.protect.d")]
    );
    assert!(config.repositories().is_empty());
}

#[test]
fn test_bad_document_type_fails_to_resolve() {
    let mut document = seeded(None);
    document.set("general.concurrency", "many");

    assert!(LuetConfig::from_document(document).is_err());
}
