//! Layered backing document
//!
//! A [`ConfigDocument`] holds the raw configuration as four layers of JSON
//! trees, merged in this order (later layers override earlier ones):
//!
//! 1. **Defaults** - seeded by [`crate::defaults::gen_default`]
//! 2. **File** - persisted documents merged with [`ConfigDocument::merge_file`]
//! 3. **Environment** - `LUET_<SECTION>__<KEY>` variables
//! 4. **Overrides** - explicit [`ConfigDocument::set`] calls
//!
//! Keys are dotted paths such as `system.rootfs`. Objects are deep-merged
//! across layers; scalars and lists from a higher layer replace lower ones.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use luet_fs::DocumentStore;
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::{Error, Result};

/// Prefix of environment variables bound to document keys.
pub const ENV_PREFIX: &str = "LUET";

/// Replaces `.` between key segments in environment variable names.
pub const ENV_KEY_SEPARATOR: &str = "__";

/// One source layer of a [`ConfigDocument`], in ascending precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    Default,
    File,
    Env,
    Override,
}

/// Layered key/value document backing a [`crate::LuetConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfigDocument {
    defaults: Value,
    file: Value,
    env: Value,
    overrides: Value,
    config_file: Option<PathBuf>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value in the defaults layer.
    ///
    /// Defaults never shadow values coming from any other layer, so seeding
    /// them repeatedly is harmless.
    pub fn set_default(&mut self, key: &str, value: impl Into<Value>) {
        insert_path(&mut self.defaults, &key.to_lowercase(), value.into());
    }

    /// Set an explicit override, which wins over every other layer.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        insert_path(&mut self.overrides, &key.to_lowercase(), value.into());
    }

    /// Merge a persisted document (YAML, TOML or JSON) into the file layer.
    pub fn merge_file(&mut self, path: &Path) -> Result<()> {
        let value: Value = DocumentStore::new().load(path)?;
        if !(value.is_object() || value.is_null()) {
            return Err(luet_fs::Error::DocumentParse {
                path: path.to_path_buf(),
                format: luet_fs::DocumentFormat::from_path(path)?.to_string(),
                message: "expected a mapping at the document root".to_string(),
            }
            .into());
        }

        tracing::debug!(path = %path.display(), "Merging config file layer");
        self.merge_value(value);
        self.config_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Merge an already parsed document tree into the file layer.
    ///
    /// Keys are matched case-insensitively, like every other layer, so
    /// mapping keys are lowercased before merging. Lists are kept as written.
    pub fn merge_value(&mut self, value: Value) {
        deep_merge_value(&mut self.file, &lowercase_keys(value));
    }

    /// Bind process environment variables to known keys.
    pub fn read_env(&mut self) -> Result<usize> {
        self.read_env_from(std::env::vars())
    }

    /// Bind environment variables from `vars` to known keys.
    ///
    /// Only keys already present in another layer are bound. Each value is
    /// coerced to the type currently held by that key; list keys are split on
    /// whitespace and commas. Lists of records, such as `repositories`, are
    /// never bound. The environment layer is rebuilt from scratch on
    /// every call. Returns the number of bound variables.
    pub fn read_env_from<I, K, V>(&mut self, vars: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        self.env = Value::Null;
        let base = self.resolved();
        let mut bound = 0;

        for key in self.keys() {
            let var = env_var_name(&key);
            let Some(raw) = vars.get(&var) else {
                continue;
            };
            let template = lookup_path(&base, &key).unwrap_or(&Value::Null);
            let value = coerce_env(&var, raw, template)?;
            tracing::debug!(%var, %key, "Binding environment variable");
            insert_path(&mut self.env, &key, value);
            bound += 1;
        }

        Ok(bound)
    }

    /// The merged value at `key`, if any layer provides it.
    pub fn get(&self, key: &str) -> Option<Value> {
        lookup_path(&self.resolved(), &key.to_lowercase()).cloned()
    }

    /// True if any layer, defaults included, provides `key`.
    pub fn is_set(&self, key: &str) -> bool {
        self.layer_of(key).is_some()
    }

    /// The highest-precedence layer providing `key`.
    pub fn layer_of(&self, key: &str) -> Option<Layer> {
        let key = key.to_lowercase();
        [
            (Layer::Override, &self.overrides),
            (Layer::Env, &self.env),
            (Layer::File, &self.file),
            (Layer::Default, &self.defaults),
        ]
        .into_iter()
        .find(|(_, layer)| lookup_path(layer, &key).is_some_and(|v| !v.is_null()))
        .map(|(layer, _)| layer)
    }

    /// All leaf keys known to any layer, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = BTreeSet::new();
        for layer in [&self.defaults, &self.file, &self.env, &self.overrides] {
            collect_leaf_keys(layer, "", &mut keys);
        }
        keys.into_iter().collect()
    }

    /// The fully merged document tree.
    pub fn resolved(&self) -> Value {
        let mut merged = Value::Object(Map::new());
        for layer in [&self.defaults, &self.file, &self.env, &self.overrides] {
            deep_merge_value(&mut merged, layer);
        }
        merged
    }

    /// Deserialize the merged document into `T`.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.resolved()).map_err(Error::Decode)
    }

    /// Path of the last file merged with [`Self::merge_file`].
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

/// Environment variable name bound to a dotted key.
///
/// ```
/// use luet_config::document::env_var_name;
///
/// assert_eq!(env_var_name("system.rootfs"), "LUET_SYSTEM__ROOTFS");
/// ```
pub fn env_var_name(key: &str) -> String {
    format!(
        "{}_{}",
        ENV_PREFIX,
        key.to_uppercase().replace('.', ENV_KEY_SEPARATOR)
    )
}

fn coerce_env(var: &str, raw: &str, template: &Value) -> Result<Value> {
    let invalid = |expected: &'static str| Error::InvalidEnv {
        var: var.to_string(),
        value: raw.to_string(),
        expected,
    };
    let trimmed = raw.trim();

    match template {
        Value::Bool(_) => parse_bool(trimmed)
            .map(Value::Bool)
            .ok_or_else(|| invalid("a boolean")),
        Value::Number(n) if n.is_u64() => trimmed
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| invalid("a non-negative integer")),
        Value::Number(n) if n.is_i64() => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid("an integer")),
        Value::Number(_) => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| invalid("a number")),
        Value::Array(_) => Ok(Value::Array(
            raw.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|s| !s.is_empty())
                .map(Value::from)
                .collect(),
        )),
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced by an object"),
    }
}

fn insert_path(root: &mut Value, key: &str, value: Value) {
    match key.split_once('.') {
        Some((head, rest)) => {
            let child = ensure_object(root).entry(head).or_insert(Value::Null);
            insert_path(child, rest, value);
        }
        None => {
            ensure_object(root).insert(key.to_string(), value);
        }
    }
}

fn lookup_path<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |current, segment| current.get(segment))
}

fn collect_leaf_keys(value: &Value, prefix: &str, keys: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (name, child) in map {
                let key = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                collect_leaf_keys(child, &key, keys);
            }
        }
        Value::Null => {}
        Value::Array(items) if items.iter().any(Value::is_object) => {}
        _ if !prefix.is_empty() => {
            keys.insert(prefix.to_string());
        }
        _ => {}
    }
}

fn lowercase_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, child)| (key.to_lowercase(), lowercase_keys(child)))
                .collect(),
        ),
        other => other,
    }
}

/// Deep merge two JSON values
///
/// If both values are objects, merge them recursively with `other` taking
/// precedence. A null `other` leaves `base` untouched; anything else replaces it.
fn deep_merge_value(base: &mut Value, other: &Value) {
    match (base, other) {
        (_, Value::Null) => {}
        (Value::Object(base_map), Value::Object(other_map)) => {
            for (key, other_val) in other_map {
                if let Some(base_val) = base_map.get_mut(key) {
                    deep_merge_value(base_val, other_val);
                } else if !other_val.is_null() {
                    base_map.insert(key.clone(), other_val.clone());
                }
            }
        }
        (base, other) => {
            *base = other.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_path_creates_nested_objects() {
        let mut root = Value::Null;
        insert_path(&mut root, "system.rootfs", json!("/"));
        insert_path(&mut root, "system.database_path", json!("/var/cache/luet"));
        assert_eq!(
            root,
            json!({"system": {"rootfs": "/", "database_path": "/var/cache/luet"}})
        );
    }

    #[test]
    fn insert_path_replaces_scalar_parent() {
        let mut root = json!({"solver": "broken"});
        insert_path(&mut root, "solver.type", json!("qlearning"));
        assert_eq!(root, json!({"solver": {"type": "qlearning"}}));
    }

    #[test]
    fn deep_merge_objects() {
        let mut base = json!({
            "a": 1,
            "b": { "x": 10, "y": 20 }
        });
        let other = json!({
            "b": { "y": 25, "z": 30 },
            "c": 3
        });

        deep_merge_value(&mut base, &other);

        assert_eq!(base["a"], 1);
        assert_eq!(base["b"]["x"], 10);
        assert_eq!(base["b"]["y"], 25);
        assert_eq!(base["b"]["z"], 30);
        assert_eq!(base["c"], 3);
    }

    #[test]
    fn deep_merge_ignores_nulls() {
        let mut base = json!({"logging": {"level": "info"}});
        deep_merge_value(&mut base, &json!({"logging": null, "general": null}));
        assert_eq!(base, json!({"logging": {"level": "info"}}));
    }

    #[test]
    fn leaf_keys_skip_objects_and_nulls() {
        let mut keys = BTreeSet::new();
        collect_leaf_keys(
            &json!({"a": {"b": 1, "c": [1, 2]}, "d": null, "e": "x"}),
            "",
            &mut keys,
        );
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["a.b", "a.c", "e"]);
    }

    #[test]
    fn leaf_keys_skip_record_lists() {
        let mut keys = BTreeSet::new();
        collect_leaf_keys(
            &json!({"repositories": [{"name": "main"}], "repos_confdir": ["/etc"]}),
            "",
            &mut keys,
        );
        assert_eq!(keys.into_iter().collect::<Vec<_>>(), vec!["repos_confdir"]);
    }

    #[test]
    fn lowercase_keys_leaves_lists_alone() {
        let value = lowercase_keys(json!({
            "Logging": {"Level": "Debug"},
            "Repositories": [{"Name": "main"}]
        }));
        assert_eq!(
            value,
            json!({"logging": {"level": "Debug"}, "repositories": [{"Name": "main"}]})
        );
    }

    #[test]
    fn coerce_follows_template_type() {
        assert_eq!(coerce_env("V", "T", &json!(false)).unwrap(), json!(true));
        assert_eq!(coerce_env("V", " 12 ", &json!(4)).unwrap(), json!(12));
        assert_eq!(coerce_env("V", "-3", &json!(-1)).unwrap(), json!(-3));
        assert_eq!(coerce_env("V", "0.5", &json!(0.7)).unwrap(), json!(0.5));
        assert_eq!(
            coerce_env("V", "/a /b,/c", &json!(["/x"])).unwrap(),
            json!(["/a", "/b", "/c"])
        );
        assert_eq!(coerce_env("V", "debug", &json!("info")).unwrap(), json!("debug"));
    }

    #[test]
    fn coerce_rejects_bad_values() {
        let err = coerce_env("LUET_GENERAL__DEBUG", "maybe", &json!(false)).unwrap_err();
        assert!(matches!(err, Error::InvalidEnv { expected: "a boolean", .. }));
        assert!(coerce_env("V", "-1", &json!(4)).is_err());
        assert!(coerce_env("V", "fast", &json!(0.7)).is_err());
    }
}
