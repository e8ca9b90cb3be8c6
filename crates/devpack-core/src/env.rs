//! Client environment: the variables injected into the bundle as
//! compile-time constants.
//!
//! Variables come from `.env` files and the process environment. Only keys
//! prefixed with [`CLIENT_ENV_PREFIX`] reach client code, plus `NODE_ENV`
//! which is always set to the build mode.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Prefix a variable needs to be exposed to client code.
pub const CLIENT_ENV_PREFIX: &str = "ELM_APP_";

/// Parse a `.env` file's contents into key-value pairs.
///
/// Supports:
/// - `KEY=value` (unquoted, ` #` starts an inline comment)
/// - `KEY="value"` (double-quoted, with escape sequences)
/// - `KEY='value'` (single-quoted, literal)
/// - `export KEY=value`
/// - comments (`#`) and blank lines
#[must_use]
pub fn parse_env_file(content: &str) -> HashMap<String, String> {
    let mut env = HashMap::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, raw_value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        let key = key.strip_prefix("export ").unwrap_or(key).trim();
        if key.is_empty() {
            continue;
        }

        let raw_value = raw_value.trim();
        let value = if let Some(inner) = raw_value.strip_prefix('"') {
            unescape_double_quoted(inner)
        } else if let Some(inner) = raw_value.strip_prefix('\'') {
            inner.split_once('\'').map_or(inner, |(v, _)| v).to_string()
        } else {
            raw_value
                .split_once(" #")
                .map_or(raw_value, |(v, _)| v.trim_end())
                .to_string()
        };

        env.insert(key.to_string(), value);
    }

    env
}

fn unescape_double_quoted(inner: &str) -> String {
    let mut result = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => break,
            '\\' => match chars.next() {
                Some('n') => result.push('\n'),
                Some('r') => result.push('\r'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => {}
            },
            _ => result.push(c),
        }
    }
    result
}

/// Load `.env` files from the app root for the given mode.
///
/// Order: `.env`, `.env.local`, `.env.[mode]`, `.env.[mode].local`. Later
/// files override earlier ones. Missing files are skipped.
#[must_use]
pub fn load_env_files(root: &Path, mode: &str) -> HashMap<String, String> {
    let files = [
        root.join(".env"),
        root.join(".env.local"),
        root.join(format!(".env.{mode}")),
        root.join(format!(".env.{mode}.local")),
    ];

    let mut env = HashMap::new();
    for file in &files {
        if let Ok(content) = std::fs::read_to_string(file) {
            env.extend(parse_env_file(&content));
        }
    }
    env
}

/// Check that `key` can be substituted into generated code as an identifier.
pub fn validate_key(key: &str) -> Result<()> {
    let mut chars = key.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');

    if valid {
        Ok(())
    } else {
        Err(Error::InvalidEnvironmentKey {
            key: key.to_string(),
        })
    }
}

/// Snapshot of the variables exposed to client code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEnvironment {
    vars: BTreeMap<String, String>,
}

impl ClientEnvironment {
    /// An environment holding only `NODE_ENV`.
    #[must_use]
    pub fn new(mode: &str) -> Self {
        let mut vars = BTreeMap::new();
        vars.insert("NODE_ENV".to_string(), mode.to_string());
        Self { vars }
    }

    /// Keep the prefixed variables from `vars` and add `NODE_ENV`.
    pub fn collect<I, K, V>(vars: I, mode: &str) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env = Self::new(mode);
        for (key, value) in vars {
            let key = key.into();
            if key.starts_with(CLIENT_ENV_PREFIX) {
                env.insert(key, value)?;
            }
        }
        Ok(env)
    }

    /// `.env` files under `root`, overridden by the process environment.
    ///
    /// Process variables whose name or value is not UTF-8 are skipped.
    pub fn from_process(root: &Path, mode: &str) -> Result<Self> {
        let mut vars = load_env_files(root, mode);
        vars.extend(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }));
        Self::collect(vars, mode)
    }

    /// Add a variable, regardless of prefix.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        self.vars.insert(key, value.into());
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `process.env.KEY` → JSON string literal, ready for substitution.
    #[must_use]
    pub fn definitions(&self) -> BTreeMap<String, String> {
        self.vars
            .iter()
            .map(|(key, value)| {
                (
                    format!("process.env.{key}"),
                    serde_json::Value::String(value.clone()).to_string(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_parse_basic_key_value() {
        let env = parse_env_file("KEY=value\nOTHER=123");
        assert_eq!(env.get("KEY").unwrap(), "value");
        assert_eq!(env.get("OTHER").unwrap(), "123");
    }

    #[test]
    fn test_parse_quoted_values() {
        let env = parse_env_file("A=\"line1\\nline2\"\nB='lit\\n'\nC=\"say \\\"hi\\\"\"");
        assert_eq!(env.get("A").unwrap(), "line1\nline2");
        assert_eq!(env.get("B").unwrap(), "lit\\n");
        assert_eq!(env.get("C").unwrap(), "say \"hi\"");
    }

    #[test]
    fn test_comments_export_and_inline() {
        let content = "# comment\n\nexport KEY=value # trailing\nURL=http://x/#frag\n";
        let env = parse_env_file(content);
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("KEY").unwrap(), "value");
        assert_eq!(env.get("URL").unwrap(), "http://x/#frag");
    }

    #[test]
    fn test_value_with_equals() {
        let env = parse_env_file("KEY=a=b=c");
        assert_eq!(env.get("KEY").unwrap(), "a=b=c");
    }

    #[test]
    fn test_load_env_files_layering() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".env"), "ELM_APP_X=base\nELM_APP_Y=base").unwrap();
        std::fs::write(root.join(".env.local"), "ELM_APP_X=local").unwrap();
        std::fs::write(root.join(".env.development"), "ELM_APP_X=dev").unwrap();
        std::fs::write(root.join(".env.development.local"), "ELM_APP_X=dev_local").unwrap();

        let env = load_env_files(root, "development");
        assert_eq!(env.get("ELM_APP_X").unwrap(), "dev_local");
        assert_eq!(env.get("ELM_APP_Y").unwrap(), "base");
    }

    #[test]
    fn test_load_env_files_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_files(dir.path(), "development").is_empty());
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("API_URL").is_ok());
        assert!(validate_key("_private$").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("1ABC").is_err());
        assert!(validate_key("API-URL").is_err());
        assert!(validate_key("a.b").is_err());
        assert!(validate_key("x;alert(1)").is_err());
    }

    #[test]
    fn test_collect_filters_prefix_and_sets_node_env() {
        let vars = [
            ("ELM_APP_API_URL", "https://api"),
            ("DATABASE_URL", "postgres://secret"),
            ("PATH", "/usr/bin"),
        ];
        let env = ClientEnvironment::collect(vars, "development").unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("ELM_APP_API_URL"), Some("https://api"));
        assert_eq!(env.get("NODE_ENV"), Some("development"));
        assert_eq!(env.get("DATABASE_URL"), None);
    }

    #[test]
    fn test_collect_rejects_unsafe_prefixed_key() {
        let err = ClientEnvironment::collect([("ELM_APP_BAD-KEY", "x")], "development")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidEnvironmentKey { key } if key == "ELM_APP_BAD-KEY"));
    }

    #[test]
    fn test_definitions_are_json_literals() {
        let mut env = ClientEnvironment::new("development");
        env.insert("API_URL", "https://x").unwrap();
        env.insert("QUOTE", "say \"hi\"\n").unwrap();

        let defs = env.definitions();
        assert_eq!(defs.get("process.env.API_URL").unwrap(), "\"https://x\"");
        assert_eq!(defs.get("process.env.QUOTE").unwrap(), r#""say \"hi\"\n""#);
        assert_eq!(
            defs.get("process.env.NODE_ENV").unwrap(),
            "\"development\""
        );
        assert_eq!(
            defs.iter().filter(|(k, _)| k.as_str() == "process.env.API_URL").count(),
            1
        );
    }

    #[test]
    #[serial]
    fn test_process_environment_overrides_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "ELM_APP_DEVPACK_TEST_A=file\nELM_APP_DEVPACK_TEST_B=file",
        )
        .unwrap();
        std::env::set_var("ELM_APP_DEVPACK_TEST_A", "process");

        let env = ClientEnvironment::from_process(dir.path(), "development").unwrap();
        std::env::remove_var("ELM_APP_DEVPACK_TEST_A");

        assert_eq!(env.get("ELM_APP_DEVPACK_TEST_A"), Some("process"));
        assert_eq!(env.get("ELM_APP_DEVPACK_TEST_B"), Some("file"));
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_process_environment_skips_non_utf8_values() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("DEVPACK_TEST_RAW_BYTES", OsStr::from_bytes(b"\xff\xfe"));
        std::env::set_var("ELM_APP_DEVPACK_TEST_RAW", OsStr::from_bytes(b"\xff"));
        std::env::set_var("ELM_APP_DEVPACK_TEST_OK", "kept");

        let env = ClientEnvironment::from_process(dir.path(), "development");
        std::env::remove_var("DEVPACK_TEST_RAW_BYTES");
        std::env::remove_var("ELM_APP_DEVPACK_TEST_RAW");
        std::env::remove_var("ELM_APP_DEVPACK_TEST_OK");

        let env = env.unwrap();
        assert_eq!(env.get("ELM_APP_DEVPACK_TEST_OK"), Some("kept"));
        assert_eq!(env.get("ELM_APP_DEVPACK_TEST_RAW"), None);
    }
}
