//! User settings from `devpack.json`.
//!
//! Every field is optional; missing fields keep the development defaults.
//!
//! ```json
//! {
//!   "publicPath": "/app/",
//!   "devtool": "cheap-module-source-map",
//!   "urlLoaderLimit": 8192,
//!   "elmLoader": { "debug": false },
//!   "extraEntries": ["./src/polyfills.js"]
//! }
//! ```

use crate::descriptor::Devtool;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file looked up in the app root.
pub const SETTINGS_FILE: &str = "devpack.json";

/// Flags passed to the Elm loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElmLoaderFlags {
    pub verbose: bool,
    pub warn: bool,
    pub debug: bool,
}

impl Default for ElmLoaderFlags {
    fn default() -> Self {
        Self {
            verbose: true,
            warn: true,
            debug: true,
        }
    }
}

/// Descriptor knobs a project may override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Settings {
    pub devtool: Devtool,
    pub public_path: String,
    pub output_filename: String,
    /// Files below this many bytes are inlined as data URLs.
    pub url_loader_limit: u64,
    /// Output name template for emitted media files.
    pub asset_name: String,
    pub babel_presets: Vec<String>,
    pub elm_loader: ElmLoaderFlags,
    /// Entries loaded after the hot-reload runtime and before the app entry.
    pub extra_entries: Vec<String>,
    /// Entry module relative to the app root.
    pub entry: Option<PathBuf>,
    /// HTML template relative to the app root.
    pub template: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            devtool: Devtool::Eval,
            public_path: "/".to_string(),
            output_filename: "dist/js/bundle.js".to_string(),
            url_loader_limit: 10_000,
            asset_name: "static/media/[name].[hash:8].[ext]".to_string(),
            babel_presets: vec!["es2015".to_string()],
            elm_loader: ElmLoaderFlags::default(),
            extra_entries: Vec::new(),
            entry: None,
            template: None,
        }
    }
}

impl Settings {
    /// Parse settings from JSON text.
    pub fn from_json(path: &Path, source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Find the settings file in the given root directory.
#[must_use]
pub fn find_settings_file(root: &Path) -> Option<PathBuf> {
    let path = root.join(SETTINGS_FILE);
    path.is_file().then_some(path)
}

/// Load settings for the app at `root`.
///
/// If `explicit` is `Some`, that file must exist (relative paths are taken
/// from `root`). Otherwise the settings file is optional.
pub fn load_settings(root: &Path, explicit: Option<&Path>) -> Result<Option<(PathBuf, Settings)>> {
    let path = match explicit {
        Some(p) => {
            let abs = if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            };
            if !abs.exists() {
                return Err(Error::ConfigRead {
                    path: abs,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                });
            }
            abs
        }
        None => match find_settings_file(root) {
            Some(p) => p,
            None => return Ok(None),
        },
    };

    let source = std::fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;

    let settings = Settings::from_json(&path, &source)?;
    Ok(Some((path, settings)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_keeps_defaults() {
        let settings = Settings::from_json(Path::new("devpack.json"), "{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.public_path, "/");
        assert_eq!(settings.url_loader_limit, 10_000);
        assert_eq!(settings.devtool, Devtool::Eval);
    }

    #[test]
    fn test_partial_overrides() {
        let source = r#"{
            "publicPath": "/app/",
            "devtool": "cheap-module-source-map",
            "elmLoader": { "debug": false },
            "extraEntries": ["./src/polyfills.js"]
        }"#;
        let settings = Settings::from_json(Path::new("devpack.json"), source).unwrap();
        assert_eq!(settings.public_path, "/app/");
        assert_eq!(settings.devtool, Devtool::CheapModuleSourceMap);
        assert!(!settings.elm_loader.debug);
        assert!(settings.elm_loader.verbose);
        assert_eq!(settings.extra_entries, vec!["./src/polyfills.js".to_string()]);
        assert_eq!(settings.output_filename, "dist/js/bundle.js");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Settings::from_json(Path::new("devpack.json"), r#"{ "publicPth": "/" }"#)
            .unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_load_settings_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(dir.path(), None).unwrap().is_none());

        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{ "urlLoaderLimit": 1 }"#).unwrap();
        let (path, settings) = load_settings(dir.path(), None).unwrap().unwrap();
        assert_eq!(path, dir.path().join(SETTINGS_FILE));
        assert_eq!(settings.url_loader_limit, 1);
    }

    #[test]
    fn test_load_settings_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("custom.json"), r#"{ "publicPath": "/x/" }"#).unwrap();

        let (_, settings) = load_settings(dir.path(), Some(Path::new("custom.json")))
            .unwrap()
            .unwrap();
        assert_eq!(settings.public_path, "/x/");
    }

    #[test]
    fn test_load_settings_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_settings(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_load_settings_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let err = load_settings(dir.path(), None).unwrap_err();
        assert_eq!(err.code(), crate::error::codes::CONFIG_PARSE);
    }
}
