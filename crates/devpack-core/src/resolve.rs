//! Extension-priority resolution for imports written without an extension.
//!
//! Candidates are `base + ext` for every configured extension in order; the
//! first one that exists wins. The empty extension stands for `base` as
//! written.

use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Maximum number of tried paths to record.
const MAX_TRIED_PATHS: usize = 20;

/// Existence check used while probing candidates.
pub trait FileProbe {
    fn is_file(&self, path: &Path) -> bool;
}

/// Probes the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsProbe;

impl FileProbe for OsProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

impl<F: Fn(&Path) -> bool> FileProbe for F {
    fn is_file(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Outcome of extension probing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtensionResolution {
    Resolved {
        path: PathBuf,
        /// Extension that matched, as configured (`""` for the exact name).
        extension: String,
        tried: Vec<PathBuf>,
    },
    NotFound {
        tried: Vec<PathBuf>,
    },
}

impl ExtensionResolution {
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Resolved { path, .. } => Some(path),
            Self::NotFound { .. } => None,
        }
    }

    #[must_use]
    pub fn tried(&self) -> &[PathBuf] {
        match self {
            Self::Resolved { tried, .. } | Self::NotFound { tried } => tried,
        }
    }
}

/// `base` with `ext` appended to its file name.
#[must_use]
pub fn with_appended_extension(base: &Path, ext: &str) -> PathBuf {
    if ext.is_empty() {
        return base.to_path_buf();
    }
    let mut raw = OsString::from(base.as_os_str());
    if !ext.starts_with('.') {
        raw.push(".");
    }
    raw.push(ext);
    PathBuf::from(raw)
}

/// Try `base + ext` for each extension in order. First existing file wins.
pub fn resolve_with_extensions<P: FileProbe + ?Sized>(
    base: &Path,
    extensions: &[String],
    probe: &P,
) -> ExtensionResolution {
    let mut tried = Vec::new();

    for ext in extensions {
        let candidate = with_appended_extension(base, ext);
        if tried.len() < MAX_TRIED_PATHS {
            tried.push(candidate.clone());
        }
        if probe.is_file(&candidate) {
            return ExtensionResolution::Resolved {
                path: candidate,
                extension: ext.clone(),
                tried,
            };
        }
    }

    ExtensionResolution::NotFound { tried }
}
