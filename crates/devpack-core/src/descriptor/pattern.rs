//! Path patterns used by transform rules and `noParse`.

use crate::error::{Error, Result};
use regex_lite::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// A compiled regular expression that keeps its source text.
///
/// Patterns built with [`Pattern::extension`] also remember the extension
/// they stand for, which the rule diagnostics use to build probe paths.
#[derive(Clone)]
pub struct Pattern {
    regex: Regex,
    extension: Option<String>,
}

impl Pattern {
    /// Compile a pattern from raw regex source.
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(source).map_err(|e| Error::InvalidPattern {
            source_text: source.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            regex,
            extension: None,
        })
    }

    /// Pattern matching paths that end in `.<ext>`.
    ///
    /// A leading dot on `ext` is ignored.
    pub fn extension(ext: &str) -> Result<Self> {
        let ext = ext.trim_start_matches('.');
        let mut pattern = Self::new(&format!(r"\.{}$", regex_lite::escape(ext)))?;
        pattern.extension = Some(ext.to_string());
        Ok(pattern)
    }

    /// The regex source as written.
    #[must_use]
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    /// The representative extension (without dot), if built from one.
    #[must_use]
    pub fn representative_extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Test a path. Backslashes are treated as `/`.
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        if path.contains('\\') {
            self.regex.is_match(&path.replace('\\', "/"))
        } else {
            self.regex.is_match(path)
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source() == other.source()
    }
}

impl Eq for Pattern {}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.source())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
