//! Loader chains: `style!css!postcss`, `elm-webpack?verbose=true&debug=true`.
//!
//! A chain lists transformers left to right; the engine applies them right to
//! left (the last loader sees the raw source first).

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Default template mapping short loader names to module names.
pub const DEFAULT_MODULE_TEMPLATE: &str = "*-loader";

/// A single loader in a chain, with its inline query options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRef {
    pub name: String,
    /// Query options in declaration order. A bare flag (`css?modules`) has
    /// no value.
    pub options: Vec<(String, Option<String>)>,
}

impl LoaderRef {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((key.into(), Some(value.into())));
        self
    }

    /// Add a bare flag, rendered without `=value`.
    #[must_use]
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.options.push((key.into(), None));
        self
    }

    /// Look up an inline option. Bare flags read as `true`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_deref().unwrap_or("true"))
    }

    /// Module name for this loader under the given templates.
    ///
    /// Only the first template is applied; `*` stands for the short name.
    /// A name that already matches the template is returned unchanged.
    #[must_use]
    pub fn module_name(&self, templates: &[String]) -> String {
        let Some(template) = templates.first() else {
            return self.name.clone();
        };
        let Some((prefix, suffix)) = template.split_once('*') else {
            return self.name.clone();
        };
        if self.name.starts_with(prefix) && self.name.ends_with(suffix) {
            return self.name.clone();
        }
        format!("{prefix}{}{suffix}", self.name)
    }
}

impl fmt::Display for LoaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for (i, (key, value)) in self.options.iter().enumerate() {
            f.write_str(if i == 0 { "?" } else { "&" })?;
            f.write_str(key)?;
            if let Some(value) = value {
                write!(f, "={value}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for LoaderRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidLoaderChain {
            chain: s.to_string(),
            message: message.to_string(),
        };

        let (name, query) = match s.split_once('?') {
            Some((name, query)) => (name, Some(query)),
            None => (s, None),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("empty loader name"));
        }

        let mut loader = Self::new(name);
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = match pair.split_once('=') {
                    Some((key, value)) => (key, Some(value.to_string())),
                    None => (pair, None),
                };
                if key.is_empty() {
                    return Err(invalid("query option without a key"));
                }
                loader.options.push((key.to_string(), value));
            }
        }
        Ok(loader)
    }
}

/// An ordered loader chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderChain(Vec<LoaderRef>);

impl LoaderChain {
    /// Chain of the given loaders, left to right. Empty chains are rejected.
    pub fn new(loaders: Vec<LoaderRef>) -> Result<Self> {
        if loaders.is_empty() {
            return Err(Error::InvalidLoaderChain {
                chain: String::new(),
                message: "empty chain".to_string(),
            });
        }
        Ok(Self(loaders))
    }

    /// Chain of a single loader.
    #[must_use]
    pub fn single(loader: LoaderRef) -> Self {
        Self(vec![loader])
    }

    /// Loaders as declared (left to right).
    #[must_use]
    pub fn loaders(&self) -> &[LoaderRef] {
        &self.0
    }

    /// Loaders in the order the engine runs them (right to left).
    pub fn application_order(&self) -> impl Iterator<Item = &LoaderRef> {
        self.0.iter().rev()
    }

    /// Whether any loader in the chain has this short name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|l| l.name == name)
    }
}

impl fmt::Display for LoaderChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, loader) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("!")?;
            }
            write!(f, "{loader}")?;
        }
        Ok(())
    }
}

impl FromStr for LoaderChain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(Error::InvalidLoaderChain {
                chain: s.to_string(),
                message: "empty chain".to_string(),
            });
        }
        let loaders = s
            .split('!')
            .map(|segment| {
                segment.parse::<LoaderRef>().map_err(|e| match e {
                    Error::InvalidLoaderChain { message, .. } => Error::InvalidLoaderChain {
                        chain: s.to_string(),
                        message,
                    },
                    other => other,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self(loaders))
    }
}

impl Serialize for LoaderChain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
