use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes.
///
/// All codes are SCREAMING_SNAKE_CASE and stable across versions.
pub mod codes {
    pub const MISSING_ENTRY_POINT: &str = "MISSING_ENTRY_POINT";
    pub const MISSING_TEMPLATE: &str = "MISSING_TEMPLATE";
    pub const INVALID_ENVIRONMENT_KEY: &str = "INVALID_ENVIRONMENT_KEY";
    pub const INVALID_PATTERN: &str = "INVALID_PATTERN";
    pub const INVALID_LOADER_CHAIN: &str = "INVALID_LOADER_CHAIN";
    pub const CONFIG_READ: &str = "CONFIG_READ";
    pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Which required input a missing path was supposed to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRole {
    Entry,
    Template,
}

impl PathRole {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "entry",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for PathRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for devpack operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required {role} path: {path}")]
    MissingRequiredPath { role: PathRole, path: PathBuf },

    #[error("Environment variable `{key}` is not a valid identifier for code injection")]
    InvalidEnvironmentKey { key: String },

    #[error("Invalid pattern /{source_text}/: {message}")]
    InvalidPattern {
        source_text: String,
        message: String,
    },

    #[error("Invalid loader chain `{chain}`: {message}")]
    InvalidLoaderChain { chain: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    #[must_use]
    pub fn missing(role: PathRole, path: impl Into<PathBuf>) -> Self {
        Self::MissingRequiredPath {
            role,
            path: path.into(),
        }
    }

    /// Stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredPath {
                role: PathRole::Entry,
                ..
            } => codes::MISSING_ENTRY_POINT,
            Self::MissingRequiredPath {
                role: PathRole::Template,
                ..
            } => codes::MISSING_TEMPLATE,
            Self::InvalidEnvironmentKey { .. } => codes::INVALID_ENVIRONMENT_KEY,
            Self::InvalidPattern { .. } => codes::INVALID_PATTERN,
            Self::InvalidLoaderChain { .. } => codes::INVALID_LOADER_CHAIN,
            Self::Io(_) => codes::IO_ERROR,
            Self::ConfigRead { .. } => codes::CONFIG_READ,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE,
            Self::Other(_) => codes::INTERNAL,
        }
    }

    /// Whether this is a missing-path error for the given role.
    #[must_use]
    pub fn is_missing(&self, expected: PathRole) -> bool {
        matches!(self, Self::MissingRequiredPath { role, .. } if *role == expected)
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
