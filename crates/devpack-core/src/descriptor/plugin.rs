//! Build-lifecycle plugins declared by the descriptor.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Replace identifiers with compile-time constants.
///
/// Values are inserted into generated code verbatim, so they must already be
/// valid expressions (string values are JSON-encoded by the environment
/// collector).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefinePlugin {
    pub definitions: BTreeMap<String, String>,
}

/// Emit an HTML page from a template with the bundle injected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlPlugin {
    pub inject: bool,
    pub template: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<PathBuf>,
}

/// A plugin entry in the descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "options")]
pub enum PluginSpec {
    #[serde(rename = "DefinePlugin")]
    Define(DefinePlugin),
    #[serde(rename = "HtmlWebpackPlugin")]
    Html(HtmlPlugin),
    #[serde(rename = "HotModuleReplacementPlugin")]
    HotModuleReplacement,
}

impl PluginSpec {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Define(_) => "DefinePlugin",
            Self::Html(_) => "HtmlWebpackPlugin",
            Self::HotModuleReplacement => "HotModuleReplacementPlugin",
        }
    }

    /// Names of plugins that must also be declared for this one to work.
    #[must_use]
    pub fn depends_on(&self) -> &'static [&'static str] {
        match self {
            Self::Define(_) | Self::Html(_) | Self::HotModuleReplacement => &[],
        }
    }

    #[must_use]
    pub fn as_define(&self) -> Option<&DefinePlugin> {
        match self {
            Self::Define(define) => Some(define),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_html(&self) -> Option<&HtmlPlugin> {
        match self {
            Self::Html(html) => Some(html),
            _ => None,
        }
    }
}

/// `(plugin, missing dependency)` pairs, in declaration order.
///
/// `depends_on` is passed in so callers can check a set against any
/// dependency table; [`PluginSpec::depends_on`] is the built-in one.
#[must_use]
pub fn missing_dependencies<F>(
    plugins: &[PluginSpec],
    depends_on: F,
) -> Vec<(&'static str, &'static str)>
where
    F: Fn(&PluginSpec) -> &'static [&'static str],
{
    plugins
        .iter()
        .flat_map(|plugin| {
            depends_on(plugin)
                .iter()
                .filter(|dep| !plugins.iter().any(|p| p.name() == **dep))
                .map(move |dep| (plugin.name(), *dep))
        })
        .collect()
}
