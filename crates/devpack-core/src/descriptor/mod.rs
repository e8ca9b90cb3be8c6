//! The configuration descriptor handed to the bundling engine.
//!
//! A [`Descriptor`] is built once by [`build_descriptor`] and never mutated.
//! Its serialized form is the engine's configuration object:
//!
//! ```text
//! { devtool, entry[], output{path,filename,publicPath,pathinfo},
//!   resolveLoader{root,moduleTemplates[]}, resolve{modulesDirectories[],extensions[]},
//!   module{noParse[], loaders[]}, postcss[], plugins[] }
//! ```

pub mod assemble;
pub mod loader;
pub mod pattern;
pub mod plugin;
pub mod rules;
pub mod style;

pub use assemble::{
    build_descriptor, build_descriptor_with, default_rules, HOT_DEV_CLIENT_ENTRY,
    HOT_DEV_SERVER_ENTRY,
};
pub use loader::{LoaderChain, LoaderRef, DEFAULT_MODULE_TEMPLATE};
pub use pattern::Pattern;
pub use plugin::{missing_dependencies, DefinePlugin, HtmlPlugin, PluginSpec};
pub use rules::{RuleMatch, RuleSet, Shadowing, TransformRule};
pub use style::{StylePipeline, StyleStage};

use crate::resolve::{resolve_with_extensions, ExtensionResolution, FileProbe};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Stable codes for descriptor diagnostics.
pub mod codes {
    pub const RULE_SHADOWED: &str = "RULE_SHADOWED";
    pub const EXTENSION_UNCOVERED: &str = "EXTENSION_UNCOVERED";
    pub const PUBLIC_PATH_NO_TRAILING_SLASH: &str = "PUBLIC_PATH_NO_TRAILING_SLASH";
    pub const PLUGIN_DEPENDENCY_MISSING: &str = "PLUGIN_DEPENDENCY_MISSING";
}

/// Source-map style requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Devtool {
    /// Each module wrapped in `eval`. Fastest rebuilds.
    #[default]
    Eval,
    CheapModuleSourceMap,
    SourceMap,
    None,
}

impl Devtool {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eval => "eval",
            Self::CheapModuleSourceMap => "cheap-module-source-map",
            Self::SourceMap => "source-map",
            Self::None => "none",
        }
    }
}

/// Where bundled artifacts are written and served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
    pub path: PathBuf,
    pub filename: String,
    pub public_path: String,
    /// Emit module path comments in the bundle.
    pub pathinfo: bool,
}

/// Where loader modules are looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveLoader {
    pub root: PathBuf,
    pub module_templates: Vec<String>,
}

/// Module lookup directories and extension priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolve {
    pub modules_directories: Vec<String>,
    /// Tried in order; `""` is the import as written.
    pub extensions: Vec<String>,
}

/// Transform rules and parse exclusions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleOptions {
    /// Files the engine must not scan for imports.
    pub no_parse: Vec<Pattern>,
    pub loaders: RuleSet,
}

/// A finding from [`Descriptor::check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
}

/// The assembled configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    devtool: Devtool,
    entry: Vec<String>,
    output: Output,
    resolve_loader: ResolveLoader,
    resolve: Resolve,
    module: ModuleOptions,
    #[serde(rename = "postcss")]
    style_pipeline: StylePipeline,
    plugins: Vec<PluginSpec>,
}

impl Descriptor {
    #[must_use]
    pub fn devtool(&self) -> Devtool {
        self.devtool
    }

    /// Entry points in load order; the application entry is last.
    #[must_use]
    pub fn entry(&self) -> &[String] {
        &self.entry
    }

    #[must_use]
    pub fn output(&self) -> &Output {
        &self.output
    }

    #[must_use]
    pub fn resolve_loader(&self) -> &ResolveLoader {
        &self.resolve_loader
    }

    #[must_use]
    pub fn resolve(&self) -> &Resolve {
        &self.resolve
    }

    #[must_use]
    pub fn module(&self) -> &ModuleOptions {
        &self.module
    }

    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.module.loaders
    }

    #[must_use]
    pub fn style_pipeline(&self) -> &StylePipeline {
        &self.style_pipeline
    }

    #[must_use]
    pub fn plugins(&self) -> &[PluginSpec] {
        &self.plugins
    }

    /// Compile-time constants injected by the define plugin.
    #[must_use]
    pub fn definitions(&self) -> Option<&DefinePlugin> {
        self.plugins.iter().find_map(PluginSpec::as_define)
    }

    /// The rule that claims `path`.
    #[must_use]
    pub fn rule_for(&self, path: &str) -> Option<RuleMatch<'_>> {
        self.module.loaders.first_match(path)
    }

    /// Whether the engine skips import scanning for `path`.
    #[must_use]
    pub fn is_no_parse(&self, path: &str) -> bool {
        self.module.no_parse.iter().any(|p| p.is_match(path))
    }

    /// Module name of a loader under the configured templates.
    #[must_use]
    pub fn loader_module(&self, loader: &LoaderRef) -> String {
        loader.module_name(&self.resolve_loader.module_templates)
    }

    /// Resolve an extensionless import against the configured extensions.
    pub fn resolve_import<P: FileProbe + ?Sized>(
        &self,
        base: &Path,
        probe: &P,
    ) -> ExtensionResolution {
        resolve_with_extensions(base, &self.resolve.extensions, probe)
    }

    /// Rule-ordering, coverage and plugin-dependency findings. Empty when the
    /// descriptor is consistent.
    #[must_use]
    pub fn check(&self) -> Vec<Diagnostic> {
        let rules = &self.module.loaders;
        let mut findings: Vec<Diagnostic> = rules
            .shadowed_rules()
            .into_iter()
            .map(|s| Diagnostic {
                code: codes::RULE_SHADOWED,
                message: format!(
                    "rule #{} ({}) never applies to {}: rule #{} ({}) claims it first",
                    s.rule, rules[s.rule].loader, s.probe, s.shadowed_by, rules[s.shadowed_by].loader
                ),
            })
            .collect();

        findings.extend(
            rules
                .uncovered_extensions(&self.resolve.extensions)
                .into_iter()
                .map(|ext| Diagnostic {
                    code: codes::EXTENSION_UNCOVERED,
                    message: format!("no transform rule claims {ext} files"),
                }),
        );

        if !self.output.public_path.ends_with('/') {
            findings.push(Diagnostic {
                code: codes::PUBLIC_PATH_NO_TRAILING_SLASH,
                message: format!(
                    "public path `{}` does not end with `/`",
                    self.output.public_path
                ),
            });
        }

        findings.extend(
            missing_dependencies(&self.plugins, PluginSpec::depends_on)
                .into_iter()
                .map(|(plugin, dep)| Diagnostic {
                    code: codes::PLUGIN_DEPENDENCY_MISSING,
                    message: format!("{plugin} requires {dep}, which is not declared"),
                }),
        );

        findings
    }
}
