//! Stylesheet post-processing pipeline.
//!
//! Stages run in declaration order on stylesheet content after a style rule
//! has claimed the file. The stages themselves live in the external engine;
//! this is only their declaration.

use serde::Serialize;

/// One post-processing stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "plugin")]
pub enum StyleStage {
    /// Inline `@import`ed files.
    #[serde(rename = "postcss-import")]
    Import {
        /// Register each imported file as a dependency of the build so that
        /// edits to it trigger a rebuild.
        #[serde(rename = "addDependencyTo")]
        add_dependency_to_bundler: bool,
    },
    /// Rewrite `url()` references.
    #[serde(rename = "postcss-url")]
    Url,
    /// Lower future CSS syntax (custom properties, nesting, media ranges).
    #[serde(rename = "postcss-cssnext")]
    CssNext,
    /// Show processing warnings in the page.
    #[serde(rename = "postcss-browser-reporter")]
    BrowserReporter,
    /// Print processing warnings to the console.
    #[serde(rename = "postcss-reporter")]
    Reporter,
}

impl StyleStage {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import { .. } => "postcss-import",
            Self::Url => "postcss-url",
            Self::CssNext => "postcss-cssnext",
            Self::BrowserReporter => "postcss-browser-reporter",
            Self::Reporter => "postcss-reporter",
        }
    }

    /// Whether this stage only reports and never rewrites content.
    #[must_use]
    pub fn is_reporter(&self) -> bool {
        matches!(self, Self::BrowserReporter | Self::Reporter)
    }
}

/// Ordered style stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StylePipeline(Vec<StyleStage>);

impl StylePipeline {
    /// The development pipeline: import, url, cssnext, then both reporters.
    #[must_use]
    pub fn development() -> Self {
        Self(vec![
            StyleStage::Import {
                add_dependency_to_bundler: true,
            },
            StyleStage::Url,
            StyleStage::CssNext,
            StyleStage::BrowserReporter,
            StyleStage::Reporter,
        ])
    }

    #[must_use]
    pub fn stages(&self) -> &[StyleStage] {
        &self.0
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(StyleStage::name)
    }
}
