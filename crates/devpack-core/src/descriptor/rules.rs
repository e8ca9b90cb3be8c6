//! Transform rules and first-match evaluation.

use super::loader::LoaderChain;
use super::pattern::Pattern;
use serde::Serialize;

/// Name of the probe file used by the rule diagnostics (`module.<ext>`).
const PROBE_STEM: &str = "module";

/// One transform rule: which files it claims and how they are transformed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformRule {
    /// Paths must match this pattern. `None` matches every path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<Pattern>,
    /// A path matching any of these is never claimed by the rule.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<Pattern>,
    pub loader: LoaderChain,
    /// Options handed to the (single) loader.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<serde_json::Value>,
}

impl TransformRule {
    #[must_use]
    pub fn new(test: Option<Pattern>, loader: LoaderChain) -> Self {
        Self {
            test,
            exclude: Vec::new(),
            loader,
            query: None,
        }
    }

    #[must_use]
    pub fn exclude(mut self, pattern: Pattern) -> Self {
        self.exclude.push(pattern);
        self
    }

    #[must_use]
    pub fn query(mut self, query: serde_json::Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Whether this rule claims `path` on its own, ignoring rule order.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let tested = self.test.as_ref().map_or(true, |t| t.is_match(path));
        tested && !self.exclude.iter().any(|e| e.is_match(path))
    }

    /// Extension this rule stands for, when its test was built from one.
    #[must_use]
    pub fn representative_extension(&self) -> Option<&str> {
        self.test
            .as_ref()
            .and_then(Pattern::representative_extension)
    }
}

/// The rule that claimed a path.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a TransformRule,
}

/// A rule that can never apply to its own extension because an earlier rule
/// claims it first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shadowing {
    pub rule: usize,
    pub shadowed_by: usize,
    pub probe: String,
}

/// Ordered transform rules. Evaluation is first-match-wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleSet(Vec<TransformRule>);

impl RuleSet {
    #[must_use]
    pub fn new(rules: Vec<TransformRule>) -> Self {
        Self(rules)
    }

    #[must_use]
    pub fn rules(&self) -> &[TransformRule] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransformRule> {
        self.0.iter()
    }

    /// The first rule, in declaration order, that claims `path`.
    #[must_use]
    pub fn first_match(&self, path: &str) -> Option<RuleMatch<'_>> {
        self.0
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(path))
            .map(|(index, rule)| RuleMatch { index, rule })
    }

    /// Every rule that would claim `path` in isolation. Only the first one
    /// is ever applied.
    #[must_use]
    pub fn all_matches(&self, path: &str) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.matches(path))
            .map(|(index, _)| index)
            .collect()
    }

    /// Rules whose own extension is claimed by an earlier rule.
    #[must_use]
    pub fn shadowed_rules(&self) -> Vec<Shadowing> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(index, rule)| {
                let ext = rule.representative_extension()?;
                let probe = probe_path(ext);
                let winner = self.first_match(&probe)?;
                (winner.index < index).then(|| Shadowing {
                    rule: index,
                    shadowed_by: winner.index,
                    probe,
                })
            })
            .collect()
    }

    /// Extensions (from `extensions`) that no rule claims. The empty
    /// extension is skipped.
    #[must_use]
    pub fn uncovered_extensions(&self, extensions: &[String]) -> Vec<String> {
        extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.'))
            .filter(|ext| !ext.is_empty())
            .filter(|ext| self.first_match(&probe_path(ext)).is_none())
            .map(|ext| format!(".{ext}"))
            .collect()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a TransformRule;
    type IntoIter = std::slice::Iter<'a, TransformRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for RuleSet {
    type Output = TransformRule;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

fn probe_path(ext: &str) -> String {
    format!("{PROBE_STEM}.{ext}")
}
