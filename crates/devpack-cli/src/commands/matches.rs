//! `devpack match` command implementation.

use super::{absolutize, load_descriptor, ProjectOptions};
use devpack_core::{Config, Descriptor};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct MatchJson {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    loader: Option<String>,
    /// Loader modules in the order the engine runs them.
    modules: Vec<String>,
    no_parse: bool,
}

fn describe(descriptor: &Descriptor, file: String) -> MatchJson {
    let found = descriptor.rule_for(&file);
    MatchJson {
        rule: found.map(|m| m.index),
        loader: found.map(|m| m.rule.loader.to_string()),
        modules: found
            .map(|m| {
                m.rule
                    .loader
                    .application_order()
                    .map(|l| descriptor.loader_module(l))
                    .collect()
            })
            .unwrap_or_default(),
        no_parse: descriptor.is_no_parse(&file),
        file,
    }
}

/// Run the match command.
pub fn run(config: &Config, options: &ProjectOptions, files: &[PathBuf]) -> Result<()> {
    let (_, descriptor) = load_descriptor(config, options)?;

    let results: Vec<MatchJson> = files
        .iter()
        .map(|f| {
            let file = absolutize(&config.cwd, f).to_string_lossy().into_owned();
            describe(&descriptor, file)
        })
        .collect();

    if config.json_logs {
        println!("{}", serde_json::to_string_pretty(&results).into_diagnostic()?);
        return Ok(());
    }

    for result in &results {
        match (&result.rule, &result.loader) {
            (Some(index), Some(loader)) => {
                println!("{}", result.file);
                println!("  rule #{index}: {loader}");
                println!("  runs:    {}", result.modules.join(" -> "));
                if result.no_parse {
                    println!("  (not scanned for imports)");
                }
            }
            _ => println!("{}\n  no rule", result.file),
        }
    }

    Ok(())
}
