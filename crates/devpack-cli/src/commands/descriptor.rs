//! `devpack descriptor` command implementation.
//!
//! Assembles the descriptor and prints it (JSON) or a summary of it.

use super::{load_descriptor, ProjectOptions};
use devpack_core::{Config, Descriptor};
use miette::{IntoDiagnostic, Result};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Run the descriptor command.
pub fn run(config: &Config, options: &ProjectOptions, out: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    let (project, descriptor) = load_descriptor(config, options)?;
    info!(
        rules = descriptor.rules().len(),
        plugins = descriptor.plugins().len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "descriptor assembled"
    );

    let rendered = serde_json::to_string_pretty(&descriptor).into_diagnostic()?;

    if let Some(out) = out {
        let out = super::absolutize(&config.cwd, out);
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).into_diagnostic()?;
        }
        std::fs::write(&out, format!("{rendered}\n")).into_diagnostic()?;
        info!(path = %out.display(), "descriptor written");
    }

    if config.json_logs {
        println!("{rendered}");
    } else {
        print_human(&descriptor, project.settings_path.as_deref());
    }

    Ok(())
}

fn print_human(descriptor: &Descriptor, settings: Option<&Path>) {
    if let Some(path) = settings {
        println!("settings: {}", path.display());
    }
    println!("devtool:  {}", descriptor.devtool().as_str());
    println!(
        "output:   {} ({}, public path {})",
        descriptor.output().path.display(),
        descriptor.output().filename,
        descriptor.output().public_path
    );

    println!("entry:");
    for entry in descriptor.entry() {
        println!("  {entry}");
    }

    println!("rules:");
    for (i, rule) in descriptor.rules().iter().enumerate() {
        let test = rule
            .test
            .as_ref()
            .map_or_else(|| "*".to_string(), ToString::to_string);
        println!("  #{i} {test} -> {}", rule.loader);
    }

    let stages: Vec<_> = descriptor.style_pipeline().names().collect();
    println!("postcss:  {}", stages.join(", "));

    let plugins: Vec<_> = descriptor.plugins().iter().map(|p| p.name()).collect();
    println!("plugins:  {}", plugins.join(", "));
}
