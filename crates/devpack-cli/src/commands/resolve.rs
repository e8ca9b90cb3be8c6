//! `devpack resolve` command implementation.

use super::{absolutize, load_descriptor, ProjectOptions};
use devpack_core::{Config, ExtensionResolution, OsProbe};
use miette::{IntoDiagnostic, Result};
use std::path::Path;

/// Run the resolve command. Exits with status 1 when nothing matches.
pub fn run(config: &Config, options: &ProjectOptions, base: &Path) -> Result<()> {
    let (_, descriptor) = load_descriptor(config, options)?;
    let base = absolutize(&config.cwd, base);

    let result = descriptor.resolve_import(&base, &OsProbe);

    if config.json_logs {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        for tried in result.tried() {
            println!("  tried {}", tried.display());
        }
        match &result {
            ExtensionResolution::Resolved { path, .. } => println!("{}", path.display()),
            ExtensionResolution::NotFound { .. } => {
                eprintln!("error: cannot resolve {}", base.display());
            }
        }
    }

    if result.path().is_none() {
        std::process::exit(1);
    }
    Ok(())
}
