//! `devpack check` command implementation.
//!
//! Reports transform rules that can never apply to their own file type and
//! resolvable extensions no rule claims.

use super::{load_descriptor, ProjectOptions};
use devpack_core::version::REPORT_SCHEMA_VERSION;
use devpack_core::{Config, Diagnostic};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::warn;

#[derive(Serialize)]
struct CheckJson<'a> {
    report_schema_version: u32,
    ok: bool,
    diagnostics: &'a [Diagnostic],
}

/// Run the check command. Exits with status 1 when anything is reported.
pub fn run(config: &Config, options: &ProjectOptions) -> Result<()> {
    let (_, descriptor) = load_descriptor(config, options)?;
    let diagnostics = descriptor.check();

    if config.json_logs {
        let report = CheckJson {
            report_schema_version: REPORT_SCHEMA_VERSION,
            ok: diagnostics.is_empty(),
            diagnostics: &diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
    } else if diagnostics.is_empty() {
        println!("ok: {} rules, no findings", descriptor.rules().len());
    } else {
        for d in &diagnostics {
            println!("{}: {}", d.code, d.message);
        }
    }

    if !diagnostics.is_empty() {
        warn!(count = diagnostics.len(), "descriptor check failed");
        std::process::exit(1);
    }
    Ok(())
}
