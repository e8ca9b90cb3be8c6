//! `devpack env` command implementation.

use super::report_error;
use devpack_core::{find_app_root, ClientEnvironment, Config};
use miette::{IntoDiagnostic, Result};

/// Run the env command.
pub fn run(config: &Config) -> Result<()> {
    let root = find_app_root(&config.cwd).unwrap_or_else(|| config.cwd.clone());
    let env = ClientEnvironment::from_process(&root, &config.mode)
        .map_err(|e| report_error(&e, config.json_logs))?;

    let definitions = env.definitions();
    if config.json_logs {
        println!("{}", serde_json::to_string_pretty(&definitions).into_diagnostic()?);
    } else {
        for (key, value) in &definitions {
            println!("{key} = {value}");
        }
    }
    Ok(())
}
