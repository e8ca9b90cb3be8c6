#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use devpack_core::config::DEFAULT_MODE;
use devpack_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "devpack")]
#[command(author, version, about = "Development bundler configuration for Elm single-page apps", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Path to the settings file (overrides discovery of devpack.json)
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Mode: selects `.env.<mode>` files and the injected NODE_ENV
    #[arg(long, short = 'm', global = true, default_value = DEFAULT_MODE)]
    mode: String,

    /// Directory whose node_modules holds the loaders (defaults to the app root)
    #[arg(long, global = true, env = "DEVPACK_OWN_ROOT", value_name = "PATH")]
    own_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Assemble the configuration descriptor
    Descriptor {
        /// Write the descriptor JSON to this file
        #[arg(long, short = 'o', value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Show which transform rule claims each file
    Match {
        /// Files to test (relative to the working directory)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Resolve an import written without an extension
    Resolve {
        /// Path without extension (relative to the working directory)
        base: PathBuf,
    },

    /// Show the compile-time constants injected into the bundle
    Env,

    /// Check rule order and extension coverage
    Check,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::new(cwd)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json)
        .with_mode(cli.mode);

    logging::init(config.verbosity, config.json_logs);

    let options = commands::ProjectOptions {
        settings_file: cli.config,
        own_root: cli.own_root,
    };

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Descriptor { out }) => {
            let span = tracing::info_span!("descriptor", cmd = "descriptor", cwd = %config.cwd.display());
            let _guard = span.enter();
            commands::descriptor::run(&config, &options, out.as_deref())
        }
        Some(Commands::Match { files }) => commands::matches::run(&config, &options, &files),
        Some(Commands::Resolve { base }) => commands::resolve::run(&config, &options, &base),
        Some(Commands::Env) => commands::env::run(&config),
        Some(Commands::Check) => {
            let span = tracing::info_span!("check", cmd = "check", cwd = %config.cwd.display());
            let _guard = span.enter();
            commands::check::run(&config, &options)
        }
    }
}
