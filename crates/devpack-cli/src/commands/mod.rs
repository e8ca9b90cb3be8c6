pub mod check;
pub mod descriptor;
pub mod env;
pub mod matches;
pub mod resolve;
pub mod version;

use devpack_core::{
    build_descriptor_with, find_app_root, load_settings, ClientEnvironment, Config, Descriptor,
    Error, ProjectPaths, Settings,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options shared by every command that needs the project.
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub settings_file: Option<PathBuf>,
    pub own_root: Option<PathBuf>,
}

/// Everything the descriptor is assembled from.
#[derive(Debug)]
pub struct Project {
    pub paths: ProjectPaths,
    pub env: ClientEnvironment,
    pub settings: Settings,
    pub settings_path: Option<PathBuf>,
}

impl Project {
    /// Locate the app root from `config.cwd` and gather paths, settings and
    /// the client environment.
    pub fn load(config: &Config, options: &ProjectOptions) -> Result<Self, Error> {
        let app_root = find_app_root(&config.cwd).unwrap_or_else(|| config.cwd.clone());
        debug!(root = %app_root.display(), "app root");

        let explicit = options
            .settings_file
            .as_deref()
            .map(|p| absolutize(&config.cwd, p));
        let (settings_path, settings) = match load_settings(&app_root, explicit.as_deref())? {
            Some((path, settings)) => (Some(path), settings),
            None => (None, Settings::default()),
        };
        if let Some(path) = &settings_path {
            debug!(path = %path.display(), "loaded settings");
        }

        let own_root = options
            .own_root
            .as_deref()
            .map_or_else(|| app_root.clone(), |p| absolutize(&config.cwd, p));
        let mut paths = ProjectPaths::discover(&app_root, &own_root);
        if let Some(entry) = &settings.entry {
            paths = paths.with_entry(entry);
        }
        if let Some(template) = &settings.template {
            paths = paths.with_template(template);
        }

        let env = ClientEnvironment::from_process(&paths.app_root, &config.mode)?;
        debug!(vars = env.len(), mode = %config.mode, "client environment");

        Ok(Self {
            paths,
            env,
            settings,
            settings_path,
        })
    }

    pub fn descriptor(&self) -> Result<Descriptor, Error> {
        build_descriptor_with(&self.paths, &self.env, &self.settings)
    }
}

/// Load the project and build its descriptor.
pub fn load_descriptor(
    config: &Config,
    options: &ProjectOptions,
) -> miette::Result<(Project, Descriptor)> {
    Project::load(config, options)
        .and_then(|project| project.descriptor().map(|descriptor| (project, descriptor)))
        .map_err(|e| report_error(&e, config.json_logs))
}

/// Path relative to the working directory, made absolute.
pub fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[derive(Serialize)]
struct ErrorJson<'a> {
    ok: bool,
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: String,
}

/// Turn a core error into a diagnostic carrying its stable code.
///
/// With `--json` the error envelope goes to stdout and the process exits
/// with status 1 right away, so nothing else reaches stdout.
pub fn report_error(err: &Error, json: bool) -> miette::Report {
    if json {
        let body = ErrorJson {
            ok: false,
            error: ErrorBody {
                code: err.code(),
                message: err.to_string(),
            },
        };
        match serde_json::to_string(&body) {
            Ok(line) => println!("{line}"),
            Err(_) => eprintln!("error: {err}"),
        }
        std::process::exit(1);
    }
    miette::miette!(code = err.code(), "{err}")
}
