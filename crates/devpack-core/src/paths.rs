use crate::error::{Error, PathRole, Result};
use std::path::{Path, PathBuf};

/// Markers that identify an app root, in priority order.
const ROOT_MARKERS: &[&str] = &["elm-package.json", "package.json"];

/// Find the app root by walking up from `cwd`.
///
/// Returns the first directory holding one of [`ROOT_MARKERS`], or `None`.
#[must_use]
pub fn find_app_root(cwd: &Path) -> Option<PathBuf> {
    let mut current = cwd.to_path_buf();

    loop {
        if ROOT_MARKERS.iter().any(|m| current.join(m).exists()) {
            return Some(current);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Resolved filesystem locations the descriptor is assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Directory holding the app's manifest.
    pub app_root: PathBuf,
    /// Application entry module.
    pub entry: PathBuf,
    /// Build output directory.
    pub dist: PathBuf,
    /// HTML template for the page scaffold.
    pub template: PathBuf,
    /// Favicon copied next to the page, when present.
    pub favicon: Option<PathBuf>,
    /// `node_modules` of the tool itself, where loaders are looked up.
    pub own_modules: PathBuf,
    /// Elm compiler binary passed to the Elm loader.
    pub elm_make: PathBuf,
    /// Directory names searched upward for bare module imports.
    pub modules_directories: Vec<String>,
}

impl ProjectPaths {
    /// Conventional layout under `app_root`:
    ///
    /// ```text
    /// src/index.js            entry
    /// dist/                   output
    /// public/index.html       template
    /// public/favicon.ico      favicon (optional)
    /// node_modules/.bin/elm-make
    /// ```
    ///
    /// `own_root` is the directory of the tool installation; its
    /// `node_modules` is the loader lookup root.
    #[must_use]
    pub fn discover(app_root: &Path, own_root: &Path) -> Self {
        let app_root = absolute(app_root);
        let own_root = absolute(own_root);
        let favicon = app_root.join("public").join("favicon.ico");

        Self {
            entry: app_root.join("src").join("index.js"),
            dist: app_root.join("dist"),
            template: app_root.join("public").join("index.html"),
            favicon: favicon.is_file().then_some(favicon),
            own_modules: own_root.join("node_modules"),
            elm_make: app_root
                .join("node_modules")
                .join(".bin")
                .join(elm_make_binary()),
            modules_directories: vec!["node_modules".to_string()],
            app_root,
        }
    }

    /// Replace the entry module. Relative paths are taken from the app root.
    #[must_use]
    pub fn with_entry(mut self, entry: impl AsRef<Path>) -> Self {
        self.entry = self.app_root.join(entry);
        self
    }

    /// Replace the HTML template. Relative paths are taken from the app root.
    #[must_use]
    pub fn with_template(mut self, template: impl AsRef<Path>) -> Self {
        self.template = self.app_root.join(template);
        self
    }

    /// Replace the module lookup directories.
    #[must_use]
    pub fn with_modules_directories<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules_directories = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Check the paths that must exist before a descriptor can be built.
    pub fn validate(&self) -> Result<()> {
        if !self.entry.is_file() {
            return Err(Error::missing(PathRole::Entry, &self.entry));
        }
        if !self.template.is_file() {
            return Err(Error::missing(PathRole::Template, &self.template));
        }
        Ok(())
    }
}

fn elm_make_binary() -> &'static str {
    if cfg!(windows) {
        "elm-make.cmd"
    } else {
        "elm-make"
    }
}

/// Absolute form of `path`, canonical when it exists.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = dunce::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
    }
}
