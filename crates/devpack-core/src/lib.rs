#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

//! Development-mode bundler configuration.
//!
//! Assembles the immutable [`Descriptor`] consumed by the bundling engine
//! from resolved [`ProjectPaths`] and a [`ClientEnvironment`].

pub mod config;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod paths;
pub mod resolve;
pub mod settings;
pub mod version;

pub use config::Config;
pub use descriptor::{build_descriptor, build_descriptor_with, Descriptor, Diagnostic};
pub use env::ClientEnvironment;
pub use error::{Error, PathRole, Result};
pub use paths::{find_app_root, ProjectPaths};
pub use resolve::{resolve_with_extensions, ExtensionResolution, FileProbe, OsProbe};
pub use settings::{load_settings, Settings};
pub use version::VERSION;
