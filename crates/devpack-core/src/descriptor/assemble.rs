//! Descriptor assembly from resolved paths and the client environment.

use super::{
    Descriptor, DefinePlugin, HtmlPlugin, LoaderChain, LoaderRef, ModuleOptions, Output, Pattern,
    PluginSpec, Resolve, ResolveLoader, RuleSet, StylePipeline, TransformRule,
    DEFAULT_MODULE_TEMPLATE,
};
use crate::env::{validate_key, ClientEnvironment};
use crate::error::Result;
use crate::paths::ProjectPaths;
use crate::settings::Settings;
use serde_json::json;
use std::path::Path;

/// Live-reload client, first entry of every development bundle.
pub const HOT_DEV_CLIENT_ENTRY: &str = "react-dev-utils/webpackHotDevClient";

/// Hot-replacement runtime, loaded right after the client.
pub const HOT_DEV_SERVER_ENTRY: &str = "webpack/hot/dev-server";

/// Extensions the catch-all asset rule leaves to other rules (or to the
/// engine itself for html and json).
const ASSET_RULE_EXCLUDES: &[&str] = &["html", "js", "css", "json", "svg"];

/// Build the development descriptor with default settings.
pub fn build_descriptor(paths: &ProjectPaths, env: &ClientEnvironment) -> Result<Descriptor> {
    build_descriptor_with(paths, env, &Settings::default())
}

/// Build the development descriptor.
///
/// Fails without producing anything when the entry or template is missing or
/// an environment key is unsafe to inject.
pub fn build_descriptor_with(
    paths: &ProjectPaths,
    env: &ClientEnvironment,
    settings: &Settings,
) -> Result<Descriptor> {
    paths.validate()?;
    for (key, _) in env.iter() {
        validate_key(key)?;
    }

    let mut entry = vec![
        HOT_DEV_CLIENT_ENTRY.to_string(),
        HOT_DEV_SERVER_ENTRY.to_string(),
    ];
    entry.extend(settings.extra_entries.iter().cloned());
    entry.push(display(&paths.entry));

    Ok(Descriptor {
        devtool: settings.devtool,
        entry,
        output: Output {
            path: paths.dist.clone(),
            filename: settings.output_filename.clone(),
            public_path: settings.public_path.clone(),
            pathinfo: true,
        },
        resolve_loader: ResolveLoader {
            root: paths.own_modules.clone(),
            module_templates: vec![DEFAULT_MODULE_TEMPLATE.to_string()],
        },
        resolve: Resolve {
            modules_directories: paths.modules_directories.clone(),
            extensions: vec![String::new(), ".js".to_string(), ".elm".to_string()],
        },
        module: ModuleOptions {
            no_parse: vec![Pattern::extension("elm")?],
            loaders: default_rules(paths, settings)?,
        },
        style_pipeline: StylePipeline::development(),
        plugins: vec![
            PluginSpec::Define(DefinePlugin {
                definitions: env.definitions(),
            }),
            PluginSpec::Html(HtmlPlugin {
                inject: true,
                template: paths.template.clone(),
                favicon: paths.favicon.clone(),
            }),
            PluginSpec::HotModuleReplacement,
        ],
    })
}

/// The development rule set, in evaluation order:
///
/// 0. `.js` outside vendored directories → babel
/// 1. `.elm` outside `elm-stuff`/`node_modules` → elm-hot ! elm-webpack
/// 2. `.css` → style ! css ! postcss
/// 3. everything not excluded → url (small files inlined)
/// 4. `.svg` → file
pub fn default_rules(paths: &ProjectPaths, settings: &Settings) -> Result<RuleSet> {
    let flags = settings.elm_loader;
    let elm_webpack = LoaderRef::new("elm-webpack")
        .option("verbose", flags.verbose.to_string())
        .option("warn", flags.warn.to_string())
        .option("debug", flags.debug.to_string())
        .option("pathToMake", display(&paths.elm_make));

    let javascript = TransformRule::new(
        Some(Pattern::extension("js")?),
        LoaderChain::single(LoaderRef::new("babel")),
    )
    .exclude(Pattern::new("(node_modules|bower_components)")?)
    .query(json!({ "presets": settings.babel_presets }));

    let elm = TransformRule::new(
        Some(Pattern::extension("elm")?),
        LoaderChain::new(vec![LoaderRef::new("elm-hot"), elm_webpack])?,
    )
    .exclude(Pattern::new("elm-stuff")?)
    .exclude(Pattern::new("node_modules")?);

    let stylesheet = TransformRule::new(
        Some(Pattern::extension("css")?),
        "style!css!postcss".parse()?,
    );

    let mut assets = TransformRule::new(None, LoaderChain::single(LoaderRef::new("url"))).query(
        json!({ "limit": settings.url_loader_limit, "name": settings.asset_name }),
    );
    for ext in ASSET_RULE_EXCLUDES {
        assets = assets.exclude(Pattern::extension(ext)?);
    }

    let svg = TransformRule::new(
        Some(Pattern::extension("svg")?),
        LoaderChain::single(LoaderRef::new("file")),
    )
    .query(json!({ "name": settings.asset_name }));

    Ok(RuleSet::new(vec![javascript, elm, stylesheet, assets, svg]))
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
