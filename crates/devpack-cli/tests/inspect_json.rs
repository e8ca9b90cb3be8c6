//! Integration tests for `devpack match`, `resolve`, `check` and `env`.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "devpack-cli", "--bin", "devpack", "--"]);
    cmd
}

fn scaffold_app() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("elm-package.json"), "{}").unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("src/index.js"), "require('./Main');\n").unwrap();
    fs::write(root.join("src/Main.elm"), "module Main exposing (..)\n").unwrap();
    fs::write(root.join("public/index.html"), "<div id=\"root\"></div>\n").unwrap();
    dir
}

fn run(cwd: &Path, args: &[&str]) -> Output {
    cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(cwd)
        .args(args)
        .env_remove("DEVPACK_OWN_ROOT")
        .output()
        .expect("Failed to run devpack")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
fn test_match_reports_first_rule() {
    let app = scaffold_app();
    let output = run(
        app.path(),
        &["match", "src/Main.elm", "src/index.js", "src/logo.png", "src/app.css"],
    );
    assert!(output.status.success());
    let json = stdout_json(&output);
    let results = json.as_array().expect("array of matches");
    assert_eq!(results.len(), 4);

    assert_eq!(results[0]["rule"], 1);
    assert_eq!(
        results[0]["modules"],
        serde_json::json!(["elm-webpack-loader", "elm-hot-loader"])
    );
    assert_eq!(results[0]["no_parse"], true);

    assert_eq!(results[1]["rule"], 0);
    assert_eq!(results[1]["no_parse"], false);

    assert_eq!(results[2]["rule"], 3);
    assert_eq!(results[2]["loader"], "url");

    assert_eq!(
        results[3]["modules"],
        serde_json::json!(["postcss-loader", "css-loader", "style-loader"])
    );
}

#[test]
fn test_match_vendored_elm_falls_through_to_asset_rule() {
    let app = scaffold_app();
    let output = run(app.path(), &["match", "node_modules/pkg/Thing.elm"]);
    let json = stdout_json(&output);
    assert_eq!(json[0]["rule"], 3, "unexpected match: {json}");
    assert_eq!(json[0]["loader"], "url");
}

#[test]
fn test_resolve_finds_elm_module() {
    let app = scaffold_app();
    let output = run(app.path(), &["resolve", "src/Main"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "resolved");
    assert_eq!(json["extension"], ".elm");
    assert_eq!(json["tried"].as_array().unwrap().len(), 3);
}

#[test]
fn test_resolve_not_found_exits_non_zero() {
    let app = scaffold_app();
    let output = run(app.path(), &["resolve", "src/Missing"]);
    assert!(!output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["status"], "not_found");
}

#[test]
fn test_check_default_descriptor_is_clean() {
    let app = scaffold_app();
    let output = run(app.path(), &["check"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["report_schema_version"], 1);
    assert_eq!(json["ok"], true);
    assert_eq!(json["diagnostics"], serde_json::json!([]));
}

#[test]
fn test_check_flags_public_path() {
    let app = scaffold_app();
    fs::write(app.path().join("devpack.json"), r#"{ "publicPath": "/app" }"#).unwrap();

    let output = run(app.path(), &["check"]);
    assert!(!output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["ok"], false);
    assert_eq!(json["diagnostics"][0]["code"], "PUBLIC_PATH_NO_TRAILING_SLASH");
}

#[test]
fn test_env_layers_mode_files() {
    let app = scaffold_app();
    fs::write(app.path().join(".env"), "ELM_APP_NAME=base\n").unwrap();
    fs::write(app.path().join(".env.production"), "ELM_APP_NAME=prod\n").unwrap();

    let output = run(app.path(), &["--mode", "production", "env"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["process.env.ELM_APP_NAME"], "\"prod\"");
    assert_eq!(json["process.env.NODE_ENV"], "\"production\"");
}
