//! Integration tests for `devpack descriptor --json` output.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-p", "devpack-cli", "--bin", "devpack", "--"]);
    cmd
}

/// A minimal Elm app: manifest, entry module and page template.
fn scaffold_app() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("package.json"), r#"{"name":"app"}"#).unwrap();
    fs::create_dir_all(root.join("src")).unwrap();
    fs::create_dir_all(root.join("public")).unwrap();
    fs::write(root.join("src/index.js"), "require('./Main.elm');\n").unwrap();
    fs::write(root.join("public/index.html"), "<div id=\"root\"></div>\n").unwrap();
    dir
}

fn run_json(cwd: &Path, args: &[&str]) -> (serde_json::Value, bool) {
    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(cwd)
        .args(args)
        .env_remove("DEVPACK_OWN_ROOT")
        .output()
        .expect("Failed to run devpack");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");
    (json, output.status.success())
}

#[test]
fn test_descriptor_json_shape() {
    let app = scaffold_app();
    let (json, ok) = run_json(app.path(), &["descriptor"]);
    assert!(ok);

    for key in [
        "devtool",
        "entry",
        "output",
        "resolveLoader",
        "resolve",
        "module",
        "postcss",
        "plugins",
    ] {
        assert!(json.get(key).is_some(), "Missing {key}");
    }
    assert_eq!(json["devtool"], "eval");
    assert_eq!(json["output"]["publicPath"], "/");
    assert_eq!(json["output"]["pathinfo"], true);
    assert_eq!(json["resolve"]["extensions"], serde_json::json!(["", ".js", ".elm"]));
    assert_eq!(json["resolveLoader"]["moduleTemplates"], serde_json::json!(["*-loader"]));
}

#[test]
fn test_descriptor_entry_order() {
    let app = scaffold_app();
    let (json, _) = run_json(app.path(), &["descriptor"]);

    let entry: Vec<&str> = json["entry"]
        .as_array()
        .expect("entry should be an array")
        .iter()
        .filter_map(|e| e.as_str())
        .collect();
    assert_eq!(entry.len(), 3);
    assert_eq!(entry[0], "react-dev-utils/webpackHotDevClient");
    assert_eq!(entry[1], "webpack/hot/dev-server");
    assert!(entry[2].ends_with("index.js"), "app entry last: {entry:?}");
}

#[test]
fn test_descriptor_rule_order() {
    let app = scaffold_app();
    let (json, _) = run_json(app.path(), &["descriptor"]);

    let loaders: Vec<&str> = json["module"]["loaders"]
        .as_array()
        .expect("loaders should be an array")
        .iter()
        .filter_map(|r| r["loader"].as_str())
        .collect();
    assert_eq!(loaders.len(), 5);
    assert_eq!(loaders[0], "babel");
    assert!(loaders[1].starts_with("elm-hot!elm-webpack?verbose=true"));
    assert_eq!(loaders[2], "style!css!postcss");
    assert_eq!(loaders[3], "url");
    assert_eq!(loaders[4], "file");

    let plugins: Vec<&str> = json["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(
        plugins,
        ["DefinePlugin", "HtmlWebpackPlugin", "HotModuleReplacementPlugin"]
    );
}

#[test]
fn test_descriptor_reads_settings_and_env_files() {
    let app = scaffold_app();
    fs::write(
        app.path().join("devpack.json"),
        r#"{ "publicPath": "/app/", "devtool": "source-map" }"#,
    )
    .unwrap();
    fs::write(app.path().join(".env"), "ELM_APP_API=https://api.test\nOTHER=1\n").unwrap();

    let (json, ok) = run_json(app.path(), &["descriptor"]);
    assert!(ok);
    assert_eq!(json["devtool"], "source-map");
    assert_eq!(json["output"]["publicPath"], "/app/");

    let define = &json["plugins"][0]["options"]["definitions"];
    assert_eq!(define["process.env.ELM_APP_API"], "\"https://api.test\"");
    assert_eq!(define["process.env.NODE_ENV"], "\"development\"");
    assert!(define.get("process.env.OTHER").is_none());
}

#[test]
fn test_descriptor_writes_out_file() {
    let app = scaffold_app();
    let (_, ok) = run_json(app.path(), &["descriptor", "--out", "build/descriptor.json"]);
    assert!(ok);

    let written = fs::read_to_string(app.path().join("build/descriptor.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["devtool"], "eval");
}

#[test]
fn test_missing_entry_reports_error_code() {
    let app = scaffold_app();
    fs::remove_file(app.path().join("src/index.js")).unwrap();

    let (json, ok) = run_json(app.path(), &["descriptor"]);
    assert!(!ok, "missing entry should exit non-zero");
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "MISSING_ENTRY_POINT");
}

#[test]
fn test_invalid_settings_reports_config_parse() {
    let app = scaffold_app();
    fs::write(app.path().join("devpack.json"), r#"{ "unknownKnob": 1 }"#).unwrap();

    let (json, ok) = run_json(app.path(), &["descriptor"]);
    assert!(!ok);
    assert_eq!(json["error"]["code"], "CONFIG_PARSE");
}

#[test]
fn test_missing_entry_human_mode_reports_code_on_stderr() {
    let app = scaffold_app();
    fs::remove_file(app.path().join("src/index.js")).unwrap();

    let output = cargo_bin()
        .arg("--cwd")
        .arg(app.path())
        .arg("descriptor")
        .env_remove("DEVPACK_OWN_ROOT")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run devpack");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "nothing should reach stdout");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("MISSING_ENTRY_POINT"), "stderr: {stderr}");
    assert!(stderr.contains("entry"), "stderr: {stderr}");
}

#[test]
fn test_own_root_from_environment_sets_loader_root() {
    let app = scaffold_app();
    let tool = tempfile::tempdir().unwrap();

    let output = cargo_bin()
        .arg("--json")
        .arg("--cwd")
        .arg(app.path())
        .arg("descriptor")
        .env("DEVPACK_OWN_ROOT", tool.path())
        .output()
        .expect("Failed to run devpack");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).unwrap();
    let root = json["resolveLoader"]["root"].as_str().unwrap();
    let tool_root = dunce::canonicalize(tool.path()).unwrap();
    assert_eq!(Path::new(root), tool_root.join("node_modules"));

    let (default, _) = run_json(app.path(), &["descriptor"]);
    let root = default["resolveLoader"]["root"].as_str().unwrap();
    let app_root = dunce::canonicalize(app.path()).unwrap();
    assert_eq!(Path::new(root), app_root.join("node_modules"));
}
