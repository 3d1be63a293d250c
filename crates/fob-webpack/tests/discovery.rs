//! Tests for descriptor discovery and profile merging.

use fob_webpack::loader::{names, postcss_plugin_names};
use fob_webpack::{
    AssetFamily, ConfigError, DescriptorDiscovery, LintPolicy, Mode, Plugin, discover,
    discover_with_profile,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"
mode = "development"
entry = "./src/main.js"
plugins = ["Banner"]

[output]
path = "/srv/app/dist"

[layout]
root = "/srv/app"

[profiles.production]
mode = "production"
lint = "error"
plugins = ["Banner", "Extract"]

[profiles.production.optimization]
minimize = true

[profiles.production.output]
filename = "[name].[contenthash].js"
"#;

fn write_descriptor(dir: &TempDir) {
    fs::write(dir.path().join("fob-webpack.toml"), DESCRIPTOR).expect("write descriptor");
}

#[test]
fn loads_base_descriptor() {
    let dir = TempDir::new().expect("tempdir");
    write_descriptor(&dir);

    let file = discover(dir.path()).expect("load");
    assert_eq!(file.env.mode, Some(Mode::Development));
    assert_eq!(file.env.entry, Some(json!("./src/main.js")));
    assert_eq!(file.layout.root, PathBuf::from("/srv/app"));
    assert_eq!(file.lint, LintPolicy::Warn);
    assert!(file.profiles.contains_key("production"));
}

#[test]
fn profile_overrides_and_merges() {
    let dir = TempDir::new().expect("tempdir");
    write_descriptor(&dir);

    let file = discover_with_profile(dir.path(), "production").expect("load with profile");
    assert_eq!(file.env.mode, Some(Mode::Production));
    assert_eq!(file.lint, LintPolicy::Error);
    assert!(file.env.minimize());
    // arrays are replaced, objects merged
    assert_eq!(file.env.plugins, vec![json!("Banner"), json!("Extract")]);
    assert_eq!(
        file.env.output,
        Some(json!({ "path": "/srv/app/dist", "filename": "[name].[contenthash].js" }))
    );
    // unspecified fields preserved
    assert_eq!(file.env.entry, Some(json!("./src/main.js")));
    assert_eq!(file.layout.root, PathBuf::from("/srv/app"));
}

#[test]
fn unknown_profile_keeps_base() {
    let dir = TempDir::new().expect("tempdir");
    write_descriptor(&dir);

    let file = discover_with_profile(dir.path(), "staging").expect("load");
    assert_eq!(file.env.mode, Some(Mode::Development));
    assert!(!file.env.minimize());
}

#[test]
fn profiled_descriptor_composes() {
    let dir = TempDir::new().expect("tempdir");
    write_descriptor(&dir);

    let config = DescriptorDiscovery::new(dir.path())
        .load_with_profile("production")
        .expect("load")
        .compose()
        .expect("compose");

    let css = config.rule(AssetFamily::Stylesheet).unwrap();
    assert_eq!(css.chain[0].loader(), names::CSS_EXTRACT_LOADER);
    assert!(postcss_plugin_names(&css.chain[2]).contains(&"cssnano"));
    assert_eq!(
        css.chain[3].loader(),
        "/srv/app/config/loaders/css-master-class-loader"
    );

    let lint = config.rule(AssetFamily::Lint).unwrap();
    assert_eq!(lint.chain[0].options().unwrap()["emitError"], json!(true));

    assert_eq!(config.plugins.len(), 3);
    assert_eq!(config.plugins[0], Plugin::VueLoader);
}

#[test]
fn loads_from_json_descriptor() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("fob-webpack.json"),
        r#"{ "mode": "production", "entry": "./a.js", "output": { "path": "/out" } }"#,
    )
    .expect("write");

    let config = discover(dir.path())
        .expect("load")
        .compose()
        .expect("compose");
    assert_eq!(config.mode, Some(Mode::Production));
}

#[test]
fn relative_layout_root_is_anchored_at_descriptor_dir() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("fob-webpack.toml"),
        "entry = \"./a.js\"\noutput = \"dist\"\n",
    )
    .expect("write");

    let file = discover(dir.path()).expect("load");
    assert_eq!(file.layout.root, dir.path());

    let config = file.compose().expect("compose");
    let components = config.rule(AssetFamily::ComponentDirectory).unwrap();
    assert_eq!(components.include, vec![dir.path().join("src/view/components")]);
}

#[test]
fn loads_from_package_json_field() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "app",
            "fobWebpack": { "entry": "./a.js", "output": "dist" }
        }"#,
    )
    .expect("write");

    let file = discover(dir.path()).expect("load");
    assert_eq!(file.env.entry, Some(json!("./a.js")));
    assert_eq!(file.env.mode, None);
}

#[test]
fn descriptor_without_output_fails_to_compose() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("fob-webpack.toml"), "entry = \"./a.js\"\n").expect("write");

    let err = discover(dir.path())
        .expect("load")
        .compose()
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingRequiredField { field: "output" }
    ));
}

#[test]
fn invalid_toml_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("fob-webpack.toml"), "entry = [unclosed\n").expect("write");

    let err = discover(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "toml"));
}

#[test]
fn invalid_mode_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("fob-webpack.toml"), "mode = \"staging\"\n").expect("write");

    assert!(matches!(
        discover(dir.path()).unwrap_err(),
        ConfigError::InvalidValue { .. }
    ));
}
