use std::fs;
use std::path::PathBuf;

use rustify::config::{load_config, load_with_overrides};
use rustify::prelude::*;
use tempfile::tempdir;

#[test]
fn test_load_full_configuration() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("rustify.yaml");
    let yaml = r#"
input_root: ./swarms-master
output_root: ./converted
eligible_extension: .pyw
output_extension_suffix: .rs
exclude:
  - "**/tests"
  - "*.egg-info"
skip_hidden: true
lossy_decoding: false
jobs: 4
assistant:
  endpoint: http://localhost:8080/v1/chat/completions
  model: local-model
  api_key_env: LOCAL_KEY
  timeout_secs: 30
  max_retries: 2
  retry_base_delay_ms: 100
  strip_code_fences: true
"#;
    fs::write(&config_path, yaml).expect("Failed to write config file");

    let config = load_config(&config_path).expect("Failed to load config");

    assert_eq!(config.input_root, PathBuf::from("./swarms-master"));
    assert_eq!(config.resolved_output_root(), PathBuf::from("./converted"));
    assert_eq!(config.eligible_extension, ".pyw");
    assert_eq!(config.output_extension_suffix, ".rs");
    assert_eq!(config.exclude.len(), 2);
    assert!(config.skip_hidden);
    assert!(!config.lossy_decoding);
    assert_eq!(config.jobs, 4);
    assert_eq!(config.assistant.model, "local-model");
    assert_eq!(config.assistant.api_key_env, "LOCAL_KEY");
    assert_eq!(config.assistant.max_retries, 2);
    assert!(config.assistant.strip_code_fences);
}

#[test]
fn test_default_output_root_is_a_sibling_of_the_input_root() {
    let config = Config {
        input_root: PathBuf::from("/projects/swarms-master"),
        ..Config::default()
    };

    assert_eq!(
        config.resolved_output_root(),
        PathBuf::from("/projects/swarms-master-rustified")
    );
}

#[test]
fn test_invalid_configurations_are_rejected() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let cases = [
        ("missing dot", "eligible_extension: py\n"),
        ("empty suffix", "output_extension_suffix: \"\"\n"),
        ("separator in suffix", "output_extension_suffix: out/x.rs\n"),
        ("zero jobs", "jobs: 0\n"),
        ("bad glob", "exclude: [\"[unclosed\"]\n"),
        ("bad endpoint", "assistant:\n  endpoint: ftp://example.com\n"),
        (
            "overwrite",
            "input_root: ./code\noutput_root: ./code\noutput_extension_suffix: .py\n",
        ),
    ];

    for (name, yaml) in cases {
        let config_path = temp_dir.path().join(format!("{}.yaml", name.replace(' ', "_")));
        fs::write(&config_path, yaml).expect("Failed to write config file");
        assert!(load_config(&config_path).is_err(), "{name} should be rejected");
    }
}

#[test]
fn test_command_line_overrides_win() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("rustify.yaml");
    fs::write(&config_path, "input_root: ./from-file\njobs: 2\n")
        .expect("Failed to write config file");

    let overrides = ConfigOverrides {
        input_root: Some(PathBuf::from("./from-cli")),
        output_extension_suffix: Some(".rs".to_string()),
        ..ConfigOverrides::default()
    };
    let config =
        load_with_overrides(&config_path, true, overrides).expect("Failed to load config");

    assert_eq!(config.input_root, PathBuf::from("./from-cli"));
    assert_eq!(config.output_extension_suffix, ".rs");
    assert_eq!(config.jobs, 2);
}

#[test]
fn test_engine_from_configuration() {
    let config = Config {
        eligible_extension: ".src".to_string(),
        output_extension_suffix: ".out".to_string(),
        jobs: 3,
        ..Config::default()
    };

    let engine = TreeTransformer::from_config(&config).expect("Failed to build engine");
    assert_eq!(engine.mapper().rule().eligible(), ".src");
    assert_eq!(engine.mapper().rule().replacement(), ".out");
}
