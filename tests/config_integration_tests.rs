//! Integration tests for ConfigLoader and external property sources
//!
//! These tests verify:
//! - Loading every domain from YAML and TOML files
//! - Environment overrides layered over a file
//! - List and comma separated forms of `scan.allowed.extensions`
//! - Missing files, missing keys and unparseable values

use camino::Utf8PathBuf;
use fscan::{
    AnalysisSortOrder, ApplicationMode, Charset, ConfigLoader, LoadError, ReportFormat,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_test_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, path)
}

fn full_yaml(root: &Utf8PathBuf) -> String {
    format!(
        r#"
app:
  name: fscan
  version: 1.4.0
  mode: DEV
  interactive: false
scan:
  root:
    dir: "{root}"
  follow:
    symlinks: true
  max:
    depth: 4
    file:
      size:
        bytes: 1048576
  allowed:
    extensions: "RS, toml"
analysis:
  enable:
    size:
      analysis: true
    extensions:
      analysis: true
  sort:
    order: desc
  strategy: "extensions:rs"
  report:
    format: CSV
  buffer:
    size: 8192
  charset: UTF-8
  result:
    limit: 25
report:
  output:
    path: out/report.csv
  append:
    mode: true
  format: CSV
  buffer:
    size: 4096
  charset: utf-16le
  include:
    headers: true
  flush:
    interval: 50
  max:
    rows: 10000
state:
  enabled: true
  file:
    path: state/engine.bin
  autosave:
    interval: 60
  max:
    snapshots: 3
"#
    )
}

#[test]
fn test_load_all_domains_from_yaml_file() {
    let (_temp_dir, dir) = create_test_dir();
    let config_path = dir.join("fscan.yaml");
    fs::write(&config_path, full_yaml(&dir)).unwrap();

    let loader = ConfigLoader::from_file(&config_path).unwrap();
    let loaded = loader.load_all().unwrap();

    assert_eq!(loaded.application.name(), "fscan");
    assert_eq!(loaded.application.mode(), ApplicationMode::Dev);

    assert_eq!(loaded.scan.root_directory(), dir.as_path());
    assert!(loaded.scan.follow_symlinks());
    assert_eq!(loaded.scan.max_depth(), 4);
    assert_eq!(loaded.scan.max_file_size_bytes(), 1_048_576);
    let exts: Vec<&str> = loaded
        .scan
        .allowed_extensions()
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(exts, vec!["rs", "toml"]);

    assert!(loaded.analysis.enable_size_analysis());
    assert_eq!(loaded.analysis.sort_order(), AnalysisSortOrder::Desc);
    assert_eq!(loaded.analysis.report_format(), ReportFormat::Csv);
    assert_eq!(loaded.analysis.result_limit(), 25);
    assert!(loaded.analysis.includes(Path::new("main.rs")));
    assert!(!loaded.analysis.includes(Path::new("Cargo.toml")));

    assert_eq!(loaded.report.charset(), Charset::Utf16Le);
    assert_eq!(loaded.report.flush_interval(), 50);
    assert!(loaded.report.append_mode());

    assert!(loaded.state.enabled());
    assert_eq!(loaded.state.file_path(), "state/engine.bin");
    assert_eq!(loaded.state.save_interval(), 60);
}

#[test]
fn test_loaded_config_renders_as_yaml() {
    let (_temp_dir, dir) = create_test_dir();
    let config_path = dir.join("fscan.yaml");
    fs::write(&config_path, full_yaml(&dir)).unwrap();

    let loaded = ConfigLoader::from_file(&config_path)
        .unwrap()
        .load_all()
        .unwrap();
    let yaml = serde_yaml_ng::to_string(&loaded).unwrap();

    assert!(yaml.contains("file_filter: extensions:rs"));
    assert!(yaml.contains("report_format: CSV"));
    assert!(yaml.contains("mode: DEV"));
    assert!(yaml.contains(&format!("root_directory: {dir}")));
    assert!(yaml.contains("output_path: out/report.csv"));
    assert!(yaml.contains("file_path: state/engine.bin"));
}

#[test]
fn test_toml_file_with_dotted_keys() {
    let (_temp_dir, dir) = create_test_dir();
    let config_path = dir.join("fscan.toml");
    let toml = format!(
        r#"
[scan]
root.dir = "{dir}"
max.depth = -1
allowed.extensions = ["md", "TXT"]
max.file.size.bytes = 0
"#
    );
    fs::write(&config_path, toml).unwrap();

    let scan = ConfigLoader::from_file(&config_path)
        .unwrap()
        .load_scan()
        .unwrap();
    assert_eq!(scan.depth_limit(), None);
    assert!(scan.allows_extension("txt"));
    assert_eq!(scan.max_file_size_bytes(), 0);
}

#[test]
fn test_environment_overrides_file() {
    let (_temp_dir, dir) = create_test_dir();

    let mut vars = config::Map::new();
    vars.insert("FSCAN_SCAN_MAX_DEPTH".to_string(), "9".to_string());
    vars.insert("FSCAN_SCAN_ALLOWED_EXTENSIONS".to_string(), "csv,log".to_string());
    vars.insert("OTHER_SCAN_MAX_DEPTH".to_string(), "1".to_string());

    let source = config::Config::builder()
        .add_source(config::File::from_str(&full_yaml(&dir), config::FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("FSCAN")
                .separator("_")
                .source(Some(vars)),
        )
        .build()
        .unwrap();

    let scan = ConfigLoader::from_config(source).load_scan().unwrap();
    assert_eq!(scan.max_depth(), 9);
    assert!(scan.allows_extension("log"));
    assert!(!scan.allows_extension("rs"));
}

#[test]
fn test_missing_file_is_source_error() {
    let (_temp_dir, dir) = create_test_dir();
    let err = ConfigLoader::from_file(dir.join("absent.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::Source(_)));
}

#[test]
fn test_missing_root_directory_on_disk() {
    let (_temp_dir, dir) = create_test_dir();
    let yaml = format!(
        "scan:\n  root:\n    dir: \"{}\"\n  allowed:\n    extensions: rs\n",
        dir.join("gone")
    );

    let err = ConfigLoader::from_yaml_str(&yaml)
        .unwrap()
        .load_scan()
        .unwrap_err();
    match err {
        LoadError::Validation(e) => {
            assert_eq!(e.key(), "scan.root.dir");
            assert!(e.message().contains("doesn't exist"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_blank_extension_item_reaches_validation() {
    let (_temp_dir, dir) = create_test_dir();
    let yaml = format!(
        "scan:\n  root:\n    dir: \"{dir}\"\n  allowed:\n    extensions: \"rs,,md\"\n"
    );

    let err = ConfigLoader::from_yaml_str(&yaml)
        .unwrap()
        .load_scan()
        .unwrap_err();
    assert!(matches!(err, LoadError::Validation(ref e) if e.key() == "scan.allowed.extensions"));
}

#[test]
fn test_invalid_values() {
    let cases = [
        ("scan:\n  follow:\n    symlinks: maybe\n", "scan.follow.symlinks"),
        ("scan:\n  max:\n    depth: deep\n", "scan.max.depth"),
    ];
    for (yaml, key) in cases {
        let err = ConfigLoader::from_yaml_str(yaml)
            .unwrap()
            .scan_builder()
            .unwrap_err();
        assert!(
            matches!(err, LoadError::InvalidValue { key: k, .. } if k == key),
            "expected invalid value for {key}, got {err:?}"
        );
    }

    let err = ConfigLoader::from_yaml_str("analysis:\n  strategy: glob:*.rs\n")
        .unwrap()
        .analysis_builder()
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { key: "analysis.strategy", .. }));

    let err = ConfigLoader::from_yaml_str("analysis:\n  charset: EBCDIC\n")
        .unwrap()
        .analysis_builder()
        .unwrap_err();
    assert!(matches!(err, LoadError::InvalidValue { key: "analysis.charset", .. }));
}

#[test]
fn test_empty_source_fails_every_domain() {
    let loader = ConfigLoader::from_yaml_str("{}").unwrap();

    assert!(matches!(loader.load_scan(), Err(LoadError::Validation(_))));
    assert!(matches!(loader.load_analysis(), Err(LoadError::Validation(_))));
    assert!(matches!(loader.load_report(), Err(LoadError::Validation(_))));
    assert!(matches!(loader.load_serialization(), Err(LoadError::Validation(_))));
    assert!(matches!(loader.load_application(), Err(LoadError::Validation(_))));
}
