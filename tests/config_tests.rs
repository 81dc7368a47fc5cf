use tempfile::tempdir;
use treelens::config::Config;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.max_depth, 5);
    assert_eq!(config.preview_width, 50);
    assert!(config.sample_sequences);
    assert!(!config.xml_infer_types);
    assert_eq!(config.log_level, "warn");
}

#[test]
fn test_config_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        max_depth: 8,
        xml_infer_types: true,
        log_level: "debug".to_string(),
        ..Config::default()
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "max_depth = \"deep\"\n").unwrap();

    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_xml_options_follow_config() {
    let config = Config {
        xml_infer_types: true,
        ..Config::default()
    };
    assert!(config.xml_options().infer_types);
}
