use std::sync::Arc;

use datashape::descriptor::{FieldDescriptor, Shape, TypeDescriptor};
use datashape::error::DatashapeError;
use datashape::registry;
use config::Map;
use datashape::settings::{self, Settings};
use serde_json::json;

struct Inheriting;
impl Shape for Inheriting {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("Inheriting").field(FieldDescriptor::new("a"))
    }
}

#[test]
fn load_reads_file_then_environment() {
    let path = std::env::temp_dir().join("datashape_settings_test.toml");
    std::fs::write(&path, "default_strict = true\nlog_filter = \"debug\"\n").expect("write settings");
    let env = Map::from_iter([
        ("DATASHAPE_CACHE_DESCRIPTORS".to_string(), "false".to_string()),
        ("DATASHAPE_LOG_FILTER".to_string(), "trace".to_string()),
        ("OTHER_DEFAULT_STRICT".to_string(), "false".to_string()),
    ]);
    let loaded = Settings::load_from(Some(&path), Some(env)).expect("load");
    let _ = std::fs::remove_file(&path);

    assert!(loaded.default_strict);
    assert!(!loaded.cache_descriptors);
    // environment overrides the file
    assert_eq!(loaded.log_filter, "trace");
}

#[test]
fn load_without_sources_gives_defaults() {
    let loaded = Settings::load_from(None, Some(Map::new())).expect("defaults");
    assert_eq!(loaded, Settings::default());
}

#[test]
fn missing_file_is_a_config_error() {
    let path = std::env::temp_dir().join("datashape_settings_missing.toml");
    let err = Settings::load_from(Some(&path), Some(Map::new())).unwrap_err();
    assert!(matches!(err, DatashapeError::Config(_)));
}

#[test]
fn installed_settings_drive_strictness_and_caching() {
    // Inherit follows the installed default
    assert!(Inheriting::construct(json!({"a": 1, "zzz": 2})).is_ok());
    settings::install(Settings { default_strict: true, ..Settings::default() });
    let err = Inheriting::construct(json!({"a": 1, "zzz": 2})).unwrap_err();
    assert!(matches!(err, DatashapeError::UnknownFields { .. }));

    // cached descriptors are shared
    assert!(registry::is_cached::<Inheriting>());
    assert!(Arc::ptr_eq(&Inheriting::descriptor(), &Inheriting::descriptor()));
    registry::clear();
    assert!(!registry::is_cached::<Inheriting>());
    assert_eq!(registry::len(), 0);

    // disabling the cache still describes the type
    settings::install(Settings { cache_descriptors: false, ..Settings::default() });
    let first = Inheriting::descriptor();
    assert!(!Arc::ptr_eq(&first, &Inheriting::descriptor()));
    assert_eq!(first.name(), "Inheriting");
    assert!(!registry::is_cached::<Inheriting>());

    settings::install(Settings::default());
    assert!(!settings::current().default_strict);
}

#[test]
fn invalid_log_filter_is_rejected() {
    let broken = Settings { log_filter: "datashape=loudest".into(), ..Settings::default() };
    assert!(matches!(settings::init_logging(&broken), Err(DatashapeError::Config(_))));
}
