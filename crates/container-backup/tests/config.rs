//! Tests for config loading and validation
//!

use std::{fs, path::PathBuf};

use container_backup::{
    Config,
    config::{ConfigError, LoadConfigError, is_valid_account_name, is_valid_container_name},
};

mod common;
use common::test_config;

#[test]
fn missing_file_is_an_error() {
    let result = Config::load_toml(PathBuf::from("./does-not-exist.toml"));
    assert!(matches!(result, Err(LoadConfigError::NoFile)));
}

#[test]
fn default_config_round_trips() {
    let directory = tempfile::tempdir().unwrap();
    let path = directory.path().join("config.toml");

    let contents = toml::to_string_pretty(&Config::default()).unwrap();
    fs::write(&path, contents).unwrap();

    let config = Config::load_toml(path).unwrap();
    assert_eq!(config.sources.len(), 1);
}

#[test]
fn accepts_a_complete_config() {
    let config = test_config(&[("srcacct", &["images"])]);
    assert!(config.validate().is_ok());
}

#[test]
fn rejects_empty_sources() {
    let config = test_config(&[]);
    assert!(matches!(config.validate(), Err(ConfigError::NoSources)));
}

#[test]
fn rejects_missing_destination_key() {
    let mut config = test_config(&[("srcacct", &["images"])]);
    config.destination.storage_key.clear();
    assert!(matches!(config.validate(), Err(ConfigError::MissingKey(_))));
}

#[test]
fn rejects_missing_source_key() {
    let mut config = test_config(&[("srcacct", &["images"])]);
    config.sources.first_mut().unwrap().storage_key.clear();
    assert!(matches!(config.validate(), Err(ConfigError::MissingKey(_))));
}

#[test]
fn rejects_invalid_account_name() {
    let config = test_config(&[("Bad_Account", &["images"])]);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidAccountName(_))
    ));
}

#[test]
fn rejects_source_without_containers() {
    let config = test_config(&[("srcacct", &[])]);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NoContainers(_))
    ));
}

#[test]
fn rejects_invalid_container_name() {
    let config = test_config(&[("srcacct", &["UPPER"])]);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidContainerName(_, _))
    ));
}

#[test]
fn container_name_rules() {
    assert!(is_valid_container_name("images"));
    assert!(is_valid_container_name("my-container-1"));

    assert!(!is_valid_container_name("ab"));
    assert!(!is_valid_container_name("Images"));
    assert!(!is_valid_container_name("-images"));
    assert!(!is_valid_container_name("images-"));
    assert!(!is_valid_container_name("my--container"));
    assert!(!is_valid_container_name(&"a".repeat(64)));
}

#[test]
fn account_name_rules() {
    assert!(is_valid_account_name("srcacct"));
    assert!(is_valid_account_name("acct123"));

    assert!(!is_valid_account_name("src-acct"));
    assert!(!is_valid_account_name("ab"));
    assert!(!is_valid_account_name(&"a".repeat(25)));
}

#[test]
fn enumerates_containers_in_config_order() {
    let config = test_config(&[("firstacct", &["alpha", "beta"]), ("secondacct", &["gamma"])]);

    let pairs: Vec<_> = config
        .source_containers()
        .map(|(source, container)| (source.storage_account.as_str(), container))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("firstacct", "alpha"),
            ("firstacct", "beta"),
            ("secondacct", "gamma"),
        ]
    );
}
