//! Container backup config
//!

use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The backup tool's config.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// The account backups are copied into.
    pub destination: AccountConfig,

    /// Directory the copy tool's output is logged to.
    pub log_directory: PathBuf,

    /// The accounts and containers to back up.
    pub sources: Vec<SourceConfig>,
}

/// A storage account and its access key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    /// The storage account name.
    pub storage_account: String,

    /// The account access key.
    pub storage_key: String,
}

/// A source account and the containers to back up from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// The storage account name.
    pub storage_account: String,

    /// The account access key.
    pub storage_key: String,

    /// The containers to back up.
    pub containers: Vec<String>,
}

impl Config {
    /// Tries to load a config from a toml file.
    pub fn load_toml(file_path: PathBuf) -> Result<Self, LoadConfigError> {
        if !file_path.exists() {
            return Err(LoadConfigError::NoFile);
        }

        let contents = fs::read_to_string(file_path).map_err(LoadConfigError::Read)?;
        let config = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Validate the whole config up front, before any copy begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_account_name(&self.destination.storage_account) {
            return Err(ConfigError::InvalidAccountName(
                self.destination.storage_account.clone(),
            ));
        }
        if self.destination.storage_key.is_empty() {
            return Err(ConfigError::MissingKey(
                self.destination.storage_account.clone(),
            ));
        }

        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }

        for source in &self.sources {
            let account = &source.storage_account;

            if !is_valid_account_name(account) {
                return Err(ConfigError::InvalidAccountName(account.clone()));
            }
            if source.storage_key.is_empty() {
                return Err(ConfigError::MissingKey(account.clone()));
            }
            if source.containers.is_empty() {
                return Err(ConfigError::NoContainers(account.clone()));
            }

            for container in &source.containers {
                if !is_valid_container_name(container) {
                    return Err(ConfigError::InvalidContainerName(
                        account.clone(),
                        container.clone(),
                    ));
                }
            }
        }

        Ok(())
    }

    /// The ordered `(source, container)` pairs to back up; the order here is
    /// the processing order.
    pub fn source_containers(&self) -> impl Iterator<Item = (&SourceConfig, &str)> {
        self.sources.iter().flat_map(|source| {
            source
                .containers
                .iter()
                .map(move |container| (source, container.as_str()))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            destination: AccountConfig {
                storage_account: "destinationaccount".to_string(),
                storage_key: String::new(),
            },
            log_directory: PathBuf::from("./logs/azcopy"),
            sources: vec![SourceConfig {
                storage_account: "sourceaccount".to_string(),
                storage_key: String::new(),
                containers: vec!["example-container".to_string()],
            }],
        }
    }
}

/// Whether a name is a valid storage account name: 3 to 24 lowercase
/// alphanumeric characters.
pub fn is_valid_account_name(name: &str) -> bool {
    (3..=24).contains(&name.len())
        && name
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
}

/// Whether a name is a valid container name: 3 to 63 lowercase alphanumeric
/// characters and hyphens, starting and ending alphanumeric, with no
/// consecutive hyphens.
///
/// Names passing this check are ASCII, which is what makes whole-name
/// truncation during allocation safe.
pub fn is_valid_container_name(name: &str) -> bool {
    let bytes = name.as_bytes();

    if !(3..=63).contains(&bytes.len()) {
        return false;
    }

    if !bytes
        .iter()
        .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit() || *byte == b'-')
    {
        return false;
    }

    let edges_alphanumeric = bytes.first().is_some_and(u8::is_ascii_alphanumeric)
        && bytes.last().is_some_and(u8::is_ascii_alphanumeric);

    edges_alphanumeric && !name.contains("--")
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum LoadConfigError {
    #[error("The file does not exist.")]
    NoFile,

    #[error("Failed to read the file:\n{0}")]
    Read(#[source] std::io::Error),

    #[error("Failed to deserialize the file:\n{0}")]
    Deserialize(#[from] toml::de::Error),
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid storage account name: '{0}'")]
    InvalidAccountName(String),

    #[error("Missing storage key for account '{0}'")]
    MissingKey(String),

    #[error("No source accounts are configured")]
    NoSources,

    #[error("No containers are configured for account '{0}'")]
    NoContainers(String),

    #[error("Invalid container name '{1}' for account '{0}'")]
    InvalidContainerName(String, String),
}
