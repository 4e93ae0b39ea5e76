//! Destination account container queries and writes.
//!

use std::{
    io,
    process::{Command, ExitStatus},
};

use serde::Deserialize;
use thiserror::Error;

/// Operations against a storage account's container namespace.
pub trait Storage {
    /// Whether a container with this name currently exists.
    ///
    /// Must reflect the live state at call time; answers may not be cached
    /// across calls.
    fn container_exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Create a new container.
    fn create_container(&self, name: &str) -> Result<(), StorageError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        (**self).container_exists(name)
    }

    fn create_container(&self, name: &str) -> Result<(), StorageError> {
        (**self).create_container(name)
    }
}

/// A storage account driven through the Azure CLI.
#[derive(Debug, Clone)]
pub struct AzureCli {
    /// The storage account name.
    pub account: String,

    /// The account access key.
    pub key: String,
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

impl AzureCli {
    /// Run one `az` invocation against this account, returning its stdout.
    fn run(&self, args: &[&str]) -> Result<Vec<u8>, StorageError> {
        let output = Command::new("az")
            .args(args)
            .args([
                "--account-name",
                &self.account,
                "--account-key",
                &self.key,
                "--output",
                "json",
            ])
            .output()
            .map_err(StorageError::RunCommand)?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(StorageError::CommandErrored(output.status, error));
        }

        Ok(output.stdout)
    }
}

impl Storage for AzureCli {
    fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        // A fresh subprocess per query, nothing is cached between retries.
        let stdout = self.run(&["storage", "container", "exists", "--name", name])?;
        let response: ExistsResponse = serde_json::from_slice(&stdout)?;

        Ok(response.exists)
    }

    fn create_container(&self, name: &str) -> Result<(), StorageError> {
        self.run(&[
            "storage",
            "container",
            "create",
            "--name",
            name,
            "--fail-on-exist",
        ])?;

        Ok(())
    }
}

/// Build the URL for a blob container.
pub fn container_url(account: &str, container: &str) -> String {
    format!("https://{account}.blob.core.windows.net/{container}")
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to run command:\n{0}")]
    RunCommand(#[source] io::Error),

    #[error("Command exited with {0}:\n{1}")]
    CommandErrored(ExitStatus, String),

    #[error("Failed to parse command output:\n{0}")]
    ParseResponse(#[from] serde_json::Error),
}
