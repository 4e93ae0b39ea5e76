//! Shared test helpers.
//!
#![allow(dead_code)]
#![allow(missing_docs)]

use std::{cell::RefCell, collections::HashSet, io};

use container_backup::{
    Config,
    config::{AccountConfig, SourceConfig},
    copy::{CopyError, CopyJob, CopyTool},
    storage::{Storage, StorageError},
};

/// An in-memory destination account.
#[derive(Default)]
pub struct MockStorage {
    /// The containers currently in the account.
    pub containers: RefCell<HashSet<String>>,

    /// Whether newly created containers become visible to `container_exists`.
    pub register_created: bool,

    /// Report every candidate name as taken.
    pub always_exists: bool,

    /// Fail every existence query.
    pub fail_exists: bool,

    /// Fail creation of any container whose name contains this.
    pub fail_create_containing: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self {
            register_created: true,
            ..Self::default()
        }
    }

    pub fn with_containers(names: &[&str]) -> Self {
        let storage = Self::new();
        storage
            .containers
            .borrow_mut()
            .extend(names.iter().map(|name| name.to_string()));
        storage
    }
}

impl Storage for MockStorage {
    fn container_exists(&self, name: &str) -> Result<bool, StorageError> {
        if self.fail_exists {
            return Err(StorageError::RunCommand(io::Error::other("query failed")));
        }
        if self.always_exists {
            return Ok(true);
        }
        Ok(self.containers.borrow().contains(name))
    }

    fn create_container(&self, name: &str) -> Result<(), StorageError> {
        if let Some(pattern) = &self.fail_create_containing {
            if name.contains(pattern.as_str()) {
                return Err(StorageError::RunCommand(io::Error::other("create failed")));
            }
        }

        if self.register_created {
            self.containers.borrow_mut().insert(name.to_string());
        }

        Ok(())
    }
}

/// A copy tool that records its jobs.
#[derive(Default)]
pub struct MockCopyTool {
    /// Jobs in invocation order.
    pub jobs: RefCell<Vec<CopyJob>>,

    /// Fail any job whose source URL contains this.
    pub fail_source_containing: Option<String>,
}

impl CopyTool for MockCopyTool {
    fn copy(&self, job: &CopyJob) -> Result<(), CopyError> {
        self.jobs.borrow_mut().push(job.clone());

        if let Some(pattern) = &self.fail_source_containing {
            if job.source_url.contains(pattern.as_str()) {
                return Err(CopyError::RunCommand(io::Error::other("copy failed")));
            }
        }

        Ok(())
    }
}

/// A config with one destination account and the given source accounts and
/// containers.
pub fn test_config(sources: &[(&str, &[&str])]) -> Config {
    Config {
        destination: AccountConfig {
            storage_account: "destacct".to_string(),
            storage_key: "destkey".to_string(),
        },
        log_directory: std::env::temp_dir(),
        sources: sources
            .iter()
            .map(|(account, containers)| SourceConfig {
                storage_account: account.to_string(),
                storage_key: format!("{account}-key"),
                containers: containers.iter().map(|name| name.to_string()).collect(),
            })
            .collect(),
    }
}
