//! Per-run backup report.
//!

use thiserror::Error;
use tracing::{error, info};

use crate::{allocator::AllocateError, copy::CopyError, storage::StorageError};

/// Why a container's backup failed.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Failed to allocate a destination name:\n{0}")]
    Allocate(#[source] AllocateError<StorageError>),

    #[error("Failed to create the destination container:\n{0}")]
    CreateContainer(#[source] StorageError),

    #[error("Copy tool failed:\n{0}")]
    Copy(#[source] CopyError),
}

/// The outcome of one container's backup attempt.
#[derive(Debug)]
pub struct ContainerReport {
    /// The source account name.
    pub source_account: String,

    /// The source container name.
    pub source_container: String,

    /// The allocated destination container name, if allocation succeeded.
    pub destination: Option<String>,

    /// The outcome.
    pub outcome: Result<(), ContainerError>,
}

/// The report for one full run.
#[derive(Debug, Default)]
pub struct Report {
    /// Per-container outcomes, in processing order.
    pub containers: Vec<ContainerReport>,

    /// Whether the run stopped before attempting every configured container.
    pub aborted: bool,
}

impl Report {
    /// Whether every configured container was attempted and succeeded.
    pub fn all_succeeded(&self) -> bool {
        !self.aborted && self.containers.iter().all(|report| report.outcome.is_ok())
    }

    /// Log one line per container plus totals.
    pub fn log_summary(&self) {
        let mut succeeded = 0_usize;
        let mut failed = 0_usize;

        for report in &self.containers {
            match &report.outcome {
                Ok(()) => {
                    succeeded += 1;
                    info!(
                        "[{}/{}] Backed up to '{}'",
                        report.source_account,
                        report.source_container,
                        report.destination.as_deref().unwrap_or("<unknown>"),
                    );
                }
                Err(container_error) => {
                    failed += 1;
                    error!(
                        "[{}/{}] Backup failed: {container_error}",
                        report.source_account, report.source_container,
                    );
                }
            }
        }

        info!("Run complete: {succeeded} succeeded, {failed} failed");

        if self.aborted {
            error!("Run aborted before attempting every configured container");
        }
    }
}
