//! The sequential backup run driver.
//!

use std::collections::HashSet;

use tracing::{error, info};

use crate::{
    allocator::{AllocateError, BACKUP_MARKER, NameRequest, allocate},
    config::{Config, SourceConfig},
    context::Context,
    copy::{CopyJob, CopyTool},
    report::{ContainerError, ContainerReport, Report},
    storage::{Storage, container_url},
};

/// Drives one full backup run over every configured container.
pub struct Runner<'a, S, C> {
    /// The validated config.
    pub config: &'a Config,

    /// The destination account.
    pub destination: S,

    /// The external copy tool.
    pub copy_tool: C,
}

impl<S: Storage, C: CopyTool> Runner<'_, S, C> {
    /// Back up every configured container, strictly sequentially.
    ///
    /// The copy tool does not tolerate concurrent invocation, so containers
    /// are processed one at a time and each copy blocks until the tool
    /// exits. `timestamp` is computed once per run by the caller and shared
    /// by every container backed up in the run.
    ///
    /// A failure to create or copy one container is recorded and the run
    /// continues with the next container. Exhausting the name space aborts
    /// the rest of the run, since it means the existence check is broken.
    pub fn run(&self, timestamp: &str) -> Report {
        let mut report = Report::default();
        let mut allocated: HashSet<String> = HashSet::new();

        for (source, container) in self.config.source_containers() {
            let context = Context {
                account: &source.storage_account,
                container,
            };
            info!("{context} Starting backup");

            let request = NameRequest {
                timestamp,
                marker: BACKUP_MARKER,
                source_account: &source.storage_account,
                source_container: container,
            };

            // Names allocated earlier in this run may not be visible in the
            // destination account yet.
            let destination_name = allocate(&request, |candidate| {
                if allocated.contains(candidate) {
                    return Ok(true);
                }
                self.destination.container_exists(candidate)
            });

            let destination_name = match destination_name {
                Ok(name) => name,
                Err(allocate_error) => {
                    error!("{context} Failed to allocate a destination name: {allocate_error}");

                    let exhausted =
                        matches!(allocate_error, AllocateError::NameSpaceExhausted(_));

                    report.containers.push(ContainerReport {
                        source_account: source.storage_account.clone(),
                        source_container: container.to_string(),
                        destination: None,
                        outcome: Err(ContainerError::Allocate(allocate_error)),
                    });

                    if exhausted {
                        report.aborted = true;
                        break;
                    }
                    continue;
                }
            };

            allocated.insert(destination_name.clone());

            let outcome = self.backup_container(source, container, &destination_name);
            match &outcome {
                Ok(()) => info!("{context} Copied to '{destination_name}'"),
                Err(container_error) => error!("{context} {container_error}"),
            }

            report.containers.push(ContainerReport {
                source_account: source.storage_account.clone(),
                source_container: container.to_string(),
                destination: Some(destination_name),
                outcome,
            });
        }

        report
    }

    /// Create the destination container, then hand the transfer to the copy
    /// tool.
    fn backup_container(
        &self,
        source: &SourceConfig,
        container: &str,
        destination_name: &str,
    ) -> Result<(), ContainerError> {
        self.destination
            .create_container(destination_name)
            .map_err(ContainerError::CreateContainer)?;

        let job = CopyJob {
            source_url: container_url(&source.storage_account, container),
            source_key: source.storage_key.clone(),
            destination_url: container_url(
                &self.config.destination.storage_account,
                destination_name,
            ),
            destination_key: self.config.destination.storage_key.clone(),
            destination_container: destination_name.to_string(),
        };

        self.copy_tool.copy(&job).map_err(ContainerError::Copy)
    }
}
