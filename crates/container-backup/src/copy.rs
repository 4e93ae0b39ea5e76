//! Copy tool invocation.
//!

use std::{
    fs, io,
    path::PathBuf,
    process::{Command, ExitStatus, Output},
};

use thiserror::Error;
use tracing::warn;

/// One container copy for the external tool.
#[derive(Debug, Clone)]
pub struct CopyJob {
    /// The source container URL.
    pub source_url: String,

    /// The source account access key.
    pub source_key: String,

    /// The destination container URL.
    pub destination_url: String,

    /// The destination account access key.
    pub destination_key: String,

    /// The destination container name, used to name the tool's log file.
    pub destination_container: String,
}

/// The external tool performing the byte transfer.
///
/// Implementations are not safe to invoke concurrently; callers must run one
/// copy at a time.
pub trait CopyTool {
    /// Copy every blob in the source container into the destination
    /// container, blocking until the transfer completes or fails.
    ///
    /// The destination container must already exist. Every copy is a full
    /// copy; nothing is compared against prior backups.
    fn copy(&self, job: &CopyJob) -> Result<(), CopyError>;
}

impl<C: CopyTool + ?Sized> CopyTool for &C {
    fn copy(&self, job: &CopyJob) -> Result<(), CopyError> {
        (**self).copy(job)
    }
}

/// The `azcopy` bulk-copy tool.
#[derive(Debug, Clone)]
pub struct AzCopy {
    /// Directory the tool's output is logged to.
    pub log_directory: PathBuf,
}

impl AzCopy {
    /// Probe that `azcopy` can be invoked at all, before any work starts.
    pub fn ensure_available() -> Result<(), CopyError> {
        let output = Command::new("azcopy")
            .arg("--version")
            .output()
            .map_err(CopyError::RunCommand)?;

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(CopyError::Failed {
                status: output.status,
                output: error,
            });
        }

        Ok(())
    }

    /// Write the tool's combined output to `{destination container}-log.txt`
    /// in the log directory.
    ///
    /// A logging failure never fails the copy itself.
    fn write_log(&self, job: &CopyJob, output: &Output) {
        if let Err(error) = fs::create_dir_all(&self.log_directory) {
            warn!("Could not create copy tool log directory: {error}");
            return;
        }

        let path = self
            .log_directory
            .join(format!("{}-log.txt", job.destination_container));

        let mut contents = output.stdout.clone();
        contents.extend_from_slice(&output.stderr);

        if let Err(error) = fs::write(&path, contents) {
            warn!("Could not write copy tool log {path:?}: {error}");
        }
    }
}

impl CopyTool for AzCopy {
    fn copy(&self, job: &CopyJob) -> Result<(), CopyError> {
        let output = Command::new("azcopy")
            .args([
                "--source",
                &job.source_url,
                "--source-key",
                &job.source_key,
                "--destination",
                &job.destination_url,
                "--dest-key",
                &job.destination_key,
                "--recursive",
                "--quiet",
                "--verbose",
            ])
            .output()
            .map_err(CopyError::RunCommand)?;

        self.write_log(job, &output);

        if !output.status.success() {
            let error = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(CopyError::Failed {
                status: output.status,
                output: error,
            });
        }

        Ok(())
    }
}

#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum CopyError {
    #[error("Failed to run copy tool:\n{0}")]
    RunCommand(#[source] io::Error),

    #[error("Copy tool exited with {status}:\n{output}")]
    Failed {
        status: ExitStatus,
        output: String,
    },
}
