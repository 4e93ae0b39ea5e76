//! # container-backup
//! One invocation performs one full backup pass over every configured
//! container and exits. Repetition is the job of an external scheduler.
//!

use std::{fs, path::PathBuf, process::ExitCode};

use chrono::Local;
use container_backup::{
    Config, Failure, Runner, allocator::minute_timestamp, copy::AzCopy, init_logger,
    storage::AzureCli,
};
use mimalloc::MiMalloc;
use tracing::{error, info};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let _logger = init_logger().expect("Logger should initialize");

    // Initialize config if args include 'init'.
    if std::env::args().any(|arg| arg.eq("init")) {
        let config = Config::default();
        let contents =
            toml::to_string_pretty(&config).or_log_and_panic("Could not serialize config file");
        fs::write("config.toml", contents).or_log_and_panic("Could not create config file");
        return ExitCode::SUCCESS;
    }

    // Load config
    let config = match Config::load_toml(PathBuf::from("./config.toml")) {
        Ok(config) => config,
        Err(load_error) => {
            error!("Could not load config: {load_error}");
            return ExitCode::FAILURE;
        }
    };

    // The whole config is validated before any copy begins.
    if let Err(config_error) = config.validate() {
        error!("Invalid config: {config_error}");
        return ExitCode::FAILURE;
    }

    // Make sure the copy tool is available.
    if let Err(copy_error) = AzCopy::ensure_available() {
        error!("Copy tool is not available: {copy_error}");
        return ExitCode::FAILURE;
    }

    let destination = AzureCli {
        account: config.destination.storage_account.clone(),
        key: config.destination.storage_key.clone(),
    };
    let copy_tool = AzCopy {
        log_directory: config.log_directory.clone(),
    };

    // One timestamp per run, shared by every container backed up in it.
    let timestamp = minute_timestamp(&Local::now());
    info!("Starting backup run {timestamp}");

    let runner = Runner {
        config: &config,
        destination,
        copy_tool,
    };
    let report = runner.run(&timestamp);

    report.log_summary();

    if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
