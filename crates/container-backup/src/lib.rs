//! # container-backup
//! Copies cloud storage containers into uniquely named, timestamped backup
//! containers using an external copy tool as the data mover.
//!

pub mod allocator;
pub mod config;
pub mod context;
pub mod copy;
mod failure;
mod logger;
pub mod report;
pub mod runner;
pub mod storage;

pub use config::Config;
pub use failure::Failure;
pub use logger::{LoggerError, init_logger};
pub use report::Report;
pub use runner::Runner;
