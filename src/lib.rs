#[cfg(feature = "cli")]
pub mod command;
#[cfg(feature = "console-report")]
pub mod report;

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod invocation;
pub mod outcome;
pub mod query;
pub mod status;
pub mod target;
