//! Core of graphlaunch: runs the graph-loading script with its connection
//! settings and data files, then waits for the user.
//!
//! The loader itself is an external program. This crate only decides what
//! it is given:
//! - three environment variables (`NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`)
//! - three flag/value pairs naming the data files, in fixed order
//!
//! and then runs it to completion and pauses so the console output can be
//! read.
//!
//! # Security
//! - The password is held in zeroizing containers and masked in every
//!   `Debug` impl, log line and printed summary
//! - Connection URIs are redacted before they are logged
//! - The launcher never sets variables in its own process environment; they
//!   are applied to the child command only

pub mod config;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod plan;
pub mod security;

// Re-export commonly used types
pub use config::{ConnectionSettings, DataInputs, LaunchConfig};
pub use error::{LaunchError, Result};
pub use launcher::{
    Acknowledge, ChildOutcome, ConsolePause, LaunchState, Launcher, Outcome, ProcessRunner,
    TokioProcessRunner,
};
pub use logging::init_logging;
pub use plan::{LaunchPlan, PlanSummary};
pub use security::Credentials;
