//! Core planning layer of the feature launcher
//!
//! Converts a loaded feature descriptor into a concrete installation
//! plan: bundle files grouped by start order, additional installable
//! artifacts, configuration records, and merged framework properties.
//!
//! # Architecture
//!
//! ```text
//!        launcher-cli
//!             |
//!       launcher-core
//!         |        |
//!   launcher-io  launcher-model
//! ```
//!
//! The processor functions are pure with respect to their inputs: the
//! launcher configuration, the artifact resolver, and the feature are
//! always explicit parameters, and any failure aborts the whole pass
//! (no partially committed plan is ever usable).

pub mod config;
pub mod error;
pub mod plan;
pub mod processor;

pub use config::{LauncherConfig, StartupMode};
pub use error::{Error, Result};
pub use plan::{InstallationPlan, PlanConfiguration};
pub use processor::{
    calculate_artifacts, create_application, normalize_start_orders, prepare_launcher,
};
