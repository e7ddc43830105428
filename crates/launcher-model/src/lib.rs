//! Feature data model for the feature launcher
//!
//! A *feature* is a versioned descriptor assembling bundles (installable
//! modules with a start order), typed extensions, configuration records,
//! and framework properties. This crate defines those value types and
//! their JSON wire forms; resolving and planning live in the sibling
//! crates.

pub mod artifact;
pub mod bundle;
pub mod configuration;
pub mod error;
pub mod extension;
pub mod feature;

pub use artifact::{ArtifactId, DEFAULT_ARTIFACT_TYPE};
pub use bundle::{Bundle, Bundles, START_LEVEL_KEY, START_ORDER_UNSET};
pub use configuration::{
    Configuration, ConfigurationKind, REPOINIT_FACTORY_PID, SCRIPTS_PROPERTY,
};
pub use error::{Error, Result};
pub use extension::{EXTENSION_NAME_REPOINIT, Extension, ExtensionPayload};
pub use feature::Feature;
