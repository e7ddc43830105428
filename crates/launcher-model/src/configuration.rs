//! Configuration records: singletons keyed by pid, factory instances
//! keyed by `factoryPid~name`.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Factory pid of the synthetic configurations created for repoinit
/// extensions.
pub const REPOINIT_FACTORY_PID: &str = "org.apache.sling.jcr.repoinit.RepositoryInitializer";

/// Property key holding repoinit script content.
pub const SCRIPTS_PROPERTY: &str = "scripts";

/// Identity of a configuration record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationKind {
    /// A singleton record, identified by its pid.
    Singleton { pid: String },
    /// A factory instance, identified by factory pid and instance name.
    Factory { factory_pid: String, name: String },
}

/// A persisted property record declared by a feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub kind: ConfigurationKind,
    pub properties: Map<String, Value>,
}

impl Configuration {
    pub fn singleton(pid: impl Into<String>) -> Self {
        Self {
            kind: ConfigurationKind::Singleton { pid: pid.into() },
            properties: Map::new(),
        }
    }

    pub fn factory(factory_pid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ConfigurationKind::Factory {
                factory_pid: factory_pid.into(),
                name: name.into(),
            },
            properties: Map::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Whether this record is a factory instance.
    pub fn is_factory(&self) -> bool {
        matches!(self.kind, ConfigurationKind::Factory { .. })
    }

    /// The wire key of this record: the pid for singletons,
    /// `factoryPid~name` for factory instances.
    pub fn key(&self) -> String {
        match &self.kind {
            ConfigurationKind::Singleton { pid } => pid.clone(),
            ConfigurationKind::Factory { factory_pid, name } => {
                format!("{}~{}", factory_pid, name)
            }
        }
    }

    /// Parse a wire key back into a record identity. A `~` separates the
    /// factory pid from the instance name; both halves must be non-empty.
    pub fn parse_key(key: &str, properties: Map<String, Value>) -> Result<Self> {
        let kind = match key.split_once('~') {
            None => {
                if key.is_empty() {
                    return Err(Error::InvalidConfigurationKey {
                        key: key.to_string(),
                        reason: "empty pid".to_string(),
                    });
                }
                ConfigurationKind::Singleton {
                    pid: key.to_string(),
                }
            }
            Some((factory_pid, name)) => {
                if factory_pid.is_empty() || name.is_empty() {
                    return Err(Error::InvalidConfigurationKey {
                        key: key.to_string(),
                        reason: "factory pid and instance name must both be non-empty".to_string(),
                    });
                }
                ConfigurationKind::Factory {
                    factory_pid: factory_pid.to_string(),
                    name: name.to_string(),
                }
            }
        };
        Ok(Self { kind, properties })
    }
}
