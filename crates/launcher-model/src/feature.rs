//! The feature aggregate: everything a descriptor declares.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::artifact::ArtifactId;
use crate::bundle::Bundles;
use crate::configuration::Configuration;
use crate::extension::Extension;

/// A versioned assembly of bundles, extensions, configurations, and
/// framework properties.
///
/// Collection order is declaration order throughout; the launcher relies
/// on it for deterministic plan construction and first-wins property
/// merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Identity of the feature itself.
    pub id: ArtifactId,

    #[serde(default, skip_serializing_if = "Bundles::is_empty")]
    pub bundles: Bundles,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<Extension>,

    #[serde(
        default,
        with = "configurations_map",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub configurations: Vec<Configuration>,

    /// Launch-time properties handed to the framework, in declaration
    /// order.
    #[serde(
        rename = "framework-properties",
        default,
        skip_serializing_if = "Map::is_empty"
    )]
    pub framework_properties: Map<String, Value>,

    /// Default values for `${name}` placeholders used elsewhere in the
    /// descriptor.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

impl Feature {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            bundles: Bundles::default(),
            extensions: Vec::new(),
            configurations: Vec::new(),
            framework_properties: Map::new(),
            variables: Map::new(),
        }
    }
}

/// Configurations are declared as a JSON object keyed by pid or
/// `factoryPid~name`; in memory they stay an ordered list.
mod configurations_map {
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use serde_json::{Map, Value};

    use crate::configuration::Configuration;

    pub fn serialize<S>(configurations: &[Configuration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(configurations.len()))?;
        for configuration in configurations {
            map.serialize_entry(&configuration.key(), &configuration.properties)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Configuration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Map<String, Value> = serde::Deserialize::deserialize(deserializer)?;
        let mut configurations = Vec::with_capacity(raw.len());
        for (key, value) in raw {
            let properties = match value {
                Value::Object(properties) => properties,
                other => {
                    return Err(D::Error::custom(format!(
                        "configuration {:?} must be an object, got {}",
                        key, other
                    )));
                }
            };
            let configuration =
                Configuration::parse_key(&key, properties).map_err(D::Error::custom)?;
            configurations.push(configuration);
        }
        Ok(configurations)
    }
}
