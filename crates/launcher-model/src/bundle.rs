//! Bundles: installable modules with a start order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;

/// Metadata key consulted when a bundle carries no explicit start order.
pub const START_LEVEL_KEY: &str = "start-level";

/// Sentinel start order meaning "not set yet".
pub const START_ORDER_UNSET: u32 = 0;

/// A single installable module.
///
/// `start_order` of [`START_ORDER_UNSET`] means the order has not been
/// assigned; normalization resolves it from the `start-level` metadata key
/// or defaults it to 1. Any other metadata entries are carried along
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BundleRepr", into = "BundleRepr")]
pub struct Bundle {
    pub id: ArtifactId,
    pub start_order: u32,
    pub metadata: BTreeMap<String, String>,
}

impl Bundle {
    pub fn new(id: ArtifactId) -> Self {
        Self {
            id,
            start_order: START_ORDER_UNSET,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_start_order(mut self, start_order: u32) -> Self {
        self.start_order = start_order;
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Wire form of a bundle: either a bare coordinate string or an object
/// with an `id`, an optional `start-order`, and free-form metadata.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum BundleRepr {
    Coordinate(ArtifactId),
    Object {
        id: ArtifactId,
        #[serde(rename = "start-order", default, skip_serializing_if = "is_zero")]
        start_order: u32,
        #[serde(flatten)]
        metadata: BTreeMap<String, serde_json::Value>,
    },
}

fn is_zero(value: &u32) -> bool {
    *value == START_ORDER_UNSET
}

impl From<BundleRepr> for Bundle {
    fn from(repr: BundleRepr) -> Self {
        match repr {
            BundleRepr::Coordinate(id) => Bundle::new(id),
            BundleRepr::Object {
                id,
                start_order,
                metadata,
            } => Bundle {
                id,
                start_order,
                metadata: metadata
                    .into_iter()
                    .map(|(key, value)| (key, json_value_to_string(&value)))
                    .collect(),
            },
        }
    }
}

impl From<Bundle> for BundleRepr {
    fn from(bundle: Bundle) -> Self {
        if bundle.start_order == START_ORDER_UNSET && bundle.metadata.is_empty() {
            return BundleRepr::Coordinate(bundle.id);
        }
        BundleRepr::Object {
            id: bundle.id,
            start_order: bundle.start_order,
            metadata: bundle
                .metadata
                .into_iter()
                .map(|(key, value)| (key, serde_json::Value::String(value)))
                .collect(),
        }
    }
}

/// Render a metadata value as a plain string; scalars drop their quoting.
fn json_value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The ordered bundle list of a feature.
///
/// Declaration order is preserved; [`Bundles::by_start_order`] regroups
/// without losing the relative order within a start level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundles(Vec<Bundle>);

impl Bundles {
    pub fn new(bundles: Vec<Bundle>) -> Self {
        Self(bundles)
    }

    pub fn push(&mut self, bundle: Bundle) {
        self.0.push(bundle);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bundle> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Bundle> {
        self.0.iter_mut()
    }

    /// Group bundles by ascending start order, keeping declaration order
    /// within each level.
    pub fn by_start_order(&self) -> BTreeMap<u32, Vec<&Bundle>> {
        let mut map: BTreeMap<u32, Vec<&Bundle>> = BTreeMap::new();
        for bundle in &self.0 {
            map.entry(bundle.start_order).or_default().push(bundle);
        }
        map
    }
}

impl<'a> IntoIterator for &'a Bundles {
    type Item = &'a Bundle;
    type IntoIter = std::slice::Iter<'a, Bundle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Bundle> for Bundles {
    fn from_iter<T: IntoIterator<Item = Bundle>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
