//! Feature descriptor codec: JSON text in, [`Feature`] out, and back.

use std::path::Path;

use launcher_model::Feature;

use crate::error::{Error, Result};

/// Parse a feature descriptor.
///
/// `source_locator` identifies where the content came from (file path or
/// coordinate) and is carried into parse errors.
pub fn parse_feature(content: &str, source_locator: &str) -> Result<Feature> {
    serde_json::from_str(content).map_err(|e| Error::Parse {
        source_locator: source_locator.to_string(),
        message: e.to_string(),
    })
}

/// Read and parse a feature descriptor from a local file.
pub fn read_feature(path: &Path) -> Result<Feature> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    parse_feature(&content, &path.display().to_string())
}

/// Serialize a feature back to descriptor text.
pub fn serialize_feature(feature: &Feature) -> Result<String> {
    serde_json::to_string_pretty(feature).map_err(|e| Error::Parse {
        source_locator: feature.id.to_string(),
        message: e.to_string(),
    })
}
