//! Typed feature extensions.
//!
//! An extension is a named payload attached to a feature. The payload is
//! one of three forms: a list of artifact coordinates, free text, or a
//! structured sequence of text lines. The launcher dispatches on the
//! payload form exhaustively, so adding a form is a compile-time visible
//! change everywhere extensions are handled.

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactId;
use crate::error::{Error, Result};

/// Reserved extension name for repository-initialization scripts.
pub const EXTENSION_NAME_REPOINIT: &str = "repoinit";

/// A named, typed extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ExtensionRepr", into = "ExtensionRepr")]
pub struct Extension {
    pub name: String,
    pub required: bool,
    pub payload: ExtensionPayload,
}

impl Extension {
    pub fn new(name: impl Into<String>, required: bool, payload: ExtensionPayload) -> Self {
        Self {
            name: name.into(),
            required,
            payload,
        }
    }
}

/// The payload variants an extension can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionPayload {
    /// An ordered list of artifact coordinates to install.
    Artifacts(Vec<ArtifactId>),
    /// Free-form text, used verbatim.
    Text(String),
    /// An ordered sequence of text lines.
    StructuredText(Vec<String>),
}

/// Wire form: `name`, `required`, and exactly one of the payload keys
/// `artifacts`, `text`, or `scripts`.
#[derive(Serialize, Deserialize)]
struct ExtensionRepr {
    name: String,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    artifacts: Option<Vec<ArtifactId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scripts: Option<Vec<String>>,
}

impl TryFrom<ExtensionRepr> for Extension {
    type Error = Error;

    fn try_from(repr: ExtensionRepr) -> Result<Self> {
        let payload = match (repr.artifacts, repr.text, repr.scripts) {
            (Some(artifacts), None, None) => ExtensionPayload::Artifacts(artifacts),
            (None, Some(text), None) => ExtensionPayload::Text(text),
            (None, None, Some(scripts)) => ExtensionPayload::StructuredText(scripts),
            (None, None, None) => {
                return Err(Error::InvalidExtension {
                    name: repr.name,
                    reason: "missing payload: one of artifacts, text, or scripts is required"
                        .to_string(),
                });
            }
            _ => {
                return Err(Error::InvalidExtension {
                    name: repr.name,
                    reason: "ambiguous payload: artifacts, text, and scripts are mutually exclusive"
                        .to_string(),
                });
            }
        };

        Ok(Extension {
            name: repr.name,
            required: repr.required,
            payload,
        })
    }
}

impl From<Extension> for ExtensionRepr {
    fn from(extension: Extension) -> Self {
        let mut repr = ExtensionRepr {
            name: extension.name,
            required: extension.required,
            artifacts: None,
            text: None,
            scripts: None,
        };
        match extension.payload {
            ExtensionPayload::Artifacts(artifacts) => repr.artifacts = Some(artifacts),
            ExtensionPayload::Text(text) => repr.text = Some(text),
            ExtensionPayload::StructuredText(scripts) => repr.scripts = Some(scripts),
        }
        repr
    }
}
