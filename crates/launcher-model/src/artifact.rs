//! Maven-style artifact coordinates.
//!
//! A coordinate has the form `group:artifact[:type[:classifier]]:version`,
//! e.g. `org.example:launcher-api:1.2.0` or
//! `org.example:launcher-api:zip:docs:1.2.0`. Coordinates are the identity
//! of every installable unit the launcher handles and double as keys in the
//! artifact cache map.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default artifact type when the coordinate does not carry one.
pub const DEFAULT_ARTIFACT_TYPE: &str = "jar";

/// A parsed artifact coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    group_id: String,
    artifact_id: String,
    version: String,
    artifact_type: String,
    classifier: Option<String>,
}

impl ArtifactId {
    /// Build a coordinate with the default `jar` type and no classifier.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            artifact_type: DEFAULT_ARTIFACT_TYPE.to_string(),
            classifier: None,
        }
    }

    /// Parse a coordinate string.
    ///
    /// Accepted segment counts:
    /// - 3: `group:artifact:version`
    /// - 4: `group:artifact:type:version`
    /// - 5: `group:artifact:type:classifier:version`
    pub fn parse(coordinate: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidCoordinate {
            coordinate: coordinate.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = coordinate.split(':').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("empty segment"));
        }

        let (group_id, artifact_id, artifact_type, classifier, version) = match segments.as_slice()
        {
            [g, a, v] => (*g, *a, DEFAULT_ARTIFACT_TYPE, None, *v),
            [g, a, t, v] => (*g, *a, *t, None, *v),
            [g, a, t, c, v] => (*g, *a, *t, Some(c.to_string()), *v),
            _ => return Err(invalid("expected 3 to 5 colon-separated segments")),
        };

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            artifact_type: artifact_type.to_string(),
            classifier,
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn artifact_type(&self) -> &str {
        &self.artifact_type
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    /// The canonical relative path of this artifact inside a Maven-layout
    /// repository: `group/with/slashes/artifact/version/artifact-version[-classifier].type`.
    pub fn to_repository_path(&self) -> PathBuf {
        let mut file_name = format!("{}-{}", self.artifact_id, self.version);
        if let Some(classifier) = &self.classifier {
            file_name.push('-');
            file_name.push_str(classifier);
        }
        file_name.push('.');
        file_name.push_str(&self.artifact_type);

        let mut path = PathBuf::new();
        for part in self.group_id.split('.') {
            path.push(part);
        }
        path.push(&self.artifact_id);
        path.push(&self.version);
        path.push(file_name);
        path
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        match (&self.classifier, self.artifact_type.as_str()) {
            (Some(classifier), t) => write!(f, ":{}:{}", t, classifier)?,
            (None, DEFAULT_ARTIFACT_TYPE) => {}
            (None, t) => write!(f, ":{}", t)?,
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for ArtifactId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}
