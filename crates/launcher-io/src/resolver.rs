//! Artifact resolution: turning coordinates or paths into local files.

use std::path::{Path, PathBuf};

use launcher_model::ArtifactId;

use crate::error::{Error, Result};

/// A reference to an artifact: either a filesystem path or a Maven-style
/// coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRef {
    Path(PathBuf),
    Coordinate(ArtifactId),
}

impl ArtifactRef {
    /// Disambiguate a location string.
    ///
    /// A `:` at byte index 2 or later marks a coordinate
    /// (`group:artifact:version`); anything else, including strings with
    /// no `:` at all, is a filesystem path. The index-2 cutoff keeps
    /// Windows drive-letter paths (`C:\...`) on the path side. Kept
    /// bit-compatible with the existing descriptor ecosystem.
    pub fn parse(location: &str) -> Result<Self> {
        match location.find(':') {
            Some(index) if index >= 2 => Ok(Self::Coordinate(ArtifactId::parse(location)?)),
            _ => Ok(Self::Path(PathBuf::from(location))),
        }
    }
}

impl From<ArtifactId> for ArtifactRef {
    fn from(id: ArtifactId) -> Self {
        Self::Coordinate(id)
    }
}

impl std::fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Coordinate(id) => write!(f, "{}", id),
        }
    }
}

/// A successfully resolved artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// Local file holding the artifact content.
    pub file: PathBuf,
    /// Locator describing where the artifact came from, used for error
    /// context and as the parse source of loaded descriptors.
    pub source: String,
}

/// Resolves artifact references to local files.
///
/// Resolution may block on disk I/O; there are no retries and no
/// timeouts. A miss is final for the current pass.
pub trait ArtifactResolver {
    fn resolve(&self, reference: &ArtifactRef) -> Result<ResolvedArtifact>;

    /// Resolve a raw location string, applying the path-vs-coordinate
    /// disambiguation first.
    fn resolve_location(&self, location: &str) -> Result<ResolvedArtifact> {
        self.resolve(&ArtifactRef::parse(location)?)
    }
}

/// Resolver over an ordered list of Maven-layout repository directories.
///
/// Coordinates are probed repository by repository; the first hit wins.
/// Path references resolve directly against the filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalRepositoryResolver {
    repositories: Vec<PathBuf>,
}

impl LocalRepositoryResolver {
    pub fn new(repositories: Vec<PathBuf>) -> Self {
        Self { repositories }
    }

    pub fn add_repository(&mut self, repository: impl Into<PathBuf>) {
        self.repositories.push(repository.into());
    }

    pub fn repositories(&self) -> &[PathBuf] {
        &self.repositories
    }

    fn resolve_path(&self, path: &Path) -> Result<ResolvedArtifact> {
        if path.is_file() {
            return Ok(ResolvedArtifact {
                file: path.to_path_buf(),
                source: path.display().to_string(),
            });
        }
        Err(Error::ArtifactNotFound {
            reference: path.display().to_string(),
        })
    }

    fn resolve_coordinate(&self, id: &ArtifactId) -> Result<ResolvedArtifact> {
        let relative = id.to_repository_path();
        for repository in &self.repositories {
            let candidate = repository.join(&relative);
            if candidate.is_file() {
                tracing::debug!(artifact = %id, file = %candidate.display(), "resolved artifact");
                return Ok(ResolvedArtifact {
                    file: candidate,
                    source: id.to_string(),
                });
            }
        }
        Err(Error::ArtifactNotFound {
            reference: id.to_string(),
        })
    }
}

impl ArtifactResolver for LocalRepositoryResolver {
    fn resolve(&self, reference: &ArtifactRef) -> Result<ResolvedArtifact> {
        match reference {
            ArtifactRef::Path(path) => self.resolve_path(path),
            ArtifactRef::Coordinate(id) => self.resolve_coordinate(id),
        }
    }
}
