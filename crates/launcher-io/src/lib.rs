//! I/O collaborators for the feature launcher
//!
//! Everything that touches the outside world on behalf of the core:
//! parsing and serializing feature descriptors, resolving artifact
//! references to local files, substituting `${name}` variables, and
//! persisting the cached application descriptor atomically.

pub mod codec;
pub mod error;
pub mod io;
pub mod resolver;
pub mod variables;

pub use codec::{parse_feature, read_feature, serialize_feature};
pub use error::{Error, Result};
pub use io::write_atomic;
pub use resolver::{ArtifactRef, ArtifactResolver, LocalRepositoryResolver, ResolvedArtifact};
pub use variables::resolve_variables;
