//! Module descriptor probing for candidate artifacts.
//!
//! The resolver only needs two facts per artifact: the module name and
//! whether the descriptor is explicit (compiled `module-info.class`) or
//! automatic (manifest header or filename derivation).

pub mod classfile;

mod artifact;

pub use artifact::ArtifactInspector;

use std::path::Path;

use anyhow::Result;

/// What an artifact declares about itself as a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    /// Automatic modules carry a name but no compiled descriptor; jlink
    /// cannot link them.
    pub automatic: bool,
}

impl ModuleDescriptor {
    pub fn explicit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            automatic: false,
        }
    }

    pub fn automatic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            automatic: true,
        }
    }
}

/// Probes one artifact for a module descriptor.
///
/// `Ok(None)` means the artifact has no descriptor at all, not even an
/// automatic one; the caller decides whether that is fatal.
pub trait DescriptorResolver {
    fn resolve(&self, artifact: &Path) -> Result<Option<ModuleDescriptor>>;
}
