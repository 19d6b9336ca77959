//! Dependency-to-module-path resolution.
//!
//! Probes every dependency artifact for a module descriptor and builds the
//! name→location map handed to jlink. Automatic modules are skipped (jlink
//! cannot link them); artifacts with no descriptor at all fail the build.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::descriptor::DescriptorResolver;
use crate::error::LinkError;

/// Module name → artifact location. Ordered, so identical inputs always
/// produce the same module path downstream.
pub type ModulePathMap = BTreeMap<String, PathBuf>;

pub struct ModulePathResolver<'a> {
    descriptors: &'a dyn DescriptorResolver,
    verbose: bool,
}

impl<'a> ModulePathResolver<'a> {
    pub fn new(descriptors: &'a dyn DescriptorResolver, verbose: bool) -> Self {
        Self {
            descriptors,
            verbose,
        }
    }

    /// Resolve the dependency artifacts plus, when it exists on disk, the
    /// project's own compiled output directory.
    pub fn resolve(
        &self,
        dependencies: &[PathBuf],
        local_output: Option<&Path>,
    ) -> Result<ModulePathMap> {
        let mut map = ModulePathMap::new();
        for artifact in dependencies {
            self.insert(&mut map, artifact)?;
        }
        if let Some(output) = local_output {
            if output.exists() {
                self.insert(&mut map, output)?;
            }
        }
        Ok(map)
    }

    fn insert(&self, map: &mut ModulePathMap, artifact: &Path) -> Result<()> {
        let descriptor = self
            .descriptors
            .resolve(artifact)
            .with_context(|| format!("unable to probe {}", artifact.display()))?;

        let Some(descriptor) = descriptor else {
            return Err(LinkError::MissingModuleDescriptor(artifact.to_path_buf()).into());
        };

        if descriptor.automatic {
            if self.verbose {
                println!("  [SKIP] ignoring automatic module: {}", descriptor.name);
            }
            return Ok(());
        }

        // Duplicate names are tolerated: warn and let the later artifact win.
        if map.contains_key(&descriptor.name) {
            println!("[WARN] the module name {} already exists", descriptor.name);
        }
        map.insert(descriptor.name, artifact.to_path_buf());
        Ok(())
    }
}
