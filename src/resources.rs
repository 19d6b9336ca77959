//! Additional-resource overlay for the linked image.
//!
//! Runs after a successful link and before packaging, so overlaid files end
//! up inside the archive. Relative paths inside each resource directory are
//! preserved.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::ResourceSet;

/// Copy each resource set into the image directory. A missing source
/// directory is skipped with a warning; any real copy failure aborts the
/// assembly before packaging. Returns the number of files copied.
pub fn overlay_resources(image_dir: &Path, resources: &[ResourceSet]) -> Result<usize> {
    let mut copied = 0;
    for resource in resources {
        if !resource.directory.is_dir() {
            println!(
                "[WARN] resource directory {} does not exist, skipping",
                resource.directory.display()
            );
            continue;
        }
        let target_root = match &resource.target_path {
            Some(sub) => image_dir.join(sub),
            None => image_dir.to_path_buf(),
        };
        copied += copy_tree(&resource.directory, &target_root)?;
    }
    Ok(copied)
}

fn copy_tree(src: &Path, dest: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walking {}", src.display()))?;
        let relative = match entry.path().strip_prefix(src) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("unable to create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("unable to create {}", parent.display()))?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!(
                    "unable to copy {} to {}",
                    entry.path().display(),
                    target.display()
                )
            })?;
            copied += 1;
        }
    }
    Ok(copied)
}
