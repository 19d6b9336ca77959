//! Image assembly - drives one build from empty directory to archive.
//!
//! Strictly sequential: prepare the image directory, run the linker,
//! overlay additional resources, package. A packaging failure leaves the
//! uncompressed image on disk for inspection.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::archive::{parse_output_timestamp, write_checksum, zip_directory};
use crate::args::build_jlink_args;
use crate::config::LinkConfig;
use crate::exec::ImageLinker;
use crate::resources::overlay_resources;

/// The packaged result of one assembly.
#[derive(Debug, Clone)]
pub struct ImageArtifact {
    pub archive: PathBuf,
    pub checksum: PathBuf,
    pub classifier: Option<String>,
}

pub struct ImageAssembler<'a> {
    config: &'a LinkConfig,
}

impl<'a> ImageAssembler<'a> {
    pub fn new(config: &'a LinkConfig) -> Self {
        Self { config }
    }

    /// Run one full assembly with merged module inputs.
    pub fn assemble(
        &self,
        linker: &dyn ImageLinker,
        module_paths: &[PathBuf],
        modules_to_add: &[String],
    ) -> Result<ImageArtifact> {
        let config = self.config;
        let image_dir = config.image_dir();

        // Stage 1: build the argument sequence. Nothing has touched the
        // filesystem yet, so argument problems leave no trace.
        let args = build_jlink_args(config, module_paths, modules_to_add, Some(&image_dir))?;

        // Stage 2: fresh image directory. jlink refuses to write into an
        // existing one, so a leftover from a previous run is deleted; the
        // tool creates the directory itself.
        if image_dir.exists() {
            if config.verbose {
                println!("  deleting existing image directory {}", image_dir.display());
            }
            fs::remove_dir_all(&image_dir)
                .with_context(|| format!("unable to delete {}", image_dir.display()))?;
        }
        if let Some(parent) = image_dir.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("unable to create {}", parent.display()))?;
        }

        // Stage 3: link.
        println!("Running {}", linker.describe());
        linker.run(&args)?;

        // Stage 4: overlay additional resources into the image.
        if !config.additional_resources.is_empty() {
            let copied = overlay_resources(&image_dir, &config.additional_resources)?;
            println!("  overlaid {copied} resource file(s)");
        }

        // Stage 5: package. The image directory is left in place either way.
        let archive = config.archive_path();
        let timestamp = parse_output_timestamp(config.output_timestamp.as_deref())?;
        zip_directory(&image_dir, &archive, timestamp)?;
        let checksum = write_checksum(&archive)?;

        Ok(ImageArtifact {
            archive,
            checksum,
            classifier: config.classifier().map(str::to_owned),
        })
    }
}

/// Size of a file in mebibytes, for summary output.
pub fn file_size_mib(path: &Path) -> f64 {
    fs::metadata(path)
        .map(|m| m.len() as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}
