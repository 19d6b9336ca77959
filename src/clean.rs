//! Build artifact cleaning.

use anyhow::Result;
use std::fs;

use crate::config::LinkConfig;

/// Remove the image work directory, all classifiers included.
pub fn clean_images(config: &LinkConfig) -> Result<()> {
    let image_root = config.image_root();

    if image_root.exists() {
        println!("Removing {}...", image_root.display());
        fs::remove_dir_all(&image_root)?;
        println!("Image directories cleaned.");
    } else {
        println!("No image directories to clean.");
    }

    Ok(())
}

/// Remove produced archives and their checksum sidecars.
pub fn clean_archives(config: &LinkConfig) -> Result<()> {
    let build_dir = &config.build_directory;
    let mut cleaned = false;

    if build_dir.is_dir() {
        for entry in fs::read_dir(build_dir)? {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_build_archive(&name, &config.final_name) {
                continue;
            }
            println!("Removing {name}...");
            fs::remove_file(entry.path())?;
            cleaned = true;
        }
    }

    if cleaned {
        println!("Archives cleaned.");
    } else {
        println!("No archives to clean.");
    }

    Ok(())
}

/// Clean everything this tool produces.
pub fn clean_all(config: &LinkConfig) -> Result<()> {
    clean_archives(config)?;
    clean_images(config)?;
    println!("\nFull clean complete.");
    Ok(())
}

/// `<final>.zip`, `<final>-<classifier>.zip`, and their `.sha256` sidecars.
fn is_build_archive(name: &str, final_name: &str) -> bool {
    let stem = name.strip_suffix(".sha256").unwrap_or(name);
    let Some(stem) = stem.strip_suffix(".zip") else {
        return false;
    };
    stem == final_name
        || stem
            .strip_prefix(final_name)
            .is_some_and(|rest| rest.starts_with('-'))
}
