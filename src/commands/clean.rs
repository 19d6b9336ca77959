//! Clean command - removes build outputs.

use anyhow::Result;
use std::path::Path;

use crate::clean;
use crate::config::LinkConfig;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Image work directories only
    Images,
    /// Archives and checksum sidecars only
    Archives,
    /// Everything this tool produces
    All,
}

/// Execute the clean command.
pub fn cmd_clean(target: CleanTarget, manifest: &Path) -> Result<()> {
    let config = LinkConfig::load(manifest)?;
    match target {
        CleanTarget::Images => clean::clean_images(&config),
        CleanTarget::Archives => clean::clean_archives(&config),
        CleanTarget::All => clean::clean_all(&config),
    }
}
