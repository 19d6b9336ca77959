//! Show command - inspect configuration and derived state without building.

use anyhow::Result;
use std::path::Path;

use crate::args::build_jlink_args;
use crate::config::LinkConfig;
use crate::descriptor::ArtifactInspector;
use crate::resolve::ModulePathResolver;

/// What to display.
pub enum ShowTarget {
    /// Effective configuration after environment layering
    Config,
    /// Resolved module map
    Modules,
    /// The argument sequence a build would hand to jlink (without --output)
    Args,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, manifest: &Path) -> Result<()> {
    let config = LinkConfig::load(manifest)?;
    match target {
        ShowTarget::Config => {
            config.print();
            Ok(())
        }
        ShowTarget::Modules => show_modules(&config),
        ShowTarget::Args => show_args(&config),
    }
}

fn show_modules(config: &LinkConfig) -> Result<()> {
    let resolver = ModulePathResolver::new(&ArtifactInspector, config.verbose);
    let map = resolver.resolve(&config.dependencies, config.output_directory.as_deref())?;

    if map.is_empty() {
        println!("No modules resolved.");
        return Ok(());
    }
    for (name, path) in &map {
        println!(" -> module: {} ( {} )", name, path.display());
    }
    Ok(())
}

fn show_args(config: &LinkConfig) -> Result<()> {
    config.validate()?;
    let resolver = ModulePathResolver::new(&ArtifactInspector, config.verbose);
    let map = resolver.resolve(&config.dependencies, config.output_directory.as_deref())?;

    let mut modules_to_add = config.add_modules.clone();
    modules_to_add.extend(map.keys().cloned());
    let mut module_paths = config.module_paths.clone();
    module_paths.extend(map.values().cloned());

    // No image directory here: a dry run must not imply one.
    let args = build_jlink_args(config, &module_paths, &modules_to_add, None)?;
    for arg in &args {
        println!("{arg}");
    }
    Ok(())
}
