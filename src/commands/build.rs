//! Build command - links, packages, and publishes one runtime image.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::assemble::{file_size_mib, ImageAssembler};
use crate::config::LinkConfig;
use crate::descriptor::ArtifactInspector;
use crate::exec::{select_linker, ImageLinker};
use crate::provider::ToolProviderRegistry;
use crate::publish::ProjectArtifacts;
use crate::resolve::{ModulePathMap, ModulePathResolver};
use crate::toolchain::{ensure_add_options_supported, Toolchain};

/// Execute the build command.
pub fn cmd_build(manifest: &Path, classifier: Option<&str>, verbose: bool) -> Result<()> {
    let mut config = LinkConfig::load(manifest)?;
    if let Some(classifier) = classifier {
        config.classifier = Some(classifier.to_string());
    }
    if verbose {
        config.verbose = true;
    }

    println!("=== Building runtime image '{}' ===\n", config.final_name);
    let build_start = Instant::now();

    // 1. Validate option values before anything touches the filesystem.
    config.validate()?;
    let toolchain = Toolchain::discover(config.jdk_home.as_deref());
    ensure_add_options_supported(&toolchain, &config.add_options)?;

    // 2. Pick the execution strategy once: a registered in-process tool
    //    wins, otherwise the toolchain's jlink is forked.
    let registry = ToolProviderRegistry::new();
    let linker = select_linker(&registry, &toolchain)?;
    if config.verbose {
        println!("Using {}", linker.describe());
    }

    // 3. Resolve dependency artifacts into the module map.
    println!("Resolving modules...");
    let resolver = ModulePathResolver::new(&ArtifactInspector, config.verbose);
    let module_map = resolver.resolve(&config.dependencies, config.output_directory.as_deref())?;
    for (name, path) in &module_map {
        println!(" -> module: {} ( {} )", name, path.display());
    }
    if module_map.is_empty() && config.add_modules.is_empty() {
        println!("[WARN] no modules resolved and none configured; jlink will reject an empty set");
    }

    // 4. Merge configured and resolved inputs; the source JDK's jmods
    //    folder goes last so project modules shadow platform ones.
    let (module_paths, modules_to_add) = merge_module_inputs(&config, &module_map, linker.as_ref());

    // 5. Assemble the image and publish the archive.
    let assembler = ImageAssembler::new(&config);
    let artifact = assembler.assemble(linker.as_ref(), &module_paths, &modules_to_add)?;
    let mut project = ProjectArtifacts::new();
    project.publish(&artifact)?;

    println!(
        "\n=== Build Complete ({:.1}s) ===",
        build_start.elapsed().as_secs_f64()
    );
    println!(
        "  Archive:  {} ({:.1} MiB)",
        artifact.archive.display(),
        file_size_mib(&artifact.archive)
    );
    println!("  Checksum: {}", artifact.checksum.display());
    match &artifact.classifier {
        Some(classifier) => println!("  Attached with classifier '{classifier}'"),
        None => println!("  Published as the main artifact"),
    }

    Ok(())
}

/// Configured lists first, resolved artifacts after, jmods folder last.
pub(crate) fn merge_module_inputs(
    config: &LinkConfig,
    module_map: &ModulePathMap,
    linker: &dyn ImageLinker,
) -> (Vec<PathBuf>, Vec<String>) {
    let mut modules_to_add = config.add_modules.clone();
    modules_to_add.extend(module_map.keys().cloned());

    let mut module_paths = config.module_paths.clone();
    module_paths.extend(module_map.values().cloned());
    if let Some(jmods) = linker.jmods_folder(config.source_jdk_modules.as_deref()) {
        if jmods.is_dir() {
            module_paths.push(jmods);
        }
    }

    (module_paths, modules_to_add)
}
