//! Translates the declarative configuration into the exact argument
//! sequence jlink expects.
//!
//! Emission order is fixed and load-bearing: jlink treats
//! `--suggest-providers` as a terminal directive, so it always goes last.
//! Joined path values are escaped for the later shell-quoting pass
//! regardless of the execution strategy.

use std::path::{Path, PathBuf};

use crate::config::{valid_compression, valid_endianness, LinkConfig};
use crate::error::LinkError;

/// Platform path separator for module path joins.
pub const PATH_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Build the ordered jlink argument sequence.
///
/// `module_paths` and `modules_to_add` are the merged results of
/// configuration plus resolution; `image_dir` is the `--output` target and
/// is omitted only for argument-only dry runs. Option values are checked
/// before any element is emitted.
pub fn build_jlink_args(
    config: &LinkConfig,
    module_paths: &[PathBuf],
    modules_to_add: &[String],
    image_dir: Option<&Path>,
) -> Result<Vec<String>, LinkError> {
    if config.launcher.is_some() && !config.launchers.is_empty() {
        return Err(LinkError::ConflictingLauncherSpec);
    }
    if let Some(endian) = &config.endian {
        if !valid_endianness(endian) {
            return Err(LinkError::InvalidEndianness(endian.clone()));
        }
    }
    if let Some(compress) = &config.compress {
        if !valid_compression(compress) {
            return Err(LinkError::InvalidCompressionLevel(compress.clone()));
        }
    }

    let mut args: Vec<String> = Vec::new();

    if config.strip_debug {
        args.push("--strip-debug".into());
    }
    if config.bind_services {
        args.push("--bind-services".into());
    }
    if let Some(endian) = &config.endian {
        args.push("--endian".into());
        args.push(endian.clone());
    }
    if config.ignore_signing_information {
        args.push("--ignore-signing-information".into());
    }
    if let Some(compress) = &config.compress {
        args.push("--compress".into());
        args.push(compress.clone());
    }
    for launcher in config.launcher_specs() {
        args.push("--launcher".into());
        args.push(launcher);
    }
    if !config.add_options.is_empty() {
        // Single `key=value` token; jlink splits the value on spaces itself.
        args.push(format!("--add-options={}", config.add_options.join(" ")));
    }
    if let Some(plugin) = &config.disable_plugin {
        args.push("--disable-plugin".into());
        args.push(plugin.clone());
    }
    if !module_paths.is_empty() {
        args.push("--module-path".into());
        args.push(escape_backslashes(&join_platform_paths(module_paths)));
    }
    if config.no_header_files {
        args.push("--no-header-files".into());
    }
    if config.no_man_pages {
        args.push("--no-man-pages".into());
    }
    if !config.limit_modules.is_empty() {
        args.push("--limit-modules".into());
        args.push(config.limit_modules.join(","));
    }
    if !modules_to_add.is_empty() {
        args.push("--add-modules".into());
        args.push(escape_backslashes(&modules_to_add.join(",")));
    }
    if !config.include_locales.is_empty() {
        // Locale data lives in its own module; pull it in before filtering.
        args.push("--add-modules".into());
        args.push("jdk.localedata".into());
        args.push("--include-locales".into());
        args.push(config.include_locales.join(","));
    }
    if let Some(plugin_path) = &config.plugin_module_path {
        args.push("--plugin-module-path".into());
        args.push(escape_backslashes(&renormalize_path_list(plugin_path)));
    }
    if let Some(image_dir) = image_dir {
        args.push("--output".into());
        args.push(image_dir.display().to_string());
    }
    if config.verbose {
        args.push("--verbose".into());
    }
    if !config.suggest_providers.is_empty() {
        args.push("--suggest-providers".into());
        args.push(config.suggest_providers.join(","));
    }

    Ok(args)
}

/// Join filesystem paths with the platform separator.
fn join_platform_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Accept a `;`- or `:`-separated path list (empty segments dropped) and
/// rejoin it with the platform separator.
pub fn renormalize_path_list(value: &str) -> String {
    value
        .split(|c| c == ';' || c == ':')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR)
}

/// Double every backslash so the value survives shell quoting on Windows
/// path separators.
fn escape_backslashes(value: &str) -> String {
    value.replace('\\', "\\\\")
}
