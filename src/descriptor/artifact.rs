//! Descriptor probing for the artifact kinds that can sit on a module path:
//! exploded class directories, jars, and jmod containers.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use zip::result::ZipError;
use zip::ZipArchive;

use super::{classfile, DescriptorResolver, ModuleDescriptor};

const MODULE_INFO: &str = "module-info.class";
const JMOD_MODULE_INFO: &str = "classes/module-info.class";
const MANIFEST: &str = "META-INF/MANIFEST.MF";

/// Self-contained inspector: reads descriptors straight from the artifact
/// bytes, no build-system metadata involved.
pub struct ArtifactInspector;

impl DescriptorResolver for ArtifactInspector {
    fn resolve(&self, artifact: &Path) -> Result<Option<ModuleDescriptor>> {
        if artifact.is_dir() {
            return inspect_directory(artifact);
        }
        match artifact.extension().and_then(|e| e.to_str()) {
            Some("jar") => inspect_jar(artifact),
            Some("jmod") => inspect_jmod(artifact),
            _ => Ok(None),
        }
    }
}

fn inspect_directory(dir: &Path) -> Result<Option<ModuleDescriptor>> {
    let info = dir.join(MODULE_INFO);
    if !info.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(&info)
        .with_context(|| format!("unable to read {}", info.display()))?;
    let name = classfile::module_name(&bytes)
        .with_context(|| format!("invalid module descriptor in {}", dir.display()))?;
    Ok(Some(ModuleDescriptor::explicit(name)))
}

fn inspect_jar(jar: &Path) -> Result<Option<ModuleDescriptor>> {
    let file = File::open(jar).with_context(|| format!("unable to open {}", jar.display()))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("unable to read {}", jar.display()))?;

    // Compiled descriptor at the jar root wins.
    if let Some(bytes) = entry_bytes(&mut archive, MODULE_INFO)? {
        let name = classfile::module_name(&bytes)
            .with_context(|| format!("invalid module descriptor in {}", jar.display()))?;
        return Ok(Some(ModuleDescriptor::explicit(name)));
    }

    // Multi-release jars may carry the descriptor under a versioned tree;
    // the highest version is authoritative.
    let versioned = archive
        .file_names()
        .filter_map(|n| n.strip_prefix("META-INF/versions/"))
        .filter_map(|rest| rest.strip_suffix("/module-info.class"))
        .filter_map(|v| v.parse::<u32>().ok())
        .max();
    if let Some(version) = versioned {
        let entry = format!("META-INF/versions/{version}/module-info.class");
        if let Some(bytes) = entry_bytes(&mut archive, &entry)? {
            let name = classfile::module_name(&bytes)
                .with_context(|| format!("invalid module descriptor in {}", jar.display()))?;
            return Ok(Some(ModuleDescriptor::explicit(name)));
        }
    }

    // No compiled descriptor: the jar is at best an automatic module.
    if let Some(bytes) = entry_bytes(&mut archive, MANIFEST)? {
        let text = String::from_utf8_lossy(&bytes);
        if let Some(name) = automatic_name_from_manifest(&text) {
            return Ok(Some(ModuleDescriptor::automatic(name)));
        }
    }

    let derived = jar
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(derive_automatic_name);
    Ok(derived.map(ModuleDescriptor::automatic))
}

fn inspect_jmod(jmod: &Path) -> Result<Option<ModuleDescriptor>> {
    // jmod files are zip containers behind a short magic prefix; the zip
    // reader locates the central directory from the end, so the prefix is
    // harmless.
    let file = File::open(jmod).with_context(|| format!("unable to open {}", jmod.display()))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("unable to read {}", jmod.display()))?;
    match entry_bytes(&mut archive, JMOD_MODULE_INFO)? {
        Some(bytes) => {
            let name = classfile::module_name(&bytes)
                .with_context(|| format!("invalid module descriptor in {}", jmod.display()))?;
            Ok(Some(ModuleDescriptor::explicit(name)))
        }
        None => Ok(None),
    }
}

fn entry_bytes(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Vec<u8>>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut buf = Vec::new();
            entry
                .read_to_end(&mut buf)
                .with_context(|| format!("unable to read archive entry {name}"))?;
            Ok(Some(buf))
        }
        Err(ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("unable to read archive entry {name}")),
    }
}

/// Main-section manifest lookup with continuation-line folding (a line
/// starting with a single space continues the previous header).
fn automatic_name_from_manifest(text: &str) -> Option<String> {
    let mut headers: Vec<String> = Vec::new();
    for raw in text.lines() {
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            break; // end of the main section
        }
        match line.strip_prefix(' ') {
            Some(continuation) => {
                if let Some(last) = headers.last_mut() {
                    last.push_str(continuation);
                }
            }
            None => headers.push(line.to_string()),
        }
    }
    headers.iter().find_map(|h| {
        h.strip_prefix("Automatic-Module-Name:")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
    })
}

/// Filename-derived automatic module name: drop the `.jar` suffix, cut the
/// first `-<digits>` version tail, map every non-alphanumeric run to a
/// single dot, trim the ends.
fn derive_automatic_name(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(".jar").unwrap_or(file_name);
    let stem = split_version_suffix(stem);

    let mut name = String::with_capacity(stem.len());
    let mut at_dot = true; // swallows leading separators and collapses runs
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c);
            at_dot = false;
        } else if !at_dot {
            name.push('.');
            at_dot = true;
        }
    }
    while name.ends_with('.') {
        name.pop();
    }

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Cut at the first `-` that is followed by digits ending the string or
/// followed by a dot (`foo-bar-1.2.3` → `foo-bar`).
fn split_version_suffix(stem: &str) -> &str {
    let bytes = stem.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'-' {
            continue;
        }
        let mut j = i + 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > i + 1 && (j == bytes.len() || bytes[j] == b'.') {
            return &stem[..i];
        }
    }
    stem
}
