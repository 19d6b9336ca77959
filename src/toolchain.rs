//! JDK toolchain discovery and tool lookup.
//!
//! The JDK home comes from the manifest, then JDK_HOME, then JAVA_HOME;
//! the first existing directory wins. Tools live under `<jdk>/bin`. The
//! feature release is read from the JDK `release` file when a capability
//! check needs it, never probed via the running tool.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LinkError;

/// Name of the linker tool this crate drives.
pub const JLINK_TOOL: &str = "jlink";

#[derive(Debug, Clone)]
pub struct Toolchain {
    jdk_home: Option<PathBuf>,
}

impl Toolchain {
    /// Pick the JDK home: explicit configuration first, then the
    /// conventional environment variables.
    pub fn discover(configured: Option<&Path>) -> Self {
        let jdk_home = [
            configured.map(Path::to_path_buf),
            std::env::var_os("JDK_HOME").map(PathBuf::from),
            std::env::var_os("JAVA_HOME").map(PathBuf::from),
        ]
        .into_iter()
        .flatten()
        .find(|p| p.is_dir());

        Self { jdk_home }
    }

    pub fn jdk_home(&self) -> Option<&Path> {
        self.jdk_home.as_deref()
    }

    /// `<jdk>/bin/<name>` when it exists as a file, with the Windows `.exe`
    /// convention applied.
    pub fn find_tool(&self, name: &str) -> Option<PathBuf> {
        let home = self.jdk_home.as_deref()?;
        normalize_executable(home.join("bin").join(name), name)
    }

    /// JDK feature release from the `release` file (`JAVA_VERSION="…"`), or
    /// None when the file is missing or unreadable.
    pub fn feature_version(&self) -> Option<u32> {
        let release = self.jdk_home.as_deref()?.join("release");
        let text = fs::read_to_string(release).ok()?;
        text.lines()
            .find_map(|line| line.strip_prefix("JAVA_VERSION="))
            .and_then(parse_feature_version)
    }
}

/// Locate the jlink executable: toolchain lookup first, PATH probe second.
pub fn locate_jlink(toolchain: &Toolchain) -> Result<PathBuf, LinkError> {
    if let Some(exe) = toolchain.find_tool(JLINK_TOOL) {
        return Ok(exe);
    }
    which::which(JLINK_TOOL).map_err(|_| LinkError::ToolNotFound(JLINK_TOOL.to_string()))
}

/// `--add-options` appeared in jlink with JDK 14; reject older toolchains
/// up front instead of letting the tool fail mid-build. An unknown version
/// is a warning, not an error.
pub fn ensure_add_options_supported(
    toolchain: &Toolchain,
    add_options: &[String],
) -> Result<(), LinkError> {
    if add_options.is_empty() {
        return Ok(());
    }
    match toolchain.feature_version() {
        Some(version) if version < 14 => Err(LinkError::UnsupportedOption(format!(
            "the add-options setting requires a Java 14+ toolchain, found {version}"
        ))),
        Some(_) => Ok(()),
        None => {
            println!("[WARN] unable to check the toolchain java version");
            Ok(())
        }
    }
}

/// A candidate may point at a directory (append the tool name) and, on
/// Windows, may lack its `.exe` suffix. Returns None unless the result is
/// an existing file.
fn normalize_executable(mut candidate: PathBuf, name: &str) -> Option<PathBuf> {
    if candidate.is_dir() {
        candidate = candidate.join(name);
    }
    if cfg!(windows) {
        let has_extension = candidate
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.contains('.'))
            .unwrap_or(false);
        if !has_extension {
            let mut raw = candidate.into_os_string();
            raw.push(".exe");
            candidate = PathBuf::from(raw);
        }
    }
    candidate.is_file().then_some(candidate)
}

/// Feature release from a version string: `"17.0.2"` → 17, legacy
/// `"1.8.0_292"` → 8.
fn parse_feature_version(raw: &str) -> Option<u32> {
    let version = raw.trim().trim_matches('"');
    let mut parts = version.split('.');
    let first = parts.next()?;
    let first: u32 = first
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()?;
    if first == 1 {
        let second = parts.next()?;
        second
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .ok()
    } else {
        Some(first)
    }
}
