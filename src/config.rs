//! Project manifest for a runtime-image build.
//!
//! Options are read from a JSON manifest (default: jrtlink.json) with
//! kebab-case keys. The environment fills in what the manifest leaves out:
//! SOURCE_DATE_EPOCH for the output timestamp, JDK_HOME/JAVA_HOME for the
//! toolchain (resolved in the toolchain module). Relative paths are
//! interpreted against the manifest's directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::archive::parse_output_timestamp;
use crate::error::LinkError;

/// Manifest file name looked up in the project directory by default.
pub const DEFAULT_MANIFEST: &str = "jrtlink.json";

/// One additional resource set overlaid onto the linked image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResourceSet {
    /// Source directory copied recursively, relative paths preserved.
    pub directory: PathBuf,
    /// Optional subdirectory inside the image to copy into.
    #[serde(default)]
    pub target_path: Option<PathBuf>,
}

/// All options of one image build, immutable once loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LinkConfig {
    // Linker flags, mirroring jlink's own option names.
    pub strip_debug: bool,
    pub bind_services: bool,
    pub ignore_signing_information: bool,
    pub no_header_files: bool,
    pub no_man_pages: bool,
    pub verbose: bool,
    pub endian: Option<String>,
    pub compress: Option<String>,
    pub disable_plugin: Option<String>,
    pub launcher: Option<String>,
    pub launchers: Vec<String>,
    pub add_options: Vec<String>,
    pub limit_modules: Vec<String>,
    pub add_modules: Vec<String>,
    pub suggest_providers: Vec<String>,
    pub include_locales: Vec<String>,
    /// Extra plugin path, `:`- or `;`-separated; renormalized when emitted.
    pub plugin_module_path: Option<String>,
    /// Module path entries passed through in addition to resolved artifacts.
    pub module_paths: Vec<PathBuf>,

    // Project layout.
    pub dependencies: Vec<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub build_directory: PathBuf,
    pub final_name: String,
    pub classifier: Option<String>,
    pub additional_resources: Vec<ResourceSet>,

    // Toolchain and packaging.
    pub jdk_home: Option<PathBuf>,
    pub source_jdk_modules: Option<PathBuf>,
    pub output_timestamp: Option<String>,

    /// Directory the manifest was loaded from; anchors relative paths.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            strip_debug: false,
            bind_services: false,
            ignore_signing_information: false,
            no_header_files: false,
            no_man_pages: false,
            verbose: false,
            endian: None,
            compress: None,
            disable_plugin: None,
            launcher: None,
            launchers: Vec::new(),
            add_options: Vec::new(),
            limit_modules: Vec::new(),
            add_modules: Vec::new(),
            suggest_providers: Vec::new(),
            include_locales: Vec::new(),
            plugin_module_path: None,
            module_paths: Vec::new(),
            dependencies: Vec::new(),
            output_directory: None,
            build_directory: PathBuf::from("target"),
            final_name: String::new(),
            classifier: None,
            additional_resources: Vec::new(),
            jdk_home: None,
            source_jdk_modules: None,
            output_timestamp: None,
            base_dir: PathBuf::from("."),
        }
    }
}

impl LinkConfig {
    /// Load a manifest, layer in environment fallbacks, and anchor relative
    /// paths to the manifest's directory.
    pub fn load(manifest: &Path) -> Result<Self> {
        let text = fs::read_to_string(manifest)
            .with_context(|| format!("unable to read manifest {}", manifest.display()))?;
        let mut config: LinkConfig = serde_json::from_str(&text)
            .with_context(|| format!("invalid manifest {}", manifest.display()))?;

        config.base_dir = match manifest.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        config.apply_env();
        config.anchor_paths();
        Ok(config)
    }

    /// Environment fallbacks for values the manifest left unset.
    fn apply_env(&mut self) {
        if self.output_timestamp.is_none() {
            if let Ok(epoch) = std::env::var("SOURCE_DATE_EPOCH") {
                self.output_timestamp = Some(epoch);
            }
        }
    }

    fn anchor_paths(&mut self) {
        let base = self.base_dir.clone();
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(path.as_path());
            }
        };

        self.dependencies.iter_mut().for_each(anchor);
        self.module_paths.iter_mut().for_each(anchor);
        anchor(&mut self.build_directory);
        if let Some(dir) = self.output_directory.as_mut() {
            anchor(dir);
        }
        if let Some(dir) = self.jdk_home.as_mut() {
            anchor(dir);
        }
        if let Some(dir) = self.source_jdk_modules.as_mut() {
            anchor(dir);
        }
        for resource in &mut self.additional_resources {
            anchor(&mut resource.directory);
        }
    }

    /// Reject invalid option values before anything touches the filesystem
    /// or a process is spawned.
    pub fn validate(&self) -> Result<(), LinkError> {
        if self.final_name.trim().is_empty() {
            return Err(LinkError::EmptyFinalName);
        }
        if let Some(endian) = &self.endian {
            if !valid_endianness(endian) {
                return Err(LinkError::InvalidEndianness(endian.clone()));
            }
        }
        if let Some(compress) = &self.compress {
            if !valid_compression(compress) {
                return Err(LinkError::InvalidCompressionLevel(compress.clone()));
            }
        }
        if self.launcher.is_some() && !self.launchers.is_empty() {
            return Err(LinkError::ConflictingLauncherSpec);
        }
        parse_output_timestamp(self.output_timestamp.as_deref())?;
        Ok(())
    }

    /// Launcher specs collapsed to one list; the single form is a
    /// one-element list. `validate` already rejected the both-set case.
    pub fn launcher_specs(&self) -> Vec<String> {
        match &self.launcher {
            Some(single) => vec![single.clone()],
            None => self.launchers.clone(),
        }
    }

    /// Classifier, treating empty/blank as absent.
    pub fn classifier(&self) -> Option<&str> {
        self.classifier
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Root of the image work tree under the build directory.
    pub fn image_root(&self) -> PathBuf {
        self.build_directory.join("jrtlink")
    }

    /// Directory the linked image is written into. Classified images get
    /// their own subtree so parallel profiles never collide.
    pub fn image_dir(&self) -> PathBuf {
        let root = self.image_root();
        match self.classifier() {
            Some(classifier) => root.join("classifiers").join(classifier),
            None => root.join("default"),
        }
    }

    /// Final archive location: `<build>/<final-name>[-<classifier>].zip`.
    pub fn archive_path(&self) -> PathBuf {
        let file_name = match self.classifier() {
            Some(classifier) => format!("{}-{}.zip", self.final_name, classifier),
            None => format!("{}.zip", self.final_name),
        };
        self.build_directory.join(file_name)
    }

    /// Print the effective configuration.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  final-name: {}", self.final_name);
        println!(
            "  classifier: {}",
            self.classifier().unwrap_or("(none)")
        );
        println!("  build-directory: {}", self.build_directory.display());
        println!("  image-dir: {}", self.image_dir().display());
        println!("  archive: {}", self.archive_path().display());
        println!("  dependencies: {}", self.dependencies.len());
        for dep in &self.dependencies {
            println!("    {}", dep.display());
        }
        if let Some(dir) = &self.output_directory {
            println!("  output-directory: {}", dir.display());
        }
        println!("  add-modules: {}", self.add_modules.join(", "));
        println!("  limit-modules: {}", self.limit_modules.join(", "));
        println!("  strip-debug: {}", self.strip_debug);
        println!("  bind-services: {}", self.bind_services);
        println!("  no-header-files: {}", self.no_header_files);
        println!("  no-man-pages: {}", self.no_man_pages);
        if let Some(endian) = &self.endian {
            println!("  endian: {endian}");
        }
        if let Some(compress) = &self.compress {
            println!("  compress: {compress}");
        }
        let launchers = self.launcher_specs();
        if !launchers.is_empty() {
            println!("  launchers: {}", launchers.join(", "));
        }
        if let Some(jdk) = &self.jdk_home {
            println!("  jdk-home: {}", jdk.display());
        }
        if let Some(stamp) = &self.output_timestamp {
            println!("  output-timestamp: {stamp}");
        }
    }
}

/// jlink accepts `0`, `1`, `2` and the explicit `zip-0` .. `zip-9` forms.
pub(crate) fn valid_compression(value: &str) -> bool {
    matches!(value, "0" | "1" | "2")
        || value
            .strip_prefix("zip-")
            .is_some_and(|n| n.len() == 1 && n.as_bytes()[0].is_ascii_digit())
}

pub(crate) fn valid_endianness(value: &str) -> bool {
    matches!(value, "big" | "little")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn named(name: &str) -> LinkConfig {
        LinkConfig {
            final_name: name.to_string(),
            ..LinkConfig::default()
        }
    }

    #[test]
    fn test_compression_value_matrix() {
        for ok in ["0", "1", "2", "zip-0", "zip-5", "zip-9"] {
            assert!(valid_compression(ok), "{ok} should be accepted");
        }
        for bad in ["3", "9", "zip", "zip-10", "", "zip--1"] {
            assert!(!valid_compression(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_validate_rejects_bad_endian() {
        let mut config = named("image");
        config.endian = Some("middle".to_string());
        assert!(matches!(
            config.validate(),
            Err(LinkError::InvalidEndianness(_))
        ));
        config.endian = Some("little".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_compression() {
        let mut config = named("image");
        config.compress = Some("zip-10".to_string());
        assert!(matches!(
            config.validate(),
            Err(LinkError::InvalidCompressionLevel(_))
        ));
    }

    #[test]
    fn test_validate_rejects_launcher_conflict() {
        let mut config = named("image");
        config.launcher = Some("run=mod/cls".to_string());
        config.launchers = vec!["other=mod2/cls2".to_string()];
        assert!(matches!(
            config.validate(),
            Err(LinkError::ConflictingLauncherSpec)
        ));
    }

    #[test]
    fn test_validate_requires_final_name() {
        let config = named("  ");
        assert!(matches!(config.validate(), Err(LinkError::EmptyFinalName)));
    }

    #[test]
    fn test_launcher_specs_single_form() {
        let mut config = named("image");
        config.launcher = Some("run=mod/cls".to_string());
        assert_eq!(config.launcher_specs(), vec!["run=mod/cls".to_string()]);
    }

    #[test]
    fn test_manifest_keys_are_kebab_case() {
        let config: LinkConfig = serde_json::from_str(
            r#"{
                "final-name": "app-runtime",
                "strip-debug": true,
                "add-modules": ["com.example.app"],
                "no-man-pages": true,
                "launchers": ["app=com.example.app/com.example.Main"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.final_name, "app-runtime");
        assert!(config.strip_debug);
        assert!(config.no_man_pages);
        assert_eq!(config.add_modules, vec!["com.example.app".to_string()]);
        assert_eq!(config.launchers.len(), 1);
    }

    #[test]
    fn test_archive_path_with_classifier() {
        let mut config = named("app");
        config.build_directory = PathBuf::from("/tmp/build");
        assert_eq!(config.archive_path(), PathBuf::from("/tmp/build/app.zip"));
        config.classifier = Some("linux-x64".to_string());
        assert_eq!(
            config.archive_path(),
            PathBuf::from("/tmp/build/app-linux-x64.zip")
        );
    }

    #[test]
    fn test_blank_classifier_treated_as_absent() {
        let mut config = named("app");
        config.classifier = Some("  ".to_string());
        assert_eq!(config.classifier(), None);
        assert!(config.image_dir().ends_with("jrtlink/default"));
    }

    #[test]
    #[serial]
    fn test_source_date_epoch_fallback() {
        std::env::set_var("SOURCE_DATE_EPOCH", "1700000000");
        let mut config = named("app");
        config.apply_env();
        assert_eq!(config.output_timestamp.as_deref(), Some("1700000000"));

        config.output_timestamp = Some("2023-01-01T00:00:00Z".to_string());
        config.apply_env();
        assert_eq!(
            config.output_timestamp.as_deref(),
            Some("2023-01-01T00:00:00Z")
        );
        std::env::remove_var("SOURCE_DATE_EPOCH");
    }
}
