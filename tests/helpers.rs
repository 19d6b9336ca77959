//! Shared test utilities for jrtlink tests.
#![allow(dead_code)]

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Test environment with a temporary project directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Project root, doubles as the manifest directory
    pub project: PathBuf,
    /// Dependency artifacts are placed here
    pub deps: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with temporary directories.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let project = temp_dir.path().to_path_buf();
        let deps = project.join("deps");
        fs::create_dir_all(&deps).expect("Failed to create deps dir");

        Self {
            _temp_dir: temp_dir,
            project,
            deps,
        }
    }

    /// Write a project manifest and return its path.
    pub fn write_manifest(&self, json: &str) -> PathBuf {
        let path = self.project.join("jrtlink.json");
        fs::write(&path, json).expect("Failed to write manifest");
        path
    }
}

/// Hand-assembled `module-info.class` declaring `module`: a three-entry
/// constant pool (Utf8 "Module", Utf8 name, CONSTANT_Module) and a single
/// Module attribute, enough for the class-file reader to find the name.
pub fn module_info_bytes(module: &str) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend(0xCAFE_BABEu32.to_be_bytes());
    v.extend(0u16.to_be_bytes()); // minor version
    v.extend(65u16.to_be_bytes()); // major version
    v.extend(4u16.to_be_bytes()); // constant_pool_count

    v.push(1); // CONSTANT_Utf8
    v.extend((b"Module".len() as u16).to_be_bytes());
    v.extend(b"Module");

    v.push(1); // CONSTANT_Utf8
    v.extend((module.len() as u16).to_be_bytes());
    v.extend(module.as_bytes());

    v.push(19); // CONSTANT_Module
    v.extend(2u16.to_be_bytes()); // name_index -> Utf8 at 2

    v.extend(0x8000u16.to_be_bytes()); // access_flags: ACC_MODULE
    v.extend(0u16.to_be_bytes()); // this_class
    v.extend(0u16.to_be_bytes()); // super_class
    v.extend(0u16.to_be_bytes()); // interfaces_count
    v.extend(0u16.to_be_bytes()); // fields_count
    v.extend(0u16.to_be_bytes()); // methods_count

    v.extend(1u16.to_be_bytes()); // attributes_count
    v.extend(1u16.to_be_bytes()); // attribute_name_index -> "Module"
    v.extend(2u32.to_be_bytes()); // attribute_length
    v.extend(3u16.to_be_bytes()); // module_name_index -> CONSTANT_Module at 3

    v
}

fn zip_writer(path: &Path) -> ZipWriter<File> {
    let file = File::create(path).expect("Failed to create archive");
    ZipWriter::new(file)
}

/// Jar with a compiled module descriptor at the root.
pub fn create_modular_jar(path: &Path, module: &str) {
    let mut writer = zip_writer(path);
    writer
        .start_file("module-info.class", SimpleFileOptions::default())
        .expect("Failed to start entry");
    writer
        .write_all(&module_info_bytes(module))
        .expect("Failed to write descriptor");
    writer.finish().expect("Failed to finish jar");
}

/// Multi-release jar: no root descriptor, one per versioned tree. The
/// highest version declares `module`, lower ones a decoy name.
pub fn create_multi_release_jar(path: &Path, module: &str, version: u32) {
    let mut writer = zip_writer(path);
    writer
        .start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())
        .expect("Failed to start manifest");
    writer
        .write_all(b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n")
        .expect("Failed to write manifest");
    writer
        .start_file(
            "META-INF/versions/9/module-info.class",
            SimpleFileOptions::default(),
        )
        .expect("Failed to start entry");
    writer
        .write_all(&module_info_bytes("decoy.older"))
        .expect("Failed to write descriptor");
    writer
        .start_file(
            format!("META-INF/versions/{version}/module-info.class"),
            SimpleFileOptions::default(),
        )
        .expect("Failed to start entry");
    writer
        .write_all(&module_info_bytes(module))
        .expect("Failed to write descriptor");
    writer.finish().expect("Failed to finish jar");
}

/// Jar with an Automatic-Module-Name manifest header and no descriptor.
pub fn create_automatic_jar(path: &Path, module: &str) {
    let mut writer = zip_writer(path);
    writer
        .start_file("META-INF/MANIFEST.MF", SimpleFileOptions::default())
        .expect("Failed to start manifest");
    writer
        .write_all(format!("Manifest-Version: 1.0\r\nAutomatic-Module-Name: {module}\r\n\r\n").as_bytes())
        .expect("Failed to write manifest");
    writer.finish().expect("Failed to finish jar");
}

/// Jar with neither a descriptor nor any manifest header.
pub fn create_plain_jar(path: &Path) {
    let mut writer = zip_writer(path);
    writer
        .start_file("com/example/App.class", SimpleFileOptions::default())
        .expect("Failed to start entry");
    writer.write_all(b"\0").expect("Failed to write entry");
    writer.finish().expect("Failed to finish jar");
}

/// jmod container: four byte magic prefix, then a zip with the descriptor
/// under classes/.
pub fn create_jmod(path: &Path, module: &str) {
    let mut file = File::create(path).expect("Failed to create jmod");
    file.write_all(b"JM\x01\x00").expect("Failed to write magic");
    let mut writer = ZipWriter::new(file);
    writer
        .start_file("classes/module-info.class", SimpleFileOptions::default())
        .expect("Failed to start entry");
    writer
        .write_all(&module_info_bytes(module))
        .expect("Failed to write descriptor");
    writer.finish().expect("Failed to finish jmod");
}

/// Exploded class directory with a compiled descriptor.
pub fn create_exploded_module(dir: &Path, module: &str) {
    fs::create_dir_all(dir).expect("Failed to create module dir");
    fs::write(dir.join("module-info.class"), module_info_bytes(module))
        .expect("Failed to write descriptor");
}

/// Fake JDK installation: `bin/jlink` stub plus a `release` file carrying
/// the given JAVA_VERSION.
pub fn create_fake_jdk(dir: &Path, version: &str) {
    let bin = dir.join("bin");
    fs::create_dir_all(&bin).expect("Failed to create bin dir");
    fs::write(bin.join("jlink"), "#!/bin/sh\nexit 0\n").expect("Failed to write jlink stub");
    fs::write(
        dir.join("release"),
        format!("JAVA_VERSION=\"{version}\"\nOS_ARCH=\"x86_64\"\n"),
    )
    .expect("Failed to write release file");
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(
        path.is_file(),
        "Expected file to exist: {}",
        path.display()
    );
}

/// Names of all entries in a zip archive, in stored order.
pub fn zip_entry_names(archive: &Path) -> Vec<String> {
    let file = File::open(archive).expect("Failed to open archive");
    let archive = zip::ZipArchive::new(file).expect("Failed to read archive");
    archive.file_names().map(str::to_owned).collect()
}
