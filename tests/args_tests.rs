//! Manifest-to-argument pipeline tests.
//!
//! Each test goes the full distance a build does before touching the
//! filesystem: parse the JSON manifest, validate it, and translate it into
//! the jlink argument sequence.

mod helpers;

use helpers::TestEnv;
use jrtlink::args::build_jlink_args;
use jrtlink::config::LinkConfig;
use jrtlink::error::LinkError;
use std::path::{Path, PathBuf};

fn position(args: &[String], value: &str) -> usize {
    args.iter()
        .position(|a| a == value)
        .unwrap_or_else(|| panic!("{value} not found in {args:?}"))
}

#[test]
fn test_manifest_to_args_end_to_end() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "strip-debug": true,
            "no-header-files": true,
            "no-man-pages": true,
            "compress": "zip-6",
            "launchers": ["app=com.example.app/com.example.app.Main"],
            "add-modules": ["com.example.app"],
            "suggest-providers": ["java.nio.charset.spi.CharsetProvider"]
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    config.validate().unwrap();

    let image = env.project.join("image");
    let paths = vec![env.deps.join("app.jar")];
    let args = build_jlink_args(&config, &paths, &config.add_modules, Some(&image)).unwrap();

    assert_eq!(args[0], "--strip-debug");
    let compress = position(&args, "--compress");
    assert_eq!(args[compress + 1], "zip-6");
    let launcher = position(&args, "--launcher");
    assert_eq!(args[launcher + 1], "app=com.example.app/com.example.app.Main");
    let add = position(&args, "--add-modules");
    assert_eq!(args[add + 1], "com.example.app");

    // --suggest-providers is terminal.
    assert_eq!(args[args.len() - 2], "--suggest-providers");
    assert_eq!(args[args.len() - 1], "java.nio.charset.spi.CharsetProvider");
}

#[test]
fn test_relative_paths_anchor_to_manifest_directory() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "dependencies": ["deps/app.jar"],
            "build-directory": "out"
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    assert_eq!(config.dependencies[0], env.project.join("deps/app.jar"));
    assert_eq!(config.build_directory, env.project.join("out"));
    assert_eq!(
        config.archive_path(),
        env.project.join("out/app-runtime.zip")
    );
}

#[test]
fn test_absolute_paths_left_alone() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "dependencies": ["/opt/libs/app.jar"]
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    assert_eq!(config.dependencies[0], PathBuf::from("/opt/libs/app.jar"));
}

#[test]
fn test_invalid_compression_rejected_at_validation() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "compress": "zip-10"
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    assert!(matches!(
        config.validate(),
        Err(LinkError::InvalidCompressionLevel(_))
    ));
}

#[test]
fn test_launcher_conflict_rejected_at_validation() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "launcher": "app=m/c",
            "launchers": ["other=m2/c2"]
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    assert!(matches!(
        config.validate(),
        Err(LinkError::ConflictingLauncherSpec)
    ));
}

#[test]
fn test_missing_final_name_rejected() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(r#"{ "strip-debug": true }"#);

    let config = LinkConfig::load(&manifest).unwrap();
    assert!(matches!(config.validate(), Err(LinkError::EmptyFinalName)));
}

#[test]
fn test_add_options_collapse_to_one_token() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "add-options": ["-Xmx256m", "-Duser.timezone=UTC"]
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    let args = build_jlink_args(&config, &[], &[], None).unwrap();
    assert_eq!(args, vec!["--add-options=-Xmx256m -Duser.timezone=UTC"]);
}

#[test]
fn test_include_locales_pull_in_localedata() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "include-locales": ["en", "de", "ja"]
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    let args = build_jlink_args(&config, &[], &[], None).unwrap();

    let add = position(&args, "--add-modules");
    assert_eq!(args[add + 1], "jdk.localedata");
    let locales = position(&args, "--include-locales");
    assert_eq!(args[locales + 1], "en,de,ja");
}

#[cfg(not(windows))]
#[test]
fn test_plugin_module_path_renormalized() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "plugin-module-path": "plugins/a;plugins/b:plugins/c;"
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    let args = build_jlink_args(&config, &[], &[], None).unwrap();

    let plugin = position(&args, "--plugin-module-path");
    assert_eq!(args[plugin + 1], "plugins/a:plugins/b:plugins/c");
}

#[test]
fn test_dry_run_omits_output_directory() {
    let env = TestEnv::new();
    let manifest = env.write_manifest(
        r#"{
            "final-name": "app-runtime",
            "strip-debug": true
        }"#,
    );

    let config = LinkConfig::load(&manifest).unwrap();
    let dry = build_jlink_args(&config, &[], &[], None).unwrap();
    assert!(!dry.contains(&"--output".to_string()));

    let real = build_jlink_args(&config, &[], &[], Some(Path::new("/img"))).unwrap();
    let output = position(&real, "--output");
    assert_eq!(real[output + 1], "/img");
}
