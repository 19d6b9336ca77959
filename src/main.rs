//! jrtlink - custom Java runtime image builder.
//!
//! Drives the JDK's jlink tool from a project manifest:
//! - resolves JPMS module names from jars, jmods, and exploded classes
//! - assembles a trimmed runtime image with launchers and resources
//! - packages the image as a reproducible zip with a SHA-256 sidecar

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use jrtlink::commands;
use jrtlink::config::DEFAULT_MANIFEST;

#[derive(Parser)]
#[command(name = "jrtlink")]
#[command(about = "Custom Java runtime image builder")]
#[command(
    after_help = "QUICK START:\n  jrtlink show config   Print the effective configuration\n  jrtlink show args     Preview the jlink invocation\n  jrtlink build         Link and package the runtime image\n  jrtlink clean         Remove build artifacts"
)]
struct Cli {
    /// Project manifest (JSON)
    #[arg(short, long, global = true, default_value = DEFAULT_MANIFEST)]
    manifest: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the runtime image and package it as a zip archive
    Build {
        /// Attach the archive under this classifier instead of the configured one
        #[arg(long)]
        classifier: Option<String>,

        /// Print module resolution and the full jlink command line
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Clean build artifacts (default: everything)
    Clean {
        #[command(subcommand)]
        what: Option<CleanTarget>,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show the effective configuration
    Config,
    /// Show the resolved module path
    Modules,
    /// Show the jlink arguments a build would use
    Args,
}

#[derive(Subcommand)]
enum CleanTarget {
    /// Clean linked image directories only
    Images,
    /// Clean zip archives and checksum sidecars only
    Archives,
    /// Clean everything
    All,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();

    match cli.command {
        Commands::Build {
            classifier,
            verbose,
        } => {
            commands::cmd_build(&cli.manifest, classifier.as_deref(), verbose)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Modules => commands::show::ShowTarget::Modules,
                ShowTarget::Args => commands::show::ShowTarget::Args,
            };
            commands::cmd_show(show_target, &cli.manifest)?;
        }

        Commands::Clean { what } => {
            let clean_target = match what {
                None => commands::clean::CleanTarget::All,
                Some(CleanTarget::Images) => commands::clean::CleanTarget::Images,
                Some(CleanTarget::Archives) => commands::clean::CleanTarget::Archives,
                Some(CleanTarget::All) => commands::clean::CleanTarget::All,
            };
            commands::cmd_clean(clean_target, &cli.manifest)?;
        }
    }

    Ok(())
}
