//! Typed failures for the image build pipeline.
//!
//! Validation problems surface before any argument sequence is built or any
//! process is spawned; tool failures carry the exit code and the attempted
//! command line so the caller can log them verbatim.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    /// The artifact carries no module descriptor at all (not even an
    /// automatic one), so jlink cannot place it on the module path.
    #[error("the dependency {0} does not provide a module descriptor, so it cannot be linked")]
    MissingModuleDescriptor(PathBuf),

    #[error("specify either a single launcher or multiple launchers, not both")]
    ConflictingLauncherSpec,

    #[error("invalid compression level {0:?} (expected 0, 1, 2 or zip-0..zip-9)")]
    InvalidCompressionLevel(String),

    #[error("invalid endianness {0:?} (expected big or little)")]
    InvalidEndianness(String),

    #[error("unable to find the {0} command")]
    ToolNotFound(String),

    #[error("{message}")]
    ToolExecutionFailed { exit_code: i32, message: String },

    #[error("unable to invoke the tool: {0}")]
    ToolInvocationError(#[source] io::Error),

    #[error("packaging the runtime image failed: {0}")]
    PackagingError(String),

    #[error("use a classifier to attach supplemental artifacts instead of replacing the main one")]
    AmbiguousArtifactReplacement,

    #[error("invalid output timestamp {0:?} (expected ISO-8601 with offset or epoch seconds)")]
    InvalidOutputTimestamp(String),

    #[error("final-name is not allowed to be empty")]
    EmptyFinalName,

    #[error("{0}")]
    UnsupportedOption(String),
}
