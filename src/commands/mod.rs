//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Build, package, and publish a runtime image
//! - `show` - Display configuration, resolved modules, or linker arguments
//! - `clean` - Clean build artifacts

pub mod build;
pub mod clean;
pub mod show;

pub use build::cmd_build;
pub use clean::{cmd_clean, CleanTarget};
pub use show::{cmd_show, ShowTarget};
