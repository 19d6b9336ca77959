//! jrtlink library exports.
//!
//! The binary in `main.rs` is a thin clap wrapper over these modules;
//! integration tests drive the same public surface.

pub mod archive;
pub mod args;
pub mod assemble;
pub mod clean;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod exec;
pub mod provider;
pub mod publish;
pub mod resolve;
pub mod resources;
pub mod toolchain;
