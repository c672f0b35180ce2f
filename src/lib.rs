//! wpbundle library exports for testing.
//!
//! The binary in `main.rs` is a thin CLI over these modules.

pub mod archive;
pub mod clean;
pub mod config;
pub mod package;
pub mod patch;
pub mod plugin;
pub mod preflight;
pub mod process;
pub mod stage;
pub mod timing;
pub mod version;
