#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform layer for starting installed titles
//!
//! An install directory holds one launchable entry identified by a
//! platform-specific extension (`.bat`, `.app`, `.sh`). This crate finds that
//! entry, builds the native invocation for it and supervises the resulting
//! process.

pub mod launcher;
pub mod process;

pub use launcher::{find_executable, LaunchedProcess, NativeLauncher, NativeProcess, ProcessLauncher};
pub use process::PlatformCommand;
