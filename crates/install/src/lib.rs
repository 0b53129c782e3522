#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! On-disk installation state for the arcade launcher
//!
//! Each title is installed into its own directory under the apps root. A
//! marker file inside that directory records the installed version and is
//! only ever written after extraction completed, so its presence means the
//! directory holds a runnable installation.

mod extract;
mod version_store;

pub use extract::{ArchiveExtractor, EntryFilter, ExtractProgressFn, ZipExtractor};
pub use version_store::VersionStore;
