#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Remote title catalog for the arcade launcher
//!
//! The catalog is a JSON array of titles fetched from a single endpoint.
//! [`CatalogStore`] keeps the latest parsed snapshot and refreshes it on
//! demand or on a timer; readers always get an immutable `Arc` snapshot.

mod models;
mod source;
mod store;

pub use models::{parse_catalog, Titles};
pub use source::{CatalogSource, HttpCatalogSource};
pub use store::{CatalogStore, FailurePolicy};
