//! Shared test fixtures for sportsched crates.
//!
//! This crate provides instance data and pure functions for testing.
//! It depends on `sportsched-core` only, so every other crate can use it as
//! a dev-dependency.
//!
//! - [`catalogs`] - small hand-written and seeded random catalogs
//! - [`schedules`] - valid double round-robin schedules as rows
//! - [`instances`] - ITC2021 XML instance text
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! sportsched-test = { workspace = true }
//! ```
//!
//! ```ignore
//! use sportsched_test::{mixed_catalog, double_round_robin};
//! ```

pub mod catalogs;
pub mod instances;
pub mod schedules;

pub use catalogs::{empty_catalog, mixed_catalog, random_catalog};
pub use instances::SAMPLE_INSTANCE;
pub use schedules::{double_round_robin, rows_to_text};
