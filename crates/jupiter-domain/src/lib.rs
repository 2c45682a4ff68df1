//! Domain types shared across all Jupiter crates.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod id;
