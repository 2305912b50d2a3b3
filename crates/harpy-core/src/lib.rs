#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared presentation primitives for Harpy tooling.
//!
//! Used by both the bytecode reporter and the CLI, so colour and byte
//! rendering stay consistent across text output and diagnostics.

pub mod colors;
pub mod utils;

#[cfg(test)]
mod utils_tests;

pub use colors::Colors;
