//! Shared test utilities for stationline integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated tests against a file-backed database
//! - Builder patterns for orders and production-line configs

pub mod builders;
pub mod harness;

#[allow(unused_imports)]
pub use builders::*;
#[allow(unused_imports)]
pub use harness::TestHarness;
