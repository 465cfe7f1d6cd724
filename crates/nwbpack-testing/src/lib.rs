//! Testing infrastructure for nwbpack integration tests.
//!
//! Provides a fluent builder for laying out a raw session store and an
//! artifact store inside a temporary directory, so catalog/driver/CLI
//! tests describe fixtures instead of hand-writing filesystem setup.

pub mod world;

pub use world::TestWorld;
