//! Supadrift library
//!
//! This exposes the internal modules for testing

pub mod commands;
pub mod diff;
pub mod report;
pub mod snapshot;
pub mod utils;
