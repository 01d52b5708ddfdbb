//! Core domain types and pure logic for the chatlift migration pipeline.
//!
//! This crate holds everything the orchestration and I/O crates agree on:
//! the domain model, the platform port traits, the shared error type, typed
//! configuration, the pure message transformer, and the registry row logic.
//! It performs no I/O itself.

pub mod config;
pub mod error;
pub mod model;
pub mod ports;
pub mod registry;
pub mod transform;

// Re-export the shared error type
pub use error::{ChatliftError, Result};
