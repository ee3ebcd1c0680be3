//! 4D results harvester
//!
//! Extracts per-operator lottery draw results from a results page into one
//! canonical JSON schema and keeps a dated archive of them.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
