//! Application layer module
//!
//! This module contains the harvest pipeline and the use case that
//! wires it to a document source and an archive store.

pub mod harvest_service;
pub mod harvest_use_case;

pub use harvest_service::{HarvestOutcome, HarvestService};
pub use harvest_use_case::{HarvestRun, HarvestUseCase, log_run_summary};
