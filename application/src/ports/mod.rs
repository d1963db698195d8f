//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod conversation_logger;
pub mod decision_backend;
pub mod participant;
pub mod speaker_operator;
pub mod termination;
