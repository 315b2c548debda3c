// src/engine/mod.rs

//! Orchestration engine.
//!
//! - [`runtime`] is the async shell that drives the round scheduler and
//!   hands each batch to an executor backend.
//! - [`orchestrator`] resolves a target to its task set, prepares the build
//!   directory and starts a runtime for it.

pub mod orchestrator;
pub mod runtime;

pub use orchestrator::Orchestrator;
pub use runtime::Runtime;
