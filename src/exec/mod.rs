// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`thunk`] wraps a task into the zero-argument execution handle stored
//!   in every graph entry (validation, logging, timing, error wrapping).
//! - [`backend`] provides the `ExecutorBackend` trait and the production
//!   `TokioExecutor` that runs a batch of thunks concurrently.

pub mod backend;
pub mod thunk;

pub use backend::{ExecutorBackend, TokioExecutor};
pub use thunk::TaskThunk;
