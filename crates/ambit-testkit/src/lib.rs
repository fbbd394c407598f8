//! Test-support handlers for ambit-effects
//!
//! Mirrors the handler-substitution idea the effect system is built around:
//! tests wrap unmodified computations in recording, constant, or
//! deliberately unhelpful handlers and assert on what was performed.
//!
//! - [`RecordingHandler`] wraps any handler spec and captures every
//!   performed effect for later assertions.
//! - [`static_handlers`] builds a registry of constant-valued effects.
//! - [`ignoring_handler`] never resumes, forcing the unhandled path.
//! - [`failing_handler`] fails every effect with a fixed error.
//! - [`init_tracing`] wires `RUST_LOG`-filtered tracing output into tests.

#![forbid(unsafe_code)]

mod handlers;
mod logging;
mod recording;

pub use handlers::{failing_handler, ignoring_handler, static_handlers};
pub use logging::init_tracing;
pub use recording::{RecordedEffect, RecordingHandler};
