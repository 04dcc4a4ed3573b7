//! Receipt intake and loyalty-points scoring.
//!
//! The [`intake`] module holds the concurrent submission pipeline; [`config`],
//! [`telemetry`] and [`error`] carry the process-level plumbing shared with the
//! HTTP service binary.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
