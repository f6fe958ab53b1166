//! Core library for the job application board.
//!
//! The interesting parts live in [`board`]: authorization, the
//! one-application-per-offer constraint, status lifecycle, and bulk triage.
//! The remaining modules carry service plumbing shared with the API binary.

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;
