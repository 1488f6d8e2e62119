//! Base types and error handling.
//!
//! - [`GuardError`](guarderror::GuardError): every failure the guard can report
//! - [`context`]: helpers that attach context to third-party errors

pub mod context;
pub mod guarderror;
