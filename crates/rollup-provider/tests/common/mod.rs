//! Shared helpers for rollup-provider integration tests.

pub mod scripted;
