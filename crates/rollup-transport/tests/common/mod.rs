//! Shared helpers for rollup-transport integration tests.

pub mod mock_http;
pub mod mock_rpc;
