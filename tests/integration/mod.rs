//! Integration tests with mock HTTP server

pub mod diagnostics;
pub mod mock_server;
pub mod retry;
pub mod service;
