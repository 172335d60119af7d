//! Typed operations for the backend's machine-learning models.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | [`MlService::optimize_routes`] | `POST {prefix}/route-optimizer/{game}` |
//! | [`MlService::predict_performance`] | `POST {prefix}/performance-predictor/{game}` |
//! | [`MlService::detect_games`] | `GET {prefix}/game-detection` |
//! | [`MlService::optimize_game`] | `POST {prefix}/optimize-game/{game}` |
//! | [`MlService::system_info`] | `GET {prefix}/system-info` |

pub mod client;
pub mod types;

pub use client::MlService;
pub use types::*;
