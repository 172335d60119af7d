//! ML backend client.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
mod endpoint;
pub mod error_classification;
mod execution;

pub use builder::MlClientBuilder;
pub use core::MlClient;
pub use error_classification::{Classification, ClassifiedError, ErrorClassifier, ErrorKind};
