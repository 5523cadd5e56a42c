//! # Domain Layer
//!
//! Core models, the shared error type and pure services.
//! This layer is independent of HTTP, image codecs and the file system.

mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
