//! Pure domain services.

mod mime_resolver;

pub use mime_resolver::*;
