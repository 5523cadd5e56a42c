//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - HTTP (reqwest, plus the retry-on-timeout wrapper)
//! - Image processing (image crate)
//! - Local file access and terminal progress

pub mod adapter;

pub use adapter::*;
