mod chat;
mod client_config;
mod compression;
mod file_reference;

pub use chat::*;
pub use client_config::*;
pub use compression::*;
pub use file_reference::*;
