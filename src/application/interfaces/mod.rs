mod file_reader;
mod http_client;
mod image_manipulator;
mod progress_sink;

pub use file_reader::*;
pub use http_client::*;
pub use image_manipulator::*;
pub use progress_sink::*;
