mod image_crate_manipulator;
mod local_file_reader;
mod reqwest_http_client;
mod retrying_http_client;
mod spinner_progress;

pub use image_crate_manipulator::*;
pub use local_file_reader::*;
pub use reqwest_http_client::*;
pub use retrying_http_client::*;
pub use spinner_progress::*;
