mod generate_feedback;
mod prepare_image;

pub use generate_feedback::*;
pub use prepare_image::*;
