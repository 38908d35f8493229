pub mod image;
pub mod part;

pub use image::*;
pub use part::*;
