pub mod codec;
pub mod config;
pub mod display;
pub mod error;
pub mod helpers;
pub mod imops;
pub mod menu;
pub mod pipeline;
pub mod pixels;
pub mod validation;

pub use error::ImageError;
pub use pixels::PixelBuffer;
