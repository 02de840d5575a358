pub mod codec;
pub mod handler;
mod ocif;
mod renderer;
mod service;
mod sharpen;
pub mod raster;
pub mod types;

pub use handler::create_picture_router;
pub use raster::{Pixel, PixelImage, Rgb};
pub use types::RenderRequest;
