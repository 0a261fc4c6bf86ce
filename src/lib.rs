pub mod chunks;
mod crc;
pub mod decoder;
pub mod icons;
mod image_data;
mod pixel;
mod png;
pub mod raster;
mod scanlines;

pub use icons::{generate_icons, ICON_SIZES};
pub use pixel::Pixel;
pub use png::{encode_rgba, PNG};
pub use raster::{render_icon, PixelBuffer};
