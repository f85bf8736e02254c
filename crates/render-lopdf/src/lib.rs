//! lopdf implementation of the `PageCanvas` drawing surface.

mod canvas;
mod font;
mod image;

pub use canvas::LopdfCanvas;
pub use font::{FONT_NAME, FONT_RESOURCE};
