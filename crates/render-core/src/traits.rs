use crate::error::RenderError;
use crate::types::Stroke;
use rirekisho_types::geometry::{Point, Rect, Size};

/// The drawing surface the form is rendered onto.
///
/// Coordinates are in points with the origin at the top-left corner of the
/// current page. A canvas starts with its first page open; `add_page` closes
/// the current page and opens the next one.
pub trait PageCanvas {
    fn page_size(&self) -> Size;

    /// Number of pages opened so far.
    fn page_count(&self) -> usize;

    fn add_page(&mut self) -> Result<(), RenderError>;

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), RenderError>;

    fn draw_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<(), RenderError>;

    /// Strokes a closed outline through `points`.
    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke) -> Result<(), RenderError>;

    /// Places a single line of text whose box has its top-left corner at `origin`.
    fn place_text(&mut self, text: &str, origin: Point, font_size: f32) -> Result<(), RenderError>;

    /// Decodes `data` as an image and scales it into `rect`.
    ///
    /// Returns `RenderError::Image` when the bytes are not a supported image.
    fn embed_image(&mut self, data: &[u8], rect: Rect) -> Result<(), RenderError>;
}
