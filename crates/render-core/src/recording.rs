//! A canvas that records drawing calls.
//!
//! Used to inspect what the form renderers draw without producing a PDF, and
//! to dump the drawing operations of a render for debugging.

use crate::error::RenderError;
use crate::traits::PageCanvas;
use crate::types::Stroke;
use rirekisho_types::geometry::{Point, Rect, Size};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Rect { rect: Rect, stroke: Stroke },
    Polygon { points: Vec<Point>, stroke: Stroke },
    Text {
        text: String,
        origin: Point,
        font_size: f32,
    },
    Image { rect: Rect, bytes: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecordingCanvas {
    page_size: Size,
    pages: Vec<Vec<DrawOp>>,
    /// When false, `embed_image` fails like a canvas that cannot decode images.
    #[serde(skip)]
    accept_images: bool,
}

impl RecordingCanvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: vec![Vec::new()],
            accept_images: true,
        }
    }

    /// Makes every `embed_image` call fail with `RenderError::Image`.
    pub fn rejecting_images(mut self) -> Self {
        self.accept_images = false;
        self
    }

    pub fn pages(&self) -> &[Vec<DrawOp>] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> &[DrawOp] {
        self.pages.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All text placed on a page, in drawing order.
    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.page(page)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Horizontal lines on a page whose Y lies within `[top, bottom]`.
    pub fn horizontal_lines(
        &self,
        page: usize,
        top: f32,
        bottom: f32,
    ) -> Vec<(Point, Point, Stroke)> {
        self.page(page)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line { from, to, stroke }
                    if (from.y - to.y).abs() < 0.01 && from.y >= top && from.y <= bottom =>
                {
                    Some((*from, *to, *stroke))
                }
                _ => None,
            })
            .collect()
    }

    pub fn images(&self, page: usize) -> Vec<Rect> {
        self.page(page)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { rect, .. } => Some(*rect),
                _ => None,
            })
            .collect()
    }

    fn current(&mut self) -> &mut Vec<DrawOp> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl PageCanvas for RecordingCanvas {
    fn page_size(&self) -> Size {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.pages.push(Vec::new());
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), RenderError> {
        self.current().push(DrawOp::Line { from, to, stroke });
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<(), RenderError> {
        self.current().push(DrawOp::Rect { rect, stroke });
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke) -> Result<(), RenderError> {
        self.current().push(DrawOp::Polygon {
            points: points.to_vec(),
            stroke,
        });
        Ok(())
    }

    fn place_text(&mut self, text: &str, origin: Point, font_size: f32) -> Result<(), RenderError> {
        self.current().push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font_size,
        });
        Ok(())
    }

    fn embed_image(&mut self, data: &[u8], rect: Rect) -> Result<(), RenderError> {
        if !self.accept_images || data.is_empty() {
            return Err(RenderError::Image("image rejected by recording canvas".into()));
        }
        self.current().push(DrawOp::Image {
            rect,
            bytes: data.len(),
        });
        Ok(())
    }
}
