use crate::font::{self, FONT_RESOURCE};
use crate::image::decode_image;
use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use rirekisho_render_core::utils::{baseline_y, flip_y};
use rirekisho_render_core::{PageCanvas, RenderError, Stroke};
use rirekisho_types::geometry::{Point, Rect, Size};
use std::io::Write;

/// An in-memory PDF drawing surface.
///
/// Builds the document's object graph page by page and writes it out in
/// [`LopdfCanvas::finish_into`]. All pages share one resources dictionary
/// holding the font and every embedded image.
pub struct LopdfCanvas {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    xobjects: Dictionary,
    page_size: Size,
    page: PageContext,
}

#[derive(Default)]
struct PageContext {
    operations: Vec<Operation>,
    stroke: Option<Stroke>,
    font_size: Option<f32>,
}

impl PageContext {
    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        if self.stroke == Some(stroke) {
            return;
        }
        self.push("w", vec![stroke.width().into()]);
        let (dashes, phase) = stroke.style.dash_pattern();
        let dashes: Vec<Object> = dashes.iter().map(|d| (*d).into()).collect();
        self.push("d", vec![Object::Array(dashes), phase.into()]);
        self.stroke = Some(stroke);
    }
}

impl LopdfCanvas {
    pub fn new(page_size: Size) -> Result<Self, RenderError> {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        let font_id = document.add_object(font::type0_font());

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![],
            "Count" => 0,
        };
        document
            .objects
            .insert(pages_id, Object::Dictionary(pages_dict));

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let info_id = document.add_object(dictionary! {
            "Title" => Object::String(utf16_text("履歴書"), lopdf::StringFormat::Hexadecimal),
            "Producer" => Object::string_literal("rirekisho"),
        });
        document.trailer.set("Info", info_id);

        Ok(Self {
            document,
            pages_id,
            resources_id,
            font_id,
            page_ids: Vec::new(),
            xobjects: Dictionary::new(),
            page_size,
            page: PageContext::default(),
        })
    }

    fn pdf_y(&self, y: f32) -> f32 {
        flip_y(y, self.page_size.height)
    }

    /// Compresses the current page's operations and adds the page object.
    fn close_page(&mut self) -> Result<(), RenderError> {
        let page = std::mem::take(&mut self.page);
        let content = Content {
            operations: page.operations,
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content.encode()?)?;
        let compressed = encoder.finish()?;
        let content = Stream::new(dictionary! { "Filter" => "FlateDecode" }, compressed);
        let content_id = self.document.add_object(content);

        let Size { width, height } = self.page_size;
        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Closes the last page and writes the finished document to `writer`.
    pub fn finish_into<W: Write>(mut self, writer: &mut W) -> Result<(), RenderError> {
        self.close_page()?;
        let image_count = self.xobjects.len();

        let resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => self.font_id },
            "XObject" => Object::Dictionary(std::mem::take(&mut self.xobjects)),
        };
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let pages = self.document.objects.get_mut(&self.pages_id);
        if let Some(Object::Dictionary(pages_dict)) = pages {
            let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
            pages_dict.set("Kids", kids);
            pages_dict.set("Count", self.page_ids.len() as i64);
        }

        log::debug!(
            "Writing PDF with {} page(s) and {} image(s)",
            self.page_ids.len(),
            image_count
        );
        self.document.save_to(writer)?;
        Ok(())
    }

    /// Closes the last page and returns the encoded document.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut out = Vec::new();
        self.finish_into(&mut out)?;
        Ok(out)
    }
}

impl PageCanvas for LopdfCanvas {
    fn page_size(&self) -> Size {
        self.page_size
    }

    fn page_count(&self) -> usize {
        self.page_ids.len() + 1
    }

    fn add_page(&mut self) -> Result<(), RenderError> {
        self.close_page()
    }

    fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) -> Result<(), RenderError> {
        let (y1, y2) = (self.pdf_y(from.y), self.pdf_y(to.y));
        self.page.set_stroke(stroke);
        self.page.push("m", vec![from.x.into(), y1.into()]);
        self.page.push("l", vec![to.x.into(), y2.into()]);
        self.page.push("S", vec![]);
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, stroke: Stroke) -> Result<(), RenderError> {
        let y = self.pdf_y(rect.bottom());
        self.page.set_stroke(stroke);
        let operands = vec![
            rect.x.into(),
            y.into(),
            rect.width.into(),
            rect.height.into(),
        ];
        self.page.push("re", operands);
        self.page.push("S", vec![]);
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Point], stroke: Stroke) -> Result<(), RenderError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        let ys: Vec<f32> = points.iter().map(|p| self.pdf_y(p.y)).collect();
        self.page.set_stroke(stroke);
        self.page.push("m", vec![first.x.into(), ys[0].into()]);
        for (point, y) in rest.iter().zip(&ys[1..]) {
            self.page.push("l", vec![point.x.into(), (*y).into()]);
        }
        self.page.push("h", vec![]);
        self.page.push("S", vec![]);
        Ok(())
    }

    fn place_text(&mut self, text: &str, origin: Point, font_size: f32) -> Result<(), RenderError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let y = self.pdf_y(baseline_y(origin.y, font_size));
        self.page.push("BT", vec![]);
        if self.page.font_size != Some(font_size) {
            // Tf is text state and persists across BT/ET.
            let font = Object::Name(FONT_RESOURCE.as_bytes().to_vec());
            self.page.push("Tf", vec![font, font_size.into()]);
            self.page.font_size = Some(font_size);
        }
        self.page.push("Td", vec![origin.x.into(), y.into()]);
        self.page.push("Tj", vec![font::encode_text(text)]);
        self.page.push("ET", vec![]);
        Ok(())
    }

    fn embed_image(&mut self, data: &[u8], rect: Rect) -> Result<(), RenderError> {
        let decoded = decode_image(data)?;
        log::debug!(
            "Embedding {}x{} image into {:.1}x{:.1}pt box",
            decoded.width,
            decoded.height,
            rect.width,
            rect.height
        );

        let name = format!("Im{}", self.xobjects.len() + 1);
        let image_id = self.document.add_object(decoded.into_xobject());
        self.xobjects.set(name.as_bytes(), image_id);

        let y = self.pdf_y(rect.bottom());
        self.page.push("q", vec![]);
        self.page.push(
            "cm",
            vec![
                rect.width.into(),
                0.into(),
                0.into(),
                rect.height.into(),
                rect.x.into(),
                y.into(),
            ],
        );
        self.page.push("Do", vec![Object::Name(name.into_bytes())]);
        self.page.push("Q", vec![]);
        Ok(())
    }
}

fn utf16_text(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}
