use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::{GenericImageView, ImageFormat};
use lopdf::{Stream, dictionary};
use rirekisho_render_core::RenderError;
use std::io::Write;

/// An image ready to be written as a PDF XObject.
pub(crate) struct DecodedImage {
    pub width: u32,
    pub height: u32,
    color_space: &'static str,
    filter: &'static str,
    data: Vec<u8>,
}

impl DecodedImage {
    pub fn into_xobject(self) -> Stream {
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => self.width as i64,
            "Height" => self.height as i64,
            "ColorSpace" => self.color_space,
            "BitsPerComponent" => 8,
            "Filter" => self.filter,
        };
        Stream::new(dict, self.data)
    }
}

/// Decodes PNG, JPEG or GIF bytes.
///
/// Gray and YCbCr JPEG data is passed through untouched. Everything else,
/// CMYK JPEGs included, is flattened onto a white background and stored as
/// Flate-compressed RGB.
pub(crate) fn decode_image(data: &[u8]) -> Result<DecodedImage, RenderError> {
    let format = image::guess_format(data).map_err(|e| RenderError::Image(e.to_string()))?;
    let decoded = image::load_from_memory(data).map_err(|e| RenderError::Image(e.to_string()))?;
    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(RenderError::Image("image has no pixels".into()));
    }

    if format == ImageFormat::Jpeg {
        let color_space = match jpeg_components(data) {
            Some(1) => Some("DeviceGray"),
            Some(3) => Some("DeviceRGB"),
            other => {
                log::debug!("JPEG with {:?} components is re-encoded as RGB", other);
                None
            }
        };
        if let Some(color_space) = color_space {
            return Ok(DecodedImage {
                width,
                height,
                color_space,
                filter: "DCTDecode",
                data: data.to_vec(),
            });
        }
    }

    let rgba = decoded.to_rgba8();
    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[over_white(r, a), over_white(g, a), over_white(b, a)]);
    }

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&rgb)?;
    let compressed = encoder.finish()?;

    Ok(DecodedImage {
        width,
        height,
        color_space: "DeviceRGB",
        filter: "FlateDecode",
        data: compressed,
    })
}

/// Component count from the first start-of-frame segment of a JPEG stream.
fn jpeg_components(data: &[u8]) -> Option<u8> {
    let mut i = 2;
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            return None;
        }
        let marker = data[i + 1];
        match marker {
            0xFF => {
                i += 1;
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => {
                i += 2;
                continue;
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length = u16::from_be_bytes([*data.get(i + 2)?, *data.get(i + 3)?]) as usize;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            // length(2) precision(1) height(2) width(2) components(1)
            return data.get(i + 9).copied();
        }
        i += 2 + length;
    }
    None
}

fn over_white(channel: u8, alpha: u8) -> u8 {
    let a = alpha as u32;
    ((channel as u32 * a + 255 * (255 - a)) / 255) as u8
}
