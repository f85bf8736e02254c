//! The single font used on the form.
//!
//! A non-embedded Adobe-Japan1 CID font. Viewers substitute an installed
//! Japanese gothic, which keeps the output small and needs no font file.

use lopdf::{Dictionary, Object, StringFormat, dictionary};

/// Resource name the content streams refer to.
pub const FONT_RESOURCE: &str = "F1";
pub const FONT_NAME: &str = "HeiseiKakuGo-W5";
const ENCODING: &str = "UniJIS-UCS2-HW-H";

/// Printed in place of characters the UCS-2 encoding cannot address.
const REPLACEMENT: u16 = 0x3013; // 〓

pub(crate) fn type0_font() -> Dictionary {
    let descriptor = dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => FONT_NAME,
        "Flags" => 4,
        "FontBBox" => vec![(-92).into(), (-250).into(), 1010.into(), 922.into()],
        "ItalicAngle" => 0,
        "Ascent" => 752,
        "Descent" => -221,
        "CapHeight" => 737,
        "StemV" => 114,
    };

    // CIDs 1-95 are the half-width ASCII glyphs, 327-389 half-width katakana.
    let widths: Vec<Object> = vec![
        1.into(),
        95.into(),
        500.into(),
        327.into(),
        389.into(),
        500.into(),
    ];

    let descendant = dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType0",
        "BaseFont" => FONT_NAME,
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Japan1"),
            "Supplement" => 2,
        },
        "FontDescriptor" => descriptor,
        "DW" => 1000,
        "W" => widths,
    };

    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => format!("{}-{}", FONT_NAME, ENCODING),
        "Encoding" => ENCODING,
        "DescendantFonts" => vec![Object::Dictionary(descendant)],
    }
}

/// Encodes text as the UTF-16BE hex string the CMap expects.
pub(crate) fn encode_text(text: &str) -> Object {
    let mut bytes = Vec::with_capacity(text.len() * 2);
    for c in text.chars() {
        let unit = match u16::try_from(u32::from(c)) {
            Ok(unit) => unit,
            Err(_) => {
                log::debug!("Character {:?} is outside the BMP and is replaced", c);
                REPLACEMENT
            }
        };
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
