//! PDF assembly: catalog entries → a multi-page document via `lopdf`.
//!
//! Each entry gets one page with three text lines (product, size, site) and,
//! when an image was fetched, a picture in a fixed square box. Images are
//! re-encoded as baseline JPEG and embedded with `DCTDecode`, so any format the
//! fetcher can decode ends up in a form every PDF reader understands.

use crate::config::PageLayout;
use crate::error::CatalogError;
use crate::model::CatalogEntry;
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Cursor;
use tracing::debug;

/// Resource name of the regular text font.
const FONT_NAME: &[u8] = b"F1";
/// Resource name of the page's product image.
const IMAGE_NAME: &[u8] = b"Im0";

/// Attach fetched images to their entries, position by position.
///
/// # Errors
/// [`CatalogError::LengthMismatch`] when the two sequences differ in length;
/// pairing them anyway would put pictures on the wrong pages.
pub fn zip_images(
    entries: Vec<CatalogEntry>,
    images: Vec<Option<DynamicImage>>,
) -> Result<Vec<CatalogEntry>, CatalogError> {
    if entries.len() != images.len() {
        return Err(CatalogError::LengthMismatch {
            entries: entries.len(),
            images: images.len(),
        });
    }
    Ok(entries
        .into_iter()
        .zip(images)
        .map(|(mut entry, image)| {
            entry.image = image;
            entry
        })
        .collect())
}

/// Render every entry onto its own page and return the PDF bytes.
///
/// An empty slice yields a valid document with no pages.
pub fn render_catalog(
    entries: &[CatalogEntry],
    layout: &PageLayout,
) -> Result<Vec<u8>, CatalogError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let page_id = add_page(&mut doc, pages_id, font_id, entry, layout)
            .map_err(|e| CatalogError::Render(format!("page {}: {}", i + 1, e)))?;
        kids.push(page_id.into());
    }

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(layout.page_width),
        Object::Real(layout.page_height),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => entries.len() as i64,
            "MediaBox" => media_box,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .map_err(|e| CatalogError::Render(e.to_string()))?;

    debug!("Rendered {} pages → {} bytes", entries.len(), buf.len());
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    font_id: ObjectId,
    entry: &CatalogEntry,
    layout: &PageLayout,
) -> Result<ObjectId, String> {
    let row = &entry.row;
    let lines = [
        format!("Product List: {}", row.product_name),
        format!("Size: {}", row.size),
        format!("Site: {}", row.site),
    ];

    let mut operations = Vec::new();
    for (text, y) in lines.iter().zip(layout.text_lines_y) {
        operations.extend(text_line(text, layout.text_x, y, layout.font_size));
    }

    let image_id = match &entry.image {
        Some(img) => {
            let stream = jpeg_xobject(img).map_err(|e| format!("image encoding failed: {e}"))?;
            operations.extend(draw_image(layout));
            Some(doc.add_object(stream))
        }
        None => None,
    };

    let content = Content { operations }
        .encode()
        .map_err(|e| e.to_string())?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let mut resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };
    if let Some(id) = image_id {
        resources.set("XObject", dictionary! { "Im0" => id });
    }

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources,
    }))
}

fn text_line(text: &str, x: f32, y: f32, font_size: f32) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(FONT_NAME.to_vec()), Object::Real(font_size)],
        ),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
        Operation::new("ET", vec![]),
    ]
}

fn draw_image(layout: &PageLayout) -> Vec<Operation> {
    let (x, y) = layout.image_origin;
    let s = layout.image_size;
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(s),
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(s),
                Object::Real(x),
                Object::Real(y),
            ],
        ),
        Operation::new("Do", vec![Object::Name(IMAGE_NAME.to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// Encode as an RGB JPEG image XObject. Alpha is discarded.
fn jpeg_xobject(img: &DynamicImage) -> Result<Stream, image::ImageError> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)?;

    Ok(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8i64,
            "Filter" => "DCTDecode",
        },
        buf,
    ))
}

/// Map text to single-byte WinAnsiEncoding. Control characters and anything
/// the encoding cannot draw become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
        // 0x80..=0x9F hold typographic glyphs, not the C1 controls.
        '\u{20AC}' => 0x80,
        '\u{201A}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201E}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02C6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8A,
        '\u{2039}' => 0x8B,
        '\u{0152}' => 0x8C,
        '\u{017D}' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02DC}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9A,
        '\u{203A}' => 0x9B,
        '\u{0153}' => 0x9C,
        '\u{017E}' => 0x9E,
        '\u{0178}' => 0x9F,
        _ => b'?',
    }
}
