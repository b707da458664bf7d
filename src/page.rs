//! Per-image page construction.
//!
//! Geometry is computed up front as plain numbers in PDF points, then handed
//! to `printpdf`'s data-oriented API: the decoded raster becomes an XObject
//! and a single `Op::UseXobject` places it on the page. At 72 dpi one image
//! pixel maps to exactly one point, so the placement rectangle doubles as
//! the transform's scale factor.

use std::path::Path;

use printpdf::{Mm, Op, PdfDocument, PdfPage, Pt, RawImage, RawImageData, RawImageFormat, XObjectTransform};
use thiserror::Error;

/// A4 portrait, the fixed page size used when images are fit to the page.
pub const A4_WIDTH_PT: f32 = 595.0;
pub const A4_HEIGHT_PT: f32 = 842.0;

/// Region of a page where the raster image is drawn, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Page dimensions plus the image placement rectangle, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub image: Placement,
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Computes page dimensions and the image placement for one image.
///
/// Keep-original-size puts the image at the page origin with the page sized
/// to its pixel dimensions. Otherwise the page is A4 and the image is
/// uniformly scaled to fit, centered both ways.
pub fn plan_page(image_width: u32, image_height: u32, keep_original_size: bool) -> PageGeometry {
    let (image_width, image_height) = (image_width as f32, image_height as f32);

    if keep_original_size {
        return PageGeometry {
            page_width: image_width,
            page_height: image_height,
            image: Placement {
                x: 0.0,
                y: 0.0,
                width: image_width,
                height: image_height,
            },
        };
    }

    let scale = (A4_WIDTH_PT / image_width).min(A4_HEIGHT_PT / image_height);
    let scaled_width = image_width * scale;
    let scaled_height = image_height * scale;

    PageGeometry {
        page_width: A4_WIDTH_PT,
        page_height: A4_HEIGHT_PT,
        image: Placement {
            x: (A4_WIDTH_PT - scaled_width) / 2.0,
            y: (A4_HEIGHT_PT - scaled_height) / 2.0,
            width: scaled_width,
            height: scaled_height,
        },
    }
}

/// Decodes one image file and builds its page.
///
/// The raster is registered with the document as an XObject; the returned
/// page only references it. The decoded pixels are dropped before this
/// function returns.
pub fn render_page(
    doc: &mut PdfDocument,
    path: &Path,
    keep_original_size: bool,
) -> Result<PdfPage, PageError> {
    let decoded = image::open(path)?;
    let (width, height) = (decoded.width(), decoded.height());
    let geometry = plan_page(width, height, keep_original_size);

    let rgb = decoded.to_rgb8();
    let raster = RawImage {
        pixels: RawImageData::U8(rgb.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    };
    let image_id = doc.add_image(&raster);

    let ops = vec![Op::UseXobject {
        id: image_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(geometry.image.x)),
            translate_y: Some(Pt(geometry.image.y)),
            scale_x: Some(geometry.image.width / width as f32),
            scale_y: Some(geometry.image.height / height as f32),
            // 72 dpi makes the image's native size one point per pixel.
            dpi: Some(72.0),
            rotate: None,
        },
    }];

    Ok(PdfPage::new(
        mm_from_pt(geometry.page_width),
        mm_from_pt(geometry.page_height),
        ops,
    ))
}

fn mm_from_pt(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}
