//! Pagination Layout Module
//!
//! Pure placement math: scales a bitmap to the printable width and cuts it
//! into page-sized vertical slices. Page `i` shows the slice starting at
//! `i * printable_height`; the whole image is drawn shifted up by that
//! amount and clipped to the printable area.

use crate::error::{ExportError, ExportResult};
use crate::export::geometry::{PageGeometry, Rect};

/// Tolerance for float noise when comparing scaled heights, in points
const EPSILON: f64 = 1e-6;

// == Pixel Size ==
/// Size of a surface or bitmap in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// == Slice ==
/// Vertical band of the scaled image, measured from the image top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub top: f64,
    pub height: f64,
}

impl Slice {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

// == Page Placement ==
/// Where the image goes on one page and what part of it is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    /// Zero-based page number
    pub index: usize,
    /// Full scaled image position on this page
    pub image: Rect,
    /// Clip rectangle (the printable area)
    pub clip: Rect,
    /// Part of the image visible through the clip
    pub slice: Slice,
}

// == Document Layout ==
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    /// Scaled image width (the printable width)
    pub image_width: f64,
    /// Scaled image height
    pub image_height: f64,
    pub pages: Vec<PagePlacement>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Number of printable-height pages needed for `image_height`.
pub fn page_count(image_height: f64, printable_height: f64) -> usize {
    if image_height <= printable_height + EPSILON {
        return 1;
    }
    ((image_height - EPSILON) / printable_height).ceil() as usize
}

// == Paginate ==
/// Lays out a bitmap of `bitmap` pixels across pages of `geometry`.
///
/// The image keeps its aspect ratio at the printable width. A zero-sized
/// bitmap is a rasterization failure.
pub fn paginate(bitmap: PixelSize, geometry: &PageGeometry) -> ExportResult<DocumentLayout> {
    if bitmap.is_empty() {
        return Err(ExportError::RasterizationFailed(format!(
            "empty bitmap ({}x{})",
            bitmap.width, bitmap.height
        )));
    }

    let clip = geometry.printable_area();
    if clip.width <= 0.0 || clip.height <= 0.0 {
        return Err(ExportError::WriterFailed(
            "page margins leave no printable area".to_string(),
        ));
    }

    let image_width = clip.width;
    let image_height = f64::from(bitmap.height) * image_width / f64::from(bitmap.width);
    let count = page_count(image_height, clip.height);

    let pages = (0..count)
        .map(|index| {
            let top = index as f64 * clip.height;
            PagePlacement {
                index,
                image: Rect::new(clip.x, clip.y - top, image_width, image_height),
                clip,
                slice: Slice {
                    top,
                    height: (image_height - top).min(clip.height),
                },
            }
        })
        .collect();

    Ok(DocumentLayout {
        image_width,
        image_height,
        pages,
    })
}
