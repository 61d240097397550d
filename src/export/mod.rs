//! Export Module
//!
//! Turns a rendered region into a downloadable, paginated document.
//!
//! # Pieces
//! - `layout`: pure pagination math, testable without a renderer
//! - `raster` / `writer`: injected rendering and document-building boundaries
//! - `exporter`: the pipeline and its idle/exporting state
//! - `notice`: self-clearing success/error banners

mod exporter;
mod geometry;
mod layout;
mod notice;
mod raster;
mod target;
mod writer;

pub use exporter::{ExportReport, Exporter, SUCCESS_MESSAGE};
pub use geometry::{
    Orientation, PageGeometry, Rect, A4_HEIGHT_PT, A4_WIDTH_PT, DEFAULT_MARGIN_PT,
};
pub use layout::{page_count, paginate, DocumentLayout, PagePlacement, PixelSize, Slice};
pub use notice::{Notice, NoticeKind, Notifier, NOTICE_TTL};
pub use raster::{Bitmap, RasterOptions, Rasterizer, Rgb, Surface, DEFAULT_SCALE};
pub use target::{DocumentKind, ExportOptions, ExportTarget};
pub use writer::{DocumentBackend, DocumentWriter};
