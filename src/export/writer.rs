//! Document writer boundary
//!
//! A page-based document builder (PDF in practice). The pipeline creates one
//! writer per export, draws the bitmap once per page and saves it.

use async_trait::async_trait;

use crate::error::WriterError;
use crate::export::geometry::{PageGeometry, Rect};
use crate::export::raster::Bitmap;

// == Document Writer ==
#[async_trait]
pub trait DocumentWriter: Send {
    /// Starts a new page; the first page exists from creation.
    fn add_page(&mut self) -> Result<(), WriterError>;

    /// Draws `bitmap` at `placement` on the current page, showing only the
    /// part inside `clip`.
    fn add_image(
        &mut self,
        bitmap: &Bitmap,
        placement: Rect,
        clip: Rect,
    ) -> Result<(), WriterError>;

    /// Serializes the document and hands it to the user as `file_name`.
    async fn save(&mut self, file_name: &str) -> Result<(), WriterError>;
}

// == Document Backend ==
/// Creates writers for a page format.
pub trait DocumentBackend: Send + Sync {
    type Writer: DocumentWriter;

    fn create(&self, geometry: &PageGeometry) -> Result<Self::Writer, WriterError>;
}
