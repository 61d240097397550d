//! Exporter
//!
//! Runs the export pipeline: precondition check, rasterize, paginate, write,
//! save. Shared by every page that offers "download as PDF".
//!
//! # State
//! idle -> exporting -> idle. A second call while exporting is rejected with
//! `ExportError::Busy`; the flag is released on every exit path.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, error, info};

use crate::error::{ExportError, ExportResult};
use crate::export::geometry::PageGeometry;
use crate::export::layout::paginate;
use crate::export::notice::{Notice, Notifier};
use crate::export::raster::{RasterOptions, Rasterizer, Surface};
use crate::export::target::{ExportOptions, ExportTarget};
use crate::export::writer::{DocumentBackend, DocumentWriter};

/// Notice shown after a successful export
pub const SUCCESS_MESSAGE: &str = "PDF exported successfully!";

// == Export Report ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub file_name: String,
    pub pages: usize,
}

/// Holds the exporting flag for the duration of one export.
struct ExportingGuard<'a>(&'a AtomicBool);

impl<'a> ExportingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for ExportingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// == Exporter ==
pub struct Exporter<R, D> {
    rasterizer: R,
    documents: D,
    geometry: PageGeometry,
    raster_options: RasterOptions,
    notifier: Notifier,
    exporting: AtomicBool,
}

impl<R: Rasterizer, D: DocumentBackend> Exporter<R, D> {
    /// Creates an exporter producing A4 portrait documents at 2x.
    pub fn new(rasterizer: R, documents: D) -> Self {
        Self {
            rasterizer,
            documents,
            geometry: PageGeometry::a4(),
            raster_options: RasterOptions::default(),
            notifier: Notifier::default(),
            exporting: AtomicBool::new(false),
        }
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_raster_options(mut self, options: RasterOptions) -> Self {
        self.raster_options = options;
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// True while an export runs; the triggering control should be disabled.
    pub fn is_exporting(&self) -> bool {
        self.exporting.load(Ordering::Acquire)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // == Export Region ==
    /// Exports the region behind `target` as a paginated document.
    ///
    /// Success and failure are both reported through the notifier as well
    /// as the return value. Calling again after a failure retries from
    /// scratch.
    pub async fn export_region(
        &self,
        target: &ExportTarget<R::Surface>,
        options: &ExportOptions,
    ) -> ExportResult<ExportReport> {
        let Some(_guard) = ExportingGuard::acquire(&self.exporting) else {
            debug!("Export rejected: another export is in progress");
            return Err(ExportError::Busy);
        };

        let file_name = options
            .file_name
            .clone()
            .unwrap_or_else(|| target.default_file_name());

        match self.run(target, &file_name).await {
            Ok(pages) => {
                info!("Exported {} ({} pages)", file_name, pages);
                self.notifier.post(Notice::success(SUCCESS_MESSAGE));
                Ok(ExportReport { file_name, pages })
            }
            Err(e) => {
                error!("Export of {} failed: {}", file_name, e);
                self.notifier.post(Notice::error(e.user_message()));
                Err(e)
            }
        }
    }

    async fn run(&self, target: &ExportTarget<R::Surface>, file_name: &str) -> ExportResult<usize> {
        let surface = target
            .surface()
            .ok_or_else(|| ExportError::TargetUnavailable("region is not mounted".to_string()))?;
        if !surface.is_attached() {
            return Err(ExportError::TargetUnavailable(
                "region is detached".to_string(),
            ));
        }
        let size = surface.size();
        if size.is_empty() {
            return Err(ExportError::TargetUnavailable(format!(
                "region has no area ({}x{})",
                size.width, size.height
            )));
        }

        let bitmap = self
            .rasterizer
            .rasterize(surface, &self.raster_options)
            .await?;
        debug!(
            "Rasterized {}x{} region to {}x{} bitmap",
            size.width, size.height, bitmap.width, bitmap.height
        );

        let layout = paginate(bitmap.size(), &self.geometry)?;

        let mut writer = self.documents.create(&self.geometry)?;
        for page in &layout.pages {
            if page.index > 0 {
                writer.add_page()?;
            }
            writer.add_image(&bitmap, page.image, page.clip)?;
        }
        writer.save(file_name).await?;

        Ok(layout.page_count())
    }
}
