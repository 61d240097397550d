//! Rasterization boundary
//!
//! A rasterizer turns a live, rendered surface into a bitmap. The pipeline
//! never renders anything itself; it only fixes the options.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::RasterError;
use crate::export::layout::PixelSize;

/// Oversampling factor relative to on-screen pixels
pub const DEFAULT_SCALE: f64 = 2.0;

// == Color ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);

    /// CSS hex notation, e.g. `#ffffff`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

// == Raster Options ==
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Output pixels per on-screen pixel
    pub scale: f64,
    /// Opaque fill behind the surface so translucent chrome does not show through
    pub background: Rgb,
    /// Fetch cross-origin images permissively instead of tainting the canvas
    pub allow_cross_origin: bool,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            background: Rgb::WHITE,
            allow_cross_origin: true,
        }
    }
}

// == Bitmap ==
/// Rasterized surface: pixel size plus the encoded (PNG) image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub data: Bytes,
}

impl Bitmap {
    pub fn size(&self) -> PixelSize {
        PixelSize::new(self.width, self.height)
    }
}

// == Surface ==
/// A rendered region of the interface that can be exported.
pub trait Surface: Send + Sync {
    /// Whether the region is still mounted.
    fn is_attached(&self) -> bool;

    /// On-screen size in pixels.
    fn size(&self) -> PixelSize;
}

// == Rasterizer ==
#[async_trait]
pub trait Rasterizer: Send + Sync {
    type Surface: Surface;

    /// Renders `surface` to a bitmap using `options`.
    async fn rasterize(
        &self,
        surface: &Self::Surface,
        options: &RasterOptions,
    ) -> Result<Bitmap, RasterError>;
}
