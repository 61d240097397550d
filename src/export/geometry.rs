//! Page Geometry Module
//!
//! Page sizes, orientation and the printable area left inside the margins.
//! All lengths are in points (1/72 inch).

/// A4 width in points
pub const A4_WIDTH_PT: f64 = 595.28;

/// A4 height in points
pub const A4_HEIGHT_PT: f64 = 841.89;

/// Margin applied on every side of a page, in points
pub const DEFAULT_MARGIN_PT: f64 = 24.0;

// == Rect ==
/// Axis-aligned rectangle with a top-left origin, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

// == Page Geometry ==
/// Page format handed to the document writer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Width of the paper in portrait orientation
    pub paper_width: f64,
    /// Height of the paper in portrait orientation
    pub paper_height: f64,
    pub orientation: Orientation,
    pub margin: f64,
}

impl PageGeometry {
    /// A4 portrait with the default margin.
    pub fn a4() -> Self {
        Self {
            paper_width: A4_WIDTH_PT,
            paper_height: A4_HEIGHT_PT,
            orientation: Orientation::Portrait,
            margin: DEFAULT_MARGIN_PT,
        }
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn page_width(&self) -> f64 {
        match self.orientation {
            Orientation::Portrait => self.paper_width,
            Orientation::Landscape => self.paper_height,
        }
    }

    pub fn page_height(&self) -> f64 {
        match self.orientation {
            Orientation::Portrait => self.paper_height,
            Orientation::Landscape => self.paper_width,
        }
    }

    pub fn printable_width(&self) -> f64 {
        self.page_width() - 2.0 * self.margin
    }

    pub fn printable_height(&self) -> f64 {
        self.page_height() - 2.0 * self.margin
    }

    /// The region of a page content may be drawn into.
    pub fn printable_area(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            self.printable_width(),
            self.printable_height(),
        )
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_printable_area() {
        let geometry = PageGeometry::a4();
        let area = geometry.printable_area();

        assert_eq!(area.x, 24.0);
        assert_eq!(area.y, 24.0);
        assert!((area.width - 547.28).abs() < 1e-9);
        assert!((area.height - 793.89).abs() < 1e-9);
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        let geometry = PageGeometry::a4().with_orientation(Orientation::Landscape);

        assert_eq!(geometry.page_width(), A4_HEIGHT_PT);
        assert_eq!(geometry.page_height(), A4_WIDTH_PT);
    }
}
