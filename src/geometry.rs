//! # Geometry and Coordinate Translation
//!
//! The legacy API speaks in user units measured top-down from the corner of
//! the paper. Canvas backends speak in points measured bottom-up. Everything
//! that converts between the two worlds lives here, as pure functions of the
//! page dimensions and the configured unit. The transforms never touch
//! cursor state.
//!
//! Two sign conventions are part of the legacy contract:
//! - a negative X is an offset from the *right* edge (`page_width + x`),
//! - a negative Y addresses a point N units above the *bottom* edge, which
//!   is how footers are placed before the page height is interesting.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FolioError;

/// Points per inch. Every other unit scales through this.
pub const PT_PER_IN: f64 = 72.0;
/// Points per millimeter.
pub const PT_PER_MM: f64 = 72.0 / 25.4;
/// Points per centimeter.
pub const PT_PER_CM: f64 = 72.0 / 2.54;

/// The measurement unit of the user-facing API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    /// PostScript points; the identity transform.
    Pt,
    #[default]
    Mm,
    Cm,
    In,
}

impl Unit {
    /// Scale a user-unit length to points.
    pub fn to_pt(self, v: f64) -> f64 {
        match self {
            Unit::Pt => v,
            Unit::Mm => v * PT_PER_MM,
            Unit::Cm => v * PT_PER_CM,
            Unit::In => v * PT_PER_IN,
        }
    }

    /// Scale a length in points back to user units.
    pub fn from_pt(self, v: f64) -> f64 {
        match self {
            Unit::Pt => v,
            Unit::Mm => v / PT_PER_MM,
            Unit::Cm => v / PT_PER_CM,
            Unit::In => v / PT_PER_IN,
        }
    }
}

impl FromStr for Unit {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, FolioError> {
        match s {
            "pt" => Ok(Unit::Pt),
            "mm" => Ok(Unit::Mm),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            other => Err(FolioError::UnsupportedUnit(other.to_string())),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// An axis-aligned rectangle in native (bottom-up) canvas space.
///
/// `top` is the larger Y coordinate; `height` extends downward from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top - self.height
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = FolioError;

    /// Accepts the legacy single-letter codes ("P"/"L") as well as the full
    /// words, case-insensitively.
    fn from_str(s: &str) -> Result<Self, FolioError> {
        match s.to_ascii_uppercase().as_str() {
            "P" | "PORTRAIT" => Ok(Orientation::Portrait),
            "L" | "LANDSCAPE" => Ok(Orientation::Landscape),
            other => Err(FolioError::InvalidOrientation(other.to_string())),
        }
    }
}

/// Standard page sizes in points (portrait orientation).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points for portrait orientation.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    /// Returns (width, height) in points with orientation applied.
    pub fn oriented(&self, orientation: Orientation) -> (f64, f64) {
        let (w, h) = self.dimensions();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

impl FromStr for PageSize {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, FolioError> {
        match s.to_ascii_uppercase().as_str() {
            "A4" => Ok(PageSize::A4),
            "A3" => Ok(PageSize::A3),
            "A5" => Ok(PageSize::A5),
            "LETTER" => Ok(PageSize::Letter),
            "LEGAL" => Ok(PageSize::Legal),
            "TABLOID" => Ok(PageSize::Tabloid),
            other => Err(FolioError::InvalidFormat(other.to_string())),
        }
    }
}

/// The coordinate transformer: converts between the legacy unit/origin system
/// and the canvas's native point/origin system.
///
/// A `PageSpace` is a pure value of `(page_width, page_height, unit)` at call
/// time. Width/height conversions scale only; X and Y conversions also apply
/// the legacy origin rules described in the module docs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpace {
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
}

impl PageSpace {
    pub fn new(width: f64, height: f64, unit: Unit) -> Self {
        Self {
            width,
            height,
            unit,
        }
    }

    /// User X to native X. Negative input measures from the right edge.
    pub fn native_x(&self, x: f64) -> f64 {
        let x = self.unit.to_pt(x);
        if x >= 0.0 {
            x
        } else {
            self.width + x
        }
    }

    /// User Y (top-down) to native Y (bottom-up). Negative input addresses a
    /// point above the bottom edge directly.
    pub fn native_y(&self, y: f64) -> f64 {
        let y = self.unit.to_pt(y);
        if y >= 0.0 {
            self.height - y
        } else {
            -y
        }
    }

    /// Scale a user-unit length to points. No origin flip.
    pub fn length(&self, v: f64) -> f64 {
        self.unit.to_pt(v)
    }

    /// Scale a point length back to user units.
    pub fn user_length(&self, v: f64) -> f64 {
        self.unit.from_pt(v)
    }

    /// Native X back to user X.
    pub fn user_x(&self, x: f64) -> f64 {
        self.unit.from_pt(x)
    }

    /// Native Y (bottom-up) back to user Y (top-down).
    pub fn user_y(&self, y: f64) -> f64 {
        self.unit.from_pt(self.height - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn unit_scaling() {
        assert!((Unit::Pt.to_pt(10.0) - 10.0).abs() < EPS);
        assert!((Unit::Mm.to_pt(25.4) - 72.0).abs() < EPS);
        assert!((Unit::Cm.to_pt(2.54) - 72.0).abs() < EPS);
        assert!((Unit::In.to_pt(1.0) - 72.0).abs() < EPS);
    }

    #[test]
    fn unit_parse_rejects_unknown() {
        assert!("furlong".parse::<Unit>().is_err());
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Mm);
    }

    #[test]
    fn coordinate_round_trip() {
        let space = PageSpace::new(595.28, 841.89, Unit::Mm);
        for x in [0.0, 10.0, 57.3, 200.0] {
            let back = space.user_x(space.native_x(x));
            assert!((back - x).abs() < 1e-9, "round trip failed for {x}");
        }
        for y in [0.0, 10.0, 57.3, 200.0] {
            let back = space.user_y(space.native_y(y));
            assert!((back - y).abs() < 1e-9, "round trip failed for {y}");
        }
    }

    #[test]
    fn negative_x_measures_from_right_edge() {
        let space = PageSpace::new(595.28, 841.89, Unit::Mm);
        let expected = 595.28 + Unit::Mm.to_pt(-20.0);
        assert!((space.native_x(-20.0) - expected).abs() < EPS);
    }

    #[test]
    fn negative_y_measures_from_bottom_edge() {
        let space = PageSpace::new(595.28, 841.89, Unit::Mm);
        // -15mm means "15mm above the bottom", i.e. a plain bottom-up offset.
        assert!((space.native_y(-15.0) - Unit::Mm.to_pt(15.0)).abs() < EPS);
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let (w, h) = PageSize::A4.oriented(Orientation::Landscape);
        assert!(w > h);
        assert!((w - 841.89).abs() < EPS);
    }

    #[test]
    fn orientation_parse() {
        assert_eq!("P".parse::<Orientation>().unwrap(), Orientation::Portrait);
        assert_eq!("l".parse::<Orientation>().unwrap(), Orientation::Landscape);
        assert!("sideways".parse::<Orientation>().is_err());
    }
}
