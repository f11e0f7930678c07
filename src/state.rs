//! # Graphics State
//!
//! Colors, font selection, and the snapshot/restore machinery that makes the
//! two-pass close possible.
//!
//! The legacy API keeps three "current colors" (draw, text, fill) where PDF
//! itself has two (stroke, fill); the document tracks text and fill
//! separately and sets the appropriate canvas color before each operation.
//!
//! A [`GraphicsSnapshot`] captures everything *except* the cursor. That
//! exclusion is deliberate: the header hook runs once in measuring mode at
//! page start, the snapshot is restored afterwards, and the cursor movement
//! the header performed is the reserved header height.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::FolioError;
use crate::geometry::Edges;

/// An RGB color with components in 0.0–1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// From 0–255 components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    /// A gray level from a single 0–255 component.
    pub fn gray(v: u8) -> Self {
        Self::from_rgb(v, v, v)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

bitflags! {
    /// Font style flags in the legacy B/I/U encoding.
    ///
    /// Underline is carried here even though it is not a property of the
    /// font itself; the legacy API presents it as one and the snapshots
    /// must round-trip it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontStyle: u8 {
        const BOLD = 1;
        const ITALIC = 2;
        const UNDERLINE = 4;
    }
}

impl FromStr for FontStyle {
    type Err = FolioError;

    /// Parses the legacy style string: any combination of 'B', 'I', 'U'
    /// (case-insensitive). The empty string is the regular style.
    fn from_str(s: &str) -> Result<Self, FolioError> {
        let mut style = FontStyle::empty();
        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'B' => style |= FontStyle::BOLD,
                'I' => style |= FontStyle::ITALIC,
                'U' => style |= FontStyle::UNDERLINE,
                _ => return Err(FolioError::InvalidStyle(s.to_string())),
            }
        }
        Ok(style)
    }
}

/// The current font selection as the document tracks it.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSelection {
    pub family: String,
    pub style: FontStyle,
    pub size: f64,
}

impl Default for FontSelection {
    fn default() -> Self {
        Self {
            family: "Helvetica".to_string(),
            style: FontStyle::empty(),
            size: 12.0,
        }
    }
}

/// Whether a drawing primitive commits marks to the canvas or only advances
/// layout state.
///
/// Measuring is the header dry-run at page start: the cursor and graphics
/// state move exactly as they would when committing, but nothing reaches the
/// canvas and no link is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Measuring,
    Committing,
}

impl LayoutMode {
    pub fn commits(self) -> bool {
        matches!(self, LayoutMode::Committing)
    }
}

/// Immutable record of the graphics state at a point in time, minus the
/// cursor. Captured pre-header and pre-footer for every page; consumed only
/// during the replay pass.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsSnapshot {
    pub page_width: f64,
    pub page_height: f64,
    pub margins: Edges,
    pub line_width: f64,
    pub font: FontSelection,
    pub text_color: Color,
    pub fill_color: Color,
    pub stroke_color: Color,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_parse_combinations() {
        assert_eq!("".parse::<FontStyle>().unwrap(), FontStyle::empty());
        assert_eq!(
            "BIU".parse::<FontStyle>().unwrap(),
            FontStyle::BOLD | FontStyle::ITALIC | FontStyle::UNDERLINE
        );
        assert_eq!(
            "ub".parse::<FontStyle>().unwrap(),
            FontStyle::BOLD | FontStyle::UNDERLINE
        );
        assert!("BX".parse::<FontStyle>().is_err());
    }

    #[test]
    fn gray_is_equal_components() {
        let c = Color::gray(128);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }
}
