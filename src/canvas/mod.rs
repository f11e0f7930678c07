//! # Canvas Backends
//!
//! The external collaborator boundary. Everything Folio needs from a PDF
//! primitive library is collected into the [`Canvas`] trait: page creation,
//! font metrics, low-level text box rendering with a pluggable wrap
//! strategy, stroke/fill primitives, link annotation emission, and final
//! serialization. The layout layer computes *where* and *how*; the canvas
//! does the drawing.
//!
//! Coordinates crossing this boundary are always native: points, bottom-up,
//! origin at the paper corner. The legacy unit/origin translation happens
//! entirely on the document side.
//!
//! The crate ships one implementation, [`recording::RecordingCanvas`], which
//! records a display list per page. Real PDF writers implement the same
//! trait.

pub mod recording;

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{FolioError, Result};
use crate::geometry::Rect;
use crate::metrics::FontMetrics;
use crate::state::{Color, FontStyle};
use crate::wrap::WrapStrategy;

/// Horizontal alignment of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    /// Accepted for compatibility; backends may render it as left.
    Justify,
}

impl FromStr for Align {
    type Err = FolioError;

    /// Parses the legacy one-letter codes. The empty string is Left.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "" | "L" => Ok(Align::Left),
            "C" => Ok(Align::Center),
            "R" => Ok(Align::Right),
            "J" => Ok(Align::Justify),
            other => Err(FolioError::InvalidAlignment(other.to_string())),
        }
    }
}

/// Vertical alignment of text within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

/// Where a link annotation points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// An external URL.
    Url(String),
    /// A page of this document and a native Y coordinate on it.
    Destination { page: usize, y: f64 },
}

/// An image to be placed. Decoding is the backend's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes { format: String, data: Vec<u8> },
}

impl ImageSource {
    /// A human-readable name for error messages.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(p) => p.display().to_string(),
            ImageSource::Bytes { format, data } => format!("{} ({} bytes)", format, data.len()),
        }
    }
}

/// Document info handed to the backend at render time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
}

/// One text box request.
#[derive(Debug, Clone, Copy)]
pub struct TextBox<'a> {
    pub text: &'a str,
    /// Box in native coordinates; `rect.top` is the larger Y.
    pub rect: Rect,
    pub align: Align,
    pub valign: VAlign,
    pub wrap: WrapStrategy,
    /// Lay out exactly one line; overflow becomes leftover.
    pub single_line: bool,
}

/// What a text box call actually did.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBoxOutcome {
    /// Text that did not fit the box, in input order. `None` when all fit.
    pub leftover: Option<String>,
    /// Measured width of the widest drawn line, trailing spaces excluded.
    pub drawn_width: f64,
    /// Vertical extent consumed by the drawn lines.
    pub drawn_height: f64,
}

impl TextBoxOutcome {
    /// The outcome of a box that could place nothing at all.
    pub fn overflowed(text: &str) -> Self {
        Self {
            leftover: Some(text.to_string()),
            drawn_width: 0.0,
            drawn_height: 0.0,
        }
    }
}

/// The PDF primitive surface Folio draws through.
///
/// Pages are numbered from 1 in creation order. `create_page` makes the new
/// page current; `go_to_page` revisits an existing one during the close
/// replay. Graphics state (font, colors, line width) is per-canvas and
/// survives page switches; the document layer snapshots and restores it.
///
/// Vertical centering inside `draw_text_box` must correct for
/// ascender/descender overshoot so a single line is optically centered:
/// the first baseline sits at `rect.top - ascender - (h - n_line_span) / 2`
/// where `n_line_span` is `(lines - 1) * line_height + ascender + descender`.
/// Legacy cell output depends on this exact behavior.
pub trait Canvas {
    fn create_page(&mut self, width: f64, height: f64);
    fn page_number(&self) -> usize;
    fn page_count(&self) -> usize;
    fn go_to_page(&mut self, page: usize);

    fn set_font(&mut self, family: &str, style: FontStyle, size: f64) -> Result<()>;
    fn font_metrics(&self) -> FontMetrics;
    /// Width of `text` in points in the current font.
    fn text_width(&self, text: &str) -> f64;

    fn set_fill_color(&mut self, color: Color);
    fn set_stroke_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);

    /// Raw text at a baseline position; no wrapping, no clipping.
    fn draw_text(&mut self, at: (f64, f64), text: &str);
    fn draw_text_box(&mut self, spec: &TextBox<'_>) -> TextBoxOutcome;

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64));
    fn stroke_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect);

    /// Intrinsic size of an image in points, for aspect-ratio scaling.
    fn image_size(&mut self, source: &ImageSource) -> Result<(f64, f64)>;
    /// Place an image with its top-left corner at `at`.
    fn draw_image(&mut self, source: &ImageSource, at: (f64, f64), width: f64, height: f64)
        -> Result<()>;

    fn register_link(&mut self, rect: Rect, target: LinkTarget);

    /// Final serialization. Invoked once, after close.
    fn render(&mut self, metadata: &Metadata, out: &mut dyn Write) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_parse_legacy_codes() {
        assert_eq!("".parse::<Align>().unwrap(), Align::Left);
        assert_eq!("c".parse::<Align>().unwrap(), Align::Center);
        assert_eq!("R".parse::<Align>().unwrap(), Align::Right);
        assert_eq!("J".parse::<Align>().unwrap(), Align::Justify);
        assert!("M".parse::<Align>().is_err());
    }
}
