//! # Recording Canvas
//!
//! The reference [`Canvas`] implementation: every drawing call is recorded
//! as a [`DrawOp`] in a per-page display list, and `render` serializes the
//! whole document as JSON. This is what the test suite runs against, and it
//! doubles as a debugging surface: the output shows exactly where the
//! layout layer decided to put things.
//!
//! Text measurement uses the built-in core-font tables from
//! [`crate::metrics`]; text boxes are built on the wrap engine so the
//! recorded line breaks are the ones a real backend would produce.

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::canvas::{
    Align, Canvas, ImageSource, LinkTarget, Metadata, TextBox, TextBoxOutcome, VAlign,
};
use crate::error::{FolioError, Result};
use crate::geometry::Rect;
use crate::metrics::{CoreFont, FontMetrics};
use crate::state::{Color, FontStyle};
use crate::wrap::{break_line, LineFit};

/// One recorded drawing operation, in native coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        /// Baseline origin.
        x: f64,
        y: f64,
        text: String,
        font: &'static str,
        size: f64,
        underline: bool,
        color: Color,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        width: f64,
        color: Color,
    },
    FillRect {
        rect: Rect,
        color: Color,
    },
    Image {
        source: String,
        at: (f64, f64),
        width: f64,
        height: f64,
    },
    Link {
        rect: Rect,
        target: LinkTarget,
    },
}

/// A page's dimensions and display list.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedPage {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

/// Display-list canvas backend.
#[derive(Debug)]
pub struct RecordingCanvas {
    pages: Vec<RecordedPage>,
    /// 1-based index of the current page; 0 before the first page.
    current: usize,
    font: CoreFont,
    font_style: FontStyle,
    font_size: f64,
    fill_color: Color,
    stroke_color: Color,
    line_width: f64,
    /// Intrinsic sizes for image sources, keyed by their description.
    image_sizes: HashMap<String, (f64, f64)>,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: 0,
            font: CoreFont::Helvetica,
            font_style: FontStyle::empty(),
            font_size: 12.0,
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            image_sizes: HashMap::new(),
        }
    }

    /// Teach the canvas the intrinsic size (in points) of an image source,
    /// keyed by `ImageSource::describe`. Without decoders this is how tests
    /// and embedders provide dimensions.
    pub fn register_image_size(&mut self, key: impl Into<String>, size: (f64, f64)) {
        self.image_sizes.insert(key.into(), size);
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    /// The recorded page `n` (1-based).
    pub fn page(&self, n: usize) -> &RecordedPage {
        &self.pages[n - 1]
    }

    fn current_page_mut(&mut self) -> &mut RecordedPage {
        let idx = self.current - 1;
        &mut self.pages[idx]
    }

    fn char_width(&self, c: char) -> f64 {
        self.font.char_width(c, self.font_size)
    }

    fn line_x(&self, rect: &Rect, align: Align, line_width: f64) -> f64 {
        match align {
            Align::Left | Align::Justify => rect.left,
            Align::Center => rect.left + (rect.width - line_width) / 2.0,
            Align::Right => rect.left + rect.width - line_width,
        }
    }
}

impl Canvas for RecordingCanvas {
    fn create_page(&mut self, width: f64, height: f64) {
        self.pages.push(RecordedPage {
            width,
            height,
            ops: Vec::new(),
        });
        self.current = self.pages.len();
    }

    fn page_number(&self) -> usize {
        self.current
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn go_to_page(&mut self, page: usize) {
        debug_assert!(page >= 1 && page <= self.pages.len());
        self.current = page;
    }

    fn set_font(&mut self, family: &str, style: FontStyle, size: f64) -> Result<()> {
        self.font = CoreFont::resolve(family, style);
        self.font_style = style;
        self.font_size = size;
        Ok(())
    }

    fn font_metrics(&self) -> FontMetrics {
        self.font.metrics(self.font_size)
    }

    fn text_width(&self, text: &str) -> f64 {
        self.font.measure(text, self.font_size)
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn draw_text(&mut self, at: (f64, f64), text: &str) {
        if text.is_empty() {
            return;
        }
        let op = DrawOp::Text {
            x: at.0,
            y: at.1,
            text: text.to_string(),
            font: self.font.postscript_name(),
            size: self.font_size,
            underline: self.font_style.contains(FontStyle::UNDERLINE),
            color: self.fill_color,
        };
        self.current_page_mut().ops.push(op);
    }

    fn draw_text_box(&mut self, spec: &TextBox<'_>) -> TextBoxOutcome {
        if spec.text.is_empty() {
            return TextBoxOutcome {
                leftover: None,
                drawn_width: 0.0,
                drawn_height: 0.0,
            };
        }
        if spec.rect.width <= 0.0 {
            return TextBoxOutcome::overflowed(spec.text);
        }

        let m = self.font_metrics();

        // Fit lines greedily until the text or the vertical space runs out.
        // Line n occupies (n-1) * line_height + ascender + descender; the
        // slack outside ascender+descender on the last line does not count
        // against the box height.
        let mut fits: Vec<LineFit> = Vec::new();
        let mut remaining: Option<String> = Some(spec.text.to_string());
        while let Some(text) = remaining.take() {
            let used = fits.len() as f64 * m.line_height + m.ascender + m.descender;
            let at_capacity = if spec.single_line {
                !fits.is_empty()
            } else {
                !fits.is_empty() && used > spec.rect.height + 1e-6
            };
            if at_capacity {
                remaining = Some(text);
                break;
            }
            let fit = break_line(&text, spec.rect.width, spec.wrap, |c| self.char_width(c));
            if fit.text.is_empty() && fit.rest.is_some() {
                // Nothing placeable at all (wrap-prohibited, or no width).
                remaining = Some(text);
                break;
            }
            remaining = fit.rest.clone();
            fits.push(fit);
        }

        if fits.is_empty() {
            return TextBoxOutcome::overflowed(spec.text);
        }

        let n = fits.len() as f64;
        let span = (n - 1.0) * m.line_height + m.ascender + m.descender;
        let pad = match spec.valign {
            VAlign::Top => 0.0,
            VAlign::Center => (spec.rect.height - span) / 2.0,
            VAlign::Bottom => spec.rect.height - span,
        };

        let mut drawn_width: f64 = 0.0;
        let ops: Vec<DrawOp> = fits
            .iter()
            .enumerate()
            .filter(|(_, fit)| !fit.text.trim().is_empty())
            .map(|(i, fit)| {
                drawn_width = drawn_width.max(fit.width);
                DrawOp::Text {
                    x: self.line_x(&spec.rect, spec.align, fit.width),
                    y: spec.rect.top - pad - m.ascender - i as f64 * m.line_height,
                    text: fit.text.clone(),
                    font: self.font.postscript_name(),
                    size: self.font_size,
                    underline: self.font_style.contains(FontStyle::UNDERLINE),
                    color: self.fill_color,
                }
            })
            .collect();
        self.current_page_mut().ops.extend(ops);

        TextBoxOutcome {
            leftover: remaining,
            drawn_width,
            drawn_height: n * m.line_height,
        }
    }

    fn stroke_line(&mut self, from: (f64, f64), to: (f64, f64)) {
        let op = DrawOp::Line {
            from,
            to,
            width: self.line_width,
            color: self.stroke_color,
        };
        self.current_page_mut().ops.push(op);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let op = DrawOp::StrokeRect {
            rect,
            width: self.line_width,
            color: self.stroke_color,
        };
        self.current_page_mut().ops.push(op);
    }

    fn fill_rect(&mut self, rect: Rect) {
        let op = DrawOp::FillRect {
            rect,
            color: self.fill_color,
        };
        self.current_page_mut().ops.push(op);
    }

    fn image_size(&mut self, source: &ImageSource) -> Result<(f64, f64)> {
        self.image_sizes
            .get(&source.describe())
            .copied()
            .ok_or_else(|| FolioError::UnsupportedImage(source.describe()))
    }

    fn draw_image(
        &mut self,
        source: &ImageSource,
        at: (f64, f64),
        width: f64,
        height: f64,
    ) -> Result<()> {
        let op = DrawOp::Image {
            source: source.describe(),
            at,
            width,
            height,
        };
        self.current_page_mut().ops.push(op);
        Ok(())
    }

    fn register_link(&mut self, rect: Rect, target: LinkTarget) {
        let op = DrawOp::Link { rect, target };
        self.current_page_mut().ops.push(op);
    }

    fn render(&mut self, metadata: &Metadata, out: &mut dyn Write) -> Result<()> {
        #[derive(Serialize)]
        struct Rendered<'a> {
            metadata: &'a Metadata,
            pages: &'a [RecordedPage],
        }
        let doc = Rendered {
            metadata,
            pages: &self.pages,
        };
        serde_json::to_writer_pretty(&mut *out, &doc)
            .map_err(|e| FolioError::Io(std::io::Error::other(e)))?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wrap::WrapStrategy;

    fn canvas_with_page() -> RecordingCanvas {
        let mut c = RecordingCanvas::new();
        c.create_page(595.28, 841.89);
        c
    }

    #[test]
    fn records_in_page_order() {
        let mut c = canvas_with_page();
        c.draw_text((10.0, 800.0), "one");
        c.create_page(595.28, 841.89);
        c.draw_text((10.0, 800.0), "two");
        assert_eq!(c.page(1).ops.len(), 1);
        assert_eq!(c.page(2).ops.len(), 1);
        assert_eq!(c.page_count(), 2);
    }

    #[test]
    fn go_to_page_redirects_recording() {
        let mut c = canvas_with_page();
        c.create_page(595.28, 841.89);
        c.go_to_page(1);
        c.draw_text((10.0, 800.0), "late addition");
        assert_eq!(c.page(1).ops.len(), 1);
        assert!(c.page(2).ops.is_empty());
    }

    #[test]
    fn text_box_single_line_centered() {
        let mut c = canvas_with_page();
        let rect = Rect::new(100.0, 800.0, 200.0, 20.0);
        let outcome = c.draw_text_box(&TextBox {
            text: "Hi",
            rect,
            align: Align::Left,
            valign: VAlign::Center,
            wrap: WrapStrategy::WordPreferred,
            single_line: true,
        });
        assert!(outcome.leftover.is_none());
        let m = CoreFont::Helvetica.metrics(12.0);
        let expected_y = 800.0 - (20.0 - (m.ascender + m.descender)) / 2.0 - m.ascender;
        match &c.page(1).ops[0] {
            DrawOp::Text { y, .. } => assert!((y - expected_y).abs() < 1e-9),
            other => panic!("expected text op, got {other:?}"),
        }
    }

    #[test]
    fn text_box_clips_and_returns_leftover() {
        let mut c = canvas_with_page();
        // Room for one line only.
        let rect = Rect::new(0.0, 800.0, 60.0, 12.0);
        let outcome = c.draw_text_box(&TextBox {
            text: "several words that cannot possibly fit here",
            rect,
            align: Align::Left,
            valign: VAlign::Top,
            wrap: WrapStrategy::WordPreferred,
            single_line: false,
        });
        assert!(outcome.leftover.is_some());
        assert_eq!(c.page(1).ops.len(), 1);
    }

    #[test]
    fn unknown_image_is_unsupported() {
        let mut c = canvas_with_page();
        let src = ImageSource::Path("mystery.webp".into());
        assert!(matches!(
            c.image_size(&src),
            Err(FolioError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn registered_image_size_is_returned() {
        let mut c = canvas_with_page();
        c.register_image_size("logo.png", (120.0, 60.0));
        let src = ImageSource::Path("logo.png".into());
        assert_eq!(c.image_size(&src).unwrap(), (120.0, 60.0));
    }

    #[test]
    fn render_emits_json() {
        let mut c = canvas_with_page();
        c.draw_text((10.0, 800.0), "hello");
        let mut buf = Vec::new();
        c.render(&Metadata::default(), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["pages"].as_array().unwrap().len(), 1);
    }
}
