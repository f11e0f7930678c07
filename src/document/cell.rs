//! # Cell Layout
//!
//! Bordered rectangles with clipped, optically centered text (the workhorse
//! of tabular legacy layouts), and the multi-cell paragraph form that wraps
//! across lines and pages.
//!
//! A multi-cell cannot draw its border as one rectangle: any segment may
//! trigger a page break, after which the earlier edges are already on
//! another page. Each segment therefore draws its own border immediately,
//! restricted to the edges its position entitles it to (first: left/top/
//! right, interior: left/right, last: left/right/bottom), intersected with
//! whatever partial border the caller asked for.

use bitflags::bitflags;
use std::str::FromStr;

use crate::canvas::{Align, Canvas, TextBox, VAlign};
use crate::error::{FolioError, Result};
use crate::geometry::{Rect, PT_PER_MM};
use crate::links::LinkRef;
use crate::wrap::WrapStrategy;

use super::Document;

/// Fixed inner padding of a cell on each side: 1 mm, in points. Undocumented
/// in the legacy API but relied on by every layout written against it.
pub const CELL_PADDING: f64 = PT_PER_MM;

bitflags! {
    /// Which edges of a cell get a border.
    ///
    /// The intersection of a caller-specified partial border with a
    /// positional mask is plain bitwise AND.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Border: u8 {
        const LEFT = 1;
        const TOP = 2;
        const RIGHT = 4;
        const BOTTOM = 8;
    }
}

impl FromStr for Border {
    type Err = FolioError;

    /// Parses the legacy edge-letter spec: any combination of L/T/R/B,
    /// case-insensitive. The empty string is no border.
    fn from_str(s: &str) -> Result<Self> {
        let mut border = Border::empty();
        for c in s.chars() {
            match c.to_ascii_uppercase() {
                'L' => border |= Border::LEFT,
                'T' => border |= Border::TOP,
                'R' => border |= Border::RIGHT,
                'B' => border |= Border::BOTTOM,
                _ => return Err(FolioError::InvalidBorder(s.to_string())),
            }
        }
        Ok(border)
    }
}

/// Where the cursor goes after a cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorAdvance {
    /// Stay on the line: X advances by the cell width, Y is restored.
    #[default]
    Right,
    /// X returns to the left margin, Y drops by the cell height.
    NextLine,
    /// X is unchanged, Y drops by the cell height.
    Below,
}

/// Options for a single cell.
#[derive(Debug, Clone, Default)]
pub struct CellOptions {
    pub border: Border,
    pub advance: CursorAdvance,
    pub align: Align,
    pub fill: bool,
    pub link: Option<LinkRef>,
}

/// Options for a multi-cell paragraph.
#[derive(Debug, Clone)]
pub struct MultiCellOptions {
    pub border: Border,
    pub align: Align,
    pub fill: bool,
}

impl Default for MultiCellOptions {
    fn default() -> Self {
        Self {
            border: Border::empty(),
            // The legacy paragraph default.
            align: Align::Justify,
            fill: false,
        }
    }
}

/// What one internal cell layout call produced, in native points.
struct CellOutcome {
    leftover: Option<String>,
    width: f64,
    height: f64,
}

/// The border edges a multi-cell segment may draw, by position.
fn positional_mask(first: bool, last: bool) -> Border {
    match (first, last) {
        (true, true) => Border::all(),
        (true, false) => Border::LEFT | Border::TOP | Border::RIGHT,
        (false, false) => Border::LEFT | Border::RIGHT,
        (false, true) => Border::LEFT | Border::RIGHT | Border::BOTTOM,
    }
}

impl<C: Canvas> Document<C> {
    /// Draw one cell of `w` x `h` user units at the cursor.
    ///
    /// A zero width extends the cell to the right margin; a zero height
    /// auto-fits one line of the current font. Text is clipped to the cell,
    /// vertically centered, and aligned within the inner padding. Returns
    /// the text that did not fit, if any.
    pub fn cell(&mut self, w: f64, h: f64, text: &str, opts: &CellOptions) -> Result<Option<String>> {
        let outcome = self.cell_impl(
            w,
            h,
            text,
            opts.border,
            opts.advance,
            opts.align,
            opts.fill,
            opts.link.as_ref(),
            true,
        )?;
        Ok(outcome.leftover)
    }

    /// Draw a paragraph of cells of width `w`, one per wrapped segment of
    /// height `h`, breaking across pages as needed. The border is stitched
    /// per segment; the cursor finishes at the left margin below the last
    /// segment (legacy behavior).
    pub fn multi_cell(&mut self, w: f64, h: f64, text: &str, opts: &MultiCellOptions) -> Result<()> {
        self.require_page()?;
        let normalized = text.replace("\r\n", "\n");
        // Only the very first segment of the paragraph owns the top edge;
        // every hard line's final segment closes with a bottom edge.
        let mut first = true;
        for line in normalized.split('\n') {
            let mut outcome = self.segment_cell(w, h, line, opts)?;
            self.stitch_border(opts.border, first, outcome.leftover.is_none(), &outcome);
            first = false;

            while let Some(rest) = outcome.leftover.take() {
                if rest.is_empty() {
                    break;
                }
                outcome = self.segment_cell(w, h, &rest, opts)?;
                self.stitch_border(opts.border, first, outcome.leftover.is_none(), &outcome);
                if outcome.leftover.as_deref() == Some(rest.as_str()) {
                    // A cell too narrow to place anything; drop the tail
                    // rather than spin.
                    break;
                }
            }
        }
        self.cursor.0 = self.margins.left;
        Ok(())
    }

    fn segment_cell(&mut self, w: f64, h: f64, text: &str, opts: &MultiCellOptions) -> Result<CellOutcome> {
        self.cell_impl(
            w,
            h,
            text,
            Border::empty(),
            CursorAdvance::Below,
            opts.align,
            opts.fill,
            None,
            false,
        )
    }

    /// The single-cell layout algorithm shared by `cell` and `multi_cell`.
    #[allow(clippy::too_many_arguments)]
    fn cell_impl(
        &mut self,
        w: f64,
        h: f64,
        text: &str,
        border: Border,
        advance: CursorAdvance,
        align: Align,
        fill: bool,
        link: Option<&LinkRef>,
        single_line: bool,
    ) -> Result<CellOutcome> {
        self.require_page()?;
        let mut w = self.space().length(w);
        let h = Some(self.space().length(h)).filter(|v| *v > 0.0);

        self.maybe_break(h.unwrap_or(0.0))?;

        if w <= 0.0 {
            w = self.page_width - self.margins.right - self.cursor.0;
        }
        let orig_y = self.cursor.1;
        let box_h = h.unwrap_or_else(|| self.canvas.font_metrics().line_height);

        let mut leftover = None;
        let mut cell_h = box_h;

        if self.mode.commits() {
            if fill {
                self.canvas.set_fill_color(self.fill_color);
                self.canvas
                    .fill_rect(Rect::new(self.cursor.0, self.cursor.1, w, box_h));
            }

            if !text.is_empty() {
                let txt = self.substituted(text);
                self.canvas.set_fill_color(self.text_color);
                let inner = Rect::new(
                    self.cursor.0 + CELL_PADDING,
                    self.cursor.1,
                    (w - 2.0 * CELL_PADDING).max(0.0),
                    box_h,
                );
                let outcome = self.canvas.draw_text_box(&TextBox {
                    text: &txt,
                    rect: inner,
                    align,
                    valign: VAlign::Center,
                    wrap: WrapStrategy::WordPreferred,
                    single_line,
                });
                leftover = outcome.leftover;
                if h.is_none() && outcome.drawn_height > 0.0 {
                    cell_h = outcome.drawn_height;
                }
            }

            self.draw_border_edges(border, Rect::new(self.cursor.0, self.cursor.1, w, cell_h));

            if let Some(link) = link {
                self.place_link(Rect::new(self.cursor.0, self.cursor.1, w, cell_h), link);
            }
            self.last_cell_height = cell_h;
        }

        match advance {
            CursorAdvance::Right => {
                self.cursor.0 += w;
                self.cursor.1 = orig_y;
            }
            CursorAdvance::NextLine => {
                self.cursor.0 = self.margins.left;
                self.cursor.1 = orig_y - cell_h;
            }
            CursorAdvance::Below => {
                self.cursor.1 = orig_y - cell_h;
            }
        }

        Ok(CellOutcome {
            leftover,
            width: w,
            height: cell_h,
        })
    }

    /// Draw the border for one multi-cell segment the cursor just moved
    /// below, restricted by the segment's position in the paragraph.
    fn stitch_border(&mut self, border: Border, first: bool, last: bool, outcome: &CellOutcome) {
        if border.is_empty() || !self.mode.commits() {
            return;
        }
        let edges = border & positional_mask(first, last);
        let rect = Rect::new(
            self.cursor.0,
            self.cursor.1 + outcome.height,
            outcome.width,
            outcome.height,
        );
        self.draw_border_edges(edges, rect);
    }

    /// Stroke the selected edges of a rectangle; a full edge set strokes the
    /// rectangle in one operation.
    fn draw_border_edges(&mut self, border: Border, rect: Rect) {
        if border.is_empty() {
            return;
        }
        if border == Border::all() {
            self.canvas.stroke_rect(rect);
            return;
        }
        let (l, t, r, b) = (rect.left, rect.top, rect.right(), rect.bottom());
        if border.contains(Border::LEFT) {
            self.canvas.stroke_line((l, b), (l, t));
        }
        if border.contains(Border::TOP) {
            self.canvas.stroke_line((l, t), (r, t));
        }
        if border.contains(Border::RIGHT) {
            self.canvas.stroke_line((r, t), (r, b));
        }
        if border.contains(Border::BOTTOM) {
            self.canvas.stroke_line((l, b), (r, b));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_parse_edge_letters() {
        assert_eq!("".parse::<Border>().unwrap(), Border::empty());
        assert_eq!("LTRB".parse::<Border>().unwrap(), Border::all());
        assert_eq!(
            "rb".parse::<Border>().unwrap(),
            Border::RIGHT | Border::BOTTOM
        );
        assert!("LX".parse::<Border>().is_err());
    }

    #[test]
    fn positional_masks_match_segment_positions() {
        assert_eq!(positional_mask(true, true), Border::all());
        assert_eq!(
            positional_mask(true, false),
            Border::LEFT | Border::TOP | Border::RIGHT
        );
        assert_eq!(positional_mask(false, false), Border::LEFT | Border::RIGHT);
        assert_eq!(
            positional_mask(false, true),
            Border::LEFT | Border::RIGHT | Border::BOTTOM
        );
    }

    #[test]
    fn partial_border_respects_positional_constraint() {
        // A caller asking for only right+bottom gets right on the first
        // segment and right+bottom on the last.
        let requested = Border::RIGHT | Border::BOTTOM;
        assert_eq!(requested & positional_mask(true, false), Border::RIGHT);
        assert_eq!(
            requested & positional_mask(false, true),
            Border::RIGHT | Border::BOTTOM
        );
    }

    #[test]
    fn stitched_edges_reassemble_full_border() {
        // Across a 3-segment paragraph, the union of drawn edges for a full
        // requested border covers every edge exactly where expected.
        let b = Border::all();
        let first = b & positional_mask(true, false);
        let mid = b & positional_mask(false, false);
        let last = b & positional_mask(false, true);
        assert_eq!(first, "LTR".parse().unwrap());
        assert_eq!(mid, "LR".parse().unwrap());
        assert_eq!(last, "LRB".parse().unwrap());
        assert_eq!(first | mid | last, Border::all());
    }
}
