//! # Text Flow
//!
//! Continuous text written from the cursor, flowing to the right margin and
//! onward across lines and pages, with no fixed box width.
//!
//! The wrap-mode asymmetry is the whole point of this module. A `write`
//! call often continues a line that earlier calls already started, and
//! splitting a word mid-stream there looks broken; so the first segment of
//! every line runs wrap-prohibited and hands back anything that needs a word
//! boundary it does not have. Once the flow has moved to a fresh line,
//! character wrapping is acceptable and guarantees the text drains.

use crate::canvas::{Align, Canvas, TextBox, VAlign};
use crate::error::Result;
use crate::geometry::Rect;
use crate::links::LinkRef;
use crate::wrap::{break_line, WrapStrategy};

use super::Document;

impl<C: Canvas> Document<C> {
    /// Flow `text` from the cursor with line height `height` (user units).
    pub fn write(&mut self, height: f64, text: &str) -> Result<()> {
        self.write_flow(height, text, None)
    }

    /// Like [`write`](Self::write), with every drawn run registered as a
    /// link over its measured extent.
    pub fn write_linked(&mut self, height: f64, text: &str, link: LinkRef) -> Result<()> {
        self.write_flow(height, text, Some(link))
    }

    fn write_flow(&mut self, height: f64, text: &str, link: Option<LinkRef>) -> Result<()> {
        self.require_page()?;
        let normalized = text.replace("\r\n", "\n");
        let lines: Vec<&str> = normalized.split('\n').collect();

        for (i, line) in lines.iter().enumerate() {
            // The first segment may be continuing an already-started line:
            // wrap-prohibited, so an unbreakable word moves down whole.
            let mut remainder =
                self.write_segment(height, line, link.as_ref(), WrapStrategy::WordOnly)?;

            while let Some(rest) = remainder.take() {
                if rest.is_empty() {
                    break;
                }
                self.ln(Some(height));
                let next =
                    self.write_segment(height, &rest, link.as_ref(), WrapStrategy::CharFallback)?;
                if next.as_deref() == Some(rest.as_str()) {
                    // No usable width even on a fresh line; stop rather
                    // than spin.
                    break;
                }
                remainder = next;
            }

            if i + 1 < lines.len() {
                self.ln(Some(height));
            }
        }
        Ok(())
    }

    /// Lay out one segment at the cursor, advancing X by the drawn width and
    /// returning whatever must continue on the next line.
    fn write_segment(
        &mut self,
        height: f64,
        text: &str,
        link: Option<&LinkRef>,
        strategy: WrapStrategy,
    ) -> Result<Option<String>> {
        let h = self.space().length(height);
        self.maybe_break(h)?;

        if text.is_empty() {
            return Ok(None);
        }

        let orig_y = self.cursor.1;
        let avail = self.page_width - self.margins.right - self.cursor.0;

        let (advance, leftover) = if self.mode.commits() {
            let txt = self.substituted(text);
            self.canvas.set_fill_color(self.text_color);
            let outcome = self.canvas.draw_text_box(&TextBox {
                text: &txt,
                rect: Rect::new(self.cursor.0, self.cursor.1, avail, h),
                align: Align::Left,
                valign: VAlign::Top,
                wrap: strategy,
                single_line: true,
            });
            // When the whole segment fit, the cursor must advance past
            // trailing spaces too, so a following call continues the line
            // with proper spacing.
            let advance = if outcome.leftover.is_none() {
                self.canvas.text_width(&txt)
            } else {
                outcome.drawn_width
            };
            if advance > 0.0 {
                if let Some(link) = link {
                    self.place_link(Rect::new(self.cursor.0, self.cursor.1, advance, h), link);
                }
            }
            (advance, outcome.leftover)
        } else {
            // Measuring pass: identical fit math, no marks on the canvas.
            let fit = break_line(text, avail, strategy, |c| {
                let mut buf = [0u8; 4];
                self.canvas.text_width(c.encode_utf8(&mut buf))
            });
            let advance = if fit.rest.is_none() {
                self.canvas.text_width(text)
            } else {
                fit.width
            };
            (advance, fit.rest)
        };

        self.cursor.0 += advance;
        self.cursor.1 = orig_y;
        Ok(leftover)
    }
}
