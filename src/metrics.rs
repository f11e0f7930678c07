//! # Core Font Metrics
//!
//! Advance widths and vertical metrics for the standard PDF core fonts, for
//! backends that do not load font files. Font *registration* is explicitly
//! not a concern of this crate; the reference canvas resolves a family name
//! and style flags to one of the core faces below and falls back to
//! Helvetica for anything it does not recognize.
//!
//! Widths are AFM advance widths in 1/1000 em for the printable ASCII range;
//! characters outside that range measure as the em/2 default. Oblique faces
//! share the widths of their upright counterparts (true for Helvetica per
//! the AFMs); Times bold-italic borrows the bold table, a documented
//! approximation.

use crate::state::FontStyle;

/// Vertical metrics for the current font at a concrete size, in points.
///
/// `ascender` and `descender` are both positive magnitudes measured from the
/// baseline. `line_height` is the nominal line-to-line advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontMetrics {
    pub ascender: f64,
    pub descender: f64,
    pub line_height: f64,
}

/// The core faces the reference canvas can measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl CoreFont {
    /// Resolve a family name plus style flags to a core face.
    ///
    /// Family matching is case-insensitive and forgiving about the common
    /// aliases ("Arial" for Helvetica, "Times" for Times-Roman). Unknown
    /// families resolve to Helvetica in the requested style.
    pub fn resolve(family: &str, style: FontStyle) -> CoreFont {
        let bold = style.contains(FontStyle::BOLD);
        let italic = style.contains(FontStyle::ITALIC);
        match family.to_ascii_lowercase().as_str() {
            "times" | "times-roman" | "times new roman" => match (bold, italic) {
                (false, false) => CoreFont::TimesRoman,
                (true, false) => CoreFont::TimesBold,
                (false, true) => CoreFont::TimesItalic,
                (true, true) => CoreFont::TimesBoldItalic,
            },
            "courier" | "courier new" => match (bold, italic) {
                (false, false) => CoreFont::Courier,
                (true, false) => CoreFont::CourierBold,
                (false, true) => CoreFont::CourierOblique,
                (true, true) => CoreFont::CourierBoldOblique,
            },
            _ => match (bold, italic) {
                (false, false) => CoreFont::Helvetica,
                (true, false) => CoreFont::HelveticaBold,
                (false, true) => CoreFont::HelveticaOblique,
                (true, true) => CoreFont::HelveticaBoldOblique,
            },
        }
    }

    /// The PostScript name for this face.
    pub fn postscript_name(&self) -> &'static str {
        match self {
            CoreFont::Helvetica => "Helvetica",
            CoreFont::HelveticaBold => "Helvetica-Bold",
            CoreFont::HelveticaOblique => "Helvetica-Oblique",
            CoreFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
            CoreFont::TimesRoman => "Times-Roman",
            CoreFont::TimesBold => "Times-Bold",
            CoreFont::TimesItalic => "Times-Italic",
            CoreFont::TimesBoldItalic => "Times-BoldItalic",
            CoreFont::Courier => "Courier",
            CoreFont::CourierBold => "Courier-Bold",
            CoreFont::CourierOblique => "Courier-Oblique",
            CoreFont::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    fn width_table(&self) -> Option<&'static [u16; 95]> {
        match self {
            CoreFont::Helvetica | CoreFont::HelveticaOblique => Some(&HELVETICA),
            CoreFont::HelveticaBold | CoreFont::HelveticaBoldOblique => Some(&HELVETICA_BOLD),
            CoreFont::TimesRoman => Some(&TIMES_ROMAN),
            CoreFont::TimesBold | CoreFont::TimesBoldItalic => Some(&TIMES_BOLD),
            CoreFont::TimesItalic => Some(&TIMES_ITALIC),
            // Courier is monospaced; no table needed.
            _ => None,
        }
    }

    /// Advance width of one character in points at `size`.
    pub fn char_width(&self, ch: char, size: f64) -> f64 {
        let mille = match self.width_table() {
            None => 600,
            Some(table) => {
                let code = ch as u32;
                if (32..=126).contains(&code) {
                    table[(code - 32) as usize]
                } else {
                    500
                }
            }
        };
        mille as f64 / 1000.0 * size
    }

    /// Width of a string in points at `size`.
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c, size)).sum()
    }

    /// Vertical metrics at `size`.
    pub fn metrics(&self, size: f64) -> FontMetrics {
        let (asc, desc) = match self {
            CoreFont::TimesRoman
            | CoreFont::TimesBold
            | CoreFont::TimesItalic
            | CoreFont::TimesBoldItalic => (683, 217),
            CoreFont::Courier
            | CoreFont::CourierBold
            | CoreFont::CourierOblique
            | CoreFont::CourierBoldOblique => (629, 157),
            _ => (718, 207),
        };
        FontMetrics {
            ascender: asc as f64 / 1000.0 * size,
            descender: desc as f64 / 1000.0 * size,
            // The core faces share a nominal 1.15 em line advance.
            line_height: LINE_SPREAD_MILLE as f64 / 1000.0 * size,
        }
    }
}

const LINE_SPREAD_MILLE: u16 = 1150;

// AFM advance widths, chars 32..=126.

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333,
    584, 584, 584, 611, 975, 722, 722, 722, 722, 667, 611, 778, 722, 278,
    556, 722, 611, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 333, 278, 333, 584, 556, 333, 556, 611, 556, 611, 556,
    333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611, 611, 389, 556,
    333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278,
    564, 564, 564, 444, 921, 722, 667, 667, 722, 611, 556, 722, 722, 333,
    389, 722, 611, 889, 722, 722, 556, 722, 667, 556, 611, 722, 722, 944,
    722, 722, 611, 333, 278, 333, 469, 500, 333, 444, 500, 444, 500, 444,
    333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500, 500, 333, 389,
    278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333,
    570, 570, 570, 500, 930, 722, 667, 722, 722, 667, 611, 778, 778, 389,
    500, 778, 667, 944, 722, 778, 611, 778, 722, 556, 667, 722, 722, 1000,
    722, 722, 667, 333, 278, 333, 581, 500, 333, 500, 556, 444, 556, 444,
    333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444, 389,
    333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[rustfmt::skip]
static TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333,
    250, 278, 500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333,
    675, 675, 675, 500, 920, 611, 611, 667, 722, 611, 611, 722, 722, 333,
    444, 667, 556, 833, 667, 722, 611, 722, 611, 500, 556, 722, 611, 833,
    611, 556, 556, 389, 278, 389, 422, 500, 333, 500, 500, 444, 500, 444,
    278, 500, 500, 278, 278, 444, 278, 722, 500, 500, 500, 500, 389, 389,
    278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helvetica_space_width() {
        let w = CoreFont::Helvetica.char_width(' ', 12.0);
        assert!((w - 3.336).abs() < 0.001);
    }

    #[test]
    fn bold_a_is_wider() {
        let regular = CoreFont::Helvetica.char_width('A', 12.0);
        let bold = CoreFont::HelveticaBold.char_width('A', 12.0);
        assert!(bold > regular);
    }

    #[test]
    fn courier_is_monospaced() {
        let i = CoreFont::Courier.char_width('i', 10.0);
        let m = CoreFont::Courier.char_width('M', 10.0);
        assert!((i - m).abs() < 1e-9);
        assert!((i - 6.0).abs() < 1e-9);
    }

    #[test]
    fn oblique_shares_upright_widths() {
        let upright = CoreFont::Helvetica.measure("Hello", 12.0);
        let oblique = CoreFont::HelveticaOblique.measure("Hello", 12.0);
        assert!((upright - oblique).abs() < 1e-9);
    }

    #[test]
    fn unknown_family_falls_back_to_helvetica() {
        let face = CoreFont::resolve("Comic Sans", FontStyle::BOLD);
        assert_eq!(face, CoreFont::HelveticaBold);
    }

    #[test]
    fn times_alias_resolution() {
        assert_eq!(
            CoreFont::resolve("Times", FontStyle::ITALIC),
            CoreFont::TimesItalic
        );
        assert_eq!(
            CoreFont::resolve("times-roman", FontStyle::empty()),
            CoreFont::TimesRoman
        );
    }

    #[test]
    fn vertical_metrics_scale_with_size() {
        let m = CoreFont::Helvetica.metrics(10.0);
        assert!((m.ascender - 7.18).abs() < 1e-9);
        assert!((m.descender - 2.07).abs() < 1e-9);
        assert!((m.line_height - 11.5).abs() < 1e-9);
    }
}
