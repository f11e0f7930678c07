//! # Line Wrapping
//!
//! The single-line greedy breaker and the wrap-mode control that legacy text
//! flow depends on.
//!
//! When a segment overflows the available width, the strategy decides what
//! happens. Word wrapping is always preferred: the breaker looks backward
//! for the nearest UAX#14 break opportunity or soft hyphen. The strategies
//! differ only in the fallback when no acceptable boundary exists on the
//! line. Continuing an already-started line must not split a word
//! mid-stream, so that path refuses character wrapping and hands the whole
//! segment back; a fresh line splits at character level so at least some
//! progress is guaranteed.
//!
//! Hard line breaks never reach this module; callers split on them first.

use unicode_linebreak::{linebreaks, BreakOpportunity};

/// How to resolve the end of a line when a segment does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapStrategy {
    /// Break at word boundaries; split a word at character level only when
    /// it is wider than the whole line. The default for text boxes.
    #[default]
    WordPreferred,
    /// Word boundaries preferred, character wrapping guarantees progress.
    /// Used when flowing text onto a fresh line.
    CharFallback,
    /// Word boundaries only. A segment with no fitting boundary is returned
    /// whole, undrawn: the wrap-prohibited mode for continuing a line that
    /// was already started.
    WordOnly,
}

impl WrapStrategy {
    fn allows_char_split(self) -> bool {
        !matches!(self, WrapStrategy::WordOnly)
    }
}

/// The outcome of fitting one line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    /// The text placed on the line, with soft hyphens resolved (dropped, or
    /// replaced by a visible hyphen when broken at one).
    pub text: String,
    /// Drawn width of the line in points, trailing spaces excluded.
    pub width: f64,
    /// Whatever did not fit, to be placed on a following line.
    pub rest: Option<String>,
}

const SOFT_HYPHEN: char = '\u{00AD}';

/// Break opportunities indexed by char position: `true` at `i` means the
/// line may end before `chars[i]`.
fn break_opportunities(text: &str) -> Vec<bool> {
    let char_count = text.chars().count();
    let mut result = vec![false; char_count];

    // linebreaks() yields (byte_offset, opportunity) where the offset is the
    // start of the next segment; map byte offsets back to char indices.
    let mut byte_to_char = vec![0usize; text.len() + 1];
    let mut char_idx = 0;
    for (byte_idx, _) in text.char_indices() {
        byte_to_char[byte_idx] = char_idx;
        char_idx += 1;
    }
    byte_to_char[text.len()] = char_idx;

    for (byte_offset, opp) in linebreaks(text) {
        let idx = byte_to_char[byte_offset];
        // Break-at-end carries no information for a single segment, and
        // mandatory breaks cannot occur because hard breaks are split off
        // by the caller; treat anything else as an allowed boundary.
        if idx < char_count && matches!(opp, BreakOpportunity::Allowed | BreakOpportunity::Mandatory)
        {
            result[idx] = true;
        }
    }

    result
}

/// Fit as much of `text` as possible into `max_width`, resolving the line
/// end according to `strategy`. `measure` returns the advance width of one
/// character in points for the current font.
pub fn break_line<F>(text: &str, max_width: f64, strategy: WrapStrategy, measure: F) -> LineFit
where
    F: Fn(char) -> f64,
{
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return LineFit {
            text: String::new(),
            width: 0.0,
            rest: None,
        };
    }

    let widths: Vec<f64> = chars
        .iter()
        .map(|&c| if c == SOFT_HYPHEN { 0.0 } else { measure(c) })
        .collect();
    let breaks = break_opportunities(text);
    let hyphen_width = measure('-');

    let mut line_width = 0.0;
    // Break position: the line may end before chars[bp].
    let mut last_break: Option<usize> = None;

    for (i, &ch) in chars.iter().enumerate() {
        if i > 0 && breaks[i] {
            last_break = Some(i);
        }
        // A soft hyphen is an extra break point after itself.
        if ch == SOFT_HYPHEN {
            last_break = Some(i + 1);
            continue;
        }

        if line_width + widths[i] > max_width && i > 0 {
            if let Some(bp) = last_break {
                return fit_at(&chars, &widths, bp, hyphen_width);
            }
            if strategy.allows_char_split() {
                return fit_at(&chars, &widths, i, hyphen_width);
            }
            // Wrap prohibited and no boundary fits: hand everything back.
            return LineFit {
                text: String::new(),
                width: 0.0,
                rest: Some(text.to_string()),
            };
        }

        // Nothing fits at all. Character modes force minimal progress so a
        // pathologically narrow column still drains; word-only refuses.
        if line_width + widths[i] > max_width {
            return if strategy.allows_char_split() {
                fit_at(&chars, &widths, 1, hyphen_width)
            } else {
                LineFit {
                    text: String::new(),
                    width: 0.0,
                    rest: Some(text.to_string()),
                }
            };
        }

        line_width += widths[i];
    }

    LineFit {
        text: render_chars(&chars),
        width: trimmed_width(&chars, &widths),
        rest: None,
    }
}

/// Build the fit for a break before `chars[bp]`.
fn fit_at(chars: &[char], widths: &[f64], bp: usize, hyphen_width: f64) -> LineFit {
    let head = &chars[..bp];
    // Soft hyphens stay in the leftover: they are break opportunities for
    // whichever line the leftover lands on next.
    let rest: String = chars[bp..].iter().collect();

    let mut text = render_chars(head);
    let mut width = trimmed_width(head, &widths[..bp]);
    // Breaking right after a soft hyphen makes it visible.
    if head.last() == Some(&SOFT_HYPHEN) {
        text.push('-');
        width += hyphen_width;
    }

    LineFit {
        text,
        width,
        rest: if rest.is_empty() { None } else { Some(rest) },
    }
}

/// Chars to string with unused soft hyphens dropped.
fn render_chars(chars: &[char]) -> String {
    chars.iter().filter(|&&c| c != SOFT_HYPHEN).collect()
}

/// Line width with trailing spaces excluded from the measurement.
fn trimmed_width(chars: &[char], widths: &[f64]) -> f64 {
    let mut total: f64 = widths.iter().sum();
    for i in (0..chars.len()).rev() {
        if chars[i] != ' ' {
            break;
        }
        total -= widths[i];
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ten points per char makes the arithmetic readable.
    fn measure(_: char) -> f64 {
        10.0
    }

    #[test]
    fn everything_fits() {
        let fit = break_line("hello", 100.0, WrapStrategy::WordPreferred, measure);
        assert_eq!(fit.text, "hello");
        assert_eq!(fit.rest, None);
        assert!((fit.width - 50.0).abs() < 1e-9);
    }

    #[test]
    fn breaks_at_word_boundary() {
        // "aaa bbb ccc" in 80pt: "aaa bbb " is 80, "c" overflows; the last
        // boundary is before "ccc".
        let fit = break_line("aaa bbb ccc", 80.0, WrapStrategy::WordPreferred, measure);
        assert_eq!(fit.text, "aaa bbb ");
        assert_eq!(fit.rest.as_deref(), Some("ccc"));
        // Trailing space excluded from the drawn width.
        assert!((fit.width - 70.0).abs() < 1e-9);
    }

    #[test]
    fn word_only_refuses_char_split() {
        let fit = break_line("unbreakable", 50.0, WrapStrategy::WordOnly, measure);
        assert_eq!(fit.text, "");
        assert_eq!(fit.width, 0.0);
        assert_eq!(fit.rest.as_deref(), Some("unbreakable"));
    }

    #[test]
    fn word_only_still_breaks_at_boundaries() {
        let fit = break_line("word1 verylongword", 70.0, WrapStrategy::WordOnly, measure);
        assert_eq!(fit.text, "word1 ");
        assert_eq!(fit.rest.as_deref(), Some("verylongword"));
    }

    #[test]
    fn char_fallback_splits_long_word() {
        let fit = break_line("unbreakable", 50.0, WrapStrategy::CharFallback, measure);
        assert_eq!(fit.text, "unbre");
        assert_eq!(fit.rest.as_deref(), Some("akable"));
    }

    #[test]
    fn char_fallback_makes_minimal_progress() {
        // Narrower than a single character still drains one char at a time.
        let fit = break_line("ab", 5.0, WrapStrategy::CharFallback, measure);
        assert_eq!(fit.text, "a");
        assert_eq!(fit.rest.as_deref(), Some("b"));
    }

    #[test]
    fn soft_hyphen_breaks_visibly() {
        let fit = break_line("co\u{00AD}operate", 40.0, WrapStrategy::WordPreferred, measure);
        assert_eq!(fit.text, "co-");
        assert_eq!(fit.rest.as_deref(), Some("operate"));
        assert!((fit.width - 30.0).abs() < 1e-9);
    }

    #[test]
    fn unused_soft_hyphen_is_invisible() {
        let fit = break_line("co\u{00AD}op", 100.0, WrapStrategy::WordPreferred, measure);
        assert_eq!(fit.text, "coop");
        assert!((fit.width - 40.0).abs() < 1e-9);
    }
}
