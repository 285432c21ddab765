//! Text measurement and control-code stripping for window sizing.
//!
//! Glyph metrics belong to the host; this module only decides *which*
//! characters get measured and adds the fixed width of inline icons.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::window::WindowMetrics;

/// Width of one inline `\i[n]` icon.
pub const ICON_WIDTH: i32 = 24;

static ICON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\i\[\d{0,3}\]").expect("valid regex"));
static CONDITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\cc\[[^\]]+\]").expect("valid regex"));
/// Numbered codes that draw nothing (colour, font size, waits...). Name,
/// variable, party and gold codes expand into text and are kept.
static SILENT_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[^invpgINVPG]\[\d{0,3}\]").expect("valid regex"));
/// Single-character message controls.
static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[.|!><^{}$A]").expect("valid regex"));

/// Any lettered code with a numeric parameter (`\W[60]`, `\SP[30]`, `\C[2]`).
static BRACKET_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\\[A-Z]+\[\d+\]").expect("valid regex"));
/// Lettered codes without a parameter.
static BARE_CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\[A-Z]+").expect("valid regex"));

// ── TextMeasure ───────────────────────────────────────────────────────────────

/// Host text metrics.
pub trait TextMeasure {
    /// Pixel width of `text`, which is already free of control codes.
    fn text_width(&self, text: &str) -> i32;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> i32,
{
    fn text_width(&self, text: &str) -> i32 {
        self(text)
    }
}

/// Every character has the same advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MonospaceMeasure {
    pub advance: i32,
}

impl MonospaceMeasure {
    pub fn new(advance: i32) -> Self {
        Self { advance }
    }
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self { advance: 12 }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn text_width(&self, text: &str) -> i32 {
        text.chars().count() as i32 * self.advance
    }
}

// ── Stripping ─────────────────────────────────────────────────────────────────

/// Remove every `\cc[...]` condition marker.
pub fn strip_condition_markers(text: &str) -> String {
    CONDITION_RE.replace_all(text, "").into_owned()
}

/// Reduce `text` to the characters that occupy horizontal space, returning
/// the remaining text and the number of icons removed.
pub fn measurable_text(text: &str) -> (String, usize) {
    let icons = ICON_RE.find_iter(text).count();
    let stripped = strip_condition_markers(text);
    let stripped = SILENT_CODE_RE.replace_all(&stripped, "");
    let stripped = ICON_RE.replace_all(&stripped, "");
    let stripped = CONTROL_RE.replace_all(&stripped, "");
    (stripped.replace("\\\\", "\\"), icons)
}

/// Display width of a line that may contain control codes and icons.
pub fn display_width(text: &str, measure: &dyn TextMeasure) -> i32 {
    if text.is_empty() {
        return 0;
    }
    let (plain, icons) = measurable_text(text);
    measure.text_width(&plain) + icons as i32 * ICON_WIDTH
}

/// Width of one message line. Every code is dropped, including the
/// pacing codes a choice list never contains.
pub fn message_line_width(text: &str, measure: &dyn TextMeasure) -> i32 {
    let icons = ICON_RE.find_iter(text).count() as i32;
    let stripped = ICON_RE.replace_all(text, "");
    let stripped = CONTROL_RE.replace_all(&stripped, "");
    let stripped = BRACKET_CODE_RE.replace_all(&stripped, "");
    let stripped = BARE_CODE_RE.replace_all(&stripped, "");
    let stripped = stripped.replace("\\\\", "\\");
    measure.text_width(&stripped) + icons * ICON_WIDTH
}

// ── TextLine ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// One header line drawn above a choice list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub align: Align,
}

impl TextLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), align: Align::Left }
    }

    pub fn aligned(text: impl Into<String>, align: Align) -> Self {
        Self { text: text.into(), align }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// X offset of this line inside a content area `content_width` wide.
    pub fn x_offset(&self, content_width: i32, measure: &dyn TextMeasure) -> i32 {
        match self.align {
            Align::Left => 0,
            Align::Center => (content_width - display_width(&self.text, measure)) / 2,
            Align::Right => content_width - display_width(&self.text, measure),
        }
    }
}

impl From<&str> for TextLine {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for TextLine {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Total height of `lines`, honouring compact spacing for blank lines.
pub fn lines_height(lines: &[TextLine], metrics: &WindowMetrics) -> i32 {
    lines.iter().map(|l| metrics.line_advance(&l.text)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_count_as_fixed_width() {
        let m = MonospaceMeasure::new(10);
        assert_eq!(display_width(r"\i[12]Potion", &m), 24 + 60);
        assert_eq!(display_width(r"\i[1]\i[2]", &m), 48);
    }

    #[test]
    fn colour_codes_are_removed_but_name_codes_kept() {
        let (plain, icons) = measurable_text(r"\c[14]Gold\c[0] for \n[1]");
        assert_eq!(plain, r"Gold for \n[1]");
        assert_eq!(icons, 0);
    }

    #[test]
    fn condition_markers_are_not_measured() {
        let m = MonospaceMeasure::new(1);
        assert_eq!(display_width(r"\cc[s1]Yes", &m), 3);
        assert_eq!(display_width(r"Yes\CC[:rich]", &m), 3);
    }

    #[test]
    fn single_char_controls_are_removed() {
        let (plain, _) = measurable_text(r"Wait\.\|for\!it\\");
        assert_eq!(plain, r"Waitforit\");
    }

    #[test]
    fn message_width_drops_pacing_codes() {
        let m = MonospaceMeasure::new(1);
        assert_eq!(message_line_width(r"\SP[10]Hi\W[30]\.there\i[4]", &m), 7 + 24);
        assert_eq!(message_line_width(r"\C[2]Red\C[0]", &m), 3);
    }

    #[test]
    fn alignment_offsets() {
        let m = MonospaceMeasure::new(10);
        let line = TextLine::aligned("abcd", Align::Center);
        assert_eq!(line.x_offset(100, &m), 30);
        let line = TextLine::aligned("abcd", Align::Right);
        assert_eq!(line.x_offset(100, &m), 60);
        assert_eq!(TextLine::new("abcd").x_offset(100, &m), 0);
    }

    #[test]
    fn blank_lines_use_compact_height() {
        let lines = vec![TextLine::new("Title"), TextLine::new(""), TextLine::new("Sub")];
        assert_eq!(lines_height(&lines, &WindowMetrics::default()), 24 + 6 + 24);
    }
}
