//! Bubble directives embedded in message text.
//!
//! `\BM[id]` bubbles the message over a character, `\BMC[id]` does the same
//! and chains following messages into the window, `\BMD[L|R]` forces the
//! arrow side and `\BMP[A|B]` forces above or below. `\A` anywhere disables
//! fast-forward for the whole message.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::anchor::AnchorTarget;
use crate::placement::{HorizontalMode, VerticalMode};

static BUBBLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\BM(C?)\[([+-]?\d+)\]").expect("valid regex"));
static DIRECTION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\BMD\[([LR])\]").expect("valid regex"));
static POSITION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\BMP\[([AB])\]").expect("valid regex"));
static NO_SKIP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\A").expect("valid regex"));
static CHAIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\BMC\[").expect("valid regex"));
static ANY_BUBBLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\BM[CDP]?\[").expect("valid regex"));

/// Settings collected from one message's directives.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogDirectives {
    /// Last `\BM`/`\BMC` target in the text.
    pub target: Option<AnchorTarget>,
    pub chained: bool,
    pub position: VerticalMode,
    pub direction: HorizontalMode,
    /// `\A` seen: the player cannot fast-forward this message.
    pub no_fast_forward: bool,
}

impl DialogDirectives {
    pub fn is_bubble(&self) -> bool {
        self.target.is_some()
    }

    /// Drop the bubble target (it did not resolve); forced modes are kept
    /// but have no effect in default placement.
    pub fn clear_target(&mut self) {
        self.target = None;
        self.chained = false;
    }
}

/// Strip every bubble directive from `text` and report what they asked for.
pub fn scan_directives(text: &str) -> (String, DialogDirectives) {
    let mut directives = DialogDirectives {
        no_fast_forward: NO_SKIP_RE.is_match(text),
        ..DialogDirectives::default()
    };

    let text = BUBBLE_RE.replace_all(text, |caps: &Captures| {
        if let Ok(id) = caps[2].parse::<i32>() {
            directives.target = Some(AnchorTarget::from_event_id(id));
            directives.chained = !caps[1].is_empty();
        }
        ""
    });
    let text = DIRECTION_RE.replace_all(&text, |caps: &Captures| {
        directives.direction = match caps[1].to_ascii_uppercase().as_str() {
            "L" => HorizontalMode::Left,
            _ => HorizontalMode::Right,
        };
        ""
    });
    let text = POSITION_RE.replace_all(&text, |caps: &Captures| {
        directives.position = match caps[1].to_ascii_uppercase().as_str() {
            "A" => VerticalMode::Above,
            _ => VerticalMode::Below,
        };
        ""
    });

    (text.into_owned(), directives)
}

/// True if `text` asks for chaining (`\BMC[`).
pub fn has_chain_directive(text: &str) -> bool {
    CHAIN_RE.is_match(text)
}

/// True if `text` carries any bubble directive; such a message starts a
/// window of its own instead of joining a chain.
pub fn has_bubble_directive(text: &str) -> bool {
    ANY_BUBBLE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bubble_target_is_stripped() {
        let (text, d) = scan_directives(r"\bm[3]Hello there.");
        assert_eq!(text, "Hello there.");
        assert_eq!(d.target, Some(AnchorTarget::MapEntity(3)));
        assert!(!d.chained);
    }

    #[test]
    fn chain_follower_and_forced_modes() {
        let (text, d) = scan_directives(r"\BMC[-1]\BMD[l]\bmp[B]Wait!");
        assert_eq!(text, "Wait!");
        assert_eq!(d.target, Some(AnchorTarget::Follower(0)));
        assert!(d.chained);
        assert_eq!(d.direction, HorizontalMode::Left);
        assert_eq!(d.position, VerticalMode::Below);
    }

    #[test]
    fn no_fast_forward_flag() {
        // `\A` directly followed by text still counts.
        assert!(scan_directives(r"\ALook.").1.no_fast_forward);
        assert!(scan_directives(r"Look.\a").1.no_fast_forward);
        assert!(!scan_directives(r"Look.").1.no_fast_forward);
    }

    #[test]
    fn chain_and_bubble_detection() {
        assert!(has_chain_directive(r"x\bmc[2]"));
        assert!(!has_chain_directive(r"\bm[2]"));
        assert!(has_bubble_directive(r"\BMP[a]"));
        assert!(!has_bubble_directive(r"\B plain"));
    }
}
