//! Message windows: bubble directives, chained messages and paced text.

pub mod chain;
pub mod escape;
pub mod reveal;
pub mod window;

pub use chain::{CollectedMessage, FollowUp, collect_message};
pub use escape::{DialogDirectives, has_bubble_directive, has_chain_directive, scan_directives};
pub use reveal::{Glyph, GlyphKind, RevealSettings, RevealState, TextReveal};
pub use window::{DEFAULT_VISIBLE_LINES, DialogPhase, DialogWindow, MessagePosition, MessageRequest, bubble_size};

impl From<&CollectedMessage> for MessageRequest {
    fn from(message: &CollectedMessage) -> Self {
        Self {
            lines: message.lines.clone(),
            face_name: message.face_name.clone(),
            position: MessagePosition::from_param(message.position),
        }
    }
}
