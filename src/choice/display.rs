use crate::anchor::AnchorTarget;
use crate::placement::{HorizontalMode, VerticalMode};
use crate::text::TextLine;
use crate::theme::SkinType;

/// Attach the next choice window to a character.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BubbleSpec {
    pub target: AnchorTarget,
    pub position: VerticalMode,
    pub direction: HorizontalMode,
}

impl BubbleSpec {
    pub fn new(target: AnchorTarget) -> Self {
        Self { target, position: VerticalMode::Auto, direction: HorizontalMode::Auto }
    }
}

/// How the next choice window looks, set from event scripts before the
/// "show choices" command runs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChoiceDisplay {
    /// Header lines drawn above the choices.
    pub text: Vec<TextLine>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub skin_type: Option<SkinType>,
    pub bubble: Option<BubbleSpec>,
    /// Auto-resolve after this many frames at full openness; 0 disables.
    pub timer_frames: u32,
    /// On timeout pick the highlighted entry rather than the cancel slot.
    pub use_selection_on_timeout: bool,
}

/// Per-message settings shared by the interpreter and the windows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageSettings {
    pub choice: ChoiceDisplay,
}

impl MessageSettings {
    /// Script call: everything about the next choice window but its target.
    #[allow(clippy::too_many_arguments)]
    pub fn configure_choice_display(
        &mut self,
        text: Vec<TextLine>,
        x: Option<i32>,
        y: Option<i32>,
        skin_type: Option<SkinType>,
        bubble: Option<BubbleSpec>,
        timer_frames: u32,
        use_selection_on_timeout: bool,
    ) {
        self.choice = ChoiceDisplay { text, x, y, skin_type, bubble, timer_frames, use_selection_on_timeout };
    }

    /// Script call: bubble the next choice window over `event_id`
    /// (0 player, > 0 map event, < 0 follower).
    pub fn configure_bubble_target(
        &mut self,
        event_id: i32,
        position: Option<VerticalMode>,
        direction: Option<HorizontalMode>,
    ) {
        self.choice.bubble = Some(BubbleSpec {
            target: AnchorTarget::from_event_id(event_id),
            position: position.unwrap_or_default(),
            direction: direction.unwrap_or_default(),
        });
    }

    /// Back to defaults once a choice resolves.
    pub fn reset_choice(&mut self) {
        self.choice = ChoiceDisplay::default();
    }
}
