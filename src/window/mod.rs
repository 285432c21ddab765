pub mod config;

pub use config::{
    ArrowNames, ArrowSprites, BubbleLayout, Capabilities, ChoiceConfig, Config, ConfigError,
    DialogConfig, PopupConfig, ScreenConfig, WindowMetrics,
};

use serde::Deserialize;

use crate::geometry::Rect;

/// Fully open.
pub const OPENNESS_MAX: u8 = 255;
/// Openness gained or lost per frame while a window animates.
pub const OPEN_SPEED: u8 = 48;

// ── WindowKind ────────────────────────────────────────────────────────────────

/// Every window type the theming layers can be configured for.
///
/// Only the first three are built by this crate; the rest exist so skin,
/// shadow and header tables can name the host's own windows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum WindowKind {
    ChoiceList,
    Message,
    Popup,
    Help,
    Gold,
    MenuCommand,
    MenuStatus,
    ItemList,
    SkillList,
    EquipSlot,
    Status,
    ShopBuy,
    ShopSell,
    NameEdit,
    TitleCommand,
    BattleLog,
    BattleStatus,
    BattleActor,
    BattleEnemy,
}

// ── Openness ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Transition {
    Idle,
    Opening,
    Closing,
}

/// Open/close animation state: 0 is fully closed, 255 fully open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Openness {
    value: u8,
    transition: Transition,
}

impl Openness {
    pub fn closed() -> Self {
        Self { value: 0, transition: Transition::Idle }
    }

    pub fn opened() -> Self {
        Self { value: OPENNESS_MAX, transition: Transition::Idle }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn open(&mut self) {
        if self.value < OPENNESS_MAX {
            self.transition = Transition::Opening;
        }
    }

    pub fn close(&mut self) {
        if self.value > 0 {
            self.transition = Transition::Closing;
        }
    }

    /// Advance the animation by one frame.
    pub fn tick(&mut self) {
        match self.transition {
            Transition::Idle => {}
            Transition::Opening => {
                self.value = self.value.saturating_add(OPEN_SPEED);
                if self.value == OPENNESS_MAX {
                    self.transition = Transition::Idle;
                }
            }
            Transition::Closing => {
                self.value = self.value.saturating_sub(OPEN_SPEED);
                if self.value == 0 {
                    self.transition = Transition::Idle;
                }
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.value == OPENNESS_MAX
    }

    pub fn is_closed(&self) -> bool {
        self.value == 0
    }

    pub fn is_opening(&self) -> bool {
        self.transition == Transition::Opening
    }

    pub fn is_closing(&self) -> bool {
        self.transition == Transition::Closing
    }
}

impl Default for Openness {
    fn default() -> Self {
        Self::closed()
    }
}

// ── WindowFrame ───────────────────────────────────────────────────────────────

/// The host-visible state of one window: where it is, whether it is shown,
/// how far open it is and how opaque its background is.
///
/// Shadows and headers follow a frame rather than a concrete window type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WindowFrame {
    pub kind: WindowKind,
    pub rect: Rect,
    pub visible: bool,
    pub openness: Openness,
    pub opacity: u8,
}

impl WindowFrame {
    pub fn new(kind: WindowKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            visible: true,
            openness: Openness::closed(),
            opacity: 255,
        }
    }

    /// Visible and fully open.
    pub fn is_showing(&self) -> bool {
        self.visible && self.openness.is_open()
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_takes_six_frames() {
        let mut o = Openness::closed();
        o.open();
        let mut frames = 0;
        while !o.is_open() {
            o.tick();
            frames += 1;
        }
        // 48 * 5 = 240, sixth frame saturates at 255.
        assert_eq!(frames, 6);
        assert!(!o.is_opening());
    }

    #[test]
    fn closing_saturates_at_zero() {
        let mut o = Openness::opened();
        o.close();
        for _ in 0..10 {
            o.tick();
        }
        assert!(o.is_closed());
        assert!(!o.is_closing());
    }

    #[test]
    fn open_on_open_window_is_noop() {
        let mut o = Openness::opened();
        o.open();
        assert!(!o.is_opening());
    }

    #[test]
    fn frame_is_showing_only_when_open_and_visible() {
        let mut f = WindowFrame::new(WindowKind::Popup, Rect::new(0, 0, 10, 10));
        assert!(!f.is_showing());
        f.openness = Openness::opened();
        assert!(f.is_showing());
        f.visible = false;
        assert!(!f.is_showing());
    }
}
