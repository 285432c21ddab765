// =============================================================================
// SESSION — The windows of one running map or battle scene
//
// Owns the message settings scripts write to, the active message, choice and
// popup windows, and a choice queued behind a message. The host calls
// `update` once per frame with that frame's triggers.
// =============================================================================

use futures_channel::oneshot;

use crate::audio::FeedbackSink;
use crate::choice::{
    ChoiceDisplay, ChoiceHandle, ChoiceOutcome, ChoiceWindow, MergedChoiceSet, MessageSettings, PredicateRegistry,
    RawChoiceBlock, collect_choice_blocks, merge_blocks,
};
use crate::command::EventCommand;
use crate::dialog::{DialogWindow, FollowUp, MessageRequest, collect_message};
use crate::host::{HostContext, SceneKind};
use crate::input::Triggers;
use crate::popup::{PopupWindow, gold_popup_text, item_popup_text};
use crate::text::TextLine;
use crate::theme::SkinType;
use crate::window::Config;

/// A choice waiting for the message in front of it to close.
struct QueuedChoice {
    set: MergedChoiceSet,
    display: ChoiceDisplay,
    tx: oneshot::Sender<ChoiceOutcome>,
}

/// What `show_event_message` consumed.
#[derive(Debug)]
pub struct EventMessage {
    /// Where the interpreter resumes.
    pub next: usize,
    pub follow_up: Option<FollowUp>,
    /// Set when the follow-up was a "show choices" command.
    pub choices: Option<ChoiceHandle>,
}

pub struct MessageSession {
    settings: MessageSettings,
    registry: PredicateRegistry,
    dialog: Option<DialogWindow>,
    choice: Option<ChoiceWindow>,
    queued: Option<QueuedChoice>,
    popup: Option<PopupWindow>,
    /// Settings still belong to the open choice and are reset on its outcome.
    settings_in_use: bool,
}

impl MessageSession {
    pub fn new(config: &Config) -> Self {
        Self {
            settings: MessageSettings::default(),
            registry: PredicateRegistry::new(config.choice.predicates.clone()),
            dialog: None,
            choice: None,
            queued: None,
            popup: None,
            settings_in_use: false,
        }
    }

    pub fn settings(&self) -> &MessageSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut MessageSettings {
        &mut self.settings
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    pub fn dialog(&self) -> Option<&DialogWindow> {
        self.dialog.as_ref()
    }

    pub fn choice(&self) -> Option<&ChoiceWindow> {
        self.choice.as_ref()
    }

    pub fn popup(&self) -> Option<&PopupWindow> {
        self.popup.as_ref()
    }

    pub fn has_queued_choice(&self) -> bool {
        self.queued.is_some()
    }

    /// A message or choice is on screen or waiting.
    pub fn is_busy(&self) -> bool {
        self.dialog.is_some() || self.choice.is_some() || self.queued.is_some()
    }

    /// Player movement and the menu are blocked while a popup is up.
    pub fn player_blocked(&self) -> bool {
        self.popup.is_some()
    }

    // ── Messages ──────────────────────────────────────────────────────────────

    pub fn show_message(&mut self, request: &MessageRequest, ctx: &HostContext<'_>) {
        if self.dialog.is_some() {
            tracing::warn!("message shown while another is open; replacing it");
        }
        self.dialog = Some(DialogWindow::open(request, ctx));
    }

    /// Run the "show text" command at `start`, folding in chained messages.
    /// A "show choices" follow-up opens once the message has closed.
    pub fn show_event_message(
        &mut self,
        commands: &[EventCommand],
        start: usize,
        ctx: &HostContext<'_>,
    ) -> Option<EventMessage> {
        let message = collect_message(commands, start)?;
        self.show_message(&MessageRequest::from(&message), ctx);

        let choices = match message.follow_up {
            Some(FollowUp::Choices(index)) => Some(self.show_choice_commands(commands, index, ctx)),
            _ => None,
        };
        Some(EventMessage { next: message.next, follow_up: message.follow_up, choices })
    }

    // ── Choices ───────────────────────────────────────────────────────────────

    /// Merge `blocks` and open them as one choice window, or queue it behind
    /// the open message.
    pub fn show_choices(&mut self, blocks: &[RawChoiceBlock], ctx: &HostContext<'_>) -> ChoiceHandle {
        let set = merge_blocks(blocks, ctx.config.choice.merge_stride);
        let display = self.settings.choice.clone();
        let (tx, handle) = ChoiceHandle::channel();

        if let Some(old) = self.choice.as_mut() {
            tracing::warn!("choice shown while another is open; aborting it");
            old.abort();
        }
        self.queued = None;

        if self.dialog.is_some() {
            tracing::debug!("choice queued behind message");
            self.queued = Some(QueuedChoice { set, display, tx });
            self.settings_in_use = true;
        } else {
            self.open_choice(&set, &display, tx, ctx);
        }
        handle
    }

    /// Gather the "show choices" commands from `start` and show them.
    pub fn show_choice_commands(
        &mut self,
        commands: &[EventCommand],
        start: usize,
        ctx: &HostContext<'_>,
    ) -> ChoiceHandle {
        let blocks = collect_choice_blocks(commands, start);
        self.show_choices(&blocks, ctx)
    }

    fn open_choice(
        &mut self,
        set: &MergedChoiceSet,
        display: &ChoiceDisplay,
        tx: oneshot::Sender<ChoiceOutcome>,
        ctx: &HostContext<'_>,
    ) {
        let window = ChoiceWindow::open_with(set, display, &self.registry, ctx, tx);
        self.settings_in_use = true;
        self.choice = Some(window);
        self.release_settings();
    }

    fn release_settings(&mut self) {
        let resolved = self.choice.as_ref().is_some_and(|c| c.outcome().is_some());
        if self.settings_in_use && resolved {
            self.settings.reset_choice();
            self.settings_in_use = false;
        }
    }

    // ── Popups ────────────────────────────────────────────────────────────────

    /// Open a popup. Only the map scene shows popups; returns false elsewhere.
    pub fn show_popup(
        &mut self,
        lines: Vec<TextLine>,
        x: Option<i32>,
        y: Option<i32>,
        skin_type: Option<SkinType>,
        ctx: &HostContext<'_>,
    ) -> bool {
        if ctx.scene != SceneKind::Map {
            tracing::debug!(scene = ?ctx.scene, "popup outside the map scene ignored");
            return false;
        }
        self.popup = Some(PopupWindow::open(lines, x, y, skin_type, ctx));
        true
    }

    pub fn show_gold_popup(&mut self, amount: i64, ctx: &HostContext<'_>) -> bool {
        self.show_popup(gold_popup_text(amount, &ctx.config.popup), None, None, None, ctx)
    }

    pub fn show_item_popup(&mut self, name: &str, quantity: u32, ctx: &HostContext<'_>) -> bool {
        self.show_popup(item_popup_text(name, quantity, &ctx.config.popup), None, None, None, ctx)
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Tear every window down (scene change). Pending handles resolve to
    /// `ChoiceOutcome::Aborted`.
    pub fn abort_all(&mut self) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.abort();
        }
        if let Some(choice) = self.choice.as_mut() {
            choice.abort();
        }
        if let Some(popup) = self.popup.as_mut() {
            popup.abort();
        }
        self.dialog = None;
        self.choice = None;
        self.queued = None;
        self.popup = None;
        self.settings.reset_choice();
        self.settings_in_use = false;
    }

    /// Advance every window by one frame.
    pub fn update(&mut self, triggers: &Triggers, feedback: &mut dyn FeedbackSink, ctx: &HostContext<'_>) {
        if let Some(dialog) = self.dialog.as_mut() {
            dialog.update(triggers, ctx);
            if dialog.is_closed() {
                self.dialog = None;
                if let Some(QueuedChoice { set, display, tx }) = self.queued.take() {
                    self.open_choice(&set, &display, tx, ctx);
                }
            }
        }

        if let Some(choice) = self.choice.as_mut() {
            choice.update(triggers, feedback, ctx);
            self.release_settings();
            if self.choice.as_ref().is_some_and(ChoiceWindow::is_closed) {
                self.choice = None;
            }
        }

        if let Some(popup) = self.popup.as_mut() {
            popup.update(triggers, feedback, ctx);
            if popup.is_closed() {
                self.popup = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::StaticAnchors;
    use crate::assets::MemoryCatalog;
    use crate::audio::RecordingFeedback;
    use crate::choice::CancelType;
    use crate::expr::ExprError;
    use crate::input::Trigger;
    use crate::text::MonospaceMeasure;
    use crate::theme::SkinColor;

    fn always(_: &str) -> Result<bool, ExprError> {
        Ok(true)
    }

    fn ctx<'a>(
        config: &'a Config,
        measure: &'a MonospaceMeasure,
        catalog: &'a MemoryCatalog,
        anchors: &'a StaticAnchors,
        scene: SceneKind,
    ) -> HostContext<'a> {
        HostContext { config, measure, catalog, anchors, evaluator: &always, scene, skin_color: SkinColor::Grey }
    }

    #[test]
    fn popup_only_on_map() {
        let config = Config::default();
        let (m, c, a) = (MonospaceMeasure::default(), MemoryCatalog::new(), StaticAnchors::new());
        let mut session = MessageSession::new(&config);
        assert!(!session.show_gold_popup(10, &ctx(&config, &m, &c, &a, SceneKind::Battle)));
        assert!(!session.player_blocked());
        assert!(session.show_gold_popup(10, &ctx(&config, &m, &c, &a, SceneKind::Map)));
        assert!(session.player_blocked());
    }

    #[test]
    fn settings_reset_once_choice_resolves() {
        let config = Config::default();
        let (m, c, a) = (MonospaceMeasure::default(), MemoryCatalog::new(), StaticAnchors::new());
        let ctx = ctx(&config, &m, &c, &a, SceneKind::Map);
        let mut session = MessageSession::new(&config);
        session.settings_mut().choice.timer_frames = 1;
        let mut handle = session.show_choices(&[RawChoiceBlock::new(["A", "B"], CancelType::Disallow)], &ctx);
        assert_eq!(session.settings().choice.timer_frames, 1);

        let mut fb = RecordingFeedback::new();
        for _ in 0..20 {
            session.update(&Triggers::none(), &mut fb, &ctx);
        }
        assert_eq!(handle.try_outcome(), Some(ChoiceOutcome::TimedOut(Some(1))));
        assert_eq!(session.settings().choice, ChoiceDisplay::default());
    }

    #[test]
    fn abort_all_drops_queued_choice() {
        let config = Config::default();
        let (m, c, a) = (MonospaceMeasure::default(), MemoryCatalog::new(), StaticAnchors::new());
        let ctx = ctx(&config, &m, &c, &a, SceneKind::Map);
        let mut session = MessageSession::new(&config);
        session.show_message(&MessageRequest::new(["Hi"]), &ctx);
        let handle = session.show_choices(&[RawChoiceBlock::new(["A"], CancelType::Disallow)], &ctx);
        assert!(session.has_queued_choice());
        session.abort_all();
        assert!(!session.is_busy());
        assert_eq!(pollster::block_on(handle), ChoiceOutcome::Aborted);
    }

    #[test]
    fn ok_closes_popup() {
        let config = Config::default();
        let (m, c, a) = (MonospaceMeasure::default(), MemoryCatalog::new(), StaticAnchors::new());
        let ctx = ctx(&config, &m, &c, &a, SceneKind::Map);
        let mut session = MessageSession::new(&config);
        session.show_item_popup("Potion", 2, &ctx);
        let mut fb = RecordingFeedback::new();
        for _ in 0..30 {
            session.update(&Triggers::of(&[Trigger::Ok]), &mut fb, &ctx);
        }
        assert!(!session.player_blocked());
        assert_eq!(fb.played, vec![crate::audio::Sfx::PopupClose]);
    }
}
