// =============================================================================
// CHOICE WINDOW — One "show choices" invocation from open to close
//
// Lifecycle: built from a merged set, opened, active until the player picks,
// cancels or the auto-resolve timer runs out, then closing and closed. The
// outcome is delivered through a `ChoiceHandle` as soon as the window leaves
// the active state.
// =============================================================================

use futures_channel::oneshot;

use super::display::ChoiceDisplay;
use super::filter::{ChoiceEntry, ChoiceFilter};
use super::handle::{ChoiceHandle, ChoiceOutcome};
use super::merge::{CancelSlot, MergedChoiceSet};
use super::registry::PredicateRegistry;
use crate::audio::{FeedbackSink, Sfx};
use crate::geometry::{Rect, Size};
use crate::host::HostContext;
use crate::input::{Trigger, Triggers};
use crate::placement::{PlacementEngine, PlacementRequest, PlacementResult, place_default};
use crate::text::{TextLine, TextMeasure, display_width};
use crate::theme::{Decorations, SkinType, decorate};
use crate::window::{ChoiceConfig, Openness, WindowFrame, WindowKind};

/// Space between the widest choice and the window edge, besides padding.
const CHOICE_TEXT_MARGIN: i32 = 4;

// ── Sizing ────────────────────────────────────────────────────────────────────

/// Window size for `header` lines above `entries`, capped at the screen width.
pub fn choice_window_size(
    header: &[TextLine],
    entries: &[ChoiceEntry],
    config: &ChoiceConfig,
    screen: Size,
    measure: &dyn TextMeasure,
) -> Size {
    let metrics = &config.metrics;

    let header_width = header.iter().map(|l| display_width(&l.text, measure)).max().unwrap_or(0);
    let entry_width = entries
        .iter()
        .map(|e| display_width(&e.text, measure) + config.cursor_offset_x + CHOICE_TEXT_MARGIN)
        .max()
        .unwrap_or(0);
    let content = config.min_width.max(header_width).max(entry_width);
    let w = (content + metrics.standard_padding * 2).min(screen.w);

    let mut h = metrics.fitting_height(header.len() + entries.len());
    if metrics.compact_spacing {
        let blank = header.iter().filter(|l| l.is_blank()).count() as i32;
        h -= blank * (metrics.line_height - metrics.compact_line_height);
    }

    Size::new(w, h)
}

// ── Timer ─────────────────────────────────────────────────────────────────────

/// Auto-resolve countdown. Counts only while the window is fully open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ChoiceTimer {
    remaining: u32,
    use_selection: bool,
}

// ── ChoiceWindow ──────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChoicePhase {
    /// Open animation running; input ignored.
    Opening,
    /// Fully open and waiting for the player.
    Active,
    /// Resolved, close animation running.
    Closing,
    Closed,
}

pub struct ChoiceWindow {
    frame: WindowFrame,
    header: Vec<TextLine>,
    entries: Vec<ChoiceEntry>,
    cancel: Option<CancelSlot>,
    index: usize,
    placement: PlacementResult,
    skin_type: Option<SkinType>,
    decorations: Decorations,
    timer: Option<ChoiceTimer>,
    phase: ChoicePhase,
    /// Cleared by the host while another window owns input.
    active: bool,
    outcome: Option<ChoiceOutcome>,
    tx: Option<oneshot::Sender<ChoiceOutcome>>,
}

impl ChoiceWindow {
    /// Filter `set`, size and place the window, and start opening it.
    ///
    /// When nothing survives filtering the returned window is already closed
    /// and the handle resolves to `ChoiceOutcome::Empty`.
    pub fn open(
        set: &MergedChoiceSet,
        display: &ChoiceDisplay,
        registry: &PredicateRegistry,
        ctx: &HostContext<'_>,
    ) -> (Self, ChoiceHandle) {
        let (tx, handle) = ChoiceHandle::channel();
        (Self::open_with(set, display, registry, ctx, tx), handle)
    }

    /// Open a window answering on an existing channel (a choice that was
    /// queued behind a message).
    pub(crate) fn open_with(
        set: &MergedChoiceSet,
        display: &ChoiceDisplay,
        registry: &PredicateRegistry,
        ctx: &HostContext<'_>,
        tx: oneshot::Sender<ChoiceOutcome>,
    ) -> Self {
        let entries = ChoiceFilter::new(registry, ctx.evaluator).filter_visible(set);
        let config = &ctx.config.choice;
        let screen = ctx.config.screen.size();

        let size = choice_window_size(&display.text, &entries, config, screen, ctx.measure);
        let request = PlacementRequest::new(size, screen, config.bubble).at(display.x, display.y);
        let placement = match display.bubble {
            Some(bubble) => {
                let request = request.vertical(bubble.position).horizontal(bubble.direction);
                PlacementEngine::new(&config.arrows, ctx.catalog)
                    .themed(ctx.arrow_color())
                    .place(&request, ctx.resolve_anchor(bubble.target))
            }
            None => place_default(&request),
        };

        let frame = WindowFrame::new(WindowKind::ChoiceList, placement.rect());
        let timer = (display.timer_frames > 0).then_some(ChoiceTimer {
            remaining: display.timer_frames,
            use_selection: display.use_selection_on_timeout,
        });

        let mut window = Self {
            frame,
            header: display.text.clone(),
            entries,
            cancel: set.cancel,
            index: 0,
            placement,
            skin_type: display.skin_type,
            decorations: Decorations::default(),
            timer,
            phase: ChoicePhase::Opening,
            active: true,
            outcome: None,
            tx: Some(tx),
        };

        if window.entries.is_empty() {
            tracing::debug!("every choice filtered out; resolving without a window");
            window.frame.visible = false;
            window.phase = ChoicePhase::Closed;
            window.placement.arrow = None;
            window.timer = None;
            window.send(ChoiceOutcome::Empty);
            return window;
        }

        window.frame.openness.open();
        window.redecorate(ctx);
        tracing::debug!(entries = window.entries.len(), bubble = window.placement.is_bubble(), "choice window opened");
        window
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn frame(&self) -> &WindowFrame {
        &self.frame
    }

    pub fn rect(&self) -> Rect {
        self.frame.rect
    }

    pub fn placement(&self) -> &PlacementResult {
        &self.placement
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    pub fn header(&self) -> &[TextLine] {
        &self.header
    }

    pub fn entries(&self) -> &[ChoiceEntry] {
        &self.entries
    }

    pub fn phase(&self) -> ChoicePhase {
        self.phase
    }

    /// Index into `entries()` of the highlighted choice.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_entry(&self) -> Option<&ChoiceEntry> {
        self.entries.get(self.index)
    }

    pub fn outcome(&self) -> Option<ChoiceOutcome> {
        self.outcome
    }

    /// Frames left on the auto-resolve timer, if one is running.
    pub fn timer_remaining(&self) -> Option<u32> {
        self.timer.map(|t| t.remaining)
    }

    pub fn is_closed(&self) -> bool {
        self.phase == ChoicePhase::Closed
    }

    // ── Host controls ─────────────────────────────────────────────────────────

    /// Enable or disable the entry answering with `slot`. Returns false when
    /// no visible entry has that slot.
    pub fn set_enabled(&mut self, slot: usize, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.slot == slot) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Tear the window down without a result (scene change). The handle
    /// resolves to `ChoiceOutcome::Aborted`.
    pub fn abort(&mut self) {
        if self.tx.take().is_some() {
            tracing::debug!("choice window aborted");
        }
        self.release();
        self.frame.openness = Openness::closed();
        self.phase = ChoicePhase::Closed;
    }

    // ── Frame update ──────────────────────────────────────────────────────────

    /// Advance one frame with this frame's triggers.
    pub fn update(&mut self, triggers: &Triggers, feedback: &mut dyn FeedbackSink, ctx: &HostContext<'_>) {
        match self.phase {
            ChoicePhase::Closed => return,
            ChoicePhase::Active => {
                if !self.tick_timer() && self.active {
                    self.handle_input(triggers, feedback);
                }
            }
            ChoicePhase::Opening | ChoicePhase::Closing => {}
        }

        self.frame.openness.tick();
        match self.phase {
            ChoicePhase::Opening if self.frame.openness.is_open() => {
                tracing::debug!("choice window active");
                self.phase = ChoicePhase::Active;
            }
            ChoicePhase::Closing if self.frame.openness.is_closed() => {
                self.phase = ChoicePhase::Closed;
            }
            _ => {}
        }

        self.placement.sync_arrow_visibility(self.frame.openness.value());
        self.redecorate(ctx);
    }

    /// Count the timer down; true if it fired this frame.
    fn tick_timer(&mut self) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        timer.remaining = timer.remaining.saturating_sub(1);
        if timer.remaining > 0 {
            return false;
        }
        let use_selection = timer.use_selection;
        let slot = self.timeout_slot(use_selection);
        tracing::debug!(?slot, "choice timer expired");
        self.resolve(ChoiceOutcome::TimedOut(slot));
        true
    }

    fn timeout_slot(&self, use_selection: bool) -> Option<usize> {
        if use_selection {
            if let Some(entry) = self.current_entry().filter(|e| e.enabled) {
                return Some(entry.slot);
            }
        }
        match self.cancel {
            Some(CancelSlot::Branch(value)) => return Some(value),
            Some(CancelSlot::Choice(slot)) => {
                if let Some(entry) = self.entries.iter().find(|e| e.slot == slot && e.enabled) {
                    return Some(entry.slot);
                }
            }
            None => {}
        }
        self.entries.last().filter(|e| e.enabled).map(|e| e.slot)
    }

    fn handle_input(&mut self, triggers: &Triggers, feedback: &mut dyn FeedbackSink) {
        let len = self.entries.len();
        if triggers.is_triggered(Trigger::Ok) {
            match self.current_entry() {
                Some(entry) if entry.enabled => {
                    let slot = entry.slot;
                    feedback.play(Sfx::Decision);
                    self.resolve(ChoiceOutcome::Chosen(slot));
                }
                _ => feedback.play(Sfx::Buzzer),
            }
        } else if triggers.is_triggered(Trigger::Cancel) {
            self.process_cancel(feedback);
        } else if triggers.is_triggered(Trigger::Down) {
            self.index = (self.index + 1) % len;
            feedback.play(Sfx::Cursor);
        } else if triggers.is_triggered(Trigger::Up) {
            self.index = (self.index + len - 1) % len;
            feedback.play(Sfx::Cursor);
        }
    }

    fn process_cancel(&mut self, feedback: &mut dyn FeedbackSink) {
        match self.cancel {
            None => {
                let last = self.entries.len() - 1;
                if self.index != last {
                    self.index = last;
                    feedback.play(Sfx::Cursor);
                }
            }
            Some(CancelSlot::Branch(value)) => {
                feedback.play(Sfx::Cancel);
                self.resolve(ChoiceOutcome::Cancelled(value));
            }
            Some(CancelSlot::Choice(slot)) => {
                match self.entries.iter().find(|e| e.slot == slot) {
                    Some(entry) if entry.enabled => {
                        feedback.play(Sfx::Cancel);
                        self.resolve(ChoiceOutcome::Cancelled(slot));
                    }
                    // Filtered out or disabled: cancel is refused.
                    _ => feedback.play(Sfx::Buzzer),
                }
            }
        }
    }

    fn resolve(&mut self, outcome: ChoiceOutcome) {
        tracing::debug!(?outcome, "choice resolved");
        self.send(outcome);
        self.release();
        self.frame.openness.close();
        self.phase = ChoicePhase::Closing;
    }

    fn send(&mut self, outcome: ChoiceOutcome) {
        self.outcome = Some(outcome);
        if let Some(tx) = self.tx.take() {
            // The caller may have stopped waiting.
            let _ = tx.send(outcome);
        }
    }

    /// Reset the timer and drop the arrow.
    fn release(&mut self) {
        self.timer = None;
        self.placement.arrow = None;
    }

    fn redecorate(&mut self, ctx: &HostContext<'_>) {
        self.decorations = decorate(
            &self.frame,
            self.skin_type,
            ctx.skin_color,
            ctx.config,
            ctx.measure,
            ctx.catalog,
        );
    }
}
