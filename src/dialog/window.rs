// =============================================================================
// DIALOG WINDOW — A message shown either in the host's message box or as a
// speech bubble over a character
//
// Default mode keeps the full-width box at the top, middle or bottom of the
// screen and pages every four lines. Bubble mode sizes the window to its text
// and places it with the same engine the choice list uses.
// =============================================================================

use super::escape::{DialogDirectives, scan_directives};
use super::reveal::{RevealSettings, RevealState, TextReveal};
use crate::geometry::{Point, Rect, Size};
use crate::host::HostContext;
use crate::input::{Trigger, Triggers};
use crate::placement::{PlacementEngine, PlacementRequest, PlacementResult};
use crate::text::{TextMeasure, message_line_width};
use crate::theme::{Decorations, decorate};
use crate::window::{DialogConfig, Openness, WindowFrame, WindowKind};

/// Lines the default message box shows per page.
pub const DEFAULT_VISIBLE_LINES: usize = 4;
/// Frames a pause ignores input after it starts.
const PAUSE_DELAY: u32 = 10;

/// Screen band of the default message box.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MessagePosition {
    Top,
    Middle,
    #[default]
    Bottom,
}

impl MessagePosition {
    /// Host parameter: 0 top, 1 middle, anything else bottom.
    pub fn from_param(param: u8) -> Self {
        match param {
            0 => Self::Top,
            1 => Self::Middle,
            _ => Self::Bottom,
        }
    }

    fn index(self) -> i32 {
        match self {
            Self::Top => 0,
            Self::Middle => 1,
            Self::Bottom => 2,
        }
    }
}

/// What the host passes in for one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageRequest {
    pub lines: Vec<String>,
    pub face_name: String,
    pub position: MessagePosition,
}

impl MessageRequest {
    pub fn new<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self { lines: lines.into_iter().map(Into::into).collect(), ..Self::default() }
    }
}

/// Bubble size for `lines`: widest line plus padding by the summed line
/// advances plus padding.
pub fn bubble_size(lines: &[&str], config: &DialogConfig, measure: &dyn TextMeasure) -> Size {
    let metrics = &config.metrics;
    let padding = metrics.standard_padding * 2;
    let w = lines
        .iter()
        .map(|l| message_line_width(l, measure) + padding)
        .max()
        .unwrap_or(0)
        .max(1);
    let h = lines.iter().map(|l| metrics.line_advance(l)).sum::<i32>() + padding;
    Size::new(w, h)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogPhase {
    Opening,
    Showing,
    Closing,
    Closed,
}

pub struct DialogWindow {
    frame: WindowFrame,
    directives: DialogDirectives,
    placement: Option<PlacementResult>,
    reveal: TextReveal,
    text_x: i32,
    padding: i32,
    decorations: Decorations,
    phase: DialogPhase,
    pause_delay: u32,
}

impl DialogWindow {
    pub fn open(request: &MessageRequest, ctx: &HostContext<'_>) -> Self {
        let config = &ctx.config.dialog;
        let screen = ctx.config.screen.size();
        let (text, mut directives) = scan_directives(&request.lines.join("\n"));

        let anchor = directives.target.and_then(|t| ctx.resolve_anchor(t));
        if anchor.is_none() {
            directives.clear_target();
        }

        let (rect, placement) = match anchor {
            Some(anchor) => {
                let lines: Vec<&str> = text.lines().collect();
                let size = bubble_size(&lines, config, ctx.measure);
                let request = PlacementRequest::new(size, screen, config.bubble)
                    .vertical(directives.position)
                    .horizontal(directives.direction);
                let placement = PlacementEngine::new(&config.arrows, ctx.catalog)
                    .themed(ctx.arrow_color())
                    .place(&request, Some(anchor));
                (placement.rect(), Some(placement))
            }
            None => (default_rect(request.position, config, screen), None),
        };

        let bubble = placement.is_some();
        let mut reveal = TextReveal::new(
            &text,
            RevealSettings {
                text_speed: config.text_speed,
                fade_duration: config.fade_duration,
                fading: config.fading,
                page_lines: (!bubble).then_some(DEFAULT_VISIBLE_LINES),
            },
        );
        if directives.no_fast_forward {
            reveal.disable_fast_forward();
        }

        let text_x = if bubble || request.face_name.is_empty() { 0 } else { config.face_indent };
        let mut frame = WindowFrame::new(WindowKind::Message, rect);
        frame.openness.open();
        tracing::debug!(bubble, chained = directives.chained, x = rect.x, y = rect.y, "message window opened");

        let mut window = Self {
            frame,
            directives,
            placement,
            reveal,
            text_x,
            padding: config.metrics.standard_padding,
            decorations: Decorations::default(),
            phase: DialogPhase::Opening,
            pause_delay: 0,
        };
        window.redecorate(ctx);
        window
    }

    pub fn frame(&self) -> &WindowFrame {
        &self.frame
    }

    pub fn rect(&self) -> Rect {
        self.frame.rect
    }

    pub fn is_bubble(&self) -> bool {
        self.placement.is_some()
    }

    pub fn directives(&self) -> &DialogDirectives {
        &self.directives
    }

    pub fn placement(&self) -> Option<&PlacementResult> {
        self.placement.as_ref()
    }

    pub fn reveal(&self) -> &TextReveal {
        &self.reveal
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Screen position of the first text line (clear of the face graphic).
    pub fn text_origin(&self) -> Point {
        let rect = self.frame.rect;
        Point::new(rect.x + self.padding + self.text_x, rect.y + self.padding)
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == DialogPhase::Closed
    }

    /// Bubble windows never show the pause sign.
    pub fn pause_sign_visible(&self) -> bool {
        !self.is_bubble() && self.phase == DialogPhase::Showing && self.reveal.state() != RevealState::Typing
    }

    /// Start closing now (scene change or host request).
    pub fn close(&mut self) {
        if matches!(self.phase, DialogPhase::Closing | DialogPhase::Closed) {
            return;
        }
        if let Some(p) = self.placement.as_mut() {
            p.arrow = None;
        }
        self.frame.openness.close();
        self.phase = DialogPhase::Closing;
    }

    /// Drop the window immediately.
    pub fn abort(&mut self) {
        self.close();
        self.frame.openness = Openness::closed();
        self.phase = DialogPhase::Closed;
    }

    pub fn update(&mut self, triggers: &Triggers, ctx: &HostContext<'_>) {
        match self.phase {
            DialogPhase::Closed => return,
            DialogPhase::Showing => self.update_text(triggers),
            DialogPhase::Opening | DialogPhase::Closing => {}
        }

        self.frame.openness.tick();
        match self.phase {
            DialogPhase::Opening if self.frame.openness.is_open() => self.phase = DialogPhase::Showing,
            DialogPhase::Closing if self.frame.openness.is_closed() => {
                tracing::debug!("message window closed");
                self.phase = DialogPhase::Closed;
            }
            _ => {}
        }

        if let Some(p) = self.placement.as_mut() {
            p.sync_arrow_visibility(self.frame.openness.value());
        }
        self.redecorate(ctx);
    }

    fn advance_pressed(&self, triggers: &Triggers) -> bool {
        // A bubble only answers to OK.
        triggers.is_triggered(Trigger::Ok) || (!self.is_bubble() && triggers.is_triggered(Trigger::Cancel))
    }

    fn update_text(&mut self, triggers: &Triggers) {
        match self.reveal.state() {
            RevealState::Typing => {
                if triggers.is_triggered(Trigger::Ok) {
                    self.reveal.request_fast_forward();
                }
                let waits_for_input = match self.reveal.update() {
                    RevealState::Typing => false,
                    RevealState::Paused => true,
                    RevealState::Finished => self.reveal.wants_end_pause(),
                };
                if waits_for_input {
                    self.pause_delay = PAUSE_DELAY;
                }
            }
            RevealState::Paused | RevealState::Finished if self.pause_delay > 0 => {
                self.pause_delay -= 1;
            }
            RevealState::Paused => {
                if self.advance_pressed(triggers) {
                    self.reveal.resume();
                }
            }
            RevealState::Finished => {
                if !self.reveal.wants_end_pause() || self.advance_pressed(triggers) {
                    self.close();
                }
            }
        }
    }

    fn redecorate(&mut self, ctx: &HostContext<'_>) {
        self.decorations = decorate(&self.frame, None, ctx.skin_color, ctx.config, ctx.measure, ctx.catalog);
    }
}

/// Full-width host message box in the band `position` names.
fn default_rect(position: MessagePosition, config: &DialogConfig, screen: Size) -> Rect {
    let h = config.metrics.fitting_height(DEFAULT_VISIBLE_LINES);
    let y = position.index() * (screen.h - h) / 2;
    Rect::new(0, y, screen.w, h)
}
