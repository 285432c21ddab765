//! Centred notice window ("Received 100 Gil!") that blocks the player until
//! dismissed.

use crate::audio::{FeedbackSink, Sfx};
use crate::geometry::{Point, Rect, Size, centered_origin};
use crate::host::HostContext;
use crate::input::{Trigger, Triggers};
use crate::text::{TextLine, TextMeasure, display_width, lines_height};
use crate::theme::{Decorations, SkinType, decorate};
use crate::window::{Openness, PopupConfig, WindowFrame, WindowKind};

/// Lines announcing `amount` of currency.
pub fn gold_popup_text(amount: i64, config: &PopupConfig) -> Vec<TextLine> {
    received(&format!("{amount} {}", config.currency_name), config)
}

/// Lines announcing `quantity` of an item; the count is omitted for one.
pub fn item_popup_text(name: &str, quantity: u32, config: &PopupConfig) -> Vec<TextLine> {
    if quantity > 1 {
        received(&format!("{quantity}x {name}"), config)
    } else {
        received(name, config)
    }
}

fn received(what: &str, config: &PopupConfig) -> Vec<TextLine> {
    vec![
        TextLine::new(""),
        TextLine::new(format!("Received \\c[{}]{what}\\c[0]!", config.highlight_color)),
        TextLine::new(""),
    ]
}

/// Popup size: widest line and the stacked line advances, plus padding.
pub fn popup_size(lines: &[TextLine], config: &PopupConfig, measure: &dyn TextMeasure) -> Size {
    let padding = config.metrics.standard_padding * 2;
    let w = lines.iter().map(|l| display_width(&l.text, measure)).max().unwrap_or(0) + padding;
    let h = lines_height(lines, &config.metrics) + padding;
    Size::new(w.max(1), h)
}

pub struct PopupWindow {
    frame: WindowFrame,
    lines: Vec<TextLine>,
    skin_type: Option<SkinType>,
    decorations: Decorations,
}

impl PopupWindow {
    /// Size the popup to `lines` and start opening it. Each axis is centred
    /// unless given.
    pub fn open(
        lines: Vec<TextLine>,
        x: Option<i32>,
        y: Option<i32>,
        skin_type: Option<SkinType>,
        ctx: &HostContext<'_>,
    ) -> Self {
        let size = popup_size(&lines, &ctx.config.popup, ctx.measure);
        let centre = centered_origin(ctx.config.screen.size(), size);
        let origin = Point::new(x.unwrap_or(centre.x), y.unwrap_or(centre.y));

        let mut frame = WindowFrame::new(WindowKind::Popup, Rect::from_origin(origin, size));
        frame.openness.open();
        tracing::debug!(x = origin.x, y = origin.y, w = size.w, h = size.h, "popup opened");

        let mut popup = Self { frame, lines, skin_type, decorations: Decorations::default() };
        popup.redecorate(ctx);
        popup
    }

    pub fn frame(&self) -> &WindowFrame {
        &self.frame
    }

    pub fn lines(&self) -> &[TextLine] {
        &self.lines
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Player movement and the menu stay blocked until this is true.
    pub fn is_closed(&self) -> bool {
        self.frame.openness.is_closed() && !self.frame.openness.is_opening()
    }

    pub fn abort(&mut self) {
        self.frame.openness = Openness::closed();
    }

    /// OK or Cancel closes the popup once fully open.
    pub fn update(&mut self, triggers: &Triggers, feedback: &mut dyn FeedbackSink, ctx: &HostContext<'_>) {
        self.frame.openness.tick();
        if self.frame.openness.is_open()
            && (triggers.is_triggered(Trigger::Ok) || triggers.is_triggered(Trigger::Cancel))
        {
            feedback.play(Sfx::PopupClose);
            self.frame.openness.close();
        }
        self.redecorate(ctx);
    }

    fn redecorate(&mut self, ctx: &HostContext<'_>) {
        self.decorations =
            decorate(&self.frame, self.skin_type, ctx.skin_color, ctx.config, ctx.measure, ctx.catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonospaceMeasure;

    #[test]
    fn gold_text_uses_highlight_and_currency() {
        let lines = gold_popup_text(250, &PopupConfig::default());
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].text, r"Received \c[14]250 Gil\c[0]!");
        assert!(lines[0].is_blank() && lines[2].is_blank());
    }

    #[test]
    fn item_text_omits_single_quantity() {
        let c = PopupConfig::default();
        assert_eq!(item_popup_text("Potion", 3, &c)[1].text, r"Received \c[14]3x Potion\c[0]!");
        assert_eq!(item_popup_text("Potion", 1, &c)[1].text, r"Received \c[14]Potion\c[0]!");
    }

    #[test]
    fn size_ignores_colour_codes() {
        let c = PopupConfig::default();
        let m = MonospaceMeasure::new(1);
        let size = popup_size(&gold_popup_text(5, &c), &c, &m);
        // "Received 5 Gil!" is 15 wide; blank lines are compact.
        assert_eq!(size, Size::new(15 + 24, 6 + 24 + 6 + 24));
    }
}
