// =============================================================================
// REVEAL — Frame-paced text output with per-character fade-in
//
// A 60-unit character timer advances by the text speed every frame; each
// character costs 60 units, so speed 30 shows a character every other frame
// and speed 120 shows two per frame. Revealed characters fade in over the
// effect duration. Control codes inside the text adjust pacing as they are
// reached.
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;

/// Units one character costs against the character timer.
const CHAR_COST: u32 = 60;
/// `\.` wait.
const SHORT_WAIT: u32 = 15;
/// `\|` wait.
const LONG_WAIT: u32 = 60;
/// Fastest `\SP[n]`: a hundred characters a frame.
const MAX_SPEED: u32 = CHAR_COST * 100;
/// Longest `\ED[n]` fade, in frames.
const MAX_FADE: u32 = 600;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\\([A-Za-z]+)\[(\d+)\]|\\([.|!><^{}$\\Aa])|\n|.").expect("valid regex")
});

// ── Tokens ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
enum Token {
    Char(char),
    Icon(u32),
    Color(u32),
    NewLine,
    /// `\W[n]`
    Wait(u32),
    /// `\SP[n]`
    Speed(u32),
    /// `\ED[n]`
    Duration(u32),
    /// `\A`
    NoFastForward,
    /// `\!`
    Pause,
    /// `\>` on, `\<` off.
    LineInstant(bool),
    /// `\^`
    NoEndPause,
    /// Codes handled by the host renderer (`\{`, `\}`, `\$`, unknown ones).
    Ignored,
}

fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_RE
        .captures_iter(text)
        .map(|caps| {
            if let (Some(code), Some(param)) = (caps.get(1), caps.get(2)) {
                let n = param.as_str().parse().unwrap_or(0);
                return match code.as_str().to_ascii_uppercase().as_str() {
                    "I" => Token::Icon(n),
                    "C" => Token::Color(n),
                    "W" => Token::Wait(n),
                    "SP" => Token::Speed(n),
                    "ED" => Token::Duration(n),
                    _ => Token::Ignored,
                };
            }
            if let Some(code) = caps.get(3) {
                return match code.as_str() {
                    "." => Token::Wait(SHORT_WAIT),
                    "|" => Token::Wait(LONG_WAIT),
                    "!" => Token::Pause,
                    ">" => Token::LineInstant(true),
                    "<" => Token::LineInstant(false),
                    "^" => Token::NoEndPause,
                    "\\" => Token::Char('\\'),
                    "A" | "a" => Token::NoFastForward,
                    _ => Token::Ignored,
                };
            }
            match caps.get(0).and_then(|m| m.as_str().chars().next()) {
                Some('\n') => Token::NewLine,
                Some(c) => Token::Char(c),
                None => Token::Ignored,
            }
        })
        .collect()
}

// ── Glyphs ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GlyphKind {
    Char(char),
    Icon(u32),
}

/// A character or icon that has been output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub kind: GlyphKind,
    /// Line on the current page.
    pub line: usize,
    pub color: u32,
    pub opacity: u8,
    fade_remaining: u32,
    fade_total: u32,
}

impl Glyph {
    pub fn is_fading(&self) -> bool {
        self.fade_remaining > 0
    }

    fn tick(&mut self, skip: bool) {
        if self.fade_remaining == 0 {
            return;
        }
        self.fade_remaining = if skip { 0 } else { self.fade_remaining - 1 };
        self.opacity = if self.fade_remaining > 0 {
            (256 * (self.fade_total - self.fade_remaining) / self.fade_total).min(255) as u8
        } else {
            255
        };
    }
}

// ── TextReveal ────────────────────────────────────────────────────────────────

/// Where the reveal stands after an update.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Outputting characters or sitting in a timed wait.
    Typing,
    /// Waiting for the player (`\!` or a full page).
    Paused,
    /// All text out and faded in; the window may wait for a final input.
    Finished,
}

/// Pacing parameters at the start of a message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RevealSettings {
    /// Character-timer units gained per frame; 0 shows text instantly.
    pub text_speed: u32,
    /// Frames a character takes to fade in.
    pub fade_duration: u32,
    pub fading: bool,
    /// Lines per page, `None` to never page.
    pub page_lines: Option<usize>,
}

#[derive(Clone, Debug)]
pub struct TextReveal {
    tokens: Vec<Token>,
    cursor: usize,
    glyphs: Vec<Glyph>,
    line: usize,
    color: u32,
    settings: RevealSettings,
    char_timer: u32,
    in_char_wait: bool,
    wait_frames: u32,
    show_fast: bool,
    line_show_fast: bool,
    no_fast_forward: bool,
    end_pause: bool,
    paused: bool,
    /// Clear the page when the current pause ends.
    page_break: bool,
}

impl TextReveal {
    pub fn new(text: &str, settings: RevealSettings) -> Self {
        Self {
            tokens: tokenize(text),
            cursor: 0,
            glyphs: Vec::new(),
            line: 0,
            color: 0,
            settings,
            char_timer: 0,
            in_char_wait: false,
            wait_frames: 0,
            show_fast: false,
            line_show_fast: false,
            no_fast_forward: false,
            end_pause: true,
            paused: false,
            page_break: false,
        }
    }

    /// Glyphs on the current page.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// The current page as plain text (icons omitted).
    pub fn visible_text(&self) -> String {
        let mut out = String::new();
        let mut line = 0;
        for g in &self.glyphs {
            while line < g.line {
                out.push('\n');
                line += 1;
            }
            if let GlyphKind::Char(c) = g.kind {
                out.push(c);
            }
        }
        out
    }

    pub fn text_speed(&self) -> u32 {
        self.settings.text_speed
    }

    pub fn fade_duration(&self) -> u32 {
        self.settings.fade_duration
    }

    /// `\A` was reached, or set by the caller for the whole message.
    pub fn fast_forward_disabled(&self) -> bool {
        self.no_fast_forward
    }

    pub fn disable_fast_forward(&mut self) {
        self.no_fast_forward = true;
    }

    /// False when `\^` asked to close without waiting for input.
    pub fn wants_end_pause(&self) -> bool {
        self.end_pause
    }

    pub fn state(&self) -> RevealState {
        if self.paused {
            RevealState::Paused
        } else if self.cursor >= self.tokens.len()
            && !self.in_char_wait
            && self.wait_frames == 0
            && (self.show_fast || self.glyphs.iter().all(|g| !g.is_fading()))
        {
            RevealState::Finished
        } else {
            RevealState::Typing
        }
    }

    /// Player pressed OK while typing: show the rest at once, unless
    /// fast-forward is disabled.
    pub fn request_fast_forward(&mut self) {
        if !self.no_fast_forward {
            self.show_fast = true;
        }
    }

    /// End a pause. A full page is cleared before typing continues.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.show_fast = false;
        if self.page_break {
            self.page_break = false;
            self.glyphs.clear();
            self.line = 0;
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) -> RevealState {
        if !self.paused {
            self.advance();
        }
        let skip = self.show_fast;
        for g in &mut self.glyphs {
            g.tick(skip);
        }
        self.state()
    }

    fn instant(&self) -> bool {
        self.show_fast || self.line_show_fast || self.settings.text_speed == 0
    }

    fn advance(&mut self) {
        if self.wait_frames > 0 {
            if self.show_fast {
                self.wait_frames = 0;
            } else {
                self.wait_frames -= 1;
                return;
            }
        }

        if self.in_char_wait {
            self.char_timer = self.char_timer.saturating_add(self.settings.text_speed);
            if !self.finish_char_wait() {
                return;
            }
        }

        while let Some(token) = self.tokens.get(self.cursor).cloned() {
            self.cursor += 1;
            match token {
                Token::Char(c) => {
                    if !self.output(GlyphKind::Char(c)) {
                        return;
                    }
                }
                Token::Icon(n) => {
                    if !self.output(GlyphKind::Icon(n)) {
                        return;
                    }
                }
                Token::Color(n) => self.color = n,
                Token::NewLine => {
                    self.line_show_fast = false;
                    self.line += 1;
                    if self.settings.page_lines.is_some_and(|max| self.line >= max) {
                        self.paused = true;
                        self.page_break = true;
                        return;
                    }
                }
                Token::Wait(n) => {
                    if !self.show_fast && n > 0 {
                        self.wait_frames = n - 1;
                        return;
                    }
                }
                Token::Speed(n) => self.settings.text_speed = n.min(MAX_SPEED),
                Token::Duration(n) => self.settings.fade_duration = n.min(MAX_FADE),
                Token::NoFastForward => self.no_fast_forward = true,
                Token::Pause => {
                    self.paused = true;
                    return;
                }
                Token::LineInstant(on) => self.line_show_fast = on,
                Token::NoEndPause => self.end_pause = false,
                Token::Ignored => {}
            }
        }
    }

    /// Draw one glyph; false if its character wait yields this frame.
    fn output(&mut self, kind: GlyphKind) -> bool {
        let fades = self.settings.fading && !self.instant() && self.settings.fade_duration > 0;
        let duration = if fades { self.settings.fade_duration.min(MAX_FADE) } else { 0 };
        self.glyphs.push(Glyph {
            kind,
            line: self.line,
            color: self.color,
            opacity: if fades { 0 } else { 255 },
            fade_remaining: duration,
            fade_total: duration,
        });
        if self.instant() {
            return true;
        }
        self.finish_char_wait()
    }

    /// Pay for one character out of the timer, yielding while it is short.
    fn finish_char_wait(&mut self) -> bool {
        if self.char_timer < CHAR_COST && !self.instant() {
            self.in_char_wait = true;
            return false;
        }
        self.char_timer = self.char_timer.saturating_sub(CHAR_COST);
        self.in_char_wait = false;
        true
    }
}
