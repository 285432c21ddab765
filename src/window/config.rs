use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::audio::SoundBank;
use crate::geometry::Size;
use crate::theme::{HeaderConfig, ShadowConfig, SkinColor, SkinNames};

// ── ConfigError ──────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Complete configuration snapshot, loaded once at startup and read-only
/// afterwards.
///
/// Every field has a default, so `{}` is a valid document and a partial
/// document only overrides what it names.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen: ScreenConfig,
    pub capabilities: Capabilities,
    pub choice: ChoiceConfig,
    pub dialog: DialogConfig,
    pub popup: PopupConfig,
    pub skins: SkinNames,
    pub shadows: ShadowConfig,
    pub headers: HeaderConfig,
    pub sounds: SoundBank,
}

impl Config {
    /// Deserialise a `Config` from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and deserialise a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

// ── ScreenConfig ─────────────────────────────────────────────────────────────

/// Logical game resolution used for every placement computation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
}

impl ScreenConfig {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { width: 544, height: 416 }
    }
}

// ── Capabilities ─────────────────────────────────────────────────────────────

/// Which optional presentation features are installed.
///
/// Passed explicitly wherever a feature changes behaviour (coloured arrows,
/// skin overrides, shadows, headers).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub theme_system: bool,
    pub shadows: bool,
    pub headers: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self { theme_system: true, shadows: true, headers: true }
    }
}

// ── WindowMetrics ────────────────────────────────────────────────────────────

/// Line and padding metrics shared by the choice, dialog and popup windows.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowMetrics {
    pub line_height: i32,
    pub standard_padding: i32,
    /// When set, blank lines advance by `compact_line_height` instead of a
    /// full line.
    pub compact_spacing: bool,
    pub compact_line_height: i32,
}

impl WindowMetrics {
    /// Vertical advance for one line of text.
    pub fn line_advance(&self, text: &str) -> i32 {
        if self.compact_spacing && text.trim().is_empty() {
            self.compact_line_height
        } else {
            self.line_height
        }
    }

    /// Window height needed to show `lines` full lines plus padding.
    pub fn fitting_height(&self, lines: usize) -> i32 {
        lines as i32 * self.line_height + self.standard_padding * 2
    }
}

impl Default for WindowMetrics {
    fn default() -> Self {
        Self {
            line_height: 24,
            standard_padding: 12,
            compact_spacing: true,
            compact_line_height: 6,
        }
    }
}

// ── BubbleLayout ─────────────────────────────────────────────────────────────

/// Offsets and thresholds for bubble placement around an anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BubbleLayout {
    /// Anchor y → window top when the window sits below the anchor.
    pub y_offset_below: i32,
    /// Added to `anchor y - window height` when the window sits above.
    pub y_offset_above: i32,
    /// Window bottom → arrow top when the arrow hangs below the window.
    pub tag_y_offset_below: i32,
    /// Added to `window y - arrow height` when the arrow sits above the window.
    pub tag_y_offset_above: i32,
    /// Windows narrower than this centre on the arrow instead of the anchor.
    pub narrow_width: i32,
    /// Also clamp the window's y into the screen. Off by default.
    pub clamp_vertical: bool,
}

impl BubbleLayout {
    pub const CHOICE_NARROW_WIDTH: i32 = 80;
    pub const DIALOG_NARROW_WIDTH: i32 = 56;

    pub fn with_narrow_width(mut self, narrow_width: i32) -> Self {
        self.narrow_width = narrow_width;
        self
    }
}

impl Default for BubbleLayout {
    fn default() -> Self {
        Self {
            y_offset_below: 16,
            y_offset_above: -48,
            tag_y_offset_below: -10,
            tag_y_offset_above: 10,
            narrow_width: Self::CHOICE_NARROW_WIDTH,
            clamp_vertical: false,
        }
    }
}

// ── ArrowSprites ─────────────────────────────────────────────────────────────

/// One sprite name per arrow orientation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArrowNames {
    pub up_left: String,
    pub up_right: String,
    pub down_left: String,
    pub down_right: String,
}

impl ArrowNames {
    fn with_suffix(suffix: &str) -> Self {
        Self {
            up_left: format!("BubbleTag_Up_Left{suffix}"),
            up_right: format!("BubbleTag_Up_Right{suffix}"),
            down_left: format!("BubbleTag_Down_Left{suffix}"),
            down_right: format!("BubbleTag_Down_Right{suffix}"),
        }
    }
}

impl Default for ArrowNames {
    fn default() -> Self {
        Self::with_suffix("")
    }
}

/// Plain arrow sprites plus optional per-skin-colour variants that are
/// preferred while the theme system is installed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArrowSprites {
    pub plain: ArrowNames,
    pub themed: HashMap<SkinColor, ArrowNames>,
}

impl Default for ArrowSprites {
    fn default() -> Self {
        let mut themed = HashMap::new();
        themed.insert(SkinColor::Grey, ArrowNames::with_suffix("_Grey"));
        themed.insert(SkinColor::Blue, ArrowNames::with_suffix("_Blue"));
        Self { plain: ArrowNames::default(), themed }
    }
}

// ── Per-window sections ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChoiceConfig {
    pub metrics: WindowMetrics,
    /// Extra horizontal inset of the cursor and item text.
    pub cursor_offset_x: i32,
    /// Minimum content width before padding.
    pub min_width: i32,
    /// Slot spacing between merged blocks; the host reserves 4 choices plus
    /// a cancel branch per block.
    pub merge_stride: usize,
    /// Named conditions usable as `\cc[:name]`.
    pub predicates: BTreeMap<String, String>,
    pub bubble: BubbleLayout,
    pub arrows: ArrowSprites,
}

impl Default for ChoiceConfig {
    fn default() -> Self {
        Self {
            metrics: WindowMetrics::default(),
            cursor_offset_x: 0,
            min_width: 64,
            merge_stride: 5,
            predicates: BTreeMap::new(),
            bubble: BubbleLayout::default(),
            arrows: ArrowSprites::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    pub metrics: WindowMetrics,
    /// Characters per second; 0 shows text instantly.
    pub text_speed: u32,
    /// Frames a character takes to fade in.
    pub fade_duration: u32,
    pub fading: bool,
    /// Left inset of text when a face graphic is shown in default mode.
    pub face_indent: i32,
    pub bubble: BubbleLayout,
    pub arrows: ArrowSprites,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            metrics: WindowMetrics::default(),
            text_speed: 30,
            fade_duration: 6,
            fading: true,
            face_indent: 112,
            bubble: BubbleLayout::default().with_narrow_width(BubbleLayout::DIALOG_NARROW_WIDTH),
            arrows: ArrowSprites::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub metrics: WindowMetrics,
    /// Text colour index used to highlight amounts and item names.
    pub highlight_color: u32,
    pub currency_name: String,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            metrics: WindowMetrics::default(),
            highlight_color: 14,
            currency_name: "Gil".to_string(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
