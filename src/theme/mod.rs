//! Window chrome: skins, drop shadows and header tabs.

pub mod header;
pub mod shadow;
pub mod skin;

pub use header::{Header, HeaderConfig, HeaderContent, Offset, header_for};
pub use shadow::{Shadow, ShadowConfig, ShadowSettings, shadow_for};
pub use skin::{SkinColor, SkinNames, SkinType};

use crate::assets::SpriteCatalog;
use crate::text::TextMeasure;
use crate::window::{Config, WindowFrame};

/// Everything drawn around a window besides its contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Decorations {
    /// Windowskin override; `None` leaves the host's skin alone.
    pub skin: Option<String>,
    pub shadow: Option<Shadow>,
    pub header: Option<Header>,
}

/// Decorations for `frame` under the current configuration.
///
/// `skin_override` replaces the kind's chrome family for this window only
/// (e.g. a choice list configured with a `frame` skin).
pub fn decorate(
    frame: &WindowFrame,
    skin_override: Option<SkinType>,
    color: SkinColor,
    config: &Config,
    measure: &dyn TextMeasure,
    catalog: &dyn SpriteCatalog,
) -> Decorations {
    let caps = config.capabilities;
    let skin_type = skin_override.unwrap_or_else(|| config.skins.window_type(frame.kind));
    Decorations {
        skin: caps
            .theme_system
            .then(|| config.skins.windowskin_name(skin_type, color).to_string()),
        shadow: shadow_for(frame, Some(skin_type), &config.shadows, caps),
        header: header_for(frame, &config.headers, caps, measure, catalog),
    }
}
