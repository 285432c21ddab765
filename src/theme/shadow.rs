use std::collections::HashMap;

use serde::Deserialize;

use super::SkinType;
use crate::geometry::Rect;
use crate::window::{Capabilities, WindowFrame, WindowKind};

/// How one window's drop shadow is drawn.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShadowSettings {
    /// `None` means no shadow at all.
    pub windowskin: Option<String>,
    pub offset_x: i32,
    pub offset_y: i32,
    pub offset_width: i32,
    pub offset_height: i32,
    pub opacity: u8,
}

impl ShadowSettings {
    fn typed(skin: &str) -> Self {
        Self {
            windowskin: Some(skin.to_string()),
            offset_x: 2,
            offset_y: 2,
            ..Self::default()
        }
    }
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            windowskin: Some("Window_Shadow".to_string()),
            offset_x: 3,
            offset_y: 3,
            offset_width: 0,
            offset_height: 0,
            opacity: 120,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Player option; shadows are also gated by the `shadows` capability.
    pub enabled: bool,
    pub default: ShadowSettings,
    pub excluded: Vec<WindowKind>,
    pub per_kind: HashMap<WindowKind, ShadowSettings>,
    /// Used instead of `per_kind` while the theme system is installed.
    pub per_type: HashMap<SkinType, ShadowSettings>,
}

impl ShadowConfig {
    pub fn settings_for(&self, kind: WindowKind, skin_type: Option<SkinType>) -> &ShadowSettings {
        if let Some(settings) = skin_type.and_then(|t| self.per_type.get(&t)) {
            return settings;
        }
        self.per_kind.get(&kind).unwrap_or(&self.default)
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        let per_kind = HashMap::from([(
            WindowKind::Gold,
            ShadowSettings {
                offset_x: 0,
                offset_y: 0,
                offset_width: 3,
                offset_height: 3,
                opacity: 80,
                ..ShadowSettings::default()
            },
        )]);
        let per_type = HashMap::from([
            (SkinType::Default, ShadowSettings::typed("Window_Shadow_Default")),
            (SkinType::Frame, ShadowSettings::typed("Window_Shadow_Frame")),
            (SkinType::Topbar, ShadowSettings::typed("Window_Shadow_Topbar")),
            (SkinType::Help, ShadowSettings::typed("Window_Shadow_Default")),
        ]);
        Self {
            enabled: true,
            default: ShadowSettings::default(),
            excluded: vec![WindowKind::BattleLog],
            per_kind,
            per_type,
        }
    }
}

/// A shadow window mirroring its parent one layer below.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shadow {
    pub windowskin: String,
    pub rect: Rect,
    pub opacity: u8,
    pub openness: u8,
    pub visible: bool,
}

/// Shadow for `frame`, or `None` when shadows are off or the kind is
/// excluded. `skin_type` is the frame's chrome family when the theme system
/// is installed.
pub fn shadow_for(
    frame: &WindowFrame,
    skin_type: Option<SkinType>,
    config: &ShadowConfig,
    caps: Capabilities,
) -> Option<Shadow> {
    if !caps.shadows || !config.enabled || config.excluded.contains(&frame.kind) {
        return None;
    }
    let skin_type = if caps.theme_system { skin_type } else { None };
    let settings = config.settings_for(frame.kind, skin_type);
    let windowskin = settings.windowskin.clone()?;

    Some(Shadow {
        windowskin,
        rect: frame.rect.offset(
            settings.offset_x,
            settings.offset_y,
            settings.offset_width,
            settings.offset_height,
        ),
        opacity: (settings.opacity as u32 * frame.opacity as u32 / 255) as u8,
        openness: frame.openness.value(),
        visible: frame.visible,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Openness;

    fn frame(kind: WindowKind) -> WindowFrame {
        let mut f = WindowFrame::new(kind, Rect::new(10, 20, 100, 50));
        f.openness = Openness::opened();
        f
    }

    #[test]
    fn default_shadow_offsets_parent() {
        let caps = Capabilities { theme_system: false, ..Capabilities::default() };
        let s = shadow_for(&frame(WindowKind::Popup), None, &ShadowConfig::default(), caps).unwrap();
        assert_eq!(s.rect, Rect::new(13, 23, 100, 50));
        assert_eq!(s.windowskin, "Window_Shadow");
        assert_eq!(s.opacity, 120);
        assert_eq!(s.openness, 255);
    }

    #[test]
    fn type_settings_win_with_theme_system() {
        let s = shadow_for(
            &frame(WindowKind::Gold),
            Some(SkinType::Frame),
            &ShadowConfig::default(),
            Capabilities::default(),
        )
        .unwrap();
        assert_eq!(s.windowskin, "Window_Shadow_Frame");
        assert_eq!(s.rect, Rect::new(12, 22, 100, 50));
    }

    #[test]
    fn kind_settings_without_theme_system() {
        let caps = Capabilities { theme_system: false, ..Capabilities::default() };
        let s = shadow_for(&frame(WindowKind::Gold), Some(SkinType::Frame), &ShadowConfig::default(), caps)
            .unwrap();
        assert_eq!(s.rect, Rect::new(10, 20, 103, 53));
        assert_eq!(s.opacity, 80);
    }

    #[test]
    fn opacity_scales_with_parent() {
        let mut f = frame(WindowKind::Popup);
        f.opacity = 128;
        let caps = Capabilities { theme_system: false, ..Capabilities::default() };
        let s = shadow_for(&f, None, &ShadowConfig::default(), caps).unwrap();
        // 120 * 128 / 255
        assert_eq!(s.opacity, 60);
    }

    #[test]
    fn excluded_and_disabled_get_none() {
        let cfg = ShadowConfig::default();
        assert!(shadow_for(&frame(WindowKind::BattleLog), None, &cfg, Capabilities::default()).is_none());
        let caps = Capabilities { shadows: false, ..Capabilities::default() };
        assert!(shadow_for(&frame(WindowKind::Popup), None, &cfg, caps).is_none());
        let off = ShadowConfig { enabled: false, ..ShadowConfig::default() };
        assert!(shadow_for(&frame(WindowKind::Popup), None, &off, Capabilities::default()).is_none());
    }
}
