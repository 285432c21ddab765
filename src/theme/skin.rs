use std::collections::HashMap;

use serde::Deserialize;

use crate::window::WindowKind;

/// Window chrome family.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinType {
    #[default]
    Default,
    Frame,
    Topbar,
    Help,
}

impl SkinType {
    /// Parse the name a script call uses; unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::Default),
            "frame" => Some(Self::Frame),
            "topbar" => Some(Self::Topbar),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Player-selectable skin colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinColor {
    #[default]
    Grey,
    Blue,
}

/// Windowskin bitmap names and the per-window chrome family.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkinNames {
    pub grey_default: String,
    pub blue_default: String,
    pub grey_frame: String,
    pub blue_frame: String,
    pub grey_topbar: String,
    pub blue_topbar: String,
    pub help: String,
    /// Kinds not listed use [`SkinType::Default`].
    pub window_types: HashMap<WindowKind, SkinType>,
    pub back_opacity: u8,
}

impl SkinNames {
    pub fn windowskin_name(&self, ty: SkinType, color: SkinColor) -> &str {
        let blue = color == SkinColor::Blue;
        match ty {
            SkinType::Frame if blue => &self.blue_frame,
            SkinType::Frame => &self.grey_frame,
            SkinType::Topbar if blue => &self.blue_topbar,
            SkinType::Topbar => &self.grey_topbar,
            SkinType::Help => &self.help,
            SkinType::Default if blue => &self.blue_default,
            SkinType::Default => &self.grey_default,
        }
    }

    pub fn window_type(&self, kind: WindowKind) -> SkinType {
        self.window_types.get(&kind).copied().unwrap_or_default()
    }

    /// Skin for a window of `kind`, with an optional per-use override of
    /// its chrome family.
    pub fn skin_for(&self, kind: WindowKind, override_type: Option<SkinType>, color: SkinColor) -> &str {
        let ty = override_type.unwrap_or_else(|| self.window_type(kind));
        self.windowskin_name(ty, color)
    }
}

impl Default for SkinNames {
    fn default() -> Self {
        let window_types = HashMap::from([
            (WindowKind::MenuCommand, SkinType::Frame),
            (WindowKind::MenuStatus, SkinType::Topbar),
            (WindowKind::Gold, SkinType::Frame),
            (WindowKind::TitleCommand, SkinType::Frame),
        ]);
        Self {
            grey_default: "Window_Default_Grey".into(),
            blue_default: "Window_Default_Blue".into(),
            grey_frame: "Window_Frame_Grey".into(),
            blue_frame: "Window_Frame_Blue".into(),
            grey_topbar: "Window_Topbar_Grey".into(),
            blue_topbar: "Window_Topbar_Blue".into(),
            help: "Window_Help_System".into(),
            window_types,
            back_opacity: 255,
        }
    }
}
