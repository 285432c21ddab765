use std::collections::HashMap;

use serde::Deserialize;

use crate::assets::SpriteCatalog;
use crate::geometry::{Point, Size};
use crate::text::TextMeasure;
use crate::window::{Capabilities, WindowFrame, WindowKind};

/// What a header tab shows.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", content = "string", rename_all = "snake_case")]
pub enum HeaderContent {
    Text(String),
    /// Bitmap name under the header image folder.
    Image(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderConfig {
    pub text_offset: Offset,
    pub image_offset: Offset,
    pub font_size: i32,
    pub headers: HashMap<WindowKind, HeaderContent>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        let text = |s: &str| HeaderContent::Text(s.to_string());
        Self {
            text_offset: Offset { x: 10, y: -4 },
            image_offset: Offset { x: 10, y: -2 },
            font_size: 13,
            headers: HashMap::from([
                (WindowKind::Gold, text("Gold")),
                (WindowKind::MenuCommand, text("Main Menu")),
                (WindowKind::MenuStatus, text("Party")),
                (WindowKind::SkillList, text("Skills")),
                (WindowKind::ChoiceList, HeaderContent::Image("ChoiceList".to_string())),
            ]),
        }
    }
}

/// A header tab drawn over a window's top edge, one layer above it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub content: HeaderContent,
    pub position: Point,
    pub size: Size,
    pub visible: bool,
}

pub fn header_for(
    frame: &WindowFrame,
    config: &HeaderConfig,
    caps: Capabilities,
    measure: &dyn TextMeasure,
    catalog: &dyn SpriteCatalog,
) -> Option<Header> {
    if !caps.headers {
        return None;
    }
    let content = config.headers.get(&frame.kind)?;
    let (offset, size) = match content {
        HeaderContent::Text(s) => (
            config.text_offset,
            Size::new(measure.text_width(s) + 2, config.font_size + 2),
        ),
        HeaderContent::Image(name) => (config.image_offset, catalog.size_or_default(name)),
    };
    Some(Header {
        content: content.clone(),
        position: Point::new(frame.rect.x + offset.x, frame.rect.y + offset.y),
        size,
        visible: frame.is_showing(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryCatalog;
    use crate::geometry::Rect;
    use crate::text::MonospaceMeasure;
    use crate::window::Openness;

    #[test]
    fn text_header_offsets_and_size() {
        let mut f = WindowFrame::new(WindowKind::Gold, Rect::new(100, 50, 120, 48));
        f.openness = Openness::opened();
        let h = header_for(
            &f,
            &HeaderConfig::default(),
            Capabilities::default(),
            &MonospaceMeasure::new(7),
            &MemoryCatalog::new(),
        )
        .unwrap();
        assert_eq!(h.position, Point::new(110, 46));
        assert_eq!(h.size, Size::new(4 * 7 + 2, 15));
        assert!(h.visible);
    }

    #[test]
    fn image_header_hidden_until_open() {
        let f = WindowFrame::new(WindowKind::ChoiceList, Rect::new(0, 0, 80, 80));
        let cat = MemoryCatalog::new().with("ChoiceList", 64, 16);
        let h = header_for(&f, &HeaderConfig::default(), Capabilities::default(), &MonospaceMeasure::default(), &cat)
            .unwrap();
        assert_eq!(h.position, Point::new(10, -2));
        assert_eq!(h.size, Size::new(64, 16));
        assert!(!h.visible);
    }

    #[test]
    fn unlisted_kind_or_capability_off_has_none() {
        let f = WindowFrame::new(WindowKind::Popup, Rect::new(0, 0, 80, 80));
        let m = MonospaceMeasure::default();
        let cat = MemoryCatalog::new();
        assert!(header_for(&f, &HeaderConfig::default(), Capabilities::default(), &m, &cat).is_none());
        let f = WindowFrame::new(WindowKind::Gold, Rect::new(0, 0, 80, 80));
        let caps = Capabilities { headers: false, ..Capabilities::default() };
        assert!(header_for(&f, &HeaderConfig::default(), caps, &m, &cat).is_none());
    }

    #[test]
    fn headers_deserialize_tagged() {
        let cfg: HeaderConfig =
            serde_json::from_str(r#"{ "headers": { "Popup": { "type": "text", "string": "Note" } } }"#).unwrap();
        assert_eq!(cfg.headers.get(&WindowKind::Popup), Some(&HeaderContent::Text("Note".into())));
        assert_eq!(cfg.text_offset, Offset { x: 10, y: -4 });
    }
}
