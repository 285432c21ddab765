use crate::assets::SpriteCatalog;
use crate::geometry::{Point, Size};
use crate::theme::SkinColor;
use crate::window::{ArrowSprites, OPENNESS_MAX};

/// Which of the four arrow sprites to use.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrowKey {
    /// Arrow on top of the window pointing up at an anchor above it.
    pub points_up: bool,
    /// Arrow's tip on its left edge, drawn from the anchor rightwards.
    pub left: bool,
}

impl ArrowKey {
    pub const DEFAULT: ArrowKey = ArrowKey { points_up: true, left: true };

    /// Sprite name for this key, preferring the themed variant when a skin
    /// colour is given and the themed table has one.
    pub fn sprite_name<'s>(&self, sprites: &'s ArrowSprites, color: Option<SkinColor>) -> &'s str {
        let names = color
            .and_then(|c| sprites.themed.get(&c))
            .unwrap_or(&sprites.plain);
        match (self.points_up, self.left) {
            (true, true) => &names.up_left,
            (true, false) => &names.up_right,
            (false, true) => &names.down_left,
            (false, false) => &names.down_right,
        }
    }
}

/// The arrow sprite attached to a bubble window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BubbleArrow {
    pub key: ArrowKey,
    pub sprite: String,
    pub position: Point,
    pub size: Size,
    pub visible: bool,
}

impl BubbleArrow {
    pub(crate) fn resolve(
        key: ArrowKey,
        sprites: &ArrowSprites,
        color: Option<SkinColor>,
        catalog: &dyn SpriteCatalog,
    ) -> Self {
        let sprite = key.sprite_name(sprites, color);
        Self {
            key,
            sprite: sprite.to_string(),
            position: Point::ZERO,
            size: catalog.size_or_default(sprite),
            visible: false,
        }
    }

    pub fn sync_visibility(&mut self, openness: u8) {
        self.visible = openness == OPENNESS_MAX;
    }
}
