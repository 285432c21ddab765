// =============================================================================
// PLACEMENT — Bubble window positioning around an on-screen character
//
// Given a window size, the screen bounds and (optionally) a resolved anchor,
// `PlacementEngine::place` decides:
// - the window's top-left corner (default/centred mode when no anchor)
// - whether the window sits above or below the anchor
// - which of the four arrow sprites to show and where
// =============================================================================

mod arrow;

pub use arrow::{ArrowKey, BubbleArrow};

use crate::anchor::{Facing, ResolvedAnchor};
use crate::assets::SpriteCatalog;
use crate::geometry::{Point, Rect, Size, centered_origin, clamp_axis};
use crate::theme::SkinColor;
use crate::window::{ArrowSprites, BubbleLayout};

// ── Modes ─────────────────────────────────────────────────────────────────────

/// Caller's vertical preference for a bubble window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VerticalMode {
    #[default]
    Auto,
    Above,
    Below,
}

/// Caller's arrow direction preference. A forced direction also disables
/// the screen-edge flip of the arrow.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum HorizontalMode {
    #[default]
    Auto,
    Left,
    Right,
}

/// Where the window ended up relative to its anchor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Vertical {
    /// Window above the anchor; arrow hangs below the window pointing down.
    Above,
    /// Window below the anchor; arrow sits on top pointing up.
    Below,
}

// ── PlacementRequest ──────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PlacementRequest {
    pub size: Size,
    pub screen: Size,
    pub vertical: VerticalMode,
    pub horizontal: HorizontalMode,
    /// Explicit position, only honoured in default (anchorless) mode. Each
    /// axis falls back to centring when absent.
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub layout: BubbleLayout,
}

impl PlacementRequest {
    pub fn new(size: Size, screen: Size, layout: BubbleLayout) -> Self {
        Self {
            size,
            screen,
            vertical: VerticalMode::Auto,
            horizontal: HorizontalMode::Auto,
            x: None,
            y: None,
            layout,
        }
    }

    pub fn vertical(mut self, mode: VerticalMode) -> Self {
        self.vertical = mode;
        self
    }

    pub fn horizontal(mut self, mode: HorizontalMode) -> Self {
        self.horizontal = mode;
        self
    }

    pub fn at(mut self, x: Option<i32>, y: Option<i32>) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

// ── PlacementResult ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementResult {
    pub origin: Point,
    pub size: Size,
    /// `None` in default mode.
    pub vertical: Option<Vertical>,
    /// `None` in default mode.
    pub arrow: Option<BubbleArrow>,
}

impl PlacementResult {
    pub fn rect(&self) -> Rect {
        Rect::from_origin(self.origin, self.size)
    }

    pub fn is_bubble(&self) -> bool {
        self.arrow.is_some()
    }

    /// Show the arrow only once the owning window is fully open.
    pub fn sync_arrow_visibility(&mut self, openness: u8) {
        if let Some(arrow) = self.arrow.as_mut() {
            arrow.sync_visibility(openness);
        }
    }
}

// ── PlacementEngine ───────────────────────────────────────────────────────────

/// Stateless placement service for one window family (choice or dialog).
pub struct PlacementEngine<'a> {
    arrows: &'a ArrowSprites,
    catalog: &'a dyn SpriteCatalog,
    skin_color: Option<SkinColor>,
}

impl<'a> PlacementEngine<'a> {
    pub fn new(arrows: &'a ArrowSprites, catalog: &'a dyn SpriteCatalog) -> Self {
        Self { arrows, catalog, skin_color: None }
    }

    /// Prefer the arrow art matching `color` (theme system installed).
    pub fn themed(mut self, color: Option<SkinColor>) -> Self {
        self.skin_color = color;
        self
    }

    pub fn place(&self, request: &PlacementRequest, anchor: Option<ResolvedAnchor>) -> PlacementResult {
        match anchor {
            Some(anchor) => self.place_bubble(request, anchor),
            None => place_default(request),
        }
    }

    fn place_bubble(&self, req: &PlacementRequest, anchor: ResolvedAnchor) -> PlacementResult {
        let Size { w, h } = req.size;
        let (ax, ay) = (anchor.position.x, anchor.position.y);
        let layout = &req.layout;

        // Arrow size assumed before the real sprite is chosen.
        let assumed = self
            .catalog
            .sprite_size(ArrowKey::DEFAULT.sprite_name(self.arrows, self.skin_color))
            .unwrap_or_default();

        let intended_x = if w < layout.narrow_width {
            ax + assumed.w / 2 - w / 2
        } else {
            ax - w / 2
        };
        let intended_y = ay - h + layout.y_offset_above;
        let below_y = ay + layout.y_offset_below;

        let mut y = match req.vertical {
            VerticalMode::Above => intended_y,
            VerticalMode::Below => below_y,
            VerticalMode::Auto => {
                if choose_above(h + assumed.h, ay, req.screen.h) {
                    intended_y
                } else {
                    below_y
                }
            }
        };
        if layout.clamp_vertical {
            y = clamp_axis(y, req.screen.h - h);
        }
        let x = clamp_axis(intended_x, req.screen.w - w);

        let points_up = y >= ay;
        let left = arrow_left(req.horizontal, anchor.facing, intended_x, x);
        let arrow = self.arrow_for(req, anchor, Point::new(x, y), ArrowKey { points_up, left });

        tracing::debug!(x, y, points_up, left = arrow.key.left, "bubble placed");

        PlacementResult {
            origin: Point::new(x, y),
            size: req.size,
            vertical: Some(if points_up { Vertical::Below } else { Vertical::Above }),
            arrow: Some(arrow),
        }
    }

    fn arrow_for(&self, req: &PlacementRequest, anchor: ResolvedAnchor, window: Point, key: ArrowKey) -> BubbleArrow {
        let layout = &req.layout;
        let ax = anchor.position.x;
        let mut arrow = BubbleArrow::resolve(key, self.arrows, self.skin_color, self.catalog);
        let Size { w: aw, h: ah } = arrow.size;

        let y = if key.points_up {
            window.y - ah + layout.tag_y_offset_above
        } else {
            window.y + req.size.h + layout.tag_y_offset_below
        };
        let mut x = if key.left { ax } else { ax - aw };

        if req.horizontal == HorizontalMode::Auto {
            let mut left = key.left;
            if ax <= aw {
                left = true;
                x = ax;
            } else if ax >= req.screen.w - aw {
                left = false;
                x = ax - aw;
            }
            if left != key.left {
                tracing::debug!(left, "arrow flipped at screen edge");
                arrow = BubbleArrow::resolve(ArrowKey { left, ..key }, self.arrows, self.skin_color, self.catalog);
            }
            x = clamp_axis(x, req.screen.w - aw);
        }

        arrow.position = Point::new(x, y);
        arrow
    }
}

/// Anchorless placement: explicit coordinates per axis, else centred.
pub fn place_default(req: &PlacementRequest) -> PlacementResult {
    let centre = centered_origin(req.screen, req.size);
    PlacementResult {
        origin: Point::new(req.x.unwrap_or(centre.x), req.y.unwrap_or(centre.y)),
        size: req.size,
        vertical: None,
        arrow: None,
    }
}

/// Auto vertical rule: above if it fits, else below if that fits, else the
/// roomier side with ties going above.
pub fn choose_above(required: i32, anchor_y: i32, screen_h: i32) -> bool {
    let space_above = anchor_y;
    let space_below = screen_h - anchor_y;
    if required <= space_above {
        true
    } else if required <= space_below {
        false
    } else {
        space_above >= space_below
    }
}

/// Arrow side: forced direction, then facing, then which way the clamp
/// pushed the window, defaulting to left.
pub fn arrow_left(mode: HorizontalMode, facing: Option<Facing>, intended_x: i32, final_x: i32) -> bool {
    match mode {
        HorizontalMode::Left => return true,
        HorizontalMode::Right => return false,
        HorizontalMode::Auto => {}
    }
    match facing {
        Some(Facing::Left) => return false,
        Some(Facing::Right) => return true,
        _ => {}
    }
    if final_x == intended_x {
        return true;
    }
    final_x < intended_x
}
