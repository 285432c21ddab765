use jdialog::anchor::{Facing, ResolvedAnchor};
use jdialog::assets::MemoryCatalog;
use jdialog::geometry::{Point, Size};
use jdialog::placement::*;
use jdialog::theme::SkinColor;
use jdialog::window::{ArrowSprites, BubbleLayout};

fn request(w: i32, h: i32, screen: Size) -> PlacementRequest {
    PlacementRequest::new(Size::new(w, h), screen, BubbleLayout::default().with_narrow_width(90))
}

#[test]
fn test_auto_places_below_when_above_is_too_small() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let r = engine.place(&request(80, 40, Size::new(544, 240)), Some(ResolvedAnchor::new(100, 50)));
    // Narrow: centred on the assumed 32 px arrow.
    assert_eq!(r.origin, Point::new(76, 66));
    assert_eq!(r.vertical, Some(Vertical::Below));

    let arrow = r.arrow.unwrap();
    assert!(arrow.key.points_up);
    assert!(arrow.key.left);
    assert_eq!(arrow.sprite, "BubbleTag_Up_Left");
    assert_eq!(arrow.position, Point::new(100, 66 - 32 + 10));
}

#[test]
fn test_forced_above_is_not_clamped_vertically() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let req = request(80, 40, Size::new(544, 240)).vertical(VerticalMode::Above);
    let r = engine.place(&req, Some(ResolvedAnchor::new(100, 50)));
    assert_eq!(r.origin, Point::new(76, -38));
    assert_eq!(r.vertical, Some(Vertical::Above));
    assert_eq!(r.arrow.unwrap().position.y, -38 + 40 - 10);
}

#[test]
fn test_vertical_clamp_is_opt_in() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let mut req = request(80, 40, Size::new(544, 240)).vertical(VerticalMode::Above);
    req.layout.clamp_vertical = true;
    let r = engine.place(&req, Some(ResolvedAnchor::new(100, 50)));
    assert_eq!(r.origin.y, 0);
    // Still above the anchor, so the arrow points down.
    assert_eq!(r.vertical, Some(Vertical::Above));
}

#[test]
fn test_left_edge_flips_arrow_and_reloads_sprite() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new()
        .with("BubbleTag_Down_Left", 24, 20)
        .with("BubbleTag_Down_Right", 32, 32);
    let engine = PlacementEngine::new(&arrows, &catalog);

    let r = engine.place(&request(100, 40, Size::new(544, 416)), Some(ResolvedAnchor::new(10, 200)));
    assert_eq!(r.origin, Point::new(0, 112));

    let arrow = r.arrow.unwrap();
    assert!(arrow.key.left);
    assert_eq!(arrow.sprite, "BubbleTag_Down_Left");
    assert_eq!(arrow.size, Size::new(24, 20));
    assert_eq!(arrow.position, Point::new(10, 142));
}

#[test]
fn test_right_edge_flips_arrow() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let r = engine.place(&request(100, 40, Size::new(544, 416)), Some(ResolvedAnchor::new(530, 200)));
    assert_eq!(r.origin.x, 444);
    let arrow = r.arrow.unwrap();
    assert!(!arrow.key.left);
    assert_eq!(arrow.sprite, "BubbleTag_Down_Right");
    assert_eq!(arrow.position.x, 530 - 32);
}

#[test]
fn test_forced_direction_skips_edge_flip() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let req = request(100, 40, Size::new(544, 416)).horizontal(HorizontalMode::Right);
    let r = engine.place(&req, Some(ResolvedAnchor::new(10, 200)));
    let arrow = r.arrow.unwrap();
    assert!(!arrow.key.left);
    // No flip and no clamp: the arrow may hang off the screen.
    assert_eq!(arrow.position.x, 10 - 32);
}

#[test]
fn test_facing_picks_arrow_side() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let anchor = ResolvedAnchor::new(272, 200).facing(Facing::Left);
    let r = engine.place(&request(100, 40, Size::new(544, 416)), Some(anchor));
    assert!(!r.arrow.unwrap().key.left);
}

#[test]
fn test_themed_arrow_names() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog).themed(Some(SkinColor::Blue));

    let r = engine.place(&request(100, 40, Size::new(544, 416)), Some(ResolvedAnchor::new(272, 200)));
    assert_eq!(r.arrow.unwrap().sprite, "BubbleTag_Down_Left_Blue");
}

#[test]
fn test_no_anchor_uses_explicit_or_centred_position() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let r = engine.place(&request(100, 40, Size::new(544, 416)), None);
    assert_eq!(r.origin, Point::new(222, 188));
    assert!(!r.is_bubble());

    let r = engine.place(&request(100, 40, Size::new(544, 416)).at(None, Some(5)), None);
    assert_eq!(r.origin, Point::new(222, 5));
}

#[test]
fn test_window_and_arrow_stay_on_screen_horizontally() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);
    let screen = Size::new(544, 416);

    for w in [40, 89, 90, 200, 544] {
        for ax in (0..=544).step_by(17) {
            for ay in [0, 60, 208, 400] {
                let r = engine.place(&request(w, 60, screen), Some(ResolvedAnchor::new(ax, ay)));
                assert!(r.origin.x >= 0 && r.origin.x + w <= screen.w, "w={w} ax={ax}");
                let arrow = r.arrow.unwrap();
                assert!(arrow.position.x >= 0 && arrow.position.x + arrow.size.w <= screen.w, "ax={ax}");
                assert_eq!(arrow.key.points_up, r.origin.y >= ay);
            }
        }
    }
}

#[test]
fn test_arrow_visible_only_when_fully_open() {
    let arrows = ArrowSprites::default();
    let catalog = MemoryCatalog::new();
    let engine = PlacementEngine::new(&arrows, &catalog);

    let mut r = engine.place(&request(100, 40, Size::new(544, 416)), Some(ResolvedAnchor::new(272, 200)));
    r.sync_arrow_visibility(254);
    assert!(!r.arrow.as_ref().unwrap().visible);
    r.sync_arrow_visibility(255);
    assert!(r.arrow.as_ref().unwrap().visible);
}
