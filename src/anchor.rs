use std::collections::HashMap;

use crate::geometry::Point;

// ── AnchorTarget ──────────────────────────────────────────────────────────────

/// The on-screen character a bubble window attaches to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnchorTarget {
    Player,
    /// Map event by id (> 0).
    MapEntity(u32),
    /// Party follower, 0-based.
    Follower(u32),
}

impl AnchorTarget {
    /// Decode the script-call convention: 0 is the player, positive ids are
    /// map events and `-n` is the n-th follower.
    pub fn from_event_id(event_id: i32) -> Self {
        match event_id {
            0 => Self::Player,
            id if id > 0 => Self::MapEntity(id as u32),
            id => Self::Follower(id.unsigned_abs() - 1),
        }
    }

    /// Inverse of [`AnchorTarget::from_event_id`].
    pub fn event_id(&self) -> i32 {
        match *self {
            Self::Player => 0,
            Self::MapEntity(id) => id as i32,
            Self::Follower(index) => -(index as i32) - 1,
        }
    }
}

// ── Facing ────────────────────────────────────────────────────────────────────

/// Character facing in numpad notation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    Down,
    Left,
    Right,
    Up,
}

impl Facing {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Self::Down),
            4 => Some(Self::Left),
            6 => Some(Self::Right),
            8 => Some(Self::Up),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Down => 2,
            Self::Left => 4,
            Self::Right => 6,
            Self::Up => 8,
        }
    }
}

// ── ResolvedAnchor ────────────────────────────────────────────────────────────

/// A character's screen position (feet, as the host reports it) and facing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAnchor {
    pub position: Point,
    pub facing: Option<Facing>,
}

impl ResolvedAnchor {
    pub fn new(x: i32, y: i32) -> Self {
        Self { position: Point::new(x, y), facing: None }
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = Some(facing);
        self
    }
}

// ── AnchorResolver ────────────────────────────────────────────────────────────

/// Looks up where a character currently is on screen.
///
/// Returning `None` is not an error: callers fall back to default placement.
pub trait AnchorResolver {
    fn resolve(&self, target: AnchorTarget) -> Option<ResolvedAnchor>;
}

impl<F> AnchorResolver for F
where
    F: Fn(AnchorTarget) -> Option<ResolvedAnchor>,
{
    fn resolve(&self, target: AnchorTarget) -> Option<ResolvedAnchor> {
        self(target)
    }
}

/// Fixed table of anchors, for hosts that snapshot positions once per frame
/// and for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticAnchors {
    anchors: HashMap<AnchorTarget, ResolvedAnchor>,
}

impl StaticAnchors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, target: AnchorTarget, anchor: ResolvedAnchor) -> Self {
        self.insert(target, anchor);
        self
    }

    pub fn insert(&mut self, target: AnchorTarget, anchor: ResolvedAnchor) {
        self.anchors.insert(target, anchor);
    }

    pub fn remove(&mut self, target: AnchorTarget) {
        self.anchors.remove(&target);
    }
}

impl AnchorResolver for StaticAnchors {
    fn resolve(&self, target: AnchorTarget) -> Option<ResolvedAnchor> {
        self.anchors.get(&target).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_convention() {
        assert_eq!(AnchorTarget::from_event_id(0), AnchorTarget::Player);
        assert_eq!(AnchorTarget::from_event_id(7), AnchorTarget::MapEntity(7));
        assert_eq!(AnchorTarget::from_event_id(-1), AnchorTarget::Follower(0));
        assert_eq!(AnchorTarget::from_event_id(-3), AnchorTarget::Follower(2));
        for id in [-4, -1, 0, 1, 12] {
            assert_eq!(AnchorTarget::from_event_id(id).event_id(), id);
        }
    }

    #[test]
    fn facing_codes() {
        assert_eq!(Facing::from_code(4), Some(Facing::Left));
        assert_eq!(Facing::from_code(5), None);
        assert_eq!(Facing::Right.code(), 6);
    }

    #[test]
    fn static_anchors_miss_is_none() {
        let anchors = StaticAnchors::new().with(AnchorTarget::Player, ResolvedAnchor::new(1, 2));
        assert!(anchors.resolve(AnchorTarget::Player).is_some());
        assert!(anchors.resolve(AnchorTarget::MapEntity(3)).is_none());
    }

    #[test]
    fn closures_resolve() {
        let r = |t: AnchorTarget| (t == AnchorTarget::Player).then(|| ResolvedAnchor::new(5, 5));
        assert_eq!(r.resolve(AnchorTarget::Player).map(|a| a.position.x), Some(5));
    }
}
