//! Host collaborators bundled for one frame of window work.

use crate::anchor::{AnchorResolver, AnchorTarget, ResolvedAnchor};
use crate::assets::SpriteCatalog;
use crate::expr::ConditionEvaluator;
use crate::text::TextMeasure;
use crate::theme::SkinColor;
use crate::window::Config;

/// Scene the windows live in. Bubbles are map-only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum SceneKind {
    #[default]
    Map,
    Battle,
    Menu,
}

/// Read-only host services for one update.
pub struct HostContext<'a> {
    pub config: &'a Config,
    pub measure: &'a dyn TextMeasure,
    pub catalog: &'a dyn SpriteCatalog,
    pub anchors: &'a dyn AnchorResolver,
    pub evaluator: &'a dyn ConditionEvaluator,
    pub scene: SceneKind,
    /// Current player-selected skin colour.
    pub skin_color: SkinColor,
}

impl HostContext<'_> {
    /// Resolve a bubble target, logging misses. Battle scenes never bubble.
    pub fn resolve_anchor(&self, target: AnchorTarget) -> Option<ResolvedAnchor> {
        if self.scene == SceneKind::Battle {
            return None;
        }
        let anchor = self.anchors.resolve(target);
        if anchor.is_none() {
            tracing::warn!(?target, "bubble target not found; using default placement");
        }
        anchor
    }

    /// Skin colour for arrow art, when the theme system is installed.
    pub fn arrow_color(&self) -> Option<SkinColor> {
        self.config.capabilities.theme_system.then_some(self.skin_color)
    }
}
