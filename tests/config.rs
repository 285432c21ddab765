use jdialog::anchor::{AnchorTarget, ResolvedAnchor, StaticAnchors};
use jdialog::assets::MemoryCatalog;
use jdialog::audio::Sfx;
use jdialog::dialog::{DialogWindow, MessageRequest, RevealState};
use jdialog::expr::ExprError;
use jdialog::host::{HostContext, SceneKind};
use jdialog::input::{KeyCode, KeyState, Trigger, TriggerMap, Triggers};
use jdialog::text::MonospaceMeasure;
use jdialog::theme::SkinColor;
use jdialog::window::{Config, ConfigError};

const CONFIG: &str = r#"{
    "screen": { "width": 640, "height": 480 },
    "capabilities": { "theme_system": false },
    "dialog": { "text_speed": 0, "bubble": { "clamp_vertical": true } },
    "choice": { "merge_stride": 6, "predicates": { "late": "v5 >= 3" } },
    "sounds": { "buzzer": { "name": "Buzzer2", "volume": 0.5 } }
}"#;

fn always(_: &str) -> Result<bool, ExprError> {
    Ok(true)
}

#[test]
fn test_document_overrides_reach_sections() {
    let config = Config::from_json(CONFIG).unwrap();
    assert_eq!(config.screen.width, 640);
    assert!(!config.capabilities.theme_system);
    assert!(config.capabilities.shadows);
    assert_eq!(config.choice.merge_stride, 6);
    assert_eq!(config.choice.predicates.len(), 1);
    assert!(config.dialog.bubble.clamp_vertical);
    // Nested defaults survive a partial section.
    assert_eq!(config.dialog.bubble.y_offset_above, -48);

    let buzzer = config.sounds.spec(Sfx::Buzzer);
    assert_eq!(buzzer.name, "Buzzer2");
    assert_eq!(buzzer.volume, 0.5);
    assert_eq!(buzzer.pitch, 1.0);
    assert_eq!(config.sounds.spec(Sfx::Cursor).name, "Cursor1");
}

#[test]
fn test_load_reads_file() {
    let path = std::env::temp_dir().join(format!("jdialog-config-{}.json", std::process::id()));
    std::fs::write(&path, CONFIG).unwrap();
    let config = Config::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.screen.height, 480);
}

#[test]
fn test_wrong_field_type_is_rejected() {
    let err = Config::from_json(r#"{ "screen": { "width": "wide" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("malformed config"));
}

#[test]
fn test_instant_text_and_vertical_clamp_apply() {
    let config = Config::from_json(CONFIG).unwrap();
    let measure = MonospaceMeasure::default();
    let catalog = MemoryCatalog::new();
    let anchors = StaticAnchors::new().with(AnchorTarget::Player, ResolvedAnchor::new(320, 20));
    let ctx = HostContext {
        config: &config,
        measure: &measure,
        catalog: &catalog,
        anchors: &anchors,
        evaluator: &always,
        scene: SceneKind::Map,
        skin_color: SkinColor::Blue,
    };

    let mut dialog = DialogWindow::open(&MessageRequest::new([r"\bm[0]\bmp[a]Up here"]), &ctx);
    assert!(dialog.is_bubble());
    assert_eq!(dialog.rect().y, 0);
    // Theme system off: plain arrow art.
    assert_eq!(dialog.placement().unwrap().arrow.as_ref().unwrap().sprite, "BubbleTag_Down_Left");
    assert!(dialog.decorations().skin.is_none());

    for _ in 0..7 {
        dialog.update(&Triggers::none(), &ctx);
    }
    assert_eq!(dialog.reveal().state(), RevealState::Finished);
    assert_eq!(dialog.reveal().visible_text(), "Up here");
}

#[test]
fn test_default_key_bindings() {
    let map = TriggerMap::default();
    let mut keys = KeyState::new();
    keys.press(KeyCode::KeyX);
    keys.press(KeyCode::ArrowUp);
    let triggers = map.triggers(&keys);
    assert!(triggers.is_triggered(Trigger::Cancel));
    assert!(triggers.is_triggered(Trigger::Up));
    assert!(!triggers.is_triggered(Trigger::Ok));

    keys.key_consumed = true;
    assert!(map.triggers(&keys).is_empty());
}
