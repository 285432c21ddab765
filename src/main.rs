// Headless walk-through: an NPC talks in a chained bubble, then asks a merged
// choice, and the scripted key presses below answer it.

use jdialog::anchor::{AnchorTarget, Facing, ResolvedAnchor, StaticAnchors};
use jdialog::assets::DirectoryCatalog;
use jdialog::audio::AudioFeedback;
use jdialog::choice::ChoicePhase;
use jdialog::command::{CommandKind, EventCommand};
use jdialog::expr::{MemoryState, SandboxEvaluator};
use jdialog::host::{HostContext, SceneKind};
use jdialog::input::{KeyCode, KeyState, TriggerMap};
use jdialog::session::MessageSession;
use jdialog::text::MonospaceMeasure;
use jdialog::theme::SkinColor;
use jdialog::window::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MAX_FRAMES: u32 = 900;

fn event() -> Vec<EventCommand> {
    let show = || EventCommand::new(0, CommandKind::ShowText {
        face_name: String::new(),
        face_index: 0,
        background: 0,
        position: 2,
    });
    let line = |s: &str| EventCommand::new(0, CommandKind::TextLine(s.to_string()));
    vec![
        show(),
        line(r"\bmc[1]Evening, traveller.\."),
        show(),
        line(r"Where are you headed?"),
        EventCommand::new(0, CommandKind::ShowChoices {
            choices: vec!["Inn".into(), r"Shop\cc[s1]".into(), r"Castle\cc[v2 >= 10]".into()],
            cancel_type: 0,
        }),
        EventCommand::new(0, CommandKind::ChoiceBranch(0)),
        EventCommand::new(0, CommandKind::ChoiceBranch(1)),
        EventCommand::new(0, CommandKind::ChoiceBranch(2)),
        EventCommand::new(0, CommandKind::BranchEnd),
        EventCommand::new(0, CommandKind::ShowChoices { choices: vec!["Never mind".into()], cancel_type: 5 }),
        EventCommand::new(0, CommandKind::ChoiceBranch(0)),
        EventCommand::new(0, CommandKind::CancelBranch),
        EventCommand::new(0, CommandKind::BranchEnd),
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "jdialog=info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut state = MemoryState::new();
    state.set_switch(1, true).set_variable(2, 3);
    let evaluator = SandboxEvaluator::new(&state);
    let anchors = StaticAnchors::new().with(AnchorTarget::MapEntity(1), ResolvedAnchor::new(272, 180).facing(Facing::Down));
    let catalog = DirectoryCatalog::scan("resources/arrows");
    let measure = MonospaceMeasure::default();
    let mut feedback = AudioFeedback::new(config.sounds.clone(), "resources/se");
    if !feedback.is_available() {
        tracing::info!("no audio device, sound effects are skipped");
    }

    let ctx = HostContext {
        config: &config,
        measure: &measure,
        catalog: &catalog,
        anchors: &anchors,
        evaluator: &evaluator,
        scene: SceneKind::Map,
        skin_color: SkinColor::Blue,
    };

    let mut session = MessageSession::new(&config);
    let commands = event();
    let Some(message) = session.show_event_message(&commands, 0, &ctx) else {
        return Err("event does not start with a message".into());
    };
    tracing::info!(next = message.next, "message shown");

    let keymap = TriggerMap::default();
    let mut keys = KeyState::new();
    let mut moved = false;

    for frame in 0..MAX_FRAMES {
        keys.clear_frame_state();
        keys.release(KeyCode::Enter);
        keys.release(KeyCode::ArrowDown);

        let choosing = session.choice().is_some_and(|c| c.phase() == ChoicePhase::Active);
        if choosing && !moved {
            keys.press(KeyCode::ArrowDown);
            moved = true;
        } else if frame % 20 == 0 {
            keys.press(KeyCode::Enter);
        }

        session.update(&keymap.triggers(&keys), &mut feedback, &ctx);
        if frame > 0 && !session.is_busy() {
            break;
        }
    }

    if session.is_busy() {
        tracing::warn!("demo ran out of frames");
        session.abort_all();
    }

    match message.choices {
        Some(handle) => {
            let outcome = pollster::block_on(handle);
            tracing::info!(?outcome, value = outcome.value(), "choice resolved");
        }
        None => tracing::info!("message had no choices"),
    }

    session.show_gold_popup(250, &ctx);
    if let Some(popup) = session.popup() {
        tracing::info!(rect = ?popup.frame().rect, "popup shown");
    }
    Ok(())
}
