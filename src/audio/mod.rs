use std::collections::HashMap;
use std::path::Path;

use kira::{
    Volume,
    manager::{AudioManager, AudioManagerSettings, backend::DefaultBackend},
    sound::{
        PlaybackRate,
        static_sound::{StaticSoundData, StaticSoundSettings},
    },
};
use serde::Deserialize;

/// Interface tones the windows emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Cursor,
    Decision,
    Cancel,
    Buzzer,
    PopupClose,
}

/// Where feedback tones go.
pub trait FeedbackSink {
    fn play(&mut self, sfx: Sfx);
}

/// Keeps every tone in order; for tests and headless hosts.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordingFeedback {
    pub played: Vec<Sfx>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Sfx> {
        self.played.last().copied()
    }
}

impl FeedbackSink for RecordingFeedback {
    fn play(&mut self, sfx: Sfx) {
        self.played.push(sfx);
    }
}

// ── SoundBank ─────────────────────────────────────────────────────────────────

/// A sound effect file name (no extension) and how to play it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundSpec {
    pub name: String,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundSpec {
    fn named(name: &str) -> Self {
        Self { name: name.to_string(), ..Self::default() }
    }
}

impl Default for SoundSpec {
    fn default() -> Self {
        Self { name: String::new(), volume: 1.0, pitch: 1.0 }
    }
}

/// Which file each tone plays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SoundBank {
    pub cursor: SoundSpec,
    pub decision: SoundSpec,
    pub cancel: SoundSpec,
    pub buzzer: SoundSpec,
    pub popup_close: SoundSpec,
}

impl SoundBank {
    pub fn spec(&self, sfx: Sfx) -> &SoundSpec {
        match sfx {
            Sfx::Cursor => &self.cursor,
            Sfx::Decision => &self.decision,
            Sfx::Cancel => &self.cancel,
            Sfx::Buzzer => &self.buzzer,
            Sfx::PopupClose => &self.popup_close,
        }
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self {
            cursor: SoundSpec::named("Cursor1"),
            decision: SoundSpec::named("Decision1"),
            cancel: SoundSpec::named("Cancel2"),
            buzzer: SoundSpec::named("Buzzer1"),
            popup_close: SoundSpec::named("Decision1"),
        }
    }
}

// ── AudioFeedback ─────────────────────────────────────────────────────────────

/// Plays tones through kira.
pub struct AudioFeedback {
    /// `None` when audio hardware is unavailable (headless / CI / no audio device).
    manager: Option<AudioManager>,
    bank: SoundBank,
    sounds: HashMap<String, StaticSoundData>,
}

impl AudioFeedback {
    /// Open the default audio device and load every file the bank names
    /// from `dir` (`.ogg`, then `.wav`).
    pub fn new(bank: SoundBank, dir: impl AsRef<Path>) -> Self {
        let manager = match AudioManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!("failed to initialize audio manager: {e}; feedback muted");
                None
            }
        };
        let mut feedback = Self { manager, bank, sounds: HashMap::new() };
        let names: Vec<String> = [Sfx::Cursor, Sfx::Decision, Sfx::Cancel, Sfx::Buzzer, Sfx::PopupClose]
            .iter()
            .map(|sfx| feedback.bank.spec(*sfx).name.clone())
            .collect();
        for name in names {
            feedback.load(&name, dir.as_ref());
        }
        feedback
    }

    /// Returns true if audio hardware is available.
    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }

    fn load(&mut self, name: &str, dir: &Path) {
        if name.is_empty() || self.sounds.contains_key(name) {
            return;
        }
        for ext in ["ogg", "wav"] {
            let path = dir.join(format!("{name}.{ext}"));
            if !path.is_file() {
                continue;
            }
            match StaticSoundData::from_file(&path) {
                Ok(sound) => {
                    self.sounds.insert(name.to_string(), sound);
                    return;
                }
                Err(e) => tracing::warn!(path = %path.display(), "failed to load sound: {e}"),
            }
        }
        tracing::warn!(name, dir = %dir.display(), "sound file not found");
    }
}

impl FeedbackSink for AudioFeedback {
    fn play(&mut self, sfx: Sfx) {
        let Some(manager) = self.manager.as_mut() else { return };
        let spec = self.bank.spec(sfx);
        let Some(data) = self.sounds.get(&spec.name) else { return };

        let mut settings = StaticSoundSettings::new();
        settings.playback_rate = PlaybackRate::Factor(spec.pitch as f64).into();
        settings.volume = Volume::Amplitude(spec.volume.clamp(0.0, 2.0) as f64).into();

        if let Err(e) = manager.play(data.clone().with_settings(settings)) {
            tracing::warn!(?sfx, "failed to play sound: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let mut r = RecordingFeedback::new();
        r.play(Sfx::Cursor);
        r.play(Sfx::Buzzer);
        assert_eq!(r.played, vec![Sfx::Cursor, Sfx::Buzzer]);
        assert_eq!(r.last(), Some(Sfx::Buzzer));
    }

    #[test]
    fn bank_defaults_and_overrides() {
        let bank: SoundBank = serde_json::from_str(r#"{ "buzzer": { "name": "Error", "volume": 0.5 } }"#).unwrap();
        assert_eq!(bank.spec(Sfx::Buzzer).name, "Error");
        assert_eq!(bank.spec(Sfx::Buzzer).pitch, 1.0);
        assert_eq!(bank.spec(Sfx::PopupClose).name, "Decision1");
    }
}
