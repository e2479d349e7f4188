//! Sound effects
//!
//! Clips are loaded once from a sounds directory and handed to a
//! [`SoundOutput`] for playback. Any missing clip disables audio for the
//! whole run; the simulation never depends on sound working.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::sim::SimEvent;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to read sound {path}: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Collision notes, picked at random per hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    Do,
    Re,
    Mi,
    Fa,
    Si,
}

impl Note {
    pub const ALL: [Note; 5] = [Note::Do, Note::Re, Note::Mi, Note::Fa, Note::Si];
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball hits a ring or another ball
    Note(Note),
    /// A ring is destroyed
    Vanish,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 6] = [
        SoundEffect::Note(Note::Do),
        SoundEffect::Note(Note::Re),
        SoundEffect::Note(Note::Mi),
        SoundEffect::Note(Note::Fa),
        SoundEffect::Note(Note::Si),
        SoundEffect::Vanish,
    ];

    /// Asset file name inside the sounds directory
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Note(Note::Do) => "do.mp3",
            SoundEffect::Note(Note::Re) => "re.mp3",
            SoundEffect::Note(Note::Mi) => "mi.mp3",
            SoundEffect::Note(Note::Fa) => "fa.mp3",
            SoundEffect::Note(Note::Si) => "si.mp3",
            SoundEffect::Vanish => "vanish.mp3",
        }
    }
}

/// Encoded audio for one effect
#[derive(Debug, Clone)]
pub struct SoundClip {
    pub effect: SoundEffect,
    pub bytes: Vec<u8>,
}

/// Every clip the simulation can play
#[derive(Debug, Clone)]
pub struct SoundBank {
    clips: HashMap<SoundEffect, SoundClip>,
}

impl SoundBank {
    /// Load all clips from `dir`; fails on the first unreadable file
    pub fn load(dir: &Path) -> Result<Self, AudioError> {
        let mut clips = HashMap::new();
        for effect in SoundEffect::ALL {
            let path = dir.join(effect.file_name());
            let bytes = fs::read(&path).map_err(|source| AudioError::Missing { path, source })?;
            clips.insert(effect, SoundClip { effect, bytes });
        }
        log::info!("Loaded {} sounds from {}", clips.len(), dir.display());
        Ok(Self { clips })
    }

    pub fn get(&self, effect: SoundEffect) -> Option<&SoundClip> {
        self.clips.get(&effect)
    }
}

/// The external playback device
pub trait SoundOutput {
    fn play(&mut self, clip: &SoundClip, volume: f32) -> Result<(), AudioError>;
}

/// Output that only logs what would have played
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOutput;

impl SoundOutput for LogOutput {
    fn play(&mut self, clip: &SoundClip, volume: f32) -> Result<(), AudioError> {
        if clip.bytes.is_empty() {
            return Err(AudioError::Playback(format!("{} has no data", clip.effect.file_name())));
        }
        log::trace!(
            "play {} ({} bytes, volume {:.2})",
            clip.effect.file_name(),
            clip.bytes.len(),
            volume
        );
        Ok(())
    }
}

/// Output that remembers every effect played
#[derive(Debug, Default, Clone)]
pub struct RecordingOutput {
    pub played: Vec<SoundEffect>,
}

impl SoundOutput for RecordingOutput {
    fn play(&mut self, clip: &SoundClip, _volume: f32) -> Result<(), AudioError> {
        self.played.push(clip.effect);
        Ok(())
    }
}

/// Audio manager for the simulation
pub struct AudioManager<O: SoundOutput> {
    bank: Option<SoundBank>,
    output: O,
    /// Note picker, separate from the simulation's generator
    rng: Pcg32,
    master_volume: f32,
    muted: bool,
}

impl<O: SoundOutput> AudioManager<O> {
    pub fn new(bank: Option<SoundBank>, output: O, rng: Pcg32) -> Self {
        Self {
            bank,
            output,
            rng,
            master_volume: 0.8,
            muted: false,
        }
    }

    /// Load the bank from `dir`, running silently if that fails
    pub fn from_dir(dir: &Path, output: O, rng: Pcg32) -> Self {
        let bank = match SoundBank::load(dir) {
            Ok(bank) => Some(bank),
            Err(e) => {
                log::warn!("Audio disabled: {}", e);
                None
            }
        };
        Self::new(bank, output, rng)
    }

    pub fn is_enabled(&self) -> bool {
        self.bank.is_some()
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(clip) = self.bank.as_ref().and_then(|bank| bank.get(effect)) else {
            return;
        };
        if let Err(e) = self.output.play(clip, vol) {
            log::warn!("{}", e);
        }
    }

    /// A random collision note
    pub fn play_hit(&mut self) {
        let note = Note::ALL[self.rng.random_range(0..Note::ALL.len())];
        self.play(SoundEffect::Note(note));
    }

    /// Play whatever a tick's events call for
    pub fn handle_events(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::RingHit { .. } | SimEvent::BallHit { .. } => self.play_hit(),
                SimEvent::RingDestroyed { .. } => self.play(SoundEffect::Vanish),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{DestroyCause, MatchPhase};
    use rand::SeedableRng;

    fn bank() -> SoundBank {
        let clips = SoundEffect::ALL
            .into_iter()
            .map(|effect| (effect, SoundClip { effect, bytes: vec![0; 4] }))
            .collect();
        SoundBank { clips }
    }

    fn manager() -> AudioManager<RecordingOutput> {
        AudioManager::new(Some(bank()), RecordingOutput::default(), Pcg32::seed_from_u64(3))
    }

    #[test]
    fn test_events_map_to_sounds() {
        let mut audio = manager();
        audio.handle_events(&[
            SimEvent::RingHit { ball: 1, ring: 0 },
            SimEvent::BallSpawned { id: 2 },
            SimEvent::BallHit { a: 1, b: 2 },
            SimEvent::RingDestroyed {
                index: 0,
                cause: DestroyCause::Skip,
            },
            SimEvent::PhaseChanged(MatchPhase::Won),
        ]);

        let played = &audio.output().played;
        assert_eq!(played.len(), 3);
        assert!(matches!(played[0], SoundEffect::Note(_)));
        assert!(matches!(played[1], SoundEffect::Note(_)));
        assert_eq!(played[2], SoundEffect::Vanish);
    }

    #[test]
    fn test_hits_use_every_note() {
        let mut audio = manager();
        for _ in 0..200 {
            audio.play_hit();
        }
        for note in Note::ALL {
            assert!(audio.output().played.contains(&SoundEffect::Note(note)));
        }
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = manager();
        audio.set_muted(true);
        audio.play(SoundEffect::Vanish);
        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Vanish);
        assert!(audio.output().played.is_empty());
    }

    #[test]
    fn test_empty_clip_fails_playback() {
        let empty = SoundClip {
            effect: SoundEffect::Vanish,
            bytes: Vec::new(),
        };
        let err = LogOutput.play(&empty, 1.0).unwrap_err();
        assert!(matches!(err, AudioError::Playback(_)));
        assert!(err.to_string().contains("vanish.mp3"));
        assert!(LogOutput.play(&SoundClip { bytes: vec![1], ..empty }, 1.0).is_ok());

        // The manager logs the failure and carries on
        let mut clips = HashMap::new();
        clips.insert(
            SoundEffect::Vanish,
            SoundClip {
                effect: SoundEffect::Vanish,
                bytes: Vec::new(),
            },
        );
        let mut audio =
            AudioManager::new(Some(SoundBank { clips }), LogOutput, Pcg32::seed_from_u64(4));
        audio.handle_events(&[SimEvent::RingDestroyed {
            index: 0,
            cause: DestroyCause::Breach,
        }]);
        assert!(audio.is_enabled());
    }

    #[test]
    fn test_missing_directory_disables_audio() {
        let dir =
            std::env::temp_dir().join(format!("ring-breach-no-sounds-{}", std::process::id()));
        let mut audio =
            AudioManager::from_dir(&dir, RecordingOutput::default(), Pcg32::seed_from_u64(1));
        assert!(!audio.is_enabled());
        audio.play(SoundEffect::Vanish);
        assert!(audio.output().played.is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!("ring-breach-sounds-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        for effect in SoundEffect::ALL {
            fs::write(dir.join(effect.file_name()), effect.file_name()).unwrap();
        }

        let bank = SoundBank::load(&dir).unwrap();
        assert_eq!(bank.get(SoundEffect::Vanish).unwrap().bytes, b"vanish.mp3");

        // One missing clip fails the whole bank
        fs::remove_file(dir.join("fa.mp3")).unwrap();
        let err = SoundBank::load(&dir).unwrap_err();
        assert!(err.to_string().contains("fa.mp3"));

        fs::remove_dir_all(&dir).unwrap();
    }
}
