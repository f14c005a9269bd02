//! Audio cues for the timer
//!
//! Cues are best effort: a sink may fail, `CuePlayer` logs and moves on so the
//! clock never stalls on a missing speaker.
//!
//! With the `sound` feature tones are synthesized on the default output
//! device; without it, or when no device opens, they ring the terminal bell.

#[cfg(feature = "sound")]
pub mod tones;

use std::io::Write;
use std::process::Stdio;

use thiserror::Error;
use tracing::debug;

use crate::timer::Cue;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Audio device not available")]
    DeviceNotAvailable,

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Speech failed: {0}")]
    SpeechFailed(String),
}

/// One beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
    pub volume: f32,
    /// Offset from the start of the cue
    pub delay_ms: u64,
}

impl Tone {
    pub const fn new(frequency_hz: u32, duration_ms: u64, volume: f32) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            volume,
            delay_ms: 0,
        }
    }

    pub const fn after(self, delay_ms: u64) -> Self {
        Self { delay_ms, ..self }
    }
}

const WARNING: &[Tone] = &[Tone::new(880, 120, 0.16)];
const WARNING_REST: &[Tone] = &[Tone::new(740, 120, 0.15)];
const WORK_DONE: &[Tone] = &[Tone::new(520, 120, 0.20), Tone::new(660, 120, 0.16).after(130)];
const REST_DONE: &[Tone] = &[Tone::new(420, 140, 0.20), Tone::new(520, 120, 0.16).after(150)];
const TIME_UP: &[Tone] = &[Tone::new(660, 220, 0.18)];
const COMPLETE: &[Tone] = &[Tone::new(660, 240, 0.20)];

/// Played from the dashboard to check the speaker
pub const TEST_BEEP: Tone = Tone::new(880, 140, 0.14);

pub const WARNING_PHRASE: &str = "10 seconds";

/// Tone pattern for a cue
pub fn cue_tones(cue: Cue) -> &'static [Tone] {
    match cue {
        Cue::TenSeconds { rest: false } => WARNING,
        Cue::TenSeconds { rest: true } => WARNING_REST,
        Cue::WorkDone => WORK_DONE,
        Cue::RestDone => REST_DONE,
        Cue::TimeUp => TIME_UP,
        Cue::Complete => COMPLETE,
    }
}

pub fn cue_phrase(cue: Cue) -> Option<&'static str> {
    match cue {
        Cue::TenSeconds { .. } => Some(WARNING_PHRASE),
        _ => None,
    }
}

/// Where beeps and spoken phrases end up
pub trait AudioSink {
    fn beep(&mut self, tone: Tone) -> Result<(), AudioError>;
    fn speak(&mut self, text: &str) -> Result<(), AudioError>;
}

/// Plays cues on a sink, swallowing failures
pub struct CuePlayer<S: AudioSink> {
    sink: S,
    muted: bool,
}

impl<S: AudioSink> CuePlayer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, muted: false }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        for tone in cue_tones(cue) {
            if let Err(e) = self.sink.beep(*tone) {
                debug!("Beep failed for {:?}: {}", cue, e);
            }
        }
        if let Some(text) = cue_phrase(cue) {
            if let Err(e) = self.sink.speak(text) {
                debug!("Speech failed: {}", e);
            }
        }
    }

    pub fn play_all(&mut self, cues: &[Cue]) {
        for cue in cues {
            self.play(*cue);
        }
    }

    pub fn test_beep(&mut self) {
        if let Err(e) = self.sink.beep(TEST_BEEP) {
            debug!("Test beep failed: {}", e);
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Local audio: speaker tones, an external program for speech.
///
/// Falls back to the terminal bell when built without `sound` or when no
/// output device opens. The bell has no pitch, so there a tone pattern
/// collapses to one ring per tone.
pub struct TerminalAudio {
    speech_program: Option<String>,
    #[cfg(feature = "sound")]
    speaker: Option<tones::Speaker>,
}

impl TerminalAudio {
    pub fn new(speech_program: Option<String>) -> Self {
        Self {
            speech_program: speech_program.filter(|p| !p.trim().is_empty()),
            #[cfg(feature = "sound")]
            speaker: match tones::Speaker::open() {
                Ok(speaker) => Some(speaker),
                Err(e) => {
                    debug!("{}, using the terminal bell", e);
                    None
                }
            },
        }
    }

    /// Whether tones reach a real output device
    pub fn has_speaker(&self) -> bool {
        #[cfg(feature = "sound")]
        {
            self.speaker.is_some()
        }
        #[cfg(not(feature = "sound"))]
        {
            false
        }
    }
}

impl AudioSink for TerminalAudio {
    fn beep(&mut self, tone: Tone) -> Result<(), AudioError> {
        #[cfg(feature = "sound")]
        if let Some(speaker) = &self.speaker {
            return speaker.play(tone);
        }
        ring_bell(tone)
    }

    fn speak(&mut self, text: &str) -> Result<(), AudioError> {
        let Some(program) = &self.speech_program else {
            return Ok(());
        };
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(AudioError::SpeechFailed("no runtime to run the speech program".to_string()));
        }
        // a dropped child is reaped by the runtime once it exits
        tokio::process::Command::new(program)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|e| AudioError::SpeechFailed(format!("{}: {}", program, e)))
    }
}

fn ring_bell(tone: Tone) -> Result<(), AudioError> {
    debug!("Bell for {} Hz", tone.frequency_hz);
    let mut out = std::io::stderr();
    out.write_all(b"\x07")
        .and_then(|_| out.flush())
        .map_err(|e| AudioError::PlaybackFailed(e.to_string()))
}

/// Sink that plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn beep(&mut self, _tone: Tone) -> Result<(), AudioError> {
        Ok(())
    }

    fn speak(&mut self, _text: &str) -> Result<(), AudioError> {
        Ok(())
    }
}
