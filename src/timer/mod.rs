//! Interval timer - countdown, stopwatch, EMOM and work/rest intervals
//!
//! The clock is a pure function of elapsed time (`clock::evaluate`), wrapped by
//! the `IntervalTimer` state machine which tracks status and fired cues.
//! `runner` drives it from a 100 ms ticker.

pub mod clock;
pub mod machine;
pub mod presets;
pub mod runner;
pub mod stations;

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::wod::Workout;

pub use clock::{Frame, TimerPhase, evaluate};
pub use machine::{IntervalTimer, TimerStatus, TimerView};
pub use presets::{PRESETS, Preset, find_preset};

/// Default EMOM length when no round count is set
pub const DEFAULT_EMOM_ROUNDS: u32 = 12;
/// An EMOM minute, whatever work length is configured
pub const EMOM_MINUTE_SECS: u32 = 60;
pub const DEFAULT_WORK_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    #[default]
    Countdown,
    Stopwatch,
    Emom,
    Intervals,
}

impl TimerMode {
    pub fn all() -> &'static [TimerMode] {
        &[
            TimerMode::Countdown,
            TimerMode::Stopwatch,
            TimerMode::Emom,
            TimerMode::Intervals,
        ]
    }

    /// Settings value
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "countdown",
            TimerMode::Stopwatch => "stopwatch",
            TimerMode::Emom => "emom",
            TimerMode::Intervals => "intervals",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Countdown => "Countdown",
            TimerMode::Stopwatch => "Stopwatch",
            TimerMode::Emom => "EMOM",
            TimerMode::Intervals => "Intervals",
        }
    }

    pub fn next(&self) -> TimerMode {
        let all = Self::all();
        let idx = all.iter().position(|m| m == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timer mode '{0}' (countdown, stopwatch, emom, intervals)")]
pub struct ParseModeError(pub String);

impl FromStr for TimerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "countdown" => Ok(TimerMode::Countdown),
            "stopwatch" => Ok(TimerMode::Stopwatch),
            "emom" => Ok(TimerMode::Emom),
            "intervals" => Ok(TimerMode::Intervals),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Timer settings; `rounds == 0` means unset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub mode: TimerMode,
    pub work_secs: u32,
    pub rest_secs: u32,
    pub rounds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mode: TimerMode::Countdown,
            work_secs: DEFAULT_WORK_SECS,
            rest_secs: 0,
            rounds: 0,
        }
    }
}

impl TimerConfig {
    pub const fn new(mode: TimerMode, work_secs: u32, rest_secs: u32, rounds: u32) -> Self {
        Self {
            mode,
            work_secs,
            rest_secs,
            rounds,
        }
    }

    /// Round count with the per-mode default applied
    pub fn effective_rounds(&self) -> u32 {
        match (self.rounds, self.mode) {
            (0, TimerMode::Emom) => DEFAULT_EMOM_ROUNDS,
            (0, _) => 1,
            (r, _) => r,
        }
    }

    /// Config as the clock runs it: rounds resolved, EMOM without rest
    pub fn normalized(&self) -> Self {
        let mut config = *self;
        config.rounds = self.effective_rounds();
        if config.mode == TimerMode::Emom {
            config.work_secs = EMOM_MINUTE_SECS;
            config.rest_secs = 0;
        }
        config
    }

    /// Clock value shown before start and after reset
    pub fn starting_secs(&self) -> f64 {
        match self.mode {
            TimerMode::Stopwatch => 0.0,
            _ => self.normalized().work_secs as f64,
        }
    }

    /// Settings implied by a workout handed to the timer.
    ///
    /// Shapes without a natural clock keep the current durations and count down.
    pub fn for_workout(&self, workout: &Workout) -> Self {
        match workout {
            Workout::Emom { minutes, .. } => {
                Self::new(TimerMode::Emom, EMOM_MINUTE_SECS, 0, *minutes)
            }
            Workout::Intervals {
                rounds,
                work_secs,
                rest_secs,
                ..
            } => Self::new(TimerMode::Intervals, *work_secs, *rest_secs, *rounds),
            Workout::Amrap { minutes, .. } => Self::new(TimerMode::Countdown, minutes * 60, 0, 1),
            _ => Self {
                mode: TimerMode::Countdown,
                ..*self
            },
        }
    }
}

/// Audio/visual cue emitted by the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Ten seconds left in the current segment
    TenSeconds { rest: bool },
    /// A work segment ended and the clock moved on
    WorkDone,
    /// A rest segment ended; next round starts
    RestDone,
    /// Countdown reached zero
    TimeUp,
    /// All rounds done
    Complete,
}

/// Format seconds as `MM:SS.t` (or `MM:SS`), clamping negatives to zero
pub fn format_clock(secs: f64, tenths: bool) -> String {
    let s = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let mm = (s / 60.0).floor() as u64;
    let ss = (s % 60.0).floor() as u64;
    if tenths {
        let t = ((s - s.floor()) * 10.0).floor() as u64;
        format!("{:02}:{:02}.{}", mm, ss, t)
    } else {
        format!("{:02}:{:02}", mm, ss)
    }
}
