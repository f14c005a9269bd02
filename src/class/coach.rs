//! Coach mode auto-rotation cadence

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::info;

/// Cadences offered in the dashboard, in cycle order
pub const CADENCE_CHOICES: &[u64] = &[0, 30, 60, 120, 300];

/// How often the class board rotates on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoachCadence {
    #[default]
    Off,
    Every(Duration),
}

impl CoachCadence {
    pub fn seconds(secs: u64) -> Self {
        if secs == 0 {
            CoachCadence::Off
        } else {
            CoachCadence::Every(Duration::from_secs(secs))
        }
    }

    pub fn period(&self) -> Option<Duration> {
        match self {
            CoachCadence::Off => None,
            CoachCadence::Every(period) => Some(*period),
        }
    }

    /// Next cadence in the dashboard cycle
    pub fn next(&self) -> Self {
        let current = self.period().map(|p| p.as_secs()).unwrap_or(0);
        let idx = CADENCE_CHOICES.iter().position(|c| *c == current);
        let next = match idx {
            Some(i) => CADENCE_CHOICES[(i + 1) % CADENCE_CHOICES.len()],
            None => 0,
        };
        Self::seconds(next)
    }
}

impl fmt::Display for CoachCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoachCadence::Off => write!(f, "off"),
            CoachCadence::Every(period) => write!(f, "{}", period.as_secs()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coach cadence '{0}': expected 'off' or seconds")]
pub struct ParseCadenceError(pub String);

impl FromStr for CoachCadence {
    type Err = ParseCadenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("off") || s.is_empty() {
            return Ok(CoachCadence::Off);
        }
        s.parse::<u64>()
            .map(CoachCadence::seconds)
            .map_err(|_| ParseCadenceError(s.to_string()))
    }
}

/// Recurring rotation schedule, polled from the event loop.
///
/// Setting a cadence replaces whatever schedule was running before.
#[derive(Debug, Clone, Default)]
pub struct RotationSchedule {
    cadence: CoachCadence,
    next_due: Option<Instant>,
}

impl RotationSchedule {
    pub fn new(cadence: CoachCadence, now: Instant) -> Self {
        let mut schedule = Self::default();
        schedule.set(cadence, now);
        schedule
    }

    pub fn cadence(&self) -> CoachCadence {
        self.cadence
    }

    pub fn set(&mut self, cadence: CoachCadence, now: Instant) {
        self.cadence = cadence;
        self.next_due = cadence.period().map(|p| now + p);
        info!("Coach auto-rotate: {}", cadence);
    }

    /// True once per elapsed period; reschedules from `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        match (self.next_due, self.cadence.period()) {
            (Some(due), Some(period)) if now >= due => {
                self.next_due = Some(now + period);
                true
            }
            _ => false,
        }
    }
}
