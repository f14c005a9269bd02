//! Pure phase clock: timer state as a function of elapsed time

use std::fmt;

use super::{TimerConfig, TimerMode};

/// Warning threshold before a segment ends
pub const WARNING_SECS: f64 = 10.0;

/// Phase label shown under the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    Ready,
    Running,
    Countdown,
    Minute { index: u32, of: u32 },
    Work { round: u32, of: u32 },
    Rest { round: u32, of: u32 },
    TimeUp,
    Done,
    Stopped,
}

impl fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerPhase::Ready => write!(f, "—"),
            TimerPhase::Running => write!(f, "RUNNING"),
            TimerPhase::Countdown => write!(f, "COUNTDOWN"),
            TimerPhase::Minute { index, of } => write!(f, "MIN {} / {}", index, of),
            TimerPhase::Work { round, of } => write!(f, "WORK • ROUND {}/{}", round, of),
            TimerPhase::Rest { round, of } => write!(f, "REST • ROUND {}/{}", round, of),
            TimerPhase::TimeUp => write!(f, "TIME!"),
            TimerPhase::Done => write!(f, "DONE"),
            TimerPhase::Stopped => write!(f, "STOPPED"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Work,
    Rest,
}

/// The timed stretch the clock is currently counting down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Position in the run, unique per segment
    pub index: u64,
    pub kind: SegmentKind,
    pub length_secs: f64,
    pub remaining_secs: f64,
}

/// Everything the display needs at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub display_secs: f64,
    pub phase: TimerPhase,
    pub round: u32,
    pub segment: Option<Segment>,
    pub finished: bool,
}

impl Frame {
    fn finished(phase: TimerPhase, round: u32) -> Self {
        Self {
            display_secs: 0.0,
            phase,
            round,
            segment: None,
            finished: true,
        }
    }

    pub fn in_work(&self) -> bool {
        matches!(self.segment, Some(s) if s.kind == SegmentKind::Work)
    }
}

/// Recompute the clock from scratch for `elapsed` seconds since start
pub fn evaluate(config: &TimerConfig, elapsed: f64) -> Frame {
    let config = config.normalized();
    let elapsed = if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 };
    let rounds = config.rounds;

    match config.mode {
        TimerMode::Stopwatch => Frame {
            display_secs: elapsed,
            phase: TimerPhase::Running,
            round: 1,
            segment: None,
            finished: false,
        },

        TimerMode::Countdown => {
            let work = config.work_secs as f64;
            let remaining = work - elapsed;
            if remaining <= 0.0 {
                return Frame::finished(TimerPhase::TimeUp, 1);
            }
            Frame {
                display_secs: remaining,
                phase: TimerPhase::Countdown,
                round: 1,
                segment: Some(Segment {
                    index: 0,
                    kind: SegmentKind::Work,
                    length_secs: work,
                    remaining_secs: remaining,
                }),
                finished: false,
            }
        }

        TimerMode::Emom => {
            let work = config.work_secs as f64;
            let minute = (elapsed / work).floor() as u64 + 1;
            if minute > rounds as u64 {
                return Frame::finished(TimerPhase::Done, rounds);
            }
            let remaining = work - (elapsed % work);
            let minute = minute as u32;
            Frame {
                display_secs: remaining,
                phase: TimerPhase::Minute { index: minute, of: rounds },
                round: minute.min(rounds),
                segment: Some(Segment {
                    index: (minute - 1) as u64,
                    kind: SegmentKind::Work,
                    length_secs: work,
                    remaining_secs: remaining,
                }),
                finished: false,
            }
        }

        TimerMode::Intervals => {
            let work = config.work_secs as f64;
            let rest = config.rest_secs as f64;
            let cycle = work + rest;
            if cycle <= 0.0 {
                return Frame::finished(TimerPhase::Done, rounds);
            }

            let idx = (elapsed / cycle).floor() as u64 + 1;
            if idx > rounds as u64 {
                return Frame::finished(TimerPhase::Done, rounds);
            }

            let pos = elapsed % cycle;
            let in_work = pos < work;
            let remaining = if in_work { work - pos } else { cycle - pos };
            let round = (idx as u32).min(rounds);
            let (phase, kind, length) = if in_work {
                (TimerPhase::Work { round, of: rounds }, SegmentKind::Work, work)
            } else {
                (TimerPhase::Rest { round, of: rounds }, SegmentKind::Rest, rest)
            };

            Frame {
                display_secs: remaining,
                phase,
                round,
                segment: Some(Segment {
                    index: (idx - 1) * 2 + u64::from(!in_work),
                    kind,
                    length_secs: length,
                    remaining_secs: remaining,
                }),
                finished: false,
            }
        }
    }
}
