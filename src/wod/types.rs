//! Workout types and their text rendering

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Metcon shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Emom,
    #[default]
    Amrap,
    ForTime,
    Intervals,
    Chipper,
    Ladder,
}

impl Shape {
    pub fn all() -> &'static [Shape] {
        &[
            Shape::Amrap,
            Shape::ForTime,
            Shape::Emom,
            Shape::Intervals,
            Shape::Chipper,
            Shape::Ladder,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Shape::Emom => "EMOM",
            Shape::Amrap => "AMRAP",
            Shape::ForTime => "For Time",
            Shape::Intervals => "Intervals",
            Shape::Chipper => "Chipper",
            Shape::Ladder => "Ladder",
        }
    }
}

/// Which categories dominate a metcon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    Balanced,
    Barbell,
    Gymnastics,
    Calisthenics,
    Engine,
    Skill,
}

impl Focus {
    pub fn all() -> &'static [Focus] {
        &[
            Focus::Balanced,
            Focus::Barbell,
            Focus::Gymnastics,
            Focus::Calisthenics,
            Focus::Engine,
            Focus::Skill,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Focus::Balanced => "Balanced",
            Focus::Barbell => "Barbell",
            Focus::Gymnastics => "Gymnastics",
            Focus::Calisthenics => "Calisthenics",
            Focus::Engine => "Engine",
            Focus::Skill => "Skill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Rx,
    Scaled,
}

impl Level {
    pub fn label(&self) -> &'static str {
        match self {
            Level::Rx => "RX",
            Level::Scaled => "Scaled",
        }
    }
}

/// Session phase: a shaped metcon, or a strength / skill session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    #[default]
    Metcon,
    Strength,
    Skill,
}

impl SessionPhase {
    pub fn all() -> &'static [SessionPhase] {
        &[SessionPhase::Metcon, SessionPhase::Strength, SessionPhase::Skill]
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Metcon => "Metcon",
            SessionPhase::Strength => "Strength",
            SessionPhase::Skill => "Skill",
        }
    }
}

/// A generated workout.
///
/// The structured form is what the timer consumes; `Display` renders the text
/// board, whose first line always names the workout kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Workout {
    Emom {
        minutes: u32,
        slots: Vec<String>,
        cycles: u32,
    },
    Amrap {
        minutes: u32,
        movements: Vec<String>,
    },
    ForTime {
        scheme: String,
        buy_in: Option<String>,
        movements: Vec<String>,
    },
    Intervals {
        rounds: u32,
        work_secs: u32,
        rest_secs: u32,
        movements: Vec<String>,
    },
    Chipper {
        movements: Vec<String>,
    },
    Ladder {
        start: u32,
        step: u32,
        movements: Vec<String>,
    },
    Strength {
        lift: String,
        prescription: String,
    },
    Skill {
        practice: String,
        movements: Vec<String>,
    },
}

impl Workout {
    /// Metcon shape, `None` for strength and skill sessions
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Workout::Emom { .. } => Some(Shape::Emom),
            Workout::Amrap { .. } => Some(Shape::Amrap),
            Workout::ForTime { .. } => Some(Shape::ForTime),
            Workout::Intervals { .. } => Some(Shape::Intervals),
            Workout::Chipper { .. } => Some(Shape::Chipper),
            Workout::Ladder { .. } => Some(Shape::Ladder),
            Workout::Strength { .. } | Workout::Skill { .. } => None,
        }
    }

    /// First line of the text board
    pub fn title(&self) -> String {
        match self {
            Workout::Emom { minutes, .. } => format!("EMOM {}", minutes),
            Workout::Amrap { minutes, .. } => format!("AMRAP {}", minutes),
            Workout::ForTime { .. } => "For Time".to_string(),
            Workout::Intervals { .. } => "Intervals".to_string(),
            Workout::Chipper { .. } => "Chipper (For Time)".to_string(),
            Workout::Ladder { .. } => "Ladder".to_string(),
            Workout::Strength { .. } => "Strength Phase".to_string(),
            Workout::Skill { .. } => "Skill Phase".to_string(),
        }
    }

    /// Movement lines in board order
    pub fn movements(&self) -> Vec<&str> {
        match self {
            Workout::Emom { slots, .. } => slots.iter().map(String::as_str).collect(),
            Workout::Amrap { movements, .. }
            | Workout::Intervals { movements, .. }
            | Workout::Chipper { movements }
            | Workout::Ladder { movements, .. }
            | Workout::Skill { movements, .. } => movements.iter().map(String::as_str).collect(),
            Workout::ForTime { buy_in, movements, .. } => buy_in
                .iter()
                .chain(movements.iter())
                .map(String::as_str)
                .collect(),
            Workout::Strength { lift, .. } => vec![lift.as_str()],
        }
    }

    /// Ladder rungs shown on the board (the ladder itself keeps climbing)
    pub fn ladder_rungs(start: u32, step: u32) -> [u32; 4] {
        [start, start + step, start + 2 * step, start + 3 * step]
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        match self {
            Workout::Emom { slots, cycles, .. } => {
                for (i, slot) in slots.iter().enumerate() {
                    writeln!(f, "Min {}: {}", i + 1, slot)?;
                }
                write!(f, "Repeat x{}", cycles)
            }
            Workout::Amrap { movements, .. } | Workout::Chipper { movements } => {
                write_lines(f, movements)
            }
            Workout::ForTime { scheme, buy_in, movements } => {
                if let Some(buy_in) = buy_in {
                    writeln!(f, "Buy-in: {}", buy_in)?;
                }
                writeln!(f, "{}", scheme)?;
                write_lines(f, movements)
            }
            Workout::Intervals { rounds, work_secs, rest_secs, movements } => {
                writeln!(f, "{} rounds", rounds)?;
                writeln!(f, "{}s work / {}s rest", work_secs, rest_secs)?;
                write!(f, "Rotate:")?;
                for (i, m) in movements.iter().enumerate() {
                    write!(f, "\n{}) {}", i + 1, m)?;
                }
                Ok(())
            }
            Workout::Ladder { start, step, movements } => {
                let rungs = Workout::ladder_rungs(*start, *step)
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join("-");
                writeln!(f, "{}...", rungs)?;
                write_lines(f, movements)
            }
            Workout::Strength { lift, prescription } => {
                writeln!(f, "{}", lift)?;
                writeln!(f, "{}", prescription)?;
                write!(f, "Rest 2–3 min between sets")
            }
            Workout::Skill { practice, movements } => {
                writeln!(f, "{}", practice)?;
                for m in movements {
                    writeln!(f, "{}", m)?;
                }
                write!(f, "Keep quality high")
            }
        }
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, lines: &[String]) -> fmt::Result {
    write!(f, "{}", lines.join("\n"))
}
