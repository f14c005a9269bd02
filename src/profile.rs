//! Athlete profile - one-rep-max, max reps and benchmark scores

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Lifts with a tracked one-rep-max
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Lift {
    Clean,
    Snatch,
    Deadlift,
    Squat,
    PressJerk,
}

impl Lift {
    /// Settings key suffix (`rm_<key>`)
    pub fn key(&self) -> &'static str {
        match self {
            Lift::Clean => "clean",
            Lift::Snatch => "snatch",
            Lift::Deadlift => "deadlift",
            Lift::Squat => "squat",
            Lift::PressJerk => "pressjerk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Lift::Clean => "Clean",
            Lift::Snatch => "Snatch",
            Lift::Deadlift => "Deadlift",
            Lift::Squat => "Squat",
            Lift::PressJerk => "Press / Jerk",
        }
    }

    pub fn all() -> &'static [Lift] {
        &[Lift::Clean, Lift::Snatch, Lift::Deadlift, Lift::Squat, Lift::PressJerk]
    }

    /// Which lift a movement prescription refers to.
    ///
    /// Order matters: "Clean & Jerk" is a clean, "Power Snatch" is a snatch.
    pub fn from_movement(text: &str) -> Option<Lift> {
        let m = text.to_lowercase();
        if m.contains("snatch") {
            Some(Lift::Snatch)
        } else if m.contains("clean") {
            Some(Lift::Clean)
        } else if m.contains("deadlift") {
            Some(Lift::Deadlift)
        } else if m.contains("squat") {
            Some(Lift::Squat)
        } else if m.contains("jerk") || m.contains("press") {
            Some(Lift::PressJerk)
        } else {
            None
        }
    }
}

/// Bodyweight movements with a tracked max-reps value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MaxReps {
    Hspu,
    PullUps,
}

impl MaxReps {
    /// Settings key suffix (`max_<key>`)
    pub fn key(&self) -> &'static str {
        match self {
            MaxReps::Hspu => "hspu",
            MaxReps::PullUps => "pullups",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MaxReps::Hspu => "HSPU",
            MaxReps::PullUps => "Pull-ups",
        }
    }

    pub fn all() -> &'static [MaxReps] {
        &[MaxReps::Hspu, MaxReps::PullUps]
    }
}

/// Benchmark workouts with a free-text score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Benchmark {
    Fran,
    Grace,
    Murph,
}

impl Benchmark {
    /// Settings key suffix (`bm_<key>`)
    pub fn key(&self) -> &'static str {
        match self {
            Benchmark::Fran => "fran",
            Benchmark::Grace => "grace",
            Benchmark::Murph => "murph",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Benchmark::Fran => "Fran",
            Benchmark::Grace => "Grace",
            Benchmark::Murph => "Murph",
        }
    }

    pub fn all() -> &'static [Benchmark] {
        &[Benchmark::Fran, Benchmark::Grace, Benchmark::Murph]
    }
}

/// Athlete numbers used to annotate strength prescriptions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AthleteProfile {
    pub one_rep_max: HashMap<Lift, f64>,
    pub max_reps: HashMap<MaxReps, u32>,
    pub benchmarks: HashMap<Benchmark, String>,
}

/// Plate rounding step in kg
pub const PLATE_STEP_KG: f64 = 2.5;
pub const HEAVY_PCT: f64 = 0.85;
pub const MODERATE_PCT: f64 = 0.75;

/// Round `rm * pct` to the nearest plate step.
///
/// Returns `None` for a missing or non-positive one-rep-max.
pub fn suggested_load(rm: f64, pct: f64) -> Option<f64> {
    if !rm.is_finite() || rm <= 0.0 {
        return None;
    }
    let load = (rm * pct / PLATE_STEP_KG).round() * PLATE_STEP_KG;
    (load > 0.0).then_some(load)
}

impl AthleteProfile {
    pub fn one_rep_max(&self, lift: Lift) -> Option<f64> {
        self.one_rep_max.get(&lift).copied()
    }

    pub fn set_one_rep_max(&mut self, lift: Lift, value: f64) {
        self.one_rep_max.insert(lift, value);
    }

    /// Load hint appended to a strength prescription, e.g. `" @ ~85% (~127.5kg)"`.
    /// Empty when the lift is unknown or its one-rep-max is not set.
    pub fn load_hint(&self, movement: &str) -> String {
        let pct = if movement.to_lowercase().contains("heavy") {
            HEAVY_PCT
        } else {
            MODERATE_PCT
        };

        Lift::from_movement(movement)
            .and_then(|lift| self.one_rep_max(lift))
            .and_then(|rm| suggested_load(rm, pct))
            .map(|load| format!(" @ ~{}% (~{}kg)", (pct * 100.0).round(), load))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.one_rep_max.is_empty() && self.max_reps.is_empty() && self.benchmarks.is_empty()
    }
}
