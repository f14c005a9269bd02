//! Typed preferences over a `SettingsStore`
//!
//! Reads never fail: a missing key, a storage error or an unparseable value
//! all fall back to the default. Writes report storage errors.

use std::str::FromStr;

use tracing::warn;

use super::{Result, SettingsStore};
use crate::class::CoachCadence;
use crate::profile::{AthleteProfile, Benchmark, Lift, MaxReps};
use crate::timer::{DEFAULT_WORK_SECS, TimerConfig};
use crate::tui::{Theme, View};
use crate::wod::Workout;

pub const VIEW: &str = "view";
pub const THEME: &str = "theme";
pub const LAST_WOD: &str = "last_wod";
pub const CLASS_METCON: &str = "class_current_metcon";
pub const TIMER_WORKOUT: &str = "timer_workout";
pub const TIMER_MODE: &str = "timer_mode";
pub const TIMER_WORK: &str = "timer_work";
pub const TIMER_REST: &str = "timer_rest";
pub const TIMER_ROUNDS: &str = "timer_rounds";
pub const COACH_AUTO: &str = "coach_auto";

pub fn rm_key(lift: Lift) -> String {
    format!("rm_{}", lift.key())
}

pub fn max_key(movement: MaxReps) -> String {
    format!("max_{}", movement.key())
}

pub fn bm_key(benchmark: Benchmark) -> String {
    format!("bm_{}", benchmark.key())
}

fn read(store: &dyn SettingsStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            warn!("Failed to read setting '{}': {}", key, e);
            None
        }
    }
}

fn parse<T: FromStr>(store: &dyn SettingsStore, key: &str) -> Option<T> {
    let raw = read(store, key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring malformed setting {}={:?}", key, raw);
            None
        }
    }
}

fn write_opt(store: &mut dyn SettingsStore, key: &str, value: Option<String>) -> Result<()> {
    match value {
        Some(v) => store.set(key, &v),
        None => store.delete(key),
    }
}

// ---- Athlete profile ----

pub fn load_profile(store: &dyn SettingsStore) -> AthleteProfile {
    let mut profile = AthleteProfile::default();
    for lift in Lift::all() {
        if let Some(rm) = parse::<f64>(store, &rm_key(*lift)).filter(|v| v.is_finite() && *v > 0.0) {
            profile.one_rep_max.insert(*lift, rm);
        }
    }
    for movement in MaxReps::all() {
        if let Some(reps) = parse::<u32>(store, &max_key(*movement)) {
            profile.max_reps.insert(*movement, reps);
        }
    }
    for benchmark in Benchmark::all() {
        if let Some(score) = read(store, &bm_key(*benchmark)) {
            profile.benchmarks.insert(*benchmark, score);
        }
    }
    profile
}

/// `None` clears the value
pub fn save_one_rep_max(store: &mut dyn SettingsStore, lift: Lift, kg: Option<f64>) -> Result<()> {
    write_opt(store, &rm_key(lift), kg.map(|v| v.to_string()))
}

pub fn save_max_reps(store: &mut dyn SettingsStore, movement: MaxReps, reps: Option<u32>) -> Result<()> {
    write_opt(store, &max_key(movement), reps.map(|v| v.to_string()))
}

pub fn save_benchmark(store: &mut dyn SettingsStore, benchmark: Benchmark, score: Option<&str>) -> Result<()> {
    let score = score.map(str::trim).filter(|s| !s.is_empty()).map(String::from);
    write_opt(store, &bm_key(benchmark), score)
}

pub fn clear_profile(store: &mut dyn SettingsStore) -> Result<()> {
    for lift in Lift::all() {
        store.delete(&rm_key(*lift))?;
    }
    for movement in MaxReps::all() {
        store.delete(&max_key(*movement))?;
    }
    for benchmark in Benchmark::all() {
        store.delete(&bm_key(*benchmark))?;
    }
    Ok(())
}

// ---- Timer ----

pub fn load_timer_config(store: &dyn SettingsStore) -> TimerConfig {
    TimerConfig {
        mode: parse(store, TIMER_MODE).unwrap_or_default(),
        work_secs: parse(store, TIMER_WORK).unwrap_or(DEFAULT_WORK_SECS),
        rest_secs: parse(store, TIMER_REST).unwrap_or(0),
        rounds: parse(store, TIMER_ROUNDS).unwrap_or(0),
    }
}

pub fn save_timer_config(store: &mut dyn SettingsStore, config: &TimerConfig) -> Result<()> {
    store.set(TIMER_MODE, config.mode.as_str())?;
    store.set(TIMER_WORK, &config.work_secs.to_string())?;
    store.set(TIMER_REST, &config.rest_secs.to_string())?;
    store.set(TIMER_ROUNDS, &config.rounds.to_string())?;
    Ok(())
}

// ---- Workouts ----

/// Stored workout under `key`; unreadable JSON counts as absent
pub fn load_workout(store: &dyn SettingsStore, key: &str) -> Option<Workout> {
    let raw = read(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(workout) => Some(workout),
        Err(e) => {
            warn!("Ignoring unreadable workout in '{}': {}", key, e);
            None
        }
    }
}

pub fn save_workout(store: &mut dyn SettingsStore, key: &str, workout: &Workout) -> Result<()> {
    let json = serde_json::to_string(workout)?;
    store.set(key, &json)
}

// ---- Dashboard ----

pub fn load_theme(store: &dyn SettingsStore) -> Theme {
    parse(store, THEME).unwrap_or_default()
}

pub fn save_theme(store: &mut dyn SettingsStore, theme: Theme) -> Result<()> {
    store.set(THEME, theme.as_str())
}

pub fn load_view(store: &dyn SettingsStore) -> View {
    parse(store, VIEW).unwrap_or_default()
}

pub fn save_view(store: &mut dyn SettingsStore, view: View) -> Result<()> {
    store.set(VIEW, view.as_str())
}

pub fn load_cadence(store: &dyn SettingsStore) -> CoachCadence {
    parse(store, COACH_AUTO).unwrap_or_default()
}

pub fn save_cadence(store: &mut dyn SettingsStore, cadence: CoachCadence) -> Result<()> {
    store.set(COACH_AUTO, &cadence.to_string())
}
