//! Timer state machine: idle → running → finished / stopped

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use super::clock::{SegmentKind, TimerPhase, WARNING_SECS, evaluate};
use super::presets::Preset;
use super::{Cue, EMOM_MINUTE_SECS, TimerConfig, TimerMode, format_clock, stations};
use crate::wod::Workout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Stopped,
    Finished,
}

/// Snapshot handed to whatever draws the timer
#[derive(Debug, Clone, PartialEq)]
pub struct TimerView {
    pub clock: String,
    pub phase: String,
    pub mode_label: String,
    pub status_label: String,
    pub title: String,
    pub now: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IntervalTimer {
    /// Settings as the user left them
    config: TimerConfig,
    /// Settings locked in at start
    active: TimerConfig,
    status: TimerStatus,
    round: u32,
    phase: TimerPhase,
    display_secs: f64,
    workout: Option<Workout>,
    stations: Vec<String>,
    title: Option<String>,
    last_segment: Option<(u64, SegmentKind)>,
    warned_segment: Option<u64>,
}

impl Default for IntervalTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

impl IntervalTimer {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            active: config.normalized(),
            status: TimerStatus::Idle,
            round: 1,
            phase: TimerPhase::Ready,
            display_secs: config.starting_secs(),
            workout: None,
            stations: Vec::new(),
            title: None,
            last_segment: None,
            warned_segment: None,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn display_secs(&self) -> f64 {
        self.display_secs
    }

    pub fn workout(&self) -> Option<&Workout> {
        self.workout.as_ref()
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// New settings; a running clock keeps its current ones until restarted.
    ///
    /// EMOM always runs one-minute stations without rest.
    pub fn configure(&mut self, mut config: TimerConfig) {
        if config.mode == TimerMode::Emom {
            config.work_secs = EMOM_MINUTE_SECS;
            config.rest_secs = 0;
        }
        self.config = config;
        if self.status == TimerStatus::Idle {
            self.display_secs = config.starting_secs();
        }
        debug!("Timer configured: {:?}", config);
    }

    /// Attach a workout without touching the configuration
    pub fn set_workout<R: Rng + ?Sized>(&mut self, workout: Option<Workout>, rng: &mut R) {
        self.stations = match &workout {
            Some(w) => stations::resolve(w, rng),
            None => Vec::new(),
        };
        self.workout = workout;
        self.title = None;
    }

    /// Hand a generated workout to the timer and derive its settings
    pub fn load_workout<R: Rng + ?Sized>(&mut self, workout: Workout, rng: &mut R) {
        let config = self.config.for_workout(&workout);
        info!("Timer loaded '{}' as {}", workout.title(), config.mode);
        self.set_workout(Some(workout), rng);
        self.configure(config);
        self.reset();
    }

    /// Preset settings replace any loaded workout
    pub fn apply_preset<R: Rng + ?Sized>(&mut self, preset: &Preset, rng: &mut R) {
        self.set_workout(None, rng);
        self.title = Some(preset.title.to_string());
        self.configure(preset.config);
        self.reset();
        info!("Timer preset: {}", preset.title);
    }

    pub fn start(&mut self) {
        if let Some(Workout::Emom { minutes, .. }) = &self.workout {
            self.config.mode = TimerMode::Emom;
            self.config.work_secs = EMOM_MINUTE_SECS;
            self.config.rest_secs = 0;
            if self.config.rounds == 0 {
                self.config.rounds = *minutes;
            }
        }

        self.active = self.config.normalized();
        self.status = TimerStatus::Running;
        self.round = 1;
        self.last_segment = None;
        self.warned_segment = None;

        let frame = evaluate(&self.active, 0.0);
        self.display_secs = frame.display_secs;
        self.phase = frame.phase;
        info!(
            "Timer started: {} work={}s rest={}s rounds={}",
            self.active.mode, self.active.work_secs, self.active.rest_secs, self.active.rounds
        );
    }

    /// Recompute state for `elapsed` time since start; returns the cues to play
    pub fn tick(&mut self, elapsed: Duration) -> Vec<Cue> {
        let mut cues = Vec::new();
        if self.status != TimerStatus::Running {
            return cues;
        }

        let frame = evaluate(&self.active, elapsed.as_secs_f64());
        self.display_secs = frame.display_secs;
        self.phase = frame.phase;
        self.round = frame.round.max(1);

        if frame.finished {
            self.status = TimerStatus::Finished;
            cues.push(match self.active.mode {
                TimerMode::Countdown => Cue::TimeUp,
                _ => Cue::Complete,
            });
            info!("Timer finished: {}", self.phase);
            return cues;
        }

        if let Some(segment) = frame.segment {
            match self.last_segment {
                Some((index, kind)) if index != segment.index => cues.push(match kind {
                    SegmentKind::Work => Cue::WorkDone,
                    SegmentKind::Rest => Cue::RestDone,
                }),
                _ => {}
            }
            self.last_segment = Some((segment.index, segment.kind));

            if segment.length_secs >= WARNING_SECS
                && segment.remaining_secs <= WARNING_SECS
                && self.warned_segment != Some(segment.index)
            {
                self.warned_segment = Some(segment.index);
                cues.push(Cue::TenSeconds {
                    rest: segment.kind == SegmentKind::Rest,
                });
            }
        }

        cues
    }

    /// Halt a running clock; does nothing otherwise
    pub fn stop(&mut self) {
        if self.status == TimerStatus::Running {
            self.status = TimerStatus::Stopped;
            self.phase = TimerPhase::Stopped;
            info!("Timer stopped at {}", format_clock(self.display_secs, true));
        }
    }

    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.round = 1;
        self.phase = TimerPhase::Ready;
        self.display_secs = self.config.starting_secs();
        self.last_segment = None;
        self.warned_segment = None;
    }

    pub fn status_label(&self) -> String {
        match self.status {
            TimerStatus::Idle => "Ready".to_string(),
            TimerStatus::Running => self.active.mode.as_str().to_uppercase(),
            TimerStatus::Stopped => "Stopped".to_string(),
            TimerStatus::Finished => "Done".to_string(),
        }
    }

    pub fn view(&self) -> TimerView {
        let mode = match self.status {
            TimerStatus::Idle => self.config.mode,
            _ => self.active.mode,
        };
        let title = match (&self.title, &self.workout) {
            (Some(title), _) => title.clone(),
            (None, Some(workout)) => workout.title(),
            (None, None) => "No workout loaded".to_string(),
        };
        let shown = stations::shown_for(mode, self.workout.as_ref());
        let (now, next) = match stations::now_next(&self.stations, self.round) {
            Some((now, next)) if shown => (Some(now.to_string()), Some(next.to_string())),
            _ => (None, None),
        };

        TimerView {
            clock: format_clock(self.display_secs, true),
            phase: self.phase.to_string(),
            mode_label: mode.label().to_string(),
            status_label: self.status_label(),
            title,
            now,
            next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::find_preset;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// Tick every 100 ms from `from` up to and including `to`
    fn run(timer: &mut IntervalTimer, from: f64, to: f64) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut step = (from * 10.0).round() as u64;
        let last = (to * 10.0).round() as u64;
        while step <= last {
            cues.extend(timer.tick(Duration::from_millis(step * 100)));
            step += 1;
        }
        cues
    }

    fn emom_workout(minutes: u32) -> Workout {
        Workout::Emom {
            minutes,
            slots: vec!["A".into(), "B".into(), "C".into()],
            cycles: 4,
        }
    }

    #[test]
    fn test_countdown_ten_second_cue_once() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 10, 0, 0));
        timer.start();
        assert_eq!(timer.display_secs(), 10.0);

        let cues = run(&mut timer, 0.0, 9.9);
        let warnings = cues
            .iter()
            .filter(|c| matches!(c, Cue::TenSeconds { .. }))
            .count();
        assert_eq!(warnings, 1);
        assert_eq!(timer.status(), TimerStatus::Running);
    }

    #[test]
    fn test_ten_second_cue_fires_late_in_long_countdown() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 30, 0, 0));
        timer.start();
        assert!(run(&mut timer, 0.0, 19.9).is_empty());
        assert_eq!(timer.tick(secs(20.0)), vec![Cue::TenSeconds { rest: false }]);
        assert!(timer.tick(secs(20.1)).is_empty());
    }

    #[test]
    fn test_countdown_finishes_and_stays_finished() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 10, 0, 0));
        timer.start();
        assert_eq!(timer.tick(secs(10.0)), vec![Cue::TimeUp]);
        assert_eq!(timer.status(), TimerStatus::Finished);
        assert_eq!(timer.phase(), TimerPhase::TimeUp);

        assert!(timer.tick(secs(11.0)).is_empty());
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Finished);
        assert_eq!(timer.view().phase, "TIME!");

        timer.reset();
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_reset_restores_display_and_round() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Emom, 60, 0, 3));
        timer.start();
        timer.tick(secs(130.0));
        assert_eq!(timer.round(), 3);

        timer.reset();
        assert_eq!(timer.round(), 1);
        assert_eq!(timer.display_secs(), 60.0);
        assert_eq!(timer.phase(), TimerPhase::Ready);
        assert_eq!(timer.view().clock, "01:00.0");

        let mut sw = IntervalTimer::new(TimerConfig::new(TimerMode::Stopwatch, 90, 0, 0));
        sw.start();
        sw.tick(secs(42.0));
        sw.reset();
        assert_eq!(sw.display_secs(), 0.0);
    }

    #[test]
    fn test_emom_cues_per_minute() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Emom, 60, 0, 3));
        timer.start();
        let cues = run(&mut timer, 0.0, 181.0);
        let count = |want: Cue| cues.iter().filter(|c| **c == want).count();
        assert_eq!(count(Cue::TenSeconds { rest: false }), 3);
        assert_eq!(count(Cue::WorkDone), 2);
        assert_eq!(count(Cue::Complete), 1);
        assert_eq!(timer.status(), TimerStatus::Finished);
    }

    #[test]
    fn test_tabata_rest_cues() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Intervals, 20, 10, 8));
        timer.start();
        let cues = run(&mut timer, 0.0, 30.5);
        assert_eq!(
            cues,
            vec![
                Cue::TenSeconds { rest: false },
                Cue::WorkDone,
                Cue::TenSeconds { rest: true },
                Cue::RestDone,
            ]
        );
        assert_eq!(timer.view().phase, "WORK • ROUND 2/8");
    }

    #[test]
    fn test_emom_workout_infers_rounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut timer = IntervalTimer::default();
        timer.set_workout(Some(emom_workout(12)), &mut rng);
        timer.start();
        assert_eq!(timer.config().mode, TimerMode::Emom);
        assert_eq!(timer.config().rounds, 12);
        assert_eq!(timer.view().phase, "MIN 1 / 12");
    }

    #[test]
    fn test_emom_workout_keeps_explicit_rounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Intervals, 40, 20, 5));
        timer.set_workout(Some(emom_workout(12)), &mut rng);
        timer.start();
        let config = timer.config();
        assert_eq!(config, TimerConfig::new(TimerMode::Emom, 60, 0, 5));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Stopwatch, 0, 0, 0));
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Idle);

        timer.start();
        timer.tick(secs(5.0));
        timer.stop();
        timer.stop();
        assert_eq!(timer.status(), TimerStatus::Stopped);
        assert_eq!(timer.view().phase, "STOPPED");
        assert!(timer.tick(secs(6.0)).is_empty());
        assert_eq!(timer.view().clock, "00:05.0");
    }

    #[test]
    fn test_restart_after_stop() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Emom, 60, 0, 3));
        timer.start();
        timer.tick(secs(100.0));
        timer.stop();
        timer.start();
        assert_eq!(timer.status(), TimerStatus::Running);
        assert_eq!(timer.round(), 1);
        timer.tick(secs(1.0));
        assert_eq!(timer.view().phase, "MIN 1 / 3");
    }

    #[test]
    fn test_configure_while_running_waits_for_restart() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 30, 0, 0));
        timer.start();
        timer.configure(TimerConfig::new(TimerMode::Countdown, 5, 0, 0));
        timer.tick(secs(10.0));
        assert!(timer.is_running());
        timer.start();
        timer.tick(secs(5.0));
        assert_eq!(timer.status(), TimerStatus::Finished);
    }

    #[test]
    fn test_load_workout_derives_config() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut timer = IntervalTimer::default();
        let intervals = Workout::Intervals {
            rounds: 6,
            work_secs: 45,
            rest_secs: 30,
            movements: vec!["Row 250m".into(), "Burpees 15 reps".into()],
        };
        timer.load_workout(intervals, &mut rng);
        assert_eq!(timer.config(), TimerConfig::new(TimerMode::Intervals, 45, 30, 6));
        assert_eq!(timer.display_secs(), 45.0);

        let view = timer.view();
        assert_eq!(view.title, "Intervals");
        assert_eq!(view.now, None);
        assert_eq!(view.next, None);

        let mut config = timer.config();
        config.mode = TimerMode::Emom;
        timer.configure(config);
        let view = timer.view();
        assert_eq!(view.now.as_deref(), Some("Row 250m"));
        assert_eq!(view.next.as_deref(), Some("Burpees 15 reps"));
    }

    #[test]
    fn test_no_stations_without_workout() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 60, 0, 0));
        assert_eq!(timer.view().now, None);

        timer.configure(TimerConfig::new(TimerMode::Emom, 60, 0, 5));
        timer.start();
        timer.tick(secs(61.0));
        let view = timer.view();
        assert_eq!(view.now, None);
        assert_eq!(view.next, None);
    }

    #[test]
    fn test_emom_ignores_configured_work_length() {
        let mut timer = IntervalTimer::default();
        timer.configure(TimerConfig::new(TimerMode::Emom, 75, 20, 10));
        assert_eq!(timer.config(), TimerConfig::new(TimerMode::Emom, 60, 0, 10));
        assert_eq!(timer.display_secs(), 60.0);

        timer.start();
        timer.tick(secs(65.0));
        assert_eq!(timer.view().phase, "MIN 2 / 10");
        assert_eq!(timer.view().clock, "00:55.0");
    }

    #[test]
    fn test_stations_follow_round() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut timer = IntervalTimer::default();
        timer.load_workout(emom_workout(12), &mut rng);
        timer.start();
        timer.tick(secs(61.0));
        let view = timer.view();
        assert_eq!(view.now.as_deref(), Some("B"));
        assert_eq!(view.next.as_deref(), Some("C"));
    }

    #[test]
    fn test_apply_preset_drops_workout() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut timer = IntervalTimer::default();
        timer.load_workout(emom_workout(12), &mut rng);
        let tabata = find_preset("tabata").expect("tabata preset");
        timer.apply_preset(tabata, &mut rng);
        assert!(timer.workout().is_none());
        assert!(timer.stations().is_empty());
        assert_eq!(timer.view().now, None);
        assert_eq!(timer.view().title, "Tabata");

        timer.start();
        assert_eq!(timer.config().mode, TimerMode::Intervals);
    }

    #[test]
    fn test_status_labels() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Emom, 60, 0, 1));
        assert_eq!(timer.status_label(), "Ready");
        timer.start();
        assert_eq!(timer.status_label(), "EMOM");
        timer.tick(secs(61.0));
        assert_eq!(timer.status_label(), "Done");
    }
}
