//! TUI module - Terminal dashboard with ratatui
//!
//! Four views: athlete board (WOD generator), class board, timer and profile.
//! The event loop polls input every 100 ms and ticks the timer on each pass.

pub mod theme;

use std::fmt;
use std::io::{Stdout, stdout};
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use thiserror::Error;
use tracing::{error, info};

use crate::audio::{AudioSink, CuePlayer};
use crate::class::{ClassProgram, ClassQueue, CoachCadence, INITIAL_PROGRAMS, RotationSchedule};
use crate::profile::{AthleteProfile, Benchmark, HEAVY_PCT, Lift, MODERATE_PCT, MaxReps, suggested_load};
use crate::settings::SettingsStore;
use crate::settings::prefs;
use crate::timer::{IntervalTimer, PRESETS, TimerConfig, TimerStatus};
use crate::wod::{Focus, Level, SessionPhase, Shape, WodRequest, Workout, generate};

pub use theme::Theme;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// How long a notice stays in the footer
pub const NOTICE_TTL: Duration = Duration::from_millis(1200);
const POLL: Duration = Duration::from_millis(100);

const WORK_STEP_SECS: u32 = 15;
const REST_STEP_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Athlete, // WOD generator
    Class,   // class board + coach
    Timer,
    Profile,
}

impl View {
    pub fn all() -> &'static [View] {
        &[View::Athlete, View::Class, View::Timer, View::Profile]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Athlete => "athlete",
            View::Class => "class",
            View::Timer => "timer",
            View::Profile => "profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Athlete => "Athlete",
            View::Class => "Class",
            View::Timer => "Timer",
            View::Profile => "Profile",
        }
    }

    pub fn next(&self) -> View {
        cycle(View::all(), *self)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown view '{0}'")]
pub struct ParseViewError(pub String);

impl FromStr for View {
    type Err = ParseViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::all()
            .iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ParseViewError(s.trim().to_string()))
    }
}

/// Item after `current` in `all`, wrapping around
fn cycle<T: Copy + PartialEq>(all: &[T], current: T) -> T {
    let idx = all.iter().position(|x| *x == current).unwrap_or(0);
    all[(idx + 1) % all.len()]
}

/// App state for TUI
pub struct App<S: SettingsStore, A: AudioSink> {
    store: S,
    player: CuePlayer<A>,
    rng: StdRng,
    view: View,
    theme: Theme,
    profile: AthleteProfile,
    request: WodRequest,
    workout: Option<Workout>,
    classes: ClassQueue,
    coach: RotationSchedule,
    timer: IntervalTimer,
    timer_epoch: Option<Instant>,
    preset_idx: usize,
    notice: Option<(String, Instant)>,
    should_quit: bool,
}

impl<S: SettingsStore, A: AudioSink> App<S, A> {
    pub fn new(store: S, audio: A) -> Self {
        Self::with_rng(store, audio, StdRng::from_entropy())
    }

    /// Restore the dashboard from stored preferences
    pub fn with_rng(store: S, audio: A, mut rng: StdRng) -> Self {
        let profile = prefs::load_profile(&store);
        let workout = prefs::load_workout(&store, prefs::LAST_WOD);

        let mut classes = ClassQueue::seeded(INITIAL_PROGRAMS, &mut rng);
        if let Some(metcon) = prefs::load_workout(&store, prefs::CLASS_METCON)
            && let Some(program) = classes.current_mut()
        {
            program.metcon = metcon;
        }

        let mut timer = IntervalTimer::new(prefs::load_timer_config(&store));
        timer.set_workout(prefs::load_workout(&store, prefs::TIMER_WORKOUT), &mut rng);

        let coach = RotationSchedule::new(prefs::load_cadence(&store), Instant::now());

        Self {
            view: prefs::load_view(&store),
            theme: prefs::load_theme(&store),
            store,
            player: CuePlayer::new(audio),
            rng,
            profile,
            request: WodRequest::default(),
            workout,
            classes,
            coach,
            timer,
            timer_epoch: None,
            preset_idx: 0,
            notice: None,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run(&mut self) -> Result<()> {
        let mut terminal = init_terminal()?;
        info!("Dashboard opened on {}", self.view);
        with_restore(|| self.event_loop(&mut terminal), restore_terminal)
    }

    fn event_loop(&mut self, terminal: &mut Tui) -> Result<()> {
        while !self.should_quit {
            self.tick(Instant::now());
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Advance everything that moves on its own
    pub fn tick(&mut self, now: Instant) {
        if let Some(epoch) = self.timer_epoch
            && self.timer.is_running()
        {
            let cues = self.timer.tick(now.saturating_duration_since(epoch));
            self.player.play_all(&cues);
            if self.timer.status() == TimerStatus::Finished {
                self.timer_epoch = None;
            }
        }

        if self.coach.poll(now) {
            if let Err(e) = self.rotate_class() {
                error!("Coach rotation failed: {}", e);
            }
            self.notify("Coach: next class");
        }

        if let Some((_, shown)) = &self.notice
            && now.saturating_duration_since(*shown) >= NOTICE_TTL
        {
            self.notice = None;
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), Instant::now()));
    }

    fn handle_events(&mut self) -> Result<()> {
        if event::poll(POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Err(e) = self.handle_key(key.code)
        {
            error!("Key {:?} failed: {}", key.code, e);
            self.notify(format!("Error: {}", e));
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.set_view(self.view.next())?,
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.set_view(View::all()[idx])?;
            }
            KeyCode::Char('t') => {
                self.theme = self.theme.next();
                prefs::save_theme(&mut self.store, self.theme)?;
                self.notify(format!("Theme: {}", self.theme));
            }
            KeyCode::Char('m') => {
                let muted = !self.player.is_muted();
                self.player.set_muted(muted);
                self.notify(if muted { "Sound off" } else { "Sound on" });
            }
            _ => match self.view {
                View::Athlete => self.athlete_key(code)?,
                View::Class => self.class_key(code)?,
                View::Timer => self.timer_key(code)?,
                View::Profile => {}
            },
        }
        Ok(())
    }

    fn set_view(&mut self, view: View) -> Result<()> {
        self.view = view;
        prefs::save_view(&mut self.store, view)?;
        Ok(())
    }

    fn athlete_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('g') => self.generate(self.request)?,
            KeyCode::Char('r') => {
                let request = WodRequest::quick(&mut self.rng);
                self.generate(request)?;
            }
            KeyCode::Char('s') => self.request.shape = cycle(Shape::all(), self.request.shape),
            KeyCode::Char('f') => self.request.focus = cycle(Focus::all(), self.request.focus),
            KeyCode::Char('l') => {
                self.request.level = match self.request.level {
                    Level::Rx => Level::Scaled,
                    Level::Scaled => Level::Rx,
                }
            }
            KeyCode::Char('p') => self.request.phase = cycle(SessionPhase::all(), self.request.phase),
            KeyCode::Char('u') => match self.workout.clone() {
                Some(workout) => self.send_to_timer(workout)?,
                None => self.notify("Generate a workout first"),
            },
            _ => {}
        }
        Ok(())
    }

    fn generate(&mut self, request: WodRequest) -> Result<()> {
        let workout = generate(&request, &self.profile, &mut self.rng);
        prefs::save_workout(&mut self.store, prefs::LAST_WOD, &workout)?;
        self.notify(format!("Generated: {}", workout.title()));
        self.workout = Some(workout);
        Ok(())
    }

    fn class_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char('n') => self.rotate_class()?,
            KeyCode::Char('a') => {
                let program = ClassProgram::build(&mut self.rng);
                let metcon = self.classes.add(program).metcon.clone();
                prefs::save_workout(&mut self.store, prefs::CLASS_METCON, &metcon)?;
                self.notify("New class added");
            }
            KeyCode::Char('c') => {
                let cadence = self.coach.cadence().next();
                self.coach.set(cadence, Instant::now());
                prefs::save_cadence(&mut self.store, cadence)?;
                self.notify(match cadence {
                    CoachCadence::Off => "Coach auto-rotate off".to_string(),
                    CoachCadence::Every(p) => format!("Coach auto-rotate every {}s", p.as_secs()),
                });
            }
            KeyCode::Char('u') => match self.classes.current().map(|p| p.metcon.clone()) {
                Some(metcon) => self.send_to_timer(metcon)?,
                None => self.notify("No class on the board"),
            },
            _ => {}
        }
        Ok(())
    }

    fn rotate_class(&mut self) -> Result<()> {
        if let Some(metcon) = self.classes.rotate().map(|p| p.metcon.clone()) {
            prefs::save_workout(&mut self.store, prefs::CLASS_METCON, &metcon)?;
        }
        Ok(())
    }

    fn send_to_timer(&mut self, workout: Workout) -> Result<()> {
        self.timer_epoch = None;
        self.timer.load_workout(workout, &mut self.rng);
        if let Some(loaded) = self.timer.workout() {
            prefs::save_workout(&mut self.store, prefs::TIMER_WORKOUT, loaded)?;
        }
        prefs::save_timer_config(&mut self.store, &self.timer.config())?;
        self.set_view(View::Timer)?;
        self.notify("Loaded into timer");
        Ok(())
    }

    fn timer_key(&mut self, code: KeyCode) -> Result<()> {
        match code {
            KeyCode::Char(' ') | KeyCode::Enter => {
                if self.timer.is_running() {
                    self.timer.stop();
                    self.timer_epoch = None;
                } else {
                    self.timer.start();
                    self.timer_epoch = Some(Instant::now());
                    // start may coerce the config for an EMOM workout
                    prefs::save_timer_config(&mut self.store, &self.timer.config())?;
                    self.notify("Timer started");
                }
            }
            KeyCode::Char('r') => {
                self.timer.reset();
                self.timer_epoch = None;
            }
            KeyCode::Char('b') => self.player.test_beep(),
            KeyCode::Char('p') => {
                let preset = &PRESETS[self.preset_idx % PRESETS.len()];
                self.preset_idx = (self.preset_idx + 1) % PRESETS.len();
                self.timer_epoch = None;
                self.timer.apply_preset(preset, &mut self.rng);
                self.store.delete(prefs::TIMER_WORKOUT)?;
                prefs::save_timer_config(&mut self.store, &self.timer.config())?;
                self.notify(format!("Preset: {}", preset.title));
            }
            KeyCode::Char('o') => self.adjust(|c| c.mode = c.mode.next())?,
            KeyCode::Char('w') => self.adjust(|c| c.work_secs = c.work_secs.saturating_add(WORK_STEP_SECS))?,
            KeyCode::Char('W') => self.adjust(|c| c.work_secs = c.work_secs.saturating_sub(WORK_STEP_SECS))?,
            KeyCode::Char('e') => self.adjust(|c| c.rest_secs = c.rest_secs.saturating_add(REST_STEP_SECS))?,
            KeyCode::Char('E') => self.adjust(|c| c.rest_secs = c.rest_secs.saturating_sub(REST_STEP_SECS))?,
            KeyCode::Char(']') => self.adjust(|c| c.rounds = c.rounds.saturating_add(1))?,
            KeyCode::Char('[') => self.adjust(|c| c.rounds = c.rounds.saturating_sub(1))?,
            _ => {}
        }
        Ok(())
    }

    /// Edit the timer settings; a running clock picks them up on restart
    fn adjust(&mut self, edit: impl FnOnce(&mut TimerConfig)) -> Result<()> {
        let mut config = self.timer.config();
        edit(&mut config);
        self.timer.configure(config);
        prefs::save_timer_config(&mut self.store, &self.timer.config())?;
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        match self.view {
            View::Athlete => self.render_athlete(frame, chunks[1]),
            View::Class => self.render_class(frame, chunks[1]),
            View::Timer => self.render_timer(frame, chunks[1]),
            View::Profile => self.render_profile(frame, chunks[1]),
        }
        self.render_footer(frame, chunks[2]);
    }

    fn block(&self, title: impl Into<String>) -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent()))
            .title(title.into())
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            " FORGE ",
            Style::default().fg(self.theme.accent()).bold(),
        )];
        for (i, view) in View::all().iter().enumerate() {
            let label = format!(" [{}] {} ", i + 1, view.title());
            let style = if *view == self.view {
                Style::default().fg(self.theme.highlight()).bold().reversed()
            } else {
                Style::default().fg(self.theme.muted())
            };
            spans.push(Span::styled(label, style));
        }
        spans.push(Span::raw(format!("  {}", chrono::Local::now().format("%H:%M"))));

        let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn render_athlete(&self, frame: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(20)])
            .split(area);

        let r = &self.request;
        let settings = vec![
            Line::from(format!("Phase:  {}", r.phase.label())),
            Line::from(format!("Shape:  {}", r.shape.label())),
            Line::from(format!("Focus:  {}", r.focus.label())),
            Line::from(format!("Level:  {}", r.level.label())),
        ];
        frame.render_widget(Paragraph::new(settings).block(self.block("Generator")), cols[0]);

        let body = self
            .workout
            .as_ref()
            .map(|w| w.to_string())
            .unwrap_or_else(|| "Press g to generate a workout".to_string());
        let board = Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .block(self.block("WOD"));
        frame.render_widget(board, cols[1]);
    }

    fn render_class(&self, frame: &mut Frame, area: Rect) {
        let title = format!(
            "Class ({} in queue) • coach: {}",
            self.classes.len(),
            self.coach.cadence()
        );
        let outer = self.block(title);
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let Some(program) = self.classes.current() else {
            frame.render_widget(Paragraph::new("No classes queued (a: add)"), inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(inner);
        let cells: Vec<Rect> = rows
            .iter()
            .flat_map(|row| {
                Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(*row)
                    .to_vec()
            })
            .collect();

        for ((title, body), cell) in program.blocks().into_iter().zip(cells) {
            let widget = Paragraph::new(body)
                .wrap(Wrap { trim: false })
                .block(self.block(title));
            frame.render_widget(widget, cell);
        }
    }

    fn render_timer(&self, frame: &mut Frame, area: Rect) {
        let view = self.timer.view();
        let config = self.timer.config();

        let mut lines = vec![
            Line::from(view.title.clone()).centered(),
            Line::from(""),
            Line::from(Span::styled(
                view.clock.clone(),
                Style::default().fg(self.theme.accent()).bold(),
            ))
            .centered(),
            Line::from(Span::styled(
                view.phase.clone(),
                Style::default().fg(self.theme.highlight()).bold(),
            ))
            .centered(),
            Line::from(format!("{} • {}", view.mode_label, view.status_label)).centered(),
            Line::from(""),
        ];
        if let (Some(now), Some(next)) = (&view.now, &view.next) {
            lines.push(Line::from(format!("Now:  {}", now)).centered());
            lines.push(Line::from(format!("Next: {}", next)).centered());
            lines.push(Line::from(""));
        }
        lines.push(
            Line::from(Span::styled(
                format!(
                    "work {}s • rest {}s • rounds {}",
                    config.work_secs,
                    config.rest_secs,
                    match config.rounds {
                        0 => "auto".to_string(),
                        n => n.to_string(),
                    }
                ),
                Style::default().fg(self.theme.muted()),
            ))
            .centered(),
        );

        frame.render_widget(Paragraph::new(lines).block(self.block("Timer")), area);
    }

    fn render_profile(&self, frame: &mut Frame, area: Rect) {
        let kg = |v: Option<f64>| v.map(|v| format!("{}kg", v)).unwrap_or_else(|| "-".to_string());

        let mut rows: Vec<Row> = Lift::all()
            .iter()
            .map(|lift| {
                let rm = self.profile.one_rep_max(*lift);
                Row::new(vec![
                    Cell::from(lift.label()),
                    Cell::from(kg(rm)),
                    Cell::from(kg(rm.and_then(|v| suggested_load(v, MODERATE_PCT)))),
                    Cell::from(kg(rm.and_then(|v| suggested_load(v, HEAVY_PCT)))),
                ])
            })
            .collect();
        rows.extend(MaxReps::all().iter().map(|m| {
            let reps = self
                .profile
                .max_reps
                .get(m)
                .map(|r| format!("{} reps", r))
                .unwrap_or_else(|| "-".to_string());
            Row::new(vec![Cell::from(m.label()), Cell::from(reps)])
        }));
        rows.extend(Benchmark::all().iter().map(|b| {
            let score = self.profile.benchmarks.get(b).cloned().unwrap_or_else(|| "-".to_string());
            Row::new(vec![Cell::from(b.label()), Cell::from(score)])
        }));

        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
            ],
        )
        .header(Row::new(vec!["", "1RM / Max", "@ 75%", "@ 85%"]).style(Style::default().bold()))
        .block(self.block("Profile (edit with `forge profile set`)"));

        frame.render_widget(table, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let (text, style) = match &self.notice {
            Some((notice, _)) => (
                notice.clone(),
                Style::default().fg(self.theme.highlight()).bold(),
            ),
            None => {
                let keys = match self.view {
                    View::Athlete => "g: generate | r: random | s/f/l/p: shape/focus/level/phase | u: use in timer",
                    View::Class => "n: next class | a: add class | c: coach auto-rotate | u: metcon to timer",
                    View::Timer => "space: start/stop | r: reset | p: preset | o: mode | w/W e/E [/]: work rest rounds | b: beep",
                    View::Profile => "profile values are set from the command line",
                };
                (
                    format!("{} | tab: view | t: theme | m: sound | q: quit", keys),
                    Style::default().fg(self.theme.muted()),
                )
            }
        };
        let footer = Paragraph::new(text)
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(footer, area);
    }
}

fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run `body`, then `restore` even if `body` failed. The first error wins.
fn with_restore<T>(body: impl FnOnce() -> Result<T>, restore: impl FnOnce() -> Result<()>) -> Result<T> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::settings::MemorySettings;
    use crate::timer::TimerMode;
    use ratatui::backend::TestBackend;

    fn app(store: MemorySettings) -> App<MemorySettings, SilentAudio> {
        App::with_rng(store, SilentAudio, StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_terminal_restored_after_loop_error() {
        let mut restored = false;
        let result: Result<()> = with_restore(
            || Err(anyhow::anyhow!("draw failed")),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
    }

    #[test]
    fn test_loop_error_wins_over_restore_error() {
        let result: Result<()> = with_restore(
            || Err(anyhow::anyhow!("draw failed")),
            || Err(anyhow::anyhow!("restore failed")),
        );
        assert_eq!(result.unwrap_err().to_string(), "draw failed");
    }

    #[test]
    fn test_view_parse_and_cycle() {
        assert_eq!("Timer".parse::<View>(), Ok(View::Timer));
        assert_eq!(
            "settings".parse::<View>(),
            Err(ParseViewError("settings".to_string()))
        );
        assert_eq!(View::Profile.next(), View::Athlete);
    }

    #[test]
    fn test_generate_persists_last_wod() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('g')).unwrap();
        let stored = prefs::load_workout(&app.store, prefs::LAST_WOD);
        assert!(stored.is_some());
        assert_eq!(stored, app.workout);
    }

    #[test]
    fn test_use_in_timer_switches_view() {
        let mut app = app(MemorySettings::default());
        app.request = WodRequest::metcon(Shape::Emom, Focus::Balanced, Level::Rx);
        app.handle_key(KeyCode::Char('g')).unwrap();
        app.handle_key(KeyCode::Char('u')).unwrap();

        assert_eq!(app.view, View::Timer);
        assert_eq!(app.timer.config().mode, TimerMode::Emom);
        assert_eq!(prefs::load_view(&app.store), View::Timer);
        assert_eq!(prefs::load_timer_config(&app.store).rounds, 12);
        assert!(prefs::load_workout(&app.store, prefs::TIMER_WORKOUT).is_some());
    }

    #[test]
    fn test_use_without_workout_shows_notice() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('u')).unwrap();
        assert_eq!(app.view, View::Athlete);
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_class_rotate_persists_metcon() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('2')).unwrap();
        let second = app.classes.iter().nth(1).map(|p| p.metcon.clone());
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(prefs::load_workout(&app.store, prefs::CLASS_METCON), second);
    }

    #[test]
    fn test_class_metcon_restored() {
        let mut store = MemorySettings::default();
        let metcon = Workout::Chipper {
            movements: vec!["Row 500m".to_string()],
        };
        prefs::save_workout(&mut store, prefs::CLASS_METCON, &metcon).unwrap();
        let app = app(store);
        assert_eq!(app.classes.current().map(|p| &p.metcon), Some(&metcon));
    }

    #[test]
    fn test_coach_cadence_cycles_and_rotates() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('2')).unwrap();
        app.handle_key(KeyCode::Char('c')).unwrap();
        assert_eq!(prefs::load_cadence(&app.store), CoachCadence::seconds(30));

        let head = app.classes.current().cloned();
        app.tick(Instant::now() + Duration::from_secs(31));
        assert_ne!(app.classes.current().cloned(), head);
    }

    #[test]
    fn test_timer_keys() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('3')).unwrap();
        app.handle_key(KeyCode::Char('o')).unwrap();
        app.handle_key(KeyCode::Char(']')).unwrap();
        assert_eq!(app.timer.config().mode, TimerMode::Stopwatch);
        assert_eq!(prefs::load_timer_config(&app.store).rounds, 1);

        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert!(app.timer.is_running());
        app.handle_key(KeyCode::Char(' ')).unwrap();
        assert_eq!(app.timer.status(), TimerStatus::Stopped);
        app.handle_key(KeyCode::Char('r')).unwrap();
        assert_eq!(app.timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_timer_runs_from_tick() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('3')).unwrap();
        app.handle_key(KeyCode::Char('p')).unwrap();
        assert_eq!(app.timer.view().title, "EMOM 10");

        app.handle_key(KeyCode::Char(' ')).unwrap();
        let start = app.timer_epoch.expect("timer epoch");
        app.tick(start + Duration::from_secs(65));
        assert_eq!(app.timer.round(), 2);
        app.tick(start + Duration::from_secs(601));
        assert_eq!(app.timer.status(), TimerStatus::Finished);
        assert!(app.timer_epoch.is_none());
    }

    #[test]
    fn test_notice_expires() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('t')).unwrap();
        assert!(app.notice.is_some());
        app.tick(Instant::now() + NOTICE_TTL + Duration::from_millis(10));
        assert!(app.notice.is_none());
    }

    #[test]
    fn test_render_every_view() {
        let mut app = app(MemorySettings::default());
        app.handle_key(KeyCode::Char('g')).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        for view in View::all() {
            app.view = *view;
            terminal.draw(|frame| app.render(frame)).unwrap();
        }
    }
}
