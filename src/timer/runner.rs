//! Headless timer loop for the `timer` command

use std::io::Write;
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::info;

use super::{IntervalTimer, TimerStatus, TimerView};
use crate::audio::{AudioSink, CuePlayer};

/// Clock refresh period
pub const TICK: Duration = Duration::from_millis(100);

/// Receives the timer state after every tick
pub trait TimerDisplay {
    fn show(&mut self, view: &TimerView);

    fn finish(&mut self, _view: &TimerView) {}
}

/// Redraws a single terminal line in place
pub struct LineDisplay<W: Write> {
    out: W,
    last: String,
}

impl<W: Write> LineDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last: String::new(),
        }
    }

    fn line(view: &TimerView) -> String {
        let mut line = format!("{}  {}  [{}]", view.clock, view.phase, view.status_label);
        if let (Some(now), Some(next)) = (&view.now, &view.next) {
            line.push_str(&format!("  Now: {}  Next: {}", now, next));
        }
        line
    }
}

impl<W: Write> TimerDisplay for LineDisplay<W> {
    fn show(&mut self, view: &TimerView) {
        let line = Self::line(view);
        if line == self.last {
            return;
        }
        let _ = write!(self.out, "\r\x1b[2K{}", line);
        let _ = self.out.flush();
        self.last = line;
    }

    fn finish(&mut self, view: &TimerView) {
        self.show(view);
        let _ = writeln!(self.out);
    }
}

/// How the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Finished,
    Interrupted,
}

/// Start the timer and tick it until it finishes or Ctrl-C arrives.
///
/// Each tick recomputes from the start instant, so late ticks never drift.
pub async fn run<S, D>(timer: &mut IntervalTimer, player: &mut CuePlayer<S>, display: &mut D) -> RunOutcome
where
    S: AudioSink,
    D: TimerDisplay,
{
    timer.start();
    let epoch = Instant::now();
    let mut ticker = tokio::time::interval(TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let outcome = loop {
        tokio::select! {
            _ = ticker.tick() => {
                let cues = timer.tick(epoch.elapsed());
                player.play_all(&cues);
                display.show(&timer.view());
                if timer.status() == TimerStatus::Finished {
                    break RunOutcome::Finished;
                }
            }
            _ = &mut ctrl_c => {
                timer.stop();
                break RunOutcome::Interrupted;
            }
        }
    };

    display.finish(&timer.view());
    info!("Timer run ended: {:?}", outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::timer::{TimerConfig, TimerMode};

    #[derive(Default)]
    struct Frames {
        phases: Vec<String>,
        finished: Option<TimerView>,
    }

    impl TimerDisplay for Frames {
        fn show(&mut self, view: &TimerView) {
            self.phases.push(view.phase.clone());
        }

        fn finish(&mut self, view: &TimerView) {
            self.finished = Some(view.clone());
        }
    }

    #[tokio::test]
    async fn test_run_countdown_to_finish() {
        let mut timer = IntervalTimer::new(TimerConfig::new(TimerMode::Countdown, 1, 0, 0));
        let mut player = CuePlayer::new(SilentAudio);
        let mut frames = Frames::default();

        let outcome = run(&mut timer, &mut player, &mut frames).await;

        assert_eq!(outcome, RunOutcome::Finished);
        assert_eq!(timer.status(), TimerStatus::Finished);
        assert_eq!(frames.phases.first().map(String::as_str), Some("COUNTDOWN"));
        let last = frames.finished.expect("final frame");
        assert_eq!(last.phase, "TIME!");
        assert_eq!(last.clock, "00:00.0");
    }

    #[test]
    fn test_line_display_redraws_on_change() {
        let mut display = LineDisplay::new(Vec::new());
        let view = TimerView {
            clock: "00:10.0".to_string(),
            phase: "COUNTDOWN".to_string(),
            mode_label: "Countdown".to_string(),
            status_label: "COUNTDOWN".to_string(),
            title: "Countdown 10:00".to_string(),
            now: None,
            next: None,
        };
        display.show(&view);
        display.show(&view);
        let text = String::from_utf8(display.out.clone()).expect("utf8");
        assert_eq!(text.matches("00:10.0").count(), 1);
    }
}
