//! Built-in timer presets

use super::{TimerConfig, TimerMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub key: &'static str,
    pub title: &'static str,
    pub config: TimerConfig,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        key: "emom10",
        title: "EMOM 10",
        config: TimerConfig::new(TimerMode::Emom, 60, 0, 10),
    },
    Preset {
        key: "emom12",
        title: "EMOM 12",
        config: TimerConfig::new(TimerMode::Emom, 60, 0, 12),
    },
    Preset {
        key: "emom20",
        title: "EMOM 20",
        config: TimerConfig::new(TimerMode::Emom, 60, 0, 20),
    },
    Preset {
        key: "tabata",
        title: "Tabata",
        config: TimerConfig::new(TimerMode::Intervals, 20, 10, 8),
    },
    Preset {
        key: "fgb",
        title: "Fight Gone Bad (15:00)",
        config: TimerConfig::new(TimerMode::Emom, 60, 0, 15),
    },
    Preset {
        key: "cd10",
        title: "Countdown 10:00",
        config: TimerConfig::new(TimerMode::Countdown, 600, 0, 1),
    },
    Preset {
        key: "stopwatch",
        title: "Stopwatch",
        config: TimerConfig::new(TimerMode::Stopwatch, 0, 0, 1),
    },
];

/// Look up a preset by key, ignoring case
pub fn find_preset(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}
