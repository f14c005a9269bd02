//! forge - WOD generator, class programming board and interval timer
//!
//! Workouts are generated as structured values (`wod::Workout`) and handed
//! straight to the timer; the text board is only a rendering of them.

pub mod audio;
pub mod catalog;
pub mod class;
pub mod profile;
pub mod settings;
pub mod timer;
pub mod tui;
pub mod wod;

pub use settings::{SettingsStore, SqliteSettings};
pub use timer::IntervalTimer;
pub use wod::{Workout, generate};
