//! WOD module - workout generation
//!
//! Features:
//! - Structured workouts for every metcon shape
//! - Strength and skill sessions with load hints from the athlete profile
//! - Text boards rendered from the structured form

pub mod generator;
pub mod types;

pub use generator::{WodRequest, generate};
pub use types::{Focus, Level, SessionPhase, Shape, Workout};
