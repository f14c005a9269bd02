//! Class programming board - four-block class plans and the rotating queue

pub mod coach;

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::pick_from;
use crate::wod::{Focus, Level, Shape, Workout, generator};

pub use coach::{CoachCadence, RotationSchedule};

const STRENGTH_BLOCKS: &[&str] = &[
    "Clean & Jerk\n5 x 3 @ moderate, build each set",
    "Snatch\n6 x 2 (technique focus)",
    "Back Squat\n5 x 5 (add small load)",
    "Deadlift\n5 x 3 (heavy, perfect reps)",
    "Front Squat\n4 x 6",
];

const ACCESSORY_BLOCKS: &[&str] = &[
    "Core:\n3 x 45s hollow hold\n3 x 45s side plank/side",
    "Upper:\n3 x 12 ring rows\n3 x 12 strict press (light)",
    "Mobility:\n10 min hips + thoracic + calves",
    "Posterior:\n3 x 12 GHD/hip extensions\n3 x 15 band ham curls",
];

const WARMUP_MONOSTRUCTURAL: &[&str] = &["Row", "Bike", "SkiErg"];

/// Shapes a class metcon is drawn from (ladders stay on the athlete board)
pub const CLASS_SHAPES: &[Shape] = &[
    Shape::Amrap,
    Shape::ForTime,
    Shape::Emom,
    Shape::Intervals,
    Shape::Chipper,
];

pub const CLASS_FOCUSES: &[Focus] = &[
    Focus::Balanced,
    Focus::Engine,
    Focus::Gymnastics,
    Focus::Barbell,
    Focus::Calisthenics,
];

/// Programs the queue starts with
pub const INITIAL_PROGRAMS: usize = 3;

/// One class plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProgram {
    pub warmup: String,
    pub strength: String,
    pub metcon: Workout,
    pub accessory: String,
}

impl ClassProgram {
    /// Draw every block independently
    pub fn build<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let warmups = [
            format!(
                "2 min easy {}\nMobility: hips/ankles/shoulders",
                pick_from(WARMUP_MONOSTRUCTURAL, "Row", rng)
            ),
            "400m easy run\nThen banded shoulder series".to_string(),
            "3 rounds:\n10 air squats\n10 push-ups\n200m jog".to_string(),
        ];
        let warmup = warmups
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| warmups[0].clone());

        let strength = pick_from(STRENGTH_BLOCKS, STRENGTH_BLOCKS[0], rng).to_string();

        let shape = pick_from(CLASS_SHAPES, Shape::Amrap, rng);
        let focus = pick_from(CLASS_FOCUSES, Focus::Balanced, rng);
        let metcon = generator::metcon(shape, focus, Level::Rx, rng);

        let accessory = pick_from(ACCESSORY_BLOCKS, ACCESSORY_BLOCKS[0], rng).to_string();

        Self {
            warmup,
            strength,
            metcon,
            accessory,
        }
    }

    /// Titled blocks in board order
    pub fn blocks(&self) -> [(&'static str, String); 4] {
        [
            ("Warm-up", self.warmup.clone()),
            ("Strength", self.strength.clone()),
            ("Metcon", self.metcon.to_string()),
            ("Accessory / Cooldown", self.accessory.clone()),
        ]
    }
}

/// Rotating queue of class programs; the head is on the board
#[derive(Debug, Clone, Default)]
pub struct ClassQueue {
    programs: VecDeque<ClassProgram>,
}

impl ClassQueue {
    pub fn new(programs: impl IntoIterator<Item = ClassProgram>) -> Self {
        Self {
            programs: programs.into_iter().collect(),
        }
    }

    /// Queue seeded with freshly built programs
    pub fn seeded<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        Self::new((0..count).map(|_| ClassProgram::build(rng)).collect::<Vec<_>>())
    }

    pub fn current(&self) -> Option<&ClassProgram> {
        self.programs.front()
    }

    pub fn current_mut(&mut self) -> Option<&mut ClassProgram> {
        self.programs.front_mut()
    }

    /// Move the head to the tail and return the new head
    pub fn rotate(&mut self) -> Option<&ClassProgram> {
        if let Some(head) = self.programs.pop_front() {
            self.programs.push_back(head);
            info!("Class rotated ({} programs)", self.programs.len());
        }
        self.programs.front()
    }

    /// Put a program on the board, ahead of the others
    pub fn add(&mut self, program: ClassProgram) -> &ClassProgram {
        self.programs.push_front(program);
        info!("New class added ({} programs)", self.programs.len());
        &self.programs[0]
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassProgram> {
        self.programs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn queue(count: usize, seed: u64) -> ClassQueue {
        ClassQueue::seeded(count, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn test_build_class_blocks() {
        let mut rng = StdRng::seed_from_u64(1);
        let program = ClassProgram::build(&mut rng);
        let blocks = program.blocks();
        let titles: Vec<_> = blocks.iter().map(|(t, _)| *t).collect();
        assert_eq!(titles, vec!["Warm-up", "Strength", "Metcon", "Accessory / Cooldown"]);
        for (title, body) in &blocks {
            assert!(!body.is_empty(), "{} block is empty", title);
        }
    }

    #[test]
    fn test_class_metcon_shapes() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..40 {
            let program = ClassProgram::build(&mut rng);
            let shape = program.metcon.shape().expect("metcon has a shape");
            assert!(CLASS_SHAPES.contains(&shape));
        }
    }

    #[test]
    fn test_rotate_n_times_returns_to_head() {
        for n in 1..=5 {
            let mut q = queue(n, n as u64);
            let head = q.current().cloned();
            for _ in 0..n {
                q.rotate();
            }
            assert_eq!(q.current().cloned(), head);
            assert_eq!(q.len(), n);
        }
    }

    #[test]
    fn test_rotate_moves_head_to_tail() {
        let mut q = queue(3, 7);
        let original: Vec<_> = q.iter().cloned().collect();
        let new_head = q.rotate().cloned();
        assert_eq!(new_head.as_ref(), Some(&original[1]));
        let after: Vec<_> = q.iter().cloned().collect();
        assert_eq!(after, vec![original[1].clone(), original[2].clone(), original[0].clone()]);
    }

    #[test]
    fn test_rotate_empty_queue() {
        let mut q = ClassQueue::default();
        assert!(q.rotate().is_none());
        assert!(q.is_empty());
    }

    #[test]
    fn test_add_prepends() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut q = ClassQueue::seeded(INITIAL_PROGRAMS, &mut rng);
        let fresh = ClassProgram::build(&mut rng);
        q.add(fresh.clone());
        assert_eq!(q.current(), Some(&fresh));
        assert_eq!(q.len(), INITIAL_PROGRAMS + 1);
    }
}
