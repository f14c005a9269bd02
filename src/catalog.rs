//! Movement catalog - база движений для генератора

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Movement categories the generator draws from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Engine,       // Монотонка: бег, гребля, байк
    Barbell,      // Штанга
    Gymnastics,   // Гимнастика
    Calisthenics, // Работа с весом тела
    Skill,        // Навыки: скакалка, стойки
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Engine => "engine",
            Category::Barbell => "barbell",
            Category::Gymnastics => "gymnastics",
            Category::Calisthenics => "calisthenics",
            Category::Skill => "skill",
        }
    }

    /// All categories for iteration
    pub fn all() -> &'static [Category] {
        &[
            Category::Engine,
            Category::Barbell,
            Category::Gymnastics,
            Category::Calisthenics,
            Category::Skill,
        ]
    }

    /// Movements of this category, in catalog order
    pub fn movements(&self) -> &'static [&'static str] {
        match self {
            Category::Engine => ENGINE,
            Category::Barbell => BARBELL,
            Category::Gymnastics => GYMNASTICS,
            Category::Calisthenics => CALISTHENICS,
            Category::Skill => SKILL,
        }
    }
}

pub const ENGINE: &[&str] = &[
    "Run 200m",
    "Run 400m",
    "Run 800m",
    "Row 250m",
    "Row 500m",
    "Row 1000m",
    "Bike 12/9 cal",
    "Bike 15/12 cal",
    "Bike 20/15 cal",
    "SkiErg 300m",
    "SkiErg 500m",
];

pub const BARBELL: &[&str] = &[
    "Deadlift 10 reps (moderate)",
    "Power Clean 6 reps (moderate)",
    "Clean & Jerk 3 reps (heavy)",
    "Power Snatch 6 reps (moderate)",
    "Snatch 3 reps (heavy)",
    "Thrusters 10 reps (light/mod)",
    "Front Squat 8 reps (moderate)",
];

pub const GYMNASTICS: &[&str] = &[
    "Pull-Ups 10 reps",
    "Chest-to-Bar 8 reps",
    "Toes-to-Bar 10 reps",
    "Handstand Push-Ups 6 reps",
    "Ring Dips 10 reps",
    "Bar Muscle-Ups 4 reps",
    "Ring Muscle-Ups 3 reps",
    "Handstand Walk 5m",
    "Handstand Walk 10m",
    "Handstand Walk 20m",
];

pub const CALISTHENICS: &[&str] = &[
    "Air Squats 30 reps",
    "Push-Ups 20 reps",
    "Walking Lunges 20 steps",
    "V-Ups 20 reps",
    "Sit-Ups 30 reps",
    "Burpees 15 reps",
    "Pistols 10 reps (alt)",
];

pub const SKILL: &[&str] = &[
    "Double-Unders 60 reps",
    "Single-Unders 120 reps",
    "Wall Walks 8 reps",
    "GHD Sit-Ups 15 reps",
    "Kipping Practice 2 min",
];

/// Draw one movement uniformly from a category
pub fn pick<R: Rng + ?Sized>(category: Category, rng: &mut R) -> &'static str {
    category
        .movements()
        .choose(rng)
        .copied()
        .unwrap_or("Burpees 15 reps")
}

/// Draw one value uniformly from a fixed option list
pub fn pick_from<T: Copy, R: Rng + ?Sized>(options: &[T], fallback: T, rng: &mut R) -> T {
    options.choose(rng).copied().unwrap_or(fallback)
}

/// Find which category a movement belongs to
pub fn find_category(movement: &str) -> Option<Category> {
    Category::all()
        .iter()
        .copied()
        .find(|c| c.movements().contains(&movement))
}
