//! Rules-based workout generator

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::types::{Focus, Level, SessionPhase, Shape, Workout};
use crate::catalog::{Category, pick, pick_from};
use crate::profile::AthleteProfile;

pub const EMOM_SLOTS: usize = 3;
pub const EMOM_CYCLES: u32 = 4;
pub const AMRAP_MINUTES: &[u32] = &[10, 12, 15];
pub const FOR_TIME_SCHEMES: &[&str] = &["21-15-9", "15-12-9", "30-20-10"];
pub const BUY_IN_PROBABILITY: f64 = 0.45;
pub const INTERVAL_WORK_SECS: &[u32] = &[40, 45, 60];
// 30 twice on purpose: longer rest is twice as likely
pub const INTERVAL_REST_SECS: &[u32] = &[20, 30, 30];
pub const INTERVAL_ROUNDS: &[u32] = &[6, 8, 10];
pub const LADDER_STARTS: &[u32] = &[2, 3, 4];
pub const LADDER_STEPS: &[u32] = &[2, 3];

/// Major lifts for a strength session with their base prescription
pub const STRENGTH_LIFTS: &[(&str, &str)] = &[
    ("Back Squat", "Back Squat 5 reps (heavy)"),
    ("Front Squat", "Front Squat 5 reps (heavy)"),
    ("Deadlift", "Deadlift 5 reps (heavy)"),
    ("Clean & Jerk", "Clean & Jerk 3 reps (heavy)"),
    ("Snatch", "Snatch 3 reps (heavy)"),
    ("Shoulder Press / Jerk", "Shoulder Press / Jerk 5 reps (moderate)"),
];

pub const SKILL_PRACTICE: &str = "10–12 min practice";

/// What to generate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WodRequest {
    pub phase: SessionPhase,
    pub shape: Shape,
    pub focus: Focus,
    pub level: Level,
}

impl WodRequest {
    pub fn metcon(shape: Shape, focus: Focus, level: Level) -> Self {
        Self {
            phase: SessionPhase::Metcon,
            shape,
            focus,
            level,
        }
    }

    /// Random shape, balanced focus, RX
    pub fn quick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let shape = pick_from(Shape::all(), Shape::Amrap, rng);
        Self::metcon(shape, Focus::Balanced, Level::Rx)
    }
}

/// Primary, secondary and tertiary categories for a focus
pub fn focus_categories(focus: Focus) -> [Category; 3] {
    match focus {
        Focus::Barbell => [Category::Barbell, Category::Engine, Category::Calisthenics],
        Focus::Gymnastics => [Category::Gymnastics, Category::Engine, Category::Calisthenics],
        Focus::Calisthenics => [Category::Calisthenics, Category::Engine, Category::Gymnastics],
        Focus::Engine => [Category::Engine, Category::Calisthenics, Category::Gymnastics],
        Focus::Skill => [Category::Skill, Category::Engine, Category::Gymnastics],
        Focus::Balanced => [Category::Barbell, Category::Gymnastics, Category::Engine],
    }
}

/// One movement per focus category
fn pick_triple<R: Rng + ?Sized>(focus: Focus, rng: &mut R) -> [String; 3] {
    focus_categories(focus).map(|c| pick(c, rng).to_string())
}

/// Generate a workout for a request
pub fn generate<R: Rng + ?Sized>(
    request: &WodRequest,
    profile: &AthleteProfile,
    rng: &mut R,
) -> Workout {
    let workout = match request.phase {
        SessionPhase::Strength => strength(profile, rng),
        SessionPhase::Skill => skill(rng),
        SessionPhase::Metcon => metcon(request.shape, request.focus, request.level, rng),
    };
    debug!("Generated {:?}/{:?}: {}", request.phase, request.shape, workout.title());
    workout
}

/// Generate a shaped metcon
pub fn metcon<R: Rng + ?Sized>(shape: Shape, focus: Focus, level: Level, rng: &mut R) -> Workout {
    match shape {
        Shape::Emom => emom(focus, level, rng),
        Shape::Amrap => amrap(focus, rng),
        Shape::ForTime => for_time(focus, rng),
        Shape::Intervals => intervals(focus, rng),
        Shape::Chipper => chipper(rng),
        Shape::Ladder => ladder(focus, rng),
    }
}

pub fn emom<R: Rng + ?Sized>(focus: Focus, level: Level, rng: &mut R) -> Workout {
    let mut slots = pick_triple(focus, rng);
    if level == Level::Scaled {
        slots[0] = slots[0].replace("heavy", "moderate");
    }
    Workout::Emom {
        minutes: EMOM_SLOTS as u32 * EMOM_CYCLES,
        slots: slots.to_vec(),
        cycles: EMOM_CYCLES,
    }
}

pub fn amrap<R: Rng + ?Sized>(focus: Focus, rng: &mut R) -> Workout {
    let movements = pick_triple(focus, rng).to_vec();
    let minutes = pick_from(AMRAP_MINUTES, 12, rng);
    Workout::Amrap { minutes, movements }
}

pub fn for_time<R: Rng + ?Sized>(focus: Focus, rng: &mut R) -> Workout {
    let [a, b, _] = pick_triple(focus, rng);
    let scheme = pick_from(FOR_TIME_SCHEMES, "21-15-9", rng).to_string();
    let buy_in = rng
        .gen_bool(BUY_IN_PROBABILITY)
        .then(|| pick(Category::Engine, rng).to_string());
    Workout::ForTime {
        scheme,
        buy_in,
        movements: vec![a, b],
    }
}

pub fn intervals<R: Rng + ?Sized>(focus: Focus, rng: &mut R) -> Workout {
    let [a, b, _] = pick_triple(focus, rng);
    let work_secs = pick_from(INTERVAL_WORK_SECS, 45, rng);
    let rest_secs = pick_from(INTERVAL_REST_SECS, 30, rng);
    let rounds = pick_from(INTERVAL_ROUNDS, 8, rng);
    Workout::Intervals {
        rounds,
        work_secs,
        rest_secs,
        movements: vec![a, b],
    }
}

/// Chipper ignores focus: one of each major category, shuffled
pub fn chipper<R: Rng + ?Sized>(rng: &mut R) -> Workout {
    let mut movements: Vec<String> = [
        Category::Engine,
        Category::Calisthenics,
        Category::Gymnastics,
        Category::Barbell,
    ]
    .iter()
    .map(|c| pick(*c, rng).to_string())
    .collect();
    movements.shuffle(rng);
    Workout::Chipper { movements }
}

pub fn ladder<R: Rng + ?Sized>(focus: Focus, rng: &mut R) -> Workout {
    let [a, b, _] = pick_triple(focus, rng);
    let start = pick_from(LADDER_STARTS, 3, rng);
    let step = pick_from(LADDER_STEPS, 2, rng);
    Workout::Ladder {
        start,
        step,
        movements: vec![a, b],
    }
}

/// Strength session: one major lift, a set scheme and a load hint from the profile
pub fn strength<R: Rng + ?Sized>(profile: &AthleteProfile, rng: &mut R) -> Workout {
    let (lift, movement) = pick_from(STRENGTH_LIFTS, STRENGTH_LIFTS[0], rng);

    let schemes = [
        format!("5 x 3{}", profile.load_hint(movement)),
        format!("6 x 2{}", profile.load_hint(movement)),
        format!("5 x 5{}", profile.load_hint(&movement.replace("heavy", "moderate"))),
    ];
    let prescription = schemes
        .choose(rng)
        .cloned()
        .unwrap_or_else(|| schemes[0].clone());

    Workout::Strength {
        lift: lift.to_string(),
        prescription,
    }
}

pub fn skill<R: Rng + ?Sized>(rng: &mut R) -> Workout {
    Workout::Skill {
        practice: SKILL_PRACTICE.to_string(),
        movements: vec![
            pick(Category::Skill, rng).to_string(),
            pick(Category::Gymnastics, rng).to_string(),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_category;
    use crate::profile::Lift;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_every_shape_has_titled_text() {
        let mut rng = rng(11);
        let expected = [
            (Shape::Emom, "EMOM 12"),
            (Shape::ForTime, "For Time"),
            (Shape::Intervals, "Intervals"),
            (Shape::Chipper, "Chipper (For Time)"),
            (Shape::Ladder, "Ladder"),
        ];
        for focus in Focus::all() {
            for (shape, title) in expected {
                let text = metcon(shape, *focus, Level::Rx, &mut rng).to_string();
                assert!(!text.is_empty());
                assert_eq!(text.lines().next(), Some(title));
            }
            let amrap = metcon(Shape::Amrap, *focus, Level::Rx, &mut rng).to_string();
            assert!(amrap.starts_with("AMRAP "));
        }
    }

    #[test]
    fn test_emom_always_three_slots_four_cycles() {
        let mut rng = rng(3);
        for focus in Focus::all() {
            for level in [Level::Rx, Level::Scaled] {
                match emom(*focus, level, &mut rng) {
                    Workout::Emom { minutes, slots, cycles } => {
                        assert_eq!(slots.len(), 3);
                        assert_eq!(cycles, 4);
                        assert_eq!(minutes, 12);
                    }
                    other => panic!("expected EMOM, got {:?}", other),
                }
            }
        }
    }

    #[test]
    fn test_emom_scaled_downgrades_first_slot_only() {
        let mut rng = rng(5);
        for _ in 0..50 {
            if let Workout::Emom { slots, .. } = emom(Focus::Barbell, Level::Scaled, &mut rng) {
                assert!(!slots[0].contains("heavy"), "slot 1 still heavy: {}", slots[0]);
            }
        }
    }

    #[test]
    fn test_focus_drives_primary_category() {
        let mut rng = rng(9);
        for _ in 0..20 {
            if let Workout::Amrap { movements, .. } = amrap(Focus::Gymnastics, &mut rng) {
                assert_eq!(find_category(&movements[0]), Some(Category::Gymnastics));
                assert_eq!(find_category(&movements[1]), Some(Category::Engine));
                assert_eq!(find_category(&movements[2]), Some(Category::Calisthenics));
            }
        }
    }

    #[test]
    fn test_amrap_minutes_from_options() {
        let mut rng = rng(21);
        for _ in 0..30 {
            if let Workout::Amrap { minutes, movements } = amrap(Focus::Balanced, &mut rng) {
                assert!(AMRAP_MINUTES.contains(&minutes));
                assert_eq!(movements.len(), 3);
            }
        }
    }

    #[test]
    fn test_for_time_buy_in_is_engine() {
        let mut rng = rng(2);
        let mut seen_buy_in = false;
        let mut seen_without = false;
        for _ in 0..100 {
            if let Workout::ForTime { scheme, buy_in, movements } = for_time(Focus::Balanced, &mut rng) {
                assert!(FOR_TIME_SCHEMES.contains(&scheme.as_str()));
                assert_eq!(movements.len(), 2);
                match buy_in {
                    Some(b) => {
                        seen_buy_in = true;
                        assert_eq!(find_category(&b), Some(Category::Engine));
                    }
                    None => seen_without = true,
                }
            }
        }
        assert!(seen_buy_in && seen_without);
    }

    #[test]
    fn test_intervals_values_from_options() {
        let mut rng = rng(4);
        for _ in 0..30 {
            if let Workout::Intervals { rounds, work_secs, rest_secs, movements } =
                intervals(Focus::Engine, &mut rng)
            {
                assert!(INTERVAL_WORK_SECS.contains(&work_secs));
                assert!(INTERVAL_REST_SECS.contains(&rest_secs));
                assert!(INTERVAL_ROUNDS.contains(&rounds));
                assert_eq!(movements.len(), 2);
            }
        }
    }

    #[test]
    fn test_chipper_covers_four_categories() {
        let mut rng = rng(8);
        if let Workout::Chipper { movements } = chipper(&mut rng) {
            let mut categories: Vec<_> = movements.iter().filter_map(|m| find_category(m)).collect();
            categories.sort_by_key(|c| c.name());
            assert_eq!(
                categories,
                vec![
                    Category::Barbell,
                    Category::Calisthenics,
                    Category::Engine,
                    Category::Gymnastics
                ]
            );
        } else {
            panic!("expected chipper");
        }
    }

    #[test]
    fn test_ladder_start_and_step() {
        let mut rng = rng(6);
        for _ in 0..20 {
            if let Workout::Ladder { start, step, movements } = ladder(Focus::Balanced, &mut rng) {
                assert!(LADDER_STARTS.contains(&start));
                assert!(LADDER_STEPS.contains(&step));
                assert_eq!(movements.len(), 2);
            }
        }
    }

    #[test]
    fn test_strength_with_profile_shows_load() {
        let mut profile = AthleteProfile::default();
        for lift in Lift::all() {
            profile.set_one_rep_max(*lift, 100.0);
        }
        let mut rng = rng(13);
        for _ in 0..30 {
            let w = strength(&profile, &mut rng);
            let text = w.to_string();
            assert!(text.starts_with("Strength Phase\n"));
            if let Workout::Strength { prescription, .. } = w {
                assert!(
                    prescription.contains("(~85kg)") || prescription.contains("(~75kg)"),
                    "no load in {}",
                    prescription
                );
            }
        }
    }

    #[test]
    fn test_strength_without_profile_has_no_load() {
        let profile = AthleteProfile::default();
        let mut rng = rng(14);
        for _ in 0..20 {
            if let Workout::Strength { prescription, .. } = strength(&profile, &mut rng) {
                assert!(!prescription.contains("kg"));
            }
        }
    }

    #[test]
    fn test_skill_session() {
        let mut rng = rng(15);
        let w = skill(&mut rng);
        let text = w.to_string();
        assert!(text.starts_with("Skill Phase\n10–12 min practice\n"));
        assert!(text.ends_with("Keep quality high"));
        let movements = w.movements();
        assert_eq!(find_category(movements[0]), Some(Category::Skill));
        assert_eq!(find_category(movements[1]), Some(Category::Gymnastics));
    }

    #[test]
    fn test_generate_dispatches_on_phase() {
        let profile = AthleteProfile::default();
        let mut rng = rng(16);
        let request = WodRequest {
            phase: SessionPhase::Strength,
            ..WodRequest::default()
        };
        assert!(matches!(generate(&request, &profile, &mut rng), Workout::Strength { .. }));

        let request = WodRequest::metcon(Shape::Ladder, Focus::Skill, Level::Scaled);
        assert!(matches!(generate(&request, &profile, &mut rng), Workout::Ladder { .. }));
    }

    #[test]
    fn test_default_request_is_balanced_rx_amrap() {
        let request = WodRequest::default();
        assert_eq!(request.phase, SessionPhase::Metcon);
        assert_eq!(request.shape, Shape::Amrap);
        assert_eq!(request.focus, Focus::Balanced);
        assert_eq!(request.level, Level::Rx);
    }

    #[test]
    fn test_quick_request() {
        let mut rng = rng(17);
        let request = WodRequest::quick(&mut rng);
        assert_eq!(request.focus, Focus::Balanced);
        assert!(Shape::all().contains(&request.shape));
    }
}
