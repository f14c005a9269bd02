//! EMOM station rotation: which movement is up now and which comes next

use rand::Rng;

use super::TimerMode;
use crate::catalog::{Category, pick};
use crate::wod::{Shape, Workout};

/// Drawn when the loaded workout names no movements
const FALLBACK: [Category; 3] = [Category::Barbell, Category::Gymnastics, Category::Engine];

/// Station list for a loaded workout.
///
/// EMOM slots win, then the first three movements, then three random draws.
pub fn resolve<R: Rng + ?Sized>(workout: &Workout, rng: &mut R) -> Vec<String> {
    let from_workout: Vec<String> = match workout {
        Workout::Emom { slots, .. } => slots.clone(),
        w => w.movements().into_iter().take(3).map(String::from).collect(),
    };
    if !from_workout.is_empty() {
        return from_workout;
    }
    FALLBACK.iter().map(|c| pick(*c, rng).to_string()).collect()
}

/// Stations are shown only when the clock runs EMOM or the workout is one
pub fn shown_for(mode: TimerMode, workout: Option<&Workout>) -> bool {
    match workout {
        Some(w) => mode == TimerMode::Emom || w.shape() == Some(Shape::Emom),
        None => false,
    }
}

/// Current and upcoming station for a 1-based round
pub fn now_next(stations: &[String], round: u32) -> Option<(&str, &str)> {
    if stations.is_empty() {
        return None;
    }
    let i = (round.max(1) as usize - 1) % stations.len();
    let next = (i + 1) % stations.len();
    Some((stations[i].as_str(), stations[next].as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BARBELL, ENGINE, GYMNASTICS};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_emom_slots() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = Workout::Emom {
            minutes: 12,
            slots: strings(&["A", "B", "C"]),
            cycles: 4,
        };
        assert_eq!(resolve(&w, &mut rng), strings(&["A", "B", "C"]));
    }

    #[test]
    fn test_resolve_takes_first_three_movements() {
        let mut rng = StdRng::seed_from_u64(3);
        let w = Workout::Chipper {
            movements: strings(&["A", "B", "C", "D"]),
        };
        assert_eq!(resolve(&w, &mut rng), strings(&["A", "B", "C"]));
    }

    #[test]
    fn test_resolve_random_fallback() {
        let mut rng = StdRng::seed_from_u64(3);
        let empty = Workout::Chipper { movements: vec![] };
        let stations = resolve(&empty, &mut rng);
        assert_eq!(stations.len(), 3);
        assert!(BARBELL.contains(&stations[0].as_str()));
        assert!(GYMNASTICS.contains(&stations[1].as_str()));
        assert!(ENGINE.contains(&stations[2].as_str()));
    }

    #[test]
    fn test_stations_shown_only_for_emom() {
        let emom = Workout::Emom { minutes: 10, slots: strings(&["A"]), cycles: 10 };
        let amrap = Workout::Amrap { minutes: 12, movements: strings(&["A", "B"]) };

        assert!(!shown_for(TimerMode::Emom, None));
        assert!(!shown_for(TimerMode::Countdown, None));
        assert!(shown_for(TimerMode::Countdown, Some(&emom)));
        assert!(!shown_for(TimerMode::Countdown, Some(&amrap)));
        assert!(shown_for(TimerMode::Emom, Some(&amrap)));
    }

    #[test]
    fn test_now_next_wraps() {
        let stations = strings(&["A", "B", "C"]);
        assert_eq!(now_next(&stations, 1), Some(("A", "B")));
        assert_eq!(now_next(&stations, 3), Some(("C", "A")));
        assert_eq!(now_next(&stations, 4), Some(("A", "B")));
        assert_eq!(now_next(&[], 1), None);
    }
}
