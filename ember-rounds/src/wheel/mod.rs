//! Wheel spin planning.
//!
//! The winner is always decided first; the plan works backwards from it to the rotation
//! the wheel must end at. Nothing here ever derives a winner from an animation.

pub mod presenter;

pub use presenter::{present, InstantPresenter, WheelPresenter};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Keeps the landing point this far (as a fraction of a slice) from the slice edges.
const LANDING_MARGIN: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelEntry {
    pub id: Uuid,
    pub label: String,
}

impl WheelEntry {
    pub fn new(id: Uuid, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A committed spin: where the wheel starts, where it must stop, and how long it takes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    entries: Vec<WheelEntry>,
    winner_index: usize,
    start_deg: f64,
    end_deg: f64,
    duration: Duration,
}

impl SpinPlan {
    pub fn entries(&self) -> &[WheelEntry] {
        &self.entries
    }

    pub fn winner(&self) -> &WheelEntry {
        &self.entries[self.winner_index]
    }

    pub fn winner_index(&self) -> usize {
        self.winner_index
    }

    pub fn start_deg(&self) -> f64 {
        self.start_deg
    }

    pub fn end_deg(&self) -> f64 {
        self.end_deg
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn segment_deg(&self) -> f64 {
        360.0 / self.entries.len() as f64
    }

    /// Wheel rotation at `progress` (0.0 to 1.0) along a cubic ease-out.
    pub fn rotation_at(&self, progress: f64) -> f64 {
        let t = progress.clamp(0.0, 1.0);
        if t >= 1.0 {
            return self.end_deg;
        }
        let eased = 1.0 - (1.0 - t).powi(3);
        self.start_deg + (self.end_deg - self.start_deg) * eased
    }

    /// Entry under the pointer at `progress`. At 1.0 this is always the winner.
    pub fn entry_at(&self, progress: f64) -> &WheelEntry {
        let index = pointer_index(self.rotation_at(progress), self.entries.len());
        &self.entries[index]
    }
}

/// Index of the slice under the pointer for a wheel rotated by `rotation_deg`.
///
/// Slice `i` spans `[i * s, (i + 1) * s)` degrees with the pointer fixed at 0 degrees;
/// rotating the wheel by `r` brings wheel angle `360 - r` under the pointer.
pub fn pointer_index(rotation_deg: f64, segments: usize) -> usize {
    if segments == 0 {
        return 0;
    }
    let segment = 360.0 / segments as f64;
    let under_pointer = (360.0 - rotation_deg.rem_euclid(360.0)).rem_euclid(360.0);
    ((under_pointer / segment).floor() as usize).min(segments - 1)
}

/// Plans a spin that comes to rest on `winner`.
///
/// Returns `None` when there is nothing to spin (fewer than two entries) or the winner
/// is not on the wheel.
pub fn plan_spin<R: Rng + ?Sized>(
    entries: Vec<WheelEntry>,
    winner: Uuid,
    start_deg: f64,
    full_turns: u32,
    duration: Duration,
    rng: &mut R,
) -> Option<SpinPlan> {
    if entries.len() < 2 {
        return None;
    }
    let winner_index = entries.iter().position(|e| e.id == winner)?;

    let segment = 360.0 / entries.len() as f64;
    let offset = rng.gen_range(LANDING_MARGIN..(1.0 - LANDING_MARGIN));
    let target = (winner_index as f64 + offset) * segment;

    let resting = (360.0 - target).rem_euclid(360.0);
    let alignment = (resting - start_deg.rem_euclid(360.0)).rem_euclid(360.0);
    let end_deg = start_deg + 360.0 * f64::from(full_turns) + alignment;

    Some(SpinPlan {
        entries,
        winner_index,
        start_deg,
        end_deg,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entries(n: usize) -> Vec<WheelEntry> {
        (0..n)
            .map(|i| WheelEntry::new(Uuid::new_v4(), format!("player {}", i)))
            .collect()
    }

    #[test]
    fn test_too_few_entries() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(plan_spin(Vec::new(), Uuid::new_v4(), 0.0, 5, Duration::from_secs(4), &mut rng).is_none());

        let one = entries(1);
        let id = one[0].id;
        assert!(plan_spin(one, id, 0.0, 5, Duration::from_secs(4), &mut rng).is_none());
    }

    #[test]
    fn test_unknown_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert!(plan_spin(entries(3), Uuid::new_v4(), 0.0, 5, Duration::from_secs(4), &mut rng).is_none());
    }

    #[test]
    fn test_two_entries_land_on_winner() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let wheel = entries(2);
        for winner in [wheel[0].id, wheel[1].id] {
            let plan = plan_spin(wheel.clone(), winner, 0.0, 5, Duration::from_secs(4), &mut rng).unwrap();
            assert_eq!(plan.entry_at(1.0).id, winner);
            assert!(plan.end_deg() - plan.start_deg() >= 5.0 * 360.0);
        }
    }

    #[test]
    fn test_rotation_is_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let wheel = entries(6);
        let plan = plan_spin(wheel.clone(), wheel[4].id, 123.0, 5, Duration::from_secs(4), &mut rng).unwrap();

        let mut previous = plan.rotation_at(0.0);
        assert_eq!(previous, 123.0);
        for step in 1..=100 {
            let rotation = plan.rotation_at(f64::from(step) / 100.0);
            assert!(rotation >= previous);
            previous = rotation;
        }
        assert_eq!(previous, plan.end_deg());
    }

    proptest! {
        /// Property: the final rotation always lands on the pre-chosen winner
        #[test]
        fn prop_plan_lands_on_winner(
            size in 2usize..24,
            pick in any::<prop::sample::Index>(),
            start in -10_000.0f64..10_000.0,
            turns in 1u32..10,
            seed in any::<u64>(),
        ) {
            let wheel = entries(size);
            let winner = wheel[pick.index(size)].id;
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let plan = plan_spin(wheel, winner, start, turns, Duration::from_secs(4), &mut rng).unwrap();
            prop_assert_eq!(plan.winner().id, winner);
            prop_assert_eq!(plan.entry_at(1.0).id, winner);
            prop_assert_eq!(pointer_index(plan.end_deg(), size), plan.winner_index());
        }
    }
}
