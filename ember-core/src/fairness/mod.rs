//! Fairness selection: who plays next, which round type, and which prompts are served.
//!
//! Every function takes the random source explicitly so callers can seed it.

#[cfg(test)]
mod props;

use crate::content::PromptLibrary;
use crate::session::{Player, RoundTypeCounts};
use crate::types::{Difficulty, Prompt, RoundType, Stage};
use rand::seq::SliceRandom;
use rand::Rng;

/// Multiplicative jitter applied to the weighted draw.
pub const JITTER_RANGE: (f64, f64) = (0.95, 1.05);

/// Cumulative thresholds for picking the least, second-least and most used round type.
pub const LEAST_USED_SHARE: f64 = 0.60;
pub const SECOND_LEAST_USED_SHARE: f64 = 0.25;

/// Anything that can be weighted by how often it has already played.
pub trait Participant {
    fn participation_count(&self) -> u32;
}

impl Participant for Player {
    fn participation_count(&self) -> u32 {
        Player::participation_count(self)
    }
}

impl<P: Participant + ?Sized> Participant for &P {
    fn participation_count(&self) -> u32 {
        (**self).participation_count()
    }
}

/// `1 / (count + 1)`: strictly decreasing in `count`, never zero.
pub fn participation_weight(count: u32) -> f64 {
    1.0 / (f64::from(count) + 1.0)
}

/// Nominal probability of each entry being picked, ignoring jitter.
pub fn selection_probabilities<P: Participant>(players: &[P]) -> Vec<f64> {
    let weights: Vec<f64> = players
        .iter()
        .map(|p| participation_weight(p.participation_count()))
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

/// Picks a player with probability inversely proportional to their participation.
///
/// Returns `None` only for an empty roster.
pub fn select_weighted_player<'a, P, R>(players: &'a [P], rng: &mut R) -> Option<&'a P>
where
    P: Participant,
    R: Rng + ?Sized,
{
    let last = players.last()?;

    let weights: Vec<f64> = players
        .iter()
        .map(|p| participation_weight(p.participation_count()))
        .collect();
    let total: f64 = weights.iter().sum();

    let jitter = rng.gen_range(JITTER_RANGE.0..=JITTER_RANGE.1);
    let mut draw = rng.gen_range(0.0..total) * jitter;

    for (player, weight) in players.iter().zip(&weights) {
        draw -= weight;
        if draw <= 0.0 {
            return Some(player);
        }
    }

    tracing::debug!("Weighted draw ran past the roster, falling back to last player");
    Some(last)
}

/// Round types ordered from least to most played; ties keep declaration order.
pub fn rank_round_types(counts: &RoundTypeCounts) -> [RoundType; 3] {
    let mut ranked = RoundType::ALL;
    ranked.sort_by_key(|t| counts.get(*t));
    ranked
}

/// Picks the next round type: 60% least used, 25% second, 15% most used.
pub fn select_round_type<R: Rng + ?Sized>(counts: &RoundTypeCounts, rng: &mut R) -> RoundType {
    let ranked = rank_round_types(counts);
    let r: f64 = rng.gen();

    let chosen = if r < LEAST_USED_SHARE {
        ranked[0]
    } else if r < LEAST_USED_SHARE + SECOND_LEAST_USED_SHARE {
        ranked[1]
    } else {
        ranked[2]
    };

    tracing::debug!("Round type {:?} chosen (r = {:.3}, ranking {:?})", chosen, r, ranked);
    chosen
}

/// The difficulty to steer away from: set when the last two served difficulties match.
pub fn repeated_difficulty(history: &[Difficulty]) -> Option<Difficulty> {
    match history {
        [.., second_last, last] if second_last == last => Some(*last),
        _ => None,
    }
}

/// Draws up to `count` distinct prompts for a round.
///
/// When the last two difficulties repeat, prompts of that difficulty are avoided, unless
/// avoiding them would leave fewer than `count` candidates.
pub fn get_prompts_for_round<'a, R: Rng + ?Sized>(
    library: &'a PromptLibrary,
    round_type: RoundType,
    stage: Stage,
    history: &[Difficulty],
    count: usize,
    rng: &mut R,
) -> Vec<&'a Prompt> {
    let mut candidates = library.pool_for_round(round_type, stage);

    if let Some(repeated) = repeated_difficulty(history) {
        let varied: Vec<&Prompt> = candidates
            .iter()
            .copied()
            .filter(|p| p.effective_difficulty() != repeated)
            .collect();

        if varied.len() >= count {
            candidates = varied;
        } else {
            tracing::debug!(
                "Only {} prompts avoid difficulty {}, keeping the full pool",
                varied.len(),
                repeated
            );
        }
    }

    candidates.shuffle(rng);
    candidates.truncate(count);
    candidates
}

/// Draws one pointing statement. Below S3 the S3-tagged statements are left out.
///
/// `None` only if the library's pointing pool is empty, which validation rules out.
pub fn get_pointing_prompt<'a, R: Rng + ?Sized>(
    library: &'a PromptLibrary,
    stage: Stage,
    rng: &mut R,
) -> Option<&'a Prompt> {
    let pool = library.pointing();
    let eligible: Vec<&Prompt> = pool
        .iter()
        .filter(|p| stage == Stage::S3 || p.stage != Stage::S3)
        .collect();

    if eligible.is_empty() {
        return pool.choose(rng);
    }
    eligible.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PromptKind, SpecialBehavior};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn prompt(id: &str, kind: PromptKind, stage: Stage, difficulty: u8) -> Prompt {
        Prompt {
            id: id.to_string(),
            text: format!("prompt {}", id),
            stage,
            difficulty: Difficulty::new(difficulty).ok(),
            kind,
            tags: Vec::new(),
            special: SpecialBehavior::None,
        }
    }

    /// Activities: `hard` prompts of difficulty 2 and `soft` of difficulty 1.
    pub(super) fn library_with_activities(hard: usize, soft: usize) -> PromptLibrary {
        let questions = Stage::ALL
            .iter()
            .map(|s| prompt(&format!("q-{:?}", s), PromptKind::Question, *s, 1))
            .collect();
        let mut activities = Vec::new();
        for i in 0..hard {
            activities.push(prompt(&format!("hard-{}", i), PromptKind::Activity, Stage::S1, 2));
        }
        for i in 0..soft {
            activities.push(prompt(&format!("soft-{}", i), PromptKind::Activity, Stage::S1, 1));
        }
        let pointing = vec![
            prompt("p-1", PromptKind::Pointing, Stage::S1, 1),
            prompt("p-2", PromptKind::Pointing, Stage::S2, 2),
            prompt("p-3", PromptKind::Pointing, Stage::S3, 3),
        ];
        PromptLibrary::new(questions, activities, pointing).unwrap()
    }

    #[test]
    fn test_empty_roster_yields_none() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let players: Vec<Player> = Vec::new();
        assert!(select_weighted_player(&players, &mut rng).is_none());
    }

    #[test]
    fn test_single_player_always_selected() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let players = vec![Player::with_participation("Solo", 40)];
        for _ in 0..100 {
            assert_eq!(
                select_weighted_player(&players, &mut rng).unwrap().name(),
                "Solo"
            );
        }
    }

    #[test]
    fn test_underserved_player_is_favoured() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let players = vec![
            Player::with_participation("Fresh", 0),
            Player::with_participation("Busy", 9),
        ];

        let mut fresh = 0;
        let trials = 20_000;
        for _ in 0..trials {
            if select_weighted_player(&players, &mut rng).unwrap().name() == "Fresh" {
                fresh += 1;
            }
        }
        // Nominal share is 1 / (1 + 0.1) ~ 0.91; jitter shaves a little off the front.
        let share = f64::from(fresh) / f64::from(trials);
        assert!(share > 0.85 && share < 0.95, "share was {}", share);
    }

    #[test]
    fn test_round_type_ranking_ties_keep_declaration_order() {
        let ranked = rank_round_types(&RoundTypeCounts::default());
        assert_eq!(ranked, RoundType::ALL);

        let counts = RoundTypeCounts {
            individual: 4,
            rps: 1,
            group: 1,
        };
        assert_eq!(
            rank_round_types(&counts),
            [RoundType::Rps, RoundType::Group, RoundType::Individual]
        );
    }

    #[test]
    fn test_round_type_distribution_by_rank() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let counts = RoundTypeCounts {
            individual: 10,
            rps: 2,
            group: 5,
        };

        let trials = 30_000;
        let mut seen: HashMap<RoundType, u32> = HashMap::new();
        for _ in 0..trials {
            *seen.entry(select_round_type(&counts, &mut rng)).or_default() += 1;
        }

        let share = |t: RoundType| f64::from(seen.get(&t).copied().unwrap_or(0)) / f64::from(trials);
        assert!((share(RoundType::Rps) - 0.60).abs() < 0.02);
        assert!((share(RoundType::Group) - 0.25).abs() < 0.02);
        assert!((share(RoundType::Individual) - 0.15).abs() < 0.02);
    }

    #[test]
    fn test_repeated_difficulty() {
        let d = |v| Difficulty::new(v).unwrap();
        assert_eq!(repeated_difficulty(&[]), None);
        assert_eq!(repeated_difficulty(&[d(2)]), None);
        assert_eq!(repeated_difficulty(&[d(1), d(2), d(2)]), Some(d(2)));
        assert_eq!(repeated_difficulty(&[d(2), d(2), d(3)]), None);
    }

    #[test]
    fn test_difficulty_guard_filters_when_possible() {
        let library = library_with_activities(5, 5);
        let history = [Difficulty::MEDIUM, Difficulty::MEDIUM];
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..200 {
            let prompts =
                get_prompts_for_round(&library, RoundType::Group, Stage::S1, &history, 3, &mut rng);
            assert_eq!(prompts.len(), 3);
            assert!(prompts.iter().all(|p| p.effective_difficulty() != Difficulty::MEDIUM));
        }
    }

    #[test]
    fn test_difficulty_guard_yields_when_too_few_alternatives() {
        let library = library_with_activities(5, 1);
        let history = [Difficulty::MEDIUM, Difficulty::MEDIUM];
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let prompts = get_prompts_for_round(&library, RoundType::Rps, Stage::S2, &history, 3, &mut rng);
        assert_eq!(prompts.len(), 3);
        assert!(prompts.iter().any(|p| p.effective_difficulty() == Difficulty::MEDIUM));
    }

    #[test]
    fn test_count_larger_than_pool() {
        let library = library_with_activities(2, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let prompts = get_prompts_for_round(&library, RoundType::Group, Stage::S1, &[], 10, &mut rng);
        assert_eq!(prompts.len(), 3);
    }

    #[test]
    fn test_individual_prompts_match_stage() {
        let library = PromptLibrary::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        for stage in Stage::ALL {
            let prompts =
                get_prompts_for_round(&library, RoundType::Individual, stage, &[], 3, &mut rng);
            assert_eq!(prompts.len(), 3);
            assert!(prompts.iter().all(|p| p.stage == stage));
        }
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        // Each of three prompts should lead the draw roughly a third of the time.
        let library = library_with_activities(0, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut firsts: HashMap<String, u32> = HashMap::new();
        let trials = 9_000;
        for _ in 0..trials {
            let prompts = get_prompts_for_round(&library, RoundType::Group, Stage::S1, &[], 3, &mut rng);
            *firsts.entry(prompts[0].id.clone()).or_default() += 1;
        }
        assert_eq!(firsts.len(), 3);
        for count in firsts.values() {
            let share = f64::from(*count) / f64::from(trials);
            assert!((share - 1.0 / 3.0).abs() < 0.03, "share was {}", share);
        }
    }

    #[test]
    fn test_pointing_prompt_respects_stage() {
        let library = PromptLibrary::builtin();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for _ in 0..500 {
            let prompt = get_pointing_prompt(&library, Stage::S2, &mut rng).unwrap();
            assert_ne!(prompt.stage, Stage::S3);
        }

        let mut saw_s3 = false;
        for _ in 0..500 {
            saw_s3 |= get_pointing_prompt(&library, Stage::S3, &mut rng).unwrap().stage == Stage::S3;
        }
        assert!(saw_s3);
    }
}
