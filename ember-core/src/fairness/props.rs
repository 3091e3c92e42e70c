//! Property tests for the fairness selector.
//!
//! Properties tested:
//! - Weighted selection always returns a roster member
//! - A player's share shrinks as their participation grows but never hits zero
//! - Every round type stays reachable whatever the counters say
//! - Prompt draws are distinct, bounded by `count`, and as large as the pool allows
//! - The difficulty guard filters when it can and yields when it cannot

use super::tests::library_with_activities;
use super::*;
use crate::session::Player;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

fn roster(counts: &[u32]) -> Vec<Player> {
    counts
        .iter()
        .enumerate()
        .map(|(i, c)| Player::with_participation(&format!("player-{}", i), *c))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: the selected player is always on the roster
    #[test]
    fn prop_selection_is_a_roster_member(
        counts in prop::collection::vec(0u32..50, 1..12),
        seed in any::<u64>(),
    ) {
        let players = roster(&counts);
        let ids: HashSet<_> = players.iter().map(|p| p.id()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for _ in 0..20 {
            let chosen = select_weighted_player(&players, &mut rng);
            prop_assert!(chosen.is_some());
            prop_assert!(ids.contains(&chosen.unwrap().id()));
        }
    }

    /// Property: more participation means a strictly smaller, never zero, share
    #[test]
    fn prop_share_decreases_but_never_vanishes(
        peers in prop::collection::vec(0u32..20, 1..8),
        count in 0u32..1_000_000,
    ) {
        let mut lower = peers.clone();
        lower.insert(0, count);
        let mut higher = peers;
        higher.insert(0, count + 1);

        let p_lower = selection_probabilities(&roster(&lower))[0];
        let p_higher = selection_probabilities(&roster(&higher))[0];

        prop_assert!(p_higher < p_lower);
        prop_assert!(p_higher > 0.0);
    }

    /// Property: each round type can be drawn for any counter triple
    #[test]
    fn prop_every_round_type_reachable(
        individual in 0u32..1000,
        rps in 0u32..1000,
        group in 0u32..1000,
        seed in any::<u64>(),
    ) {
        let counts = RoundTypeCounts { individual, rps, group };
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut seen = HashSet::new();
        for _ in 0..400 {
            seen.insert(select_round_type(&counts, &mut rng));
        }
        prop_assert_eq!(seen.len(), 3);
    }

    /// Property: prompt draws never repeat and never exceed the request
    #[test]
    fn prop_prompt_draws_are_distinct_and_bounded(
        hard in 0usize..8,
        soft in 1usize..8,
        count in 0usize..12,
        history in prop::collection::vec(1u8..=3, 0..6),
        seed in any::<u64>(),
    ) {
        let library = library_with_activities(hard, soft);
        let history: Vec<Difficulty> = history.into_iter().filter_map(|v| Difficulty::new(v).ok()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let prompts = get_prompts_for_round(&library, RoundType::Group, Stage::S1, &history, count, &mut rng);
        let ids: HashSet<_> = prompts.iter().map(|p| p.id.as_str()).collect();

        prop_assert_eq!(ids.len(), prompts.len());
        prop_assert!(prompts.len() <= count);
        prop_assert_eq!(prompts.len(), count.min(hard + soft));
    }

    /// Property: with [2, 2] history the guard removes difficulty 2 whenever enough others exist
    #[test]
    fn prop_difficulty_guard(
        hard in 1usize..6,
        soft in 0usize..6,
        count in 1usize..6,
        seed in any::<u64>(),
    ) {
        let library = library_with_activities(hard, soft);
        let history = [Difficulty::MEDIUM, Difficulty::MEDIUM];
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let prompts = get_prompts_for_round(&library, RoundType::Group, Stage::S1, &history, count, &mut rng);
        let repeats = prompts.iter().filter(|p| p.effective_difficulty() == Difficulty::MEDIUM).count();

        if soft >= count {
            prop_assert_eq!(repeats, 0);
        } else {
            prop_assert_eq!(prompts.len(), count.min(hard + soft));
        }
    }
}
