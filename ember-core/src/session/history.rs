use crate::types::{Difficulty, RoundType};
use serde::{Deserialize, Serialize};

/// Number of recent difficulties kept for repetition avoidance.
pub const HISTORY_WINDOW: usize = 5;

/// Lifetime count of rounds played per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTypeCounts {
    #[serde(rename = "Individual")]
    pub individual: u32,
    #[serde(rename = "RPS")]
    pub rps: u32,
    #[serde(rename = "Group")]
    pub group: u32,
}

impl RoundTypeCounts {
    pub fn get(&self, round_type: RoundType) -> u32 {
        match round_type {
            RoundType::Individual => self.individual,
            RoundType::Rps => self.rps,
            RoundType::Group => self.group,
        }
    }

    fn increment(&mut self, round_type: RoundType) {
        let slot = match round_type {
            RoundType::Individual => &mut self.individual,
            RoundType::Rps => &mut self.rps,
            RoundType::Group => &mut self.group,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u32 {
        self.individual
            .saturating_add(self.rps)
            .saturating_add(self.group)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundHistory {
    difficulties: Vec<Difficulty>,
    counts: RoundTypeCounts,
}

impl RoundHistory {
    /// Oldest first.
    pub fn difficulties(&self) -> &[Difficulty] {
        &self.difficulties
    }

    pub fn counts(&self) -> &RoundTypeCounts {
        &self.counts
    }

    /// Records a finished round, evicting the oldest difficulty once the window is full.
    pub fn record(&mut self, round_type: RoundType, difficulty: Difficulty) {
        self.difficulties.push(difficulty);
        if self.difficulties.len() > HISTORY_WINDOW {
            let overflow = self.difficulties.len() - HISTORY_WINDOW;
            self.difficulties.drain(..overflow);
        }
        self.counts.increment(round_type);
    }

    /// Trims a window that came from outside to its newest entries.
    pub(crate) fn clamp_window(&mut self) {
        if self.difficulties.len() > HISTORY_WINDOW {
            let overflow = self.difficulties.len() - HISTORY_WINDOW;
            tracing::warn!("Dropping {} stale difficulties from loaded history", overflow);
            self.difficulties.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_evicts_oldest() {
        let mut history = RoundHistory::default();
        for value in [1, 2, 3, 1, 2] {
            history.record(RoundType::Individual, Difficulty::new(value).unwrap());
        }
        assert_eq!(history.difficulties().len(), HISTORY_WINDOW);

        history.record(RoundType::Group, Difficulty::HARD);
        let values: Vec<u8> = history.difficulties().iter().map(|d| d.value()).collect();
        assert_eq!(values, vec![2, 3, 1, 2, 3]);
    }

    #[test]
    fn test_counters_only_grow() {
        let mut history = RoundHistory::default();
        history.record(RoundType::Rps, Difficulty::EASY);
        history.record(RoundType::Rps, Difficulty::EASY);
        history.record(RoundType::Group, Difficulty::EASY);

        let counts = history.counts();
        assert_eq!(counts.get(RoundType::Individual), 0);
        assert_eq!(counts.get(RoundType::Rps), 2);
        assert_eq!(counts.get(RoundType::Group), 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_total_saturates() {
        let counts = RoundTypeCounts {
            individual: u32::MAX,
            rps: 7,
            group: 1,
        };
        assert_eq!(counts.total(), u32::MAX);
    }

    #[test]
    fn test_clamp_window_keeps_newest() {
        let mut history = RoundHistory {
            difficulties: [1, 2, 3, 1, 2, 3, 1, 2]
                .into_iter()
                .map(|v| Difficulty::new(v).unwrap())
                .collect(),
            counts: RoundTypeCounts::default(),
        };
        history.clamp_window();
        let values: Vec<u8> = history.difficulties().iter().map(|d| d.value()).collect();
        assert_eq!(values, vec![1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_counts_use_round_type_keys() {
        let json = serde_json::to_value(RoundTypeCounts {
            individual: 1,
            rps: 2,
            group: 3,
        })
        .unwrap();
        assert_eq!(json["RPS"], 2);
        assert_eq!(json["Individual"], 1);
    }
}
