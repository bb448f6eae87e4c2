// Completion estimate
// The export has no track length, so "completed" means "played longer than a fixed
// threshold". That's a heuristic proxy, not ground truth, and the threshold has to stay
// at exactly 90s for rankings to match earlier runs.

use super::TrackMap;
use crate::history::EventStore;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMPLETION_THRESHOLD_MS: i64 = 90_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub total_plays: u64,
    pub completed_plays: u64,
    pub skipped_plays: u64,
    pub completion_rate: f64, // 0.0 to 1.0
}

#[derive(Debug, Clone)]
pub struct CompletionEstimator {
    threshold_ms: u64,
}

impl CompletionEstimator {
    /// Negative thresholds are rejected by config validation; clamp here anyway.
    pub fn new(threshold_ms: i64) -> Self {
        Self {
            threshold_ms: threshold_ms.max(0) as u64,
        }
    }

    /// Strictly longer than the threshold counts as completed.
    pub fn is_completed(&self, ms_played: u64) -> bool {
        ms_played > self.threshold_ms
    }

    pub fn estimate(&self, store: &EventStore) -> TrackMap<CompletionStats> {
        let mut stats: TrackMap<CompletionStats> = TrackMap::new();

        for event in store {
            let entry = stats.get_or_insert_default(&event.key);
            entry.total_plays += 1;
            if self.is_completed(event.ms_played) {
                entry.completed_plays += 1;
            } else {
                entry.skipped_plays += 1;
            }
        }

        for entry in stats.values_mut() {
            entry.completion_rate = if entry.total_plays > 0 {
                entry.completed_plays as f64 / entry.total_plays as f64
            } else {
                0.0
            };
        }

        stats
    }
}

impl Default for CompletionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_COMPLETION_THRESHOLD_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{RawPlayRecord, TrackKey};

    #[test]
    fn test_threshold_boundary() {
        let estimator = CompletionEstimator::default();
        assert!(estimator.is_completed(95_000));
        assert!(!estimator.is_completed(90_000));
        assert!(!estimator.is_completed(0));
    }

    #[test]
    fn test_rate_per_track() {
        let records = vec![
            RawPlayRecord::new("2024-12-05 10:00", "Song", "Band", 95_000),
            RawPlayRecord::new("2024-12-05 10:05", "Song", "Band", 90_000),
            RawPlayRecord::new("2024-12-05 10:10", "Song", "Band", 200_000),
            RawPlayRecord::new("2024-12-05 10:15", "Song", "Band", 1_000),
        ];
        let store = EventStore::from_records(records, None).unwrap();

        let stats = CompletionEstimator::default().estimate(&store);
        let song = stats.get(&TrackKey::new("Song", "Band")).unwrap();
        assert_eq!(song.total_plays, 4);
        assert_eq!(song.completed_plays, 2);
        assert_eq!(song.skipped_plays, 2);
        assert!((song.completion_rate - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_default_stats_have_zero_rate() {
        let stats = CompletionStats::default();
        assert_eq!(stats.total_plays, 0);
        assert_eq!(stats.completion_rate, 0.0);
    }
}
