// Per-track metrics - the "what did you actually listen to" part of encore
// Every analyzer is an independent pass over the same EventStore and returns its own table

pub mod basic;       // play counts and listened time
pub mod completion;  // completed vs skipped plays
pub mod consistency; // week/month spread
pub mod density;     // same-day repeat listens
pub mod sessions;    // session detection and session starters

pub use basic::{analyze_basic_metrics, TrackAggregate};
pub use completion::{CompletionEstimator, CompletionStats};
pub use consistency::{analyze_consistency, ConsistencyStats, MonthTally};
pub use density::{analyze_density, DensityStats};
pub use sessions::{SessionCounts, SessionDetector};

use crate::config::AnalysisConfig;
use crate::history::{EventStore, TrackKey};
use std::collections::HashMap;
use tracing::debug;

/// Owned per-track table that remembers first-seen order.
///
/// Entries are created lazily by [`TrackMap::get_or_insert_default`] on the first
/// event of a track, so a track with no plays never has an entry.
#[derive(Debug, Clone)]
pub struct TrackMap<T> {
    entries: Vec<(TrackKey, T)>,
    index: HashMap<TrackKey, usize>,
}

impl<T> TrackMap<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn get(&self, key: &TrackKey) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &TrackKey) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&TrackKey, &T)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &TrackKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Default> TrackMap<T> {
    pub fn get_or_insert_default(&mut self, key: &TrackKey) -> &mut T {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.clone(), T::default()));
                self.index.insert(key.clone(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }
}

impl<T> Default for TrackMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// All five per-track analyses of one run.
#[derive(Debug, Clone)]
pub struct MetricSet {
    pub basic: TrackMap<TrackAggregate>,
    pub sessions: SessionCounts,
    pub completion: TrackMap<CompletionStats>,
    pub density: TrackMap<DensityStats>,
    pub consistency: TrackMap<ConsistencyStats>,
}

impl MetricSet {
    /// Runs every analyzer over `store`. They share nothing but the read-only
    /// event slice, so the order here carries no meaning.
    pub fn compute(store: &EventStore, config: &AnalysisConfig) -> Self {
        let basic = analyze_basic_metrics(store);
        let sessions = SessionDetector::new(config.session_gap_minutes).detect(store);
        let completion = CompletionEstimator::new(config.completion_threshold_ms).estimate(store);
        let density = analyze_density(store);
        let consistency = analyze_consistency(store);

        debug!(
            tracks = basic.len(),
            sessions = sessions.total_sessions(),
            "Computed per-track metrics"
        );

        Self {
            basic,
            sessions,
            completion,
            density,
            consistency,
        }
    }

    pub fn session_starts(&self, key: &TrackKey) -> u32 {
        self.sessions.starts_for(key)
    }

    pub fn completion_rate(&self, key: &TrackKey) -> f64 {
        self.completion.get(key).map_or(0.0, |c| c.completion_rate)
    }

    pub fn multi_listen_days(&self, key: &TrackKey) -> u32 {
        self.density.get(key).map_or(0, |d| d.multi_listen_days)
    }

    pub fn distinct_weeks(&self, key: &TrackKey) -> u32 {
        self.consistency.get(key).map_or(0, |c| c.distinct_weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_map_keeps_first_seen_order() {
        let mut map: TrackMap<u32> = TrackMap::new();
        let b = TrackKey::new("B", "x");
        let a = TrackKey::new("A", "x");

        *map.get_or_insert_default(&b) += 1;
        *map.get_or_insert_default(&a) += 1;
        *map.get_or_insert_default(&b) += 1;

        let order: Vec<_> = map.iter().map(|(k, v)| (k.track_name.as_str(), *v)).collect();
        assert_eq!(order, vec![("B", 2), ("A", 1)]);
        assert!(map.get(&TrackKey::new("C", "x")).is_none());
    }
}
