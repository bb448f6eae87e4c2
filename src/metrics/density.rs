use super::TrackMap;
use crate::history::EventStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityStats {
    pub multi_listen_days: u32, // days with 2+ plays of the track
    pub max_in_one_day: u32,
}

/// Same-day repeat listening per track.
pub fn analyze_density(store: &EventStore) -> TrackMap<DensityStats> {
    let mut daily: TrackMap<BTreeMap<NaiveDate, u32>> = TrackMap::new();
    for event in store {
        *daily
            .get_or_insert_default(&event.key)
            .entry(event.date())
            .or_insert(0) += 1;
    }

    let mut stats: TrackMap<DensityStats> = TrackMap::new();
    for (key, days) in daily.iter() {
        let entry = stats.get_or_insert_default(key);
        entry.multi_listen_days = days.values().filter(|&&count| count >= 2).count() as u32;
        entry.max_in_one_day = days.values().copied().max().unwrap_or(0);
    }

    stats
}
