use super::TrackMap;
use crate::history::EventStore;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackAggregate {
    pub track_name: String,
    pub artist_name: String,
    pub play_count: u64,
    pub total_ms: u64,
}

impl TrackAggregate {
    pub fn minutes(&self) -> f64 {
        self.total_ms as f64 / 60_000.0
    }
}

/// Play count and listened time per track, in one pass.
pub fn analyze_basic_metrics(store: &EventStore) -> TrackMap<TrackAggregate> {
    let mut stats: TrackMap<TrackAggregate> = TrackMap::new();

    for event in store {
        let entry = stats.get_or_insert_default(&event.key);
        entry.play_count += 1;
        entry.total_ms += event.ms_played;

        // First non-blank name wins, later blanks never overwrite it
        if entry.track_name.is_empty() {
            entry.track_name = event.key.track_name.clone();
            entry.artist_name = event.key.artist_name.clone();
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{RawPlayRecord, TrackKey};

    #[test]
    fn test_counts_and_minutes() {
        let records = vec![
            RawPlayRecord::new("2024-12-05 10:00", "Song", "Band", 180_000),
            RawPlayRecord::new("2024-12-05 10:04", "Other", "Band", 30_000),
            RawPlayRecord::new("2024-12-05 10:08", "Song", "Band", 60_000),
        ];
        let store = EventStore::from_records(records, None).unwrap();

        let stats = analyze_basic_metrics(&store);
        let song = stats.get(&TrackKey::new("Song", "Band")).unwrap();
        assert_eq!(song.play_count, 2);
        assert_eq!(song.total_ms, 240_000);
        assert!((song.minutes() - 4.0).abs() < 1e-9);
        assert_eq!(song.track_name, "Song");
        assert_eq!(song.artist_name, "Band");
        assert_eq!(stats.len(), 2);
    }

    #[test]
    fn test_zero_ms_plays_still_count() {
        let records = vec![RawPlayRecord::new("2024-12-05 10:00", "Song", "Band", 0)];
        let store = EventStore::from_records(records, None).unwrap();

        let stats = analyze_basic_metrics(&store);
        let song = stats.get(&TrackKey::new("Song", "Band")).unwrap();
        assert_eq!(song.play_count, 1);
        assert_eq!(song.total_ms, 0);
    }
}
