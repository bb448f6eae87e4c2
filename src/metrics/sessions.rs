// Session detection - a new session starts whenever the gap since the previous play
// reaches the threshold. The track that opens a session gets credited as its starter.

use super::TrackMap;
use crate::history::{EventStore, TrackKey};
use chrono::NaiveDateTime;
use tracing::info;

pub const DEFAULT_SESSION_GAP_MINUTES: i64 = 30;

#[derive(Debug, Clone, Default)]
pub struct SessionCounts {
    starters: TrackMap<u32>,
    total_sessions: u32,
}

impl SessionCounts {
    /// Sessions started by `key`, 0 if it never opened one.
    pub fn starts_for(&self, key: &TrackKey) -> u32 {
        self.starters.get(key).copied().unwrap_or(0)
    }

    pub fn total_sessions(&self) -> u32 {
        self.total_sessions
    }

    /// Only tracks that started at least one session.
    pub fn starters(&self) -> &TrackMap<u32> {
        &self.starters
    }
}

#[derive(Debug, Clone)]
pub struct SessionDetector {
    gap_minutes: i64,
}

impl SessionDetector {
    pub fn new(gap_minutes: i64) -> Self {
        Self { gap_minutes }
    }

    pub fn detect(&self, store: &EventStore) -> SessionCounts {
        let mut counts = SessionCounts::default();
        let mut previous: Option<NaiveDateTime> = None;

        for event in store {
            let starts_session = match previous {
                None => true,
                Some(prev) => (event.end_time - prev).num_minutes() >= self.gap_minutes,
            };

            if starts_session {
                *counts.starters.get_or_insert_default(&event.key) += 1;
                counts.total_sessions += 1;
            }

            previous = Some(event.end_time);
        }

        info!("Detected {} listening sessions", counts.total_sessions);
        counts
    }
}

impl Default for SessionDetector {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_GAP_MINUTES)
    }
}
