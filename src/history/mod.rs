// Play history - the immutable, time-ordered event log every analyzer reads from
// Raw records come in from the loader (or any host), get parsed once, then never change

pub mod loader;

pub use loader::HistoryLoader;

use crate::error::{Result, StatsError};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Stand-in for a missing track or artist name.
pub const UNKNOWN: &str = "Unknown";

// Export format first, the rest are seen in hand-edited or extended dumps
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// One entry of a streaming-history export, exactly as it appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayRecord {
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub track_name: Option<String>,
    #[serde(default)]
    pub artist_name: Option<String>,
    // Signed so one odd value in an export can't fail the whole file
    #[serde(default)]
    pub ms_played: i64,
}

impl RawPlayRecord {
    pub fn new(end_time: &str, track_name: &str, artist_name: &str, ms_played: i64) -> Self {
        Self {
            end_time: Some(end_time.to_string()),
            track_name: Some(track_name.to_string()),
            artist_name: Some(artist_name.to_string()),
            ms_played,
        }
    }
}

/// Grouping identity for a track. Exact string match, no fuzzy matching,
/// so every nameless track collapses into the same `Unknown|||Unknown` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackKey {
    pub track_name: String,
    pub artist_name: String,
}

impl TrackKey {
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            track_name: track_name.into(),
            artist_name: artist_name.into(),
        }
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.track_name, self.artist_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayEvent {
    pub key: TrackKey,
    pub end_time: NaiveDateTime,
    pub ms_played: u64,
}

impl PlayEvent {
    pub fn from_record(index: usize, record: RawPlayRecord) -> Result<Self> {
        let raw_time = record
            .end_time
            .as_deref()
            .ok_or_else(|| StatsError::data(index, "missing endTime"))?;
        let end_time = parse_timestamp(raw_time)
            .ok_or_else(|| StatsError::data(index, format!("unparseable endTime {:?}", raw_time)))?;

        // Negative durations count as nothing listened
        if record.ms_played < 0 {
            warn!(index, ms_played = record.ms_played, "Negative msPlayed, counting it as 0");
        }
        let ms_played = u64::try_from(record.ms_played).unwrap_or(0);

        let key = TrackKey::new(
            record.track_name.unwrap_or_else(|| UNKNOWN.to_string()),
            record.artist_name.unwrap_or_else(|| UNKNOWN.to_string()),
        );

        Ok(Self {
            key,
            end_time,
            ms_played,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.end_time.date()
    }
}

/// Parses a timezone-naive timestamp at minute resolution.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .and_then(|ts| ts.with_second(0))
        .and_then(|ts| ts.with_nanosecond(0))
}

/// The filtered, ascending-time event sequence.
#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<PlayEvent>,
}

impl EventStore {
    /// Parses every record, drops events before `cutoff` (inclusive lower bound at
    /// midnight) and stable-sorts by timestamp. One bad timestamp aborts the whole
    /// load: dropping it silently would shift session and consistency figures.
    pub fn from_records<I>(records: I, cutoff: Option<NaiveDate>) -> Result<Self>
    where
        I: IntoIterator<Item = RawPlayRecord>,
    {
        let parsed = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| PlayEvent::from_record(index, record))
            .collect::<Result<Vec<_>>>()?;

        let total = parsed.len();
        let mut events: Vec<PlayEvent> = match cutoff {
            Some(date) => {
                let cutoff = date.and_time(chrono::NaiveTime::MIN);
                parsed.into_iter().filter(|e| e.end_time >= cutoff).collect()
            }
            None => parsed,
        };

        // Vec::sort_by_key is stable, equal timestamps keep their input order
        events.sort_by_key(|e| e.end_time);

        match cutoff {
            Some(date) => info!("Loaded {} streams from {} onwards", events.len(), date),
            None => info!("Loaded {} streams", events.len()),
        }
        debug!("Dropped {} streams before the cutoff", total - events.len());

        Ok(Self { events })
    }

    pub fn from_events(mut events: Vec<PlayEvent>) -> Self {
        events.sort_by_key(|e| e.end_time);
        Self { events }
    }

    pub fn events(&self) -> &[PlayEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first_played(&self) -> Option<NaiveDateTime> {
        self.events.first().map(|e| e.end_time)
    }

    pub fn last_played(&self) -> Option<NaiveDateTime> {
        self.events.last().map(|e| e.end_time)
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a PlayEvent;
    type IntoIter = std::slice::Iter<'a, PlayEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
