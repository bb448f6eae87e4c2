// Consistency - how widely a track is spread over the calendar
// Weeks are ISO-8601 (Monday start, week 1 holds the first Thursday), so the last days
// of December can belong to week 1 of the next year.

use super::TrackMap;
use crate::history::EventStore;
use chrono::{Datelike, IsoWeek};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthTally {
    pub month: String, // calendar month name, e.g. "December"
    pub plays: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyStats {
    pub distinct_weeks: u32,
    pub distinct_months: u32, // distinct year-month pairs
    /// Plays per calendar month name, in first-encountered order. Years fold
    /// together, "December" counts every December in the history.
    pub monthly_plays: Vec<MonthTally>,
}

impl ConsistencyStats {
    /// Month with the most plays; ties go to the month encountered first.
    pub fn peak_month(&self) -> Option<&MonthTally> {
        let mut peak: Option<&MonthTally> = None;
        for tally in &self.monthly_plays {
            if peak.map_or(true, |p| tally.plays > p.plays) {
                peak = Some(tally);
            }
        }
        peak
    }
}

#[derive(Default)]
struct Spread {
    weeks: HashSet<IsoWeek>,
    months: HashSet<(i32, u32)>,
    monthly_plays: Vec<MonthTally>,
}

pub fn analyze_consistency(store: &EventStore) -> TrackMap<ConsistencyStats> {
    let mut spreads: TrackMap<Spread> = TrackMap::new();

    for event in store {
        let date = event.date();
        let spread = spreads.get_or_insert_default(&event.key);
        spread.weeks.insert(date.iso_week());
        spread.months.insert((date.year(), date.month()));

        let month = date.format("%B").to_string();
        match spread.monthly_plays.iter_mut().find(|t| t.month == month) {
            Some(tally) => tally.plays += 1,
            None => spread.monthly_plays.push(MonthTally { month, plays: 1 }),
        }
    }

    let mut stats: TrackMap<ConsistencyStats> = TrackMap::new();
    for (key, spread) in spreads.iter() {
        let entry = stats.get_or_insert_default(key);
        entry.distinct_weeks = spread.weeks.len() as u32;
        entry.distinct_months = spread.months.len() as u32;
        entry.monthly_plays = spread.monthly_plays.clone();
    }

    stats
}
