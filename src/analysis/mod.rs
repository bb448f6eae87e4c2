// The full run: events -> five analyzers -> cohort + scores -> rankings
// Everything here is deterministic, no clocks and no randomness, so the same input
// always gives the same report

use crate::config::{AnalysisConfig, ReportConfig};
use crate::error::Result;
use crate::history::{EventStore, RawPlayRecord};
use crate::metrics::MetricSet;
use crate::report::{Ranking, RankingKind, ReportBuilder};
use crate::scoring::{select_cohort, ScoreAggregator};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_streams: usize,
    pub first_played: Option<NaiveDateTime>,
    pub last_played: Option<NaiveDateTime>,
    pub total_sessions: u32,
    pub total_minutes: f64,
    pub distinct_tracks: usize,
    pub cohort_size: usize,
    pub cohort_min_plays: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub summary: RunSummary,
    pub rankings: Vec<Ranking>,
}

impl AnalysisReport {
    pub fn ranking(&self, kind: RankingKind) -> Option<&Ranking> {
        self.rankings.iter().find(|r| r.kind == kind)
    }
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    analysis: AnalysisConfig,
    report: ReportConfig,
}

impl Analyzer {
    /// Validates both config sections up front, nothing runs on a bad config.
    pub fn new(analysis: AnalysisConfig, report: ReportConfig) -> Result<Self> {
        analysis.validate()?;
        report.validate()?;
        Ok(Self { analysis, report })
    }

    /// Builds the event store with the configured cutoff, then runs.
    pub fn run_records<I>(&self, records: I) -> Result<AnalysisReport>
    where
        I: IntoIterator<Item = RawPlayRecord>,
    {
        let store = EventStore::from_records(records, self.analysis.cutoff_date)?;
        Ok(self.run(&store))
    }

    pub fn run(&self, store: &EventStore) -> AnalysisReport {
        let metrics = MetricSet::compute(store, &self.analysis);

        let cohort = select_cohort(&metrics, self.analysis.cohort_min_plays);
        let scores = ScoreAggregator::from_config(&self.analysis).score(&metrics, &cohort);

        let builder = ReportBuilder::new(&metrics, &scores, self.report.clone());
        let rankings = builder.build_all(&cohort);

        let summary = RunSummary {
            total_streams: store.len(),
            first_played: store.first_played(),
            last_played: store.last_played(),
            total_sessions: metrics.sessions.total_sessions(),
            total_minutes: metrics.basic.values().map(|b| b.minutes()).sum(),
            distinct_tracks: metrics.basic.len(),
            cohort_size: cohort.len(),
            cohort_min_plays: self.analysis.cohort_min_plays,
        };

        info!(
            streams = summary.total_streams,
            ranked = summary.cohort_size,
            "Analysis complete"
        );

        AnalysisReport { summary, rankings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalysisConfig::default(), ReportConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_history_gives_empty_rankings() {
        let report = analyzer().run(&EventStore::default());
        assert_eq!(report.rankings.len(), 5);
        assert!(report.rankings.iter().all(|r| r.rows.is_empty()));
        assert_eq!(report.summary.total_sessions, 0);
        assert_eq!(report.summary.first_played, None);
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let mut analysis = AnalysisConfig::default();
        analysis.weights.consistency = 0.5;
        assert!(Analyzer::new(analysis, ReportConfig::default()).is_err());
    }

    #[test]
    fn test_cutoff_applies_to_records() {
        let records = vec![
            RawPlayRecord::new("2024-11-20 10:00", "Old", "A", 200_000),
            RawPlayRecord::new("2024-11-21 10:00", "Old", "A", 200_000),
            RawPlayRecord::new("2024-11-22 10:00", "Old", "A", 200_000),
            RawPlayRecord::new("2024-12-02 10:00", "New", "A", 200_000),
        ];

        let report = analyzer().run_records(records).unwrap();
        assert_eq!(report.summary.total_streams, 1);
        assert_eq!(report.summary.cohort_size, 0);
    }

    #[test]
    fn test_ranking_lookup() {
        let report = analyzer().run(&EventStore::default());
        let ranking = report.ranking(RankingKind::SessionStarts).unwrap();
        assert_eq!(ranking.title, "TOP 10 SESSION STARTERS");
    }
}
