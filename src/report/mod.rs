// Rankings - sorts the cohort by one metric at a time and turns the top N into rows
// Row construction lives here, printing lives in `render`, so a CLI, a JSON export or
// anything else can share the same fixed-width table contract

pub mod render;

pub use render::{render_ranking, render_report};

use crate::config::ReportConfig;
use crate::history::TrackKey;
use crate::insights::InsightGenerator;
use crate::metrics::{MetricSet, TrackMap};
use crate::scoring::ScoreBreakdown;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingKind {
    PlayCount,
    TotalMinutes,
    SessionStarts,
    CompletionRate,
    WeightedScore,
}

impl RankingKind {
    /// Report order.
    pub const ALL: [RankingKind; 5] = [
        RankingKind::PlayCount,
        RankingKind::TotalMinutes,
        RankingKind::SessionStarts,
        RankingKind::CompletionRate,
        RankingKind::WeightedScore,
    ];

    pub fn title(self, top_n: usize) -> String {
        match self {
            Self::PlayCount => format!("TOP {} BY PLAY COUNT", top_n),
            Self::TotalMinutes => format!("TOP {} BY MINUTES LISTENED", top_n),
            Self::SessionStarts => format!("TOP {} SESSION STARTERS", top_n),
            Self::CompletionRate => format!("TOP {} LEAST SKIPPED (COMPLETION RATE)", top_n),
            Self::WeightedScore => format!("TOP {} WEIGHTED 'TRUE FAVORITES'", top_n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub rank: usize,
    pub track: TrackKey,
    /// Display names, cut to the configured widths.
    pub track_display: String,
    pub artist_display: String,
    pub play_count: u64,
    pub minutes: f64,
    pub extra: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub kind: RankingKind,
    pub title: String,
    pub rows: Vec<ReportRow>,
}

pub fn truncate_chars(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Stable descending sort on `metric`, cut to `limit`. Ties keep cohort order.
pub fn top_by<F>(cohort: &[TrackKey], metric: F, limit: usize) -> Vec<&TrackKey>
where
    F: Fn(&TrackKey) -> f64,
{
    let mut ranked: Vec<(&TrackKey, f64)> = cohort.iter().map(|key| (key, metric(key))).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.into_iter().take(limit).map(|(key, _)| key).collect()
}

pub struct ReportBuilder<'a> {
    metrics: &'a MetricSet,
    scores: &'a TrackMap<ScoreBreakdown>,
    insights: InsightGenerator,
    config: ReportConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(
        metrics: &'a MetricSet,
        scores: &'a TrackMap<ScoreBreakdown>,
        config: ReportConfig,
    ) -> Self {
        Self {
            metrics,
            scores,
            insights: InsightGenerator::new(),
            config,
        }
    }

    pub fn metric(&self, kind: RankingKind, key: &TrackKey) -> f64 {
        match kind {
            RankingKind::PlayCount => self.metrics.basic.get(key).map_or(0.0, |b| b.play_count as f64),
            RankingKind::TotalMinutes => self.metrics.basic.get(key).map_or(0.0, |b| b.minutes()),
            RankingKind::SessionStarts => self.metrics.session_starts(key) as f64,
            RankingKind::CompletionRate => self.metrics.completion_rate(key),
            RankingKind::WeightedScore => self.scores.get(key).map_or(0.0, |s| s.total),
        }
    }

    pub fn build(&self, kind: RankingKind, cohort: &[TrackKey]) -> Ranking {
        // Only tracks that actually opened a session compete as starters
        let eligible: Vec<TrackKey> = match kind {
            RankingKind::SessionStarts => cohort
                .iter()
                .filter(|key| self.metrics.sessions.starters().contains_key(key))
                .cloned()
                .collect(),
            _ => cohort.to_vec(),
        };

        let rows = top_by(&eligible, |key| self.metric(kind, key), self.config.top_n)
            .into_iter()
            .enumerate()
            .map(|(i, key)| self.row(kind, i + 1, key))
            .collect();

        Ranking {
            kind,
            title: kind.title(self.config.top_n),
            rows,
        }
    }

    pub fn build_all(&self, cohort: &[TrackKey]) -> Vec<Ranking> {
        RankingKind::ALL
            .iter()
            .map(|&kind| self.build(kind, cohort))
            .collect()
    }

    fn row(&self, kind: RankingKind, rank: usize, key: &TrackKey) -> ReportRow {
        let aggregate = self.metrics.basic.get(key).cloned().unwrap_or_default();

        let mut row = ReportRow {
            rank,
            track: key.clone(),
            track_display: truncate_chars(&aggregate.track_name, self.config.track_width),
            artist_display: truncate_chars(&aggregate.artist_name, self.config.artist_width),
            play_count: aggregate.play_count,
            minutes: aggregate.minutes(),
            extra: None,
            score: None,
            insight: None,
        };

        match kind {
            RankingKind::PlayCount | RankingKind::TotalMinutes => {}
            RankingKind::SessionStarts => {
                row.extra = Some(format!(
                    "Sessions started: {}",
                    self.metrics.session_starts(key)
                ));
            }
            RankingKind::CompletionRate => {
                row.extra = Some(format!(
                    "Completion: {:.1}%",
                    self.metrics.completion_rate(key) * 100.0
                ));
            }
            RankingKind::WeightedScore => {
                let score = self.scores.get(key).copied().unwrap_or_default();
                row.extra = Some(format!("Score: {:.3}", score.total));
                row.score = Some(score);
                row.insight = Some(self.insights.explain(self.metrics, key));
            }
        }

        row
    }
}
