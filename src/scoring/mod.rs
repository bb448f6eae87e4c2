// Weighted "true favorite" score
// Five signals on very different scales get squashed to [0,1] against the cohort's best,
// then blended with fixed weights

use crate::config::AnalysisConfig;
use crate::error::{Result, StatsError};
use crate::history::TrackKey;
use crate::metrics::{MetricSet, TrackMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub minutes: f64,
    pub sessions: f64,
    pub completion: f64,
    pub density: f64,
    pub consistency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            minutes: 0.25,
            sessions: 0.30,
            completion: 0.25,
            density: 0.15,
            consistency: 0.05,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.minutes + self.sessions + self.completion + self.density + self.consistency
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("minutes", self.minutes),
            ("sessions", self.sessions),
            ("completion", self.completion),
            ("density", self.density),
            ("consistency", self.consistency),
        ];

        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(StatsError::config(format!(
                    "weight '{}' must be a non-negative number (got {})",
                    name, weight
                )));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(StatsError::config(format!(
                "score weights must sum to 1.0 (got {:.6})",
                sum
            )));
        }

        Ok(())
    }
}

/// Normalized components, each in [0,1], plus their weighted total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub minutes: f64,
    pub sessions: f64,
    pub completion: f64,
    pub density: f64,
    pub consistency: f64,
    pub total: f64,
}

/// Tracks eligible for rankings, in first-seen order.
pub fn select_cohort(metrics: &MetricSet, min_plays: u64) -> Vec<TrackKey> {
    let cohort: Vec<TrackKey> = metrics
        .basic
        .iter()
        .filter(|(_, stats)| stats.play_count >= min_plays)
        .map(|(key, _)| key.clone())
        .collect();

    info!(
        "Analyzing {} songs (with {}+ plays)",
        cohort.len(),
        min_plays
    );
    cohort
}

#[derive(Debug, Clone, Copy, Default)]
struct CohortMaxima {
    total_ms: f64,
    sessions: f64,
    density: f64,
    consistency: f64,
}

impl CohortMaxima {
    fn over(metrics: &MetricSet, cohort: &[TrackKey]) -> Self {
        let mut maxima = Self::default();
        for key in cohort {
            let total_ms = metrics.basic.get(key).map_or(0, |b| b.total_ms) as f64;
            maxima.total_ms = maxima.total_ms.max(total_ms);
            maxima.sessions = maxima.sessions.max(metrics.session_starts(key) as f64);
            maxima.density = maxima.density.max(metrics.multi_listen_days(key) as f64);
            maxima.consistency = maxima.consistency.max(metrics.distinct_weeks(key) as f64);
        }
        maxima
    }
}

// A zero maximum means every track scores 0 on that dimension
fn denominator(max: f64) -> f64 {
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct ScoreAggregator {
    weights: ScoreWeights,
}

impl ScoreAggregator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.weights)
    }

    /// Scores every cohort member. Maxima are taken over the cohort only.
    pub fn score(&self, metrics: &MetricSet, cohort: &[TrackKey]) -> TrackMap<ScoreBreakdown> {
        let maxima = CohortMaxima::over(metrics, cohort);
        debug!(
            max_ms = maxima.total_ms,
            max_sessions = maxima.sessions,
            max_density = maxima.density,
            max_weeks = maxima.consistency,
            "Cohort maxima"
        );

        let mut scores: TrackMap<ScoreBreakdown> = TrackMap::new();
        for key in cohort {
            let total_ms = metrics.basic.get(key).map_or(0, |b| b.total_ms) as f64;

            let mut breakdown = ScoreBreakdown {
                minutes: total_ms / denominator(maxima.total_ms),
                sessions: metrics.session_starts(key) as f64 / denominator(maxima.sessions),
                // already a rate, used as-is
                completion: metrics.completion_rate(key),
                density: metrics.multi_listen_days(key) as f64 / denominator(maxima.density),
                consistency: metrics.distinct_weeks(key) as f64 / denominator(maxima.consistency),
                total: 0.0,
            };
            breakdown.total = breakdown.minutes * self.weights.minutes
                + breakdown.sessions * self.weights.sessions
                + breakdown.completion * self.weights.completion
                + breakdown.density * self.weights.density
                + breakdown.consistency * self.weights.consistency;
            // Weights may sum a hair over 1 within tolerance
            breakdown.total = breakdown.total.clamp(0.0, 1.0);

            *scores.get_or_insert_default(key) = breakdown;
        }

        scores
    }
}

impl Default for ScoreAggregator {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}
