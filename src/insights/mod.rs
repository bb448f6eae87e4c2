// Fun facts - short explanations of why a track ranks where it does
// A fixed rule table, evaluated category by category; every matching phrase is kept

use crate::history::TrackKey;
use crate::metrics::{CompletionStats, ConsistencyStats, DensityStats, MetricSet};

pub const FALLBACK_INSIGHT: &str = "A steady presence in your listening";
const SEPARATOR: &str = "; ";

/// Everything the rules look at for one track.
#[derive(Debug, Clone, Default)]
pub struct InsightInput {
    pub play_count: u64,
    pub session_starts: u32,
    pub completion: CompletionStats,
    pub density: DensityStats,
    pub consistency: ConsistencyStats,
}

impl InsightInput {
    pub fn gather(metrics: &MetricSet, key: &TrackKey) -> Self {
        Self {
            play_count: metrics.basic.get(key).map_or(0, |b| b.play_count),
            session_starts: metrics.session_starts(key),
            completion: metrics.completion.get(key).cloned().unwrap_or_default(),
            density: metrics.density.get(key).cloned().unwrap_or_default(),
            consistency: metrics.consistency.get(key).cloned().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn explain(&self, metrics: &MetricSet, key: &TrackKey) -> String {
        self.describe(&InsightInput::gather(metrics, key))
    }

    pub fn describe(&self, input: &InsightInput) -> String {
        let phrases = self.phrases(input);
        if phrases.is_empty() {
            FALLBACK_INSIGHT.to_string()
        } else {
            phrases.join(SEPARATOR)
        }
    }

    /// Matching phrases in category order: sessions, completion, density,
    /// consistency, peak-month concentration.
    pub fn phrases(&self, input: &InsightInput) -> Vec<String> {
        let mut phrases = Vec::new();

        // Sessions - only the higher tier fires
        if input.session_starts > 10 {
            phrases.push(format!("Kicked off {} listening sessions", input.session_starts));
        } else if input.session_starts > 5 {
            phrases.push(format!("Started {} sessions", input.session_starts));
        }

        // Completion
        let completion = &input.completion;
        if completion.completion_rate >= 0.95 {
            phrases.push(format!(
                "Rarely skipped ({:.0}% played through)",
                completion.completion_rate * 100.0
            ));
        } else if completion.completion_rate < 0.5 && completion.skipped_plays > 5 {
            phrases.push(format!("Often skipped ({} short plays)", completion.skipped_plays));
        }

        // Density
        if input.density.max_in_one_day >= 5 {
            phrases.push(format!(
                "Binged {} times in a single day",
                input.density.max_in_one_day
            ));
        } else if input.density.multi_listen_days >= 10 {
            phrases.push(format!(
                "Replayed on {} different days",
                input.density.multi_listen_days
            ));
        }

        // Consistency
        let peak = input.consistency.peak_month();
        if input.consistency.distinct_months == 1 {
            if let Some(peak) = peak {
                phrases.push(format!("A {} obsession", peak.month));
            }
        } else if input.consistency.distinct_months >= 3 {
            phrases.push(format!(
                "In rotation across {} months",
                input.consistency.distinct_months
            ));
        }

        // Peak-month concentration
        if let Some(peak) = peak {
            if input.play_count > 0 {
                let share = peak.plays as f64 / input.play_count as f64;
                if share > 0.5 {
                    phrases.push(format!(
                        "{:.0}% of plays came in {}",
                        share * 100.0,
                        peak.month
                    ));
                }
            }
        }

        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonthTally;

    fn tally(month: &str, plays: u32) -> MonthTally {
        MonthTally {
            month: month.to_string(),
            plays,
        }
    }

    fn spread_input() -> InsightInput {
        // Evenly spread over two months so no consistency/concentration phrase fires
        InsightInput {
            play_count: 4,
            session_starts: 0,
            completion: CompletionStats {
                total_plays: 4,
                completed_plays: 3,
                skipped_plays: 1,
                completion_rate: 0.75,
            },
            density: DensityStats::default(),
            consistency: ConsistencyStats {
                distinct_weeks: 2,
                distinct_months: 2,
                monthly_plays: vec![tally("December", 2), tally("January", 2)],
            },
        }
    }

    #[test]
    fn test_fallback_when_nothing_matches() {
        let text = InsightGenerator::new().describe(&spread_input());
        assert_eq!(text, FALLBACK_INSIGHT);
    }

    #[test]
    fn test_session_tiers_are_exclusive() {
        let generator = InsightGenerator::new();
        let mut input = spread_input();

        input.session_starts = 11;
        assert_eq!(generator.phrases(&input), vec!["Kicked off 11 listening sessions"]);

        input.session_starts = 10;
        assert_eq!(generator.phrases(&input), vec!["Started 10 sessions"]);

        input.session_starts = 5;
        assert!(generator.phrases(&input).is_empty());
    }

    #[test]
    fn test_completion_phrases() {
        let generator = InsightGenerator::new();
        let mut input = spread_input();

        input.completion.completion_rate = 0.95;
        assert_eq!(generator.phrases(&input), vec!["Rarely skipped (95% played through)"]);

        input.completion.completion_rate = 0.4;
        input.completion.skipped_plays = 6;
        assert_eq!(generator.phrases(&input), vec!["Often skipped (6 short plays)"]);

        // Low rate alone isn't enough
        input.completion.skipped_plays = 5;
        assert!(generator.phrases(&input).is_empty());
    }

    #[test]
    fn test_binge_beats_repeat_days() {
        let generator = InsightGenerator::new();
        let mut input = spread_input();
        input.density = DensityStats {
            multi_listen_days: 12,
            max_in_one_day: 5,
        };
        assert_eq!(generator.phrases(&input), vec!["Binged 5 times in a single day"]);

        input.density.max_in_one_day = 4;
        assert_eq!(generator.phrases(&input), vec!["Replayed on 12 different days"]);
    }

    #[test]
    fn test_single_month_obsession_also_reports_concentration() {
        let mut input = spread_input();
        input.consistency = ConsistencyStats {
            distinct_weeks: 1,
            distinct_months: 1,
            monthly_plays: vec![tally("December", 4)],
        };

        let text = InsightGenerator::new().describe(&input);
        assert_eq!(text, "A December obsession; 100% of plays came in December");
    }

    #[test]
    fn test_spread_with_peak_month() {
        let mut input = spread_input();
        input.play_count = 10;
        input.consistency = ConsistencyStats {
            distinct_weeks: 6,
            distinct_months: 3,
            monthly_plays: vec![tally("December", 2), tally("January", 6), tally("February", 2)],
        };

        let phrases = InsightGenerator::new().phrases(&input);
        assert_eq!(
            phrases,
            vec!["In rotation across 3 months", "60% of plays came in January"]
        );
    }

    #[test]
    fn test_exactly_half_is_not_concentrated() {
        let mut input = spread_input();
        input.consistency.monthly_plays = vec![tally("December", 2), tally("January", 2)];
        input.play_count = 4;
        assert!(InsightGenerator::new().phrases(&input).is_empty());
    }
}
