use super::{Ranking, RankingKind};
use crate::analysis::AnalysisReport;
use crate::config::ReportConfig;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;

/// One ranking as a fixed-width text table.
pub fn render_ranking(ranking: &Ranking, config: &ReportConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", ranking.title);
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    if ranking.rows.is_empty() {
        let _ = writeln!(out, "    (no tracks qualify)");
        return out;
    }

    for row in &ranking.rows {
        let _ = writeln!(
            out,
            "{:2}. {:<tw$} - {:<aw$}",
            row.rank,
            row.track_display,
            row.artist_display,
            tw = config.track_width,
            aw = config.artist_width,
        );

        let mut line = format!("    Plays: {:3} | Minutes: {:6.1}", row.play_count, row.minutes);
        if let Some(extra) = &row.extra {
            line.push_str(" | ");
            line.push_str(extra);
        }
        let _ = writeln!(out, "{}", line);

        if ranking.kind == RankingKind::WeightedScore {
            if let Some(insight) = &row.insight {
                let _ = writeln!(out, "    {}", insight);
            }
        }
    }

    out
}

/// The whole run: banner, summary, every ranking in order.
pub fn render_report(report: &AnalysisReport, config: &ReportConfig) -> String {
    let banner = "=".repeat(RULE_WIDTH);
    let summary = &report.summary;

    let mut out = String::new();
    let _ = writeln!(out, "{}", banner);
    let _ = writeln!(out, "YOUR LISTENING, RANKED");
    let _ = writeln!(out, "{}", banner);

    let _ = writeln!(out, "Streams analyzed:   {}", summary.total_streams);
    if let (Some(first), Some(last)) = (summary.first_played, summary.last_played) {
        let _ = writeln!(
            out,
            "Period:             {} to {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }
    let _ = writeln!(out, "Listening sessions: {}", summary.total_sessions);
    let _ = writeln!(out, "Minutes listened:   {:.1}", summary.total_minutes);
    let _ = writeln!(out, "Distinct tracks:    {}", summary.distinct_tracks);
    let _ = writeln!(
        out,
        "Ranked tracks:      {} (with {}+ plays)",
        summary.cohort_size, summary.cohort_min_plays
    );

    for ranking in &report.rankings {
        out.push_str(&render_ranking(ranking, config));
    }

    let _ = writeln!(out, "\n{}", banner);
    out
}
