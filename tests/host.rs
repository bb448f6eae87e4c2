use encore::config::Config;
use encore::export::ExportManager;
use encore::report::{render_report, RankingKind};
use encore::{Analyzer, HistoryLoader, StatsError};
use std::fs;
use tempfile::TempDir;

const PART_0: &str = r#"[
  {"endTime": "2024-12-02 09:00", "artistName": "Band", "trackName": "Opener", "msPlayed": 200000},
  {"endTime": "2024-12-02 09:04", "artistName": "Band", "trackName": "Second", "msPlayed": 40000},
  {"endTime": "2024-12-03 09:00", "artistName": "Band", "trackName": "Opener", "msPlayed": 200000}
]"#;

const PART_1: &str = r#"[
  {"endTime": "2024-12-04 09:00", "artistName": "Band", "trackName": "Opener", "msPlayed": 200000},
  {"endTime": "2024-12-04 09:04", "artistName": "Band", "trackName": "Second", "msPlayed": 40000},
  {"endTime": "2024-12-05 09:04", "artistName": "Band", "trackName": "Second", "msPlayed": 40000},
  {"endTime": "2024-11-01 09:00", "artistName": "Band", "trackName": "Old", "msPlayed": 200000}
]"#;

fn export_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("StreamingHistory_music_0.json"), PART_0).unwrap();
    fs::write(dir.path().join("StreamingHistory_music_1.json"), PART_1).unwrap();
    fs::write(dir.path().join("StreamingHistory_podcast_0.json"), "[]").unwrap();
    dir
}

#[test]
fn loads_export_folder_and_ranks() {
    let dir = export_dir();
    let config = Config::default();

    let records = HistoryLoader::default().load_dir(dir.path()).unwrap();
    assert_eq!(records.len(), 7);

    let analyzer = Analyzer::new(config.analysis.clone(), config.report.clone()).unwrap();
    let report = analyzer.run_records(records).unwrap();
    assert_eq!(report.summary.total_streams, 6);
    assert_eq!(report.summary.cohort_size, 2);

    let starters = report.ranking(RankingKind::SessionStarts).unwrap();
    // Second only opens the Dec 5 session, after a full day of silence
    assert_eq!(starters.rows.len(), 2);
    assert_eq!(starters.rows[0].track.track_name, "Opener");
    assert_eq!(starters.rows[1].extra.as_deref(), Some("Sessions started: 1"));

    let text = render_report(&report, &config.report);
    assert!(text.contains("TOP 10 SESSION STARTERS"));
    assert!(text.contains("Listening sessions: 4"));
}

#[test]
fn config_round_trips_through_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("encore").join("config.toml");

    let mut config = Config::default();
    config.analysis.session_gap_minutes = 45;
    config.report.top_n = 5;
    config.save(Some(&path)).unwrap();

    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.analysis, config.analysis);
    assert_eq!(loaded.report, config.report);

    // --all-time written out must stay all-time
    config.analysis.cutoff_date = None;
    config.save(Some(&path)).unwrap();
    let loaded = Config::load(Some(&path)).unwrap();
    assert_eq!(loaded.analysis.cutoff_date, None);
    assert_eq!(loaded.analysis, config.analysis);
}

#[test]
fn missing_config_file_means_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(loaded.analysis.session_gap_minutes, 30);
}

#[test]
fn unbalanced_weights_rejected_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[analysis.weights]\nminutes = 0.5\nsessions = 0.5\ncompletion = 0.5\n",
    )
    .unwrap();

    let config = Config::load(Some(&path)).unwrap();
    assert!(matches!(config.validate(), Err(StatsError::Config(_))));
}

#[test]
fn json_export_matches_report() {
    let dir = export_dir();
    let config = Config::default();
    let records = HistoryLoader::default().load_dir(dir.path()).unwrap();
    let report = Analyzer::new(config.analysis, config.report)
        .unwrap()
        .run_records(records)
        .unwrap();

    let out = dir.path().join("report.json");
    ExportManager::new().export_to_json(&report, &out).unwrap();

    let parsed: encore::AnalysisReport =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(parsed.summary, report.summary);
    assert_eq!(parsed.rankings.len(), report.rankings.len());
}
