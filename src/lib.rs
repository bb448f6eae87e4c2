// Encore Library - turns a streaming-history export into "true favorite" rankings
// Each stage is a plain function or struct, so hosts can run the whole thing or pick pieces

pub mod analysis; // runs the whole pipeline
pub mod config;   // settings and thresholds
pub mod error;    // what can go wrong
pub mod export;   // JSON report export
pub mod history;  // loading and ordering play events
pub mod insights; // fun-fact explanations
pub mod metrics;  // per-track listening metrics
pub mod report;   // rankings and table rendering
pub mod scoring;  // weighted favorite score

// Export the stuff hosts actually use
pub use analysis::{AnalysisReport, Analyzer, RunSummary};
pub use config::{AnalysisConfig, Config, ReportConfig};
pub use error::{Result, StatsError};
pub use history::{EventStore, HistoryLoader, PlayEvent, RawPlayRecord, TrackKey};
pub use metrics::MetricSet;
pub use report::{Ranking, RankingKind, ReportRow};
pub use scoring::{ScoreBreakdown, ScoreWeights};
