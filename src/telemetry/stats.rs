use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Response-time samples kept for averaging. Oldest samples drop first.
const MAX_RESPONSE_TIME_SAMPLES: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsState {
    started_at: DateTime<Utc>,
    conversations: u64,
    successes: u64,
    failures: u64,
    commands: HashMap<String, u64>,
    response_times_ms: Vec<u64>,
}

impl StatsState {
    fn fresh() -> Self {
        Self {
            started_at: Utc::now(),
            conversations: 0,
            successes: 0,
            failures: 0,
            commands: HashMap::new(),
            response_times_ms: Vec::new(),
        }
    }
}

/// Aggregate view over everything recorded since the last reset.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub started_at: DateTime<Utc>,
    pub total_conversations: u64,
    pub total_commands: u64,
    pub successes: u64,
    pub failures: u64,
    /// Percentage in [0, 100]; 100 when nothing has been recorded yet.
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
}

/// Running performance counters, persisted to `performance.json` on every
/// update so a restart does not wipe the picture.
pub struct PerformanceStats {
    path: PathBuf,
    state: StatsState,
}

impl PerformanceStats {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join("performance.json");
        let state = crate::knowledge::load_or_init(&path, StatsState::fresh);
        Self { path, state }
    }

    /// Record a completed conversational turn.
    pub fn record_conversation(&mut self, success: bool, response_time_ms: u64) {
        self.state.conversations += 1;
        if success {
            self.state.successes += 1;
        } else {
            self.state.failures += 1;
        }
        self.state.response_times_ms.push(response_time_ms);
        if self.state.response_times_ms.len() > MAX_RESPONSE_TIME_SAMPLES {
            let excess = self.state.response_times_ms.len() - MAX_RESPONSE_TIME_SAMPLES;
            self.state.response_times_ms.drain(..excess);
        }
        self.save();
    }

    /// Bump a named command counter.
    pub fn record_command(&mut self, command: &str) {
        *self.state.commands.entry(command.to_string()).or_insert(0) += 1;
        self.save();
    }

    pub fn summarize(&self) -> StatsSummary {
        let total = self.state.successes + self.state.failures;
        let success_rate = if total == 0 {
            100.0
        } else {
            self.state.successes as f64 / total as f64 * 100.0
        };
        let avg_response_time_ms = if self.state.response_times_ms.is_empty() {
            0.0
        } else {
            self.state.response_times_ms.iter().sum::<u64>() as f64
                / self.state.response_times_ms.len() as f64
        };
        StatsSummary {
            started_at: self.state.started_at,
            total_conversations: self.state.conversations,
            total_commands: self.state.commands.values().sum(),
            successes: self.state.successes,
            failures: self.state.failures,
            success_rate,
            avg_response_time_ms,
        }
    }

    /// Write a dated report file next to the state file.
    pub fn write_daily_report(&self, data_dir: &Path) {
        self.write_report(data_dir, "daily");
    }

    pub fn write_weekly_report(&self, data_dir: &Path) {
        self.write_report(data_dir, "weekly");
    }

    fn write_report(&self, data_dir: &Path, kind: &str) {
        let summary = self.summarize();
        let name = format!("report-{kind}-{}.json", Utc::now().format("%Y-%m-%d"));
        let path = data_dir.join(name);
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!("failed to write {kind} report: {e}");
                } else {
                    info!(path = %path.display(), "{kind} report written");
                }
            }
            Err(e) => warn!("failed to serialize {kind} report: {e}"),
        }
    }

    /// Drop all counters and start a fresh window.
    pub fn reset_statistics(&mut self) {
        self.state = StatsState::fresh();
        self.save();
    }

    fn save(&self) {
        if let Err(e) = crate::knowledge::persist(&self.path, &self.state) {
            warn!("failed to persist performance stats: {e}");
        }
    }
}
