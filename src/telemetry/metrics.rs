use crate::knowledge::synonyms::SynonymBank;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

/// One answered turn, kept for engagement analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub id: Uuid,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub response: String,
    pub follow_up_used: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MetricsState {
    interactions: Vec<InteractionRecord>,
    satisfaction_ratings: Vec<u8>,
}

/// Engagement quality over recorded interactions, persisted as
/// `metrics.json`.
pub struct EngagementMetrics {
    path: PathBuf,
    state: MetricsState,
}

/// The rates `report()` prints, each in [0, 1].
#[derive(Debug, Clone, Serialize)]
pub struct EngagementReport {
    pub total_interactions: usize,
    pub unique_users: usize,
    pub avg_interactions_per_user: f64,
    pub follow_up_usage_rate: f64,
    pub unique_response_rate: f64,
    pub synonym_usage_rate: f64,
    pub avg_satisfaction: f64,
}

impl EngagementMetrics {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join("metrics.json");
        let state = crate::knowledge::load_or_init(&path, MetricsState::default);
        Self { path, state }
    }

    pub fn record_interaction(&mut self, user_id: &str, response: &str, follow_up_used: bool) {
        self.state.interactions.push(InteractionRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            timestamp: Utc::now(),
            response: response.to_string(),
            follow_up_used,
        });
        self.save();
    }

    /// Record a 1-5 satisfaction rating; out-of-range values are clamped.
    pub fn record_satisfaction(&mut self, rating: u8) {
        self.state.satisfaction_ratings.push(rating.clamp(1, 5));
        self.save();
    }

    pub fn interaction_count(&self) -> usize {
        self.state.interactions.len()
    }

    /// Compute the engagement rates. The synonym-usage rate asks the
    /// synonym bank which responses contain any known synonym.
    pub fn summarize(&self, synonyms: &SynonymBank) -> EngagementReport {
        let total = self.state.interactions.len();
        let users: HashSet<&str> = self
            .state
            .interactions
            .iter()
            .map(|i| i.user_id.as_str())
            .collect();
        let unique_responses: HashSet<&str> = self
            .state
            .interactions
            .iter()
            .map(|i| i.response.as_str())
            .collect();

        let rate = |count: usize| {
            if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            }
        };

        let follow_ups = self
            .state
            .interactions
            .iter()
            .filter(|i| i.follow_up_used)
            .count();
        let with_synonyms = self
            .state
            .interactions
            .iter()
            .filter(|i| synonyms.mentions_synonym(&i.response))
            .count();

        let avg_satisfaction = if self.state.satisfaction_ratings.is_empty() {
            0.0
        } else {
            self.state.satisfaction_ratings.iter().map(|r| *r as f64).sum::<f64>()
                / self.state.satisfaction_ratings.len() as f64
        };

        EngagementReport {
            total_interactions: total,
            unique_users: users.len(),
            avg_interactions_per_user: if users.is_empty() {
                0.0
            } else {
                total as f64 / users.len() as f64
            },
            follow_up_usage_rate: rate(follow_ups),
            unique_response_rate: rate(unique_responses.len()),
            synonym_usage_rate: rate(with_synonyms),
            avg_satisfaction,
        }
    }

    /// Human-readable report for the `status` subcommand.
    pub fn report(&self, synonyms: &SynonymBank) -> String {
        let r = self.summarize(synonyms);
        format!(
            "interações: {} | usuários: {} | média por usuário: {:.1}\n\
             follow-ups: {:.0}% | respostas únicas: {:.0}% | sinônimos: {:.0}%\n\
             satisfação média: {:.1}/5",
            r.total_interactions,
            r.unique_users,
            r.avg_interactions_per_user,
            r.follow_up_usage_rate * 100.0,
            r.unique_response_rate * 100.0,
            r.synonym_usage_rate * 100.0,
            r.avg_satisfaction,
        )
    }

    fn save(&self) {
        if let Err(e) = crate::knowledge::persist(&self.path, &self.state) {
            warn!("failed to persist engagement metrics: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(name: &str) -> EngagementMetrics {
        let dir =
            std::env::temp_dir().join(format!("luana-metrics-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let _ = std::fs::create_dir_all(&dir);
        EngagementMetrics::open(&dir)
    }

    fn synonyms(name: &str) -> SynonymBank {
        let dir =
            std::env::temp_dir().join(format!("luana-metrics-syn-{name}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        SynonymBank::open(&dir)
    }

    #[test]
    fn rates_are_computed_over_interactions() {
        let mut m = metrics("rates");
        m.record_interaction("u1", "resposta a", true);
        m.record_interaction("u1", "resposta a", false);
        m.record_interaction("u2", "resposta b", false);

        let report = m.summarize(&synonyms("rates"));
        assert_eq!(report.total_interactions, 3);
        assert_eq!(report.unique_users, 2);
        assert!((report.follow_up_usage_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((report.unique_response_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn satisfaction_is_clamped() {
        let mut m = metrics("clamp");
        m.record_satisfaction(0);
        m.record_satisfaction(9);
        let report = m.summarize(&synonyms("clamp"));
        assert!((report.avg_satisfaction - 3.0).abs() < f64::EPSILON);
    }
}
