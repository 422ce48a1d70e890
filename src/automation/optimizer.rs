use super::anticipation::NeedsAnticipator;
use crate::knowledge::expressions::ExpressionBank;
use crate::telemetry::StatsSummary;
use chrono::Duration;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Probability of minting a fresh greeting when the bot is doing well.
pub const NEW_EXPRESSION_P: f64 = 0.25;

/// Cooldown adjustment step and bounds.
const COOLDOWN_STEP_MS: i64 = 60_000;
const COOLDOWN_FLOOR_MS: i64 = 60_000;
const COOLDOWN_CEILING_MS: i64 = 20 * 60_000;

/// Success rate above which the bot experiments with new expressions.
const EXPERIMENT_SUCCESS_RATE: f64 = 85.0;

/// Self-adjusted automation parameters, persisted as `tuning.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationTuning {
    #[serde(default = "default_cooldown_ms")]
    pub anticipation_cooldown_ms: i64,
    #[serde(default = "default_max_response_time")]
    pub max_response_time_target_ms: f64,
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate_percent: f64,
    #[serde(default = "default_faq_threshold")]
    pub faq_confidence_threshold: f64,
}

fn default_cooldown_ms() -> i64 {
    30 * 60_000
}
fn default_max_response_time() -> f64 {
    1500.0
}
fn default_min_success_rate() -> f64 {
    80.0
}
fn default_faq_threshold() -> f64 {
    crate::automation::triggers::FAQ_CONFIDENCE_THRESHOLD
}

impl Default for AutomationTuning {
    fn default() -> Self {
        Self {
            anticipation_cooldown_ms: default_cooldown_ms(),
            max_response_time_target_ms: default_max_response_time(),
            min_success_rate_percent: default_min_success_rate(),
            faq_confidence_threshold: default_faq_threshold(),
        }
    }
}

pub struct Optimizer {
    path: PathBuf,
    tuning: AutomationTuning,
}

impl Optimizer {
    pub fn open(data_dir: &Path) -> Self {
        let path = data_dir.join("tuning.json");
        let tuning = crate::knowledge::load_or_init(&path, AutomationTuning::default);
        Self { path, tuning }
    }

    pub fn tuning(&self) -> &AutomationTuning {
        &self.tuning
    }

    /// One optimization pass. Good health (success rate at or above the
    /// floor, response time at or below the ceiling) makes the bot more
    /// proactive by shortening the anticipation cooldown; poor health
    /// backs it off. On a healthy streak it may also mint a new greeting.
    /// Failures are logged, never propagated.
    pub fn optimize_parameters(
        &mut self,
        summary: &StatsSummary,
        anticipator: &mut NeedsAnticipator,
        expressions: &mut ExpressionBank,
        rng: &mut impl Rng,
    ) {
        let healthy = summary.success_rate >= self.tuning.min_success_rate_percent
            && summary.avg_response_time_ms <= self.tuning.max_response_time_target_ms;

        let current = self.tuning.anticipation_cooldown_ms;
        self.tuning.anticipation_cooldown_ms = if healthy {
            (current - COOLDOWN_STEP_MS).max(COOLDOWN_FLOOR_MS)
        } else {
            (current + COOLDOWN_STEP_MS).min(COOLDOWN_CEILING_MS)
        };

        info!(
            healthy,
            success_rate = summary.success_rate,
            avg_rt_ms = summary.avg_response_time_ms,
            cooldown_ms = self.tuning.anticipation_cooldown_ms,
            "optimization pass"
        );

        if let Err(e) = crate::knowledge::persist(&self.path, &self.tuning) {
            warn!("failed to persist tuning: {e}");
        }
        anticipator.set_cooldown(Duration::milliseconds(self.tuning.anticipation_cooldown_ms));

        if summary.success_rate > EXPERIMENT_SUCCESS_RATE
            && rng.random::<f64>() < NEW_EXPRESSION_P
        {
            let fresh = format!(
                "Oi! Já são {} conversas por aqui, bora para mais uma?",
                summary.total_conversations
            );
            match expressions.add("greetings", &fresh) {
                Ok(true) => info!("added experimental greeting"),
                Ok(false) => {}
                Err(e) => warn!("failed to add experimental greeting: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn summary(success_rate: f64, avg_rt: f64) -> StatsSummary {
        StatsSummary {
            started_at: Utc::now(),
            total_conversations: 10,
            total_commands: 0,
            successes: 9,
            failures: 1,
            success_rate,
            avg_response_time_ms: avg_rt,
        }
    }

    fn fixtures(name: &str) -> (Optimizer, NeedsAnticipator, ExpressionBank) {
        let dir = std::env::temp_dir().join(format!("luana-opt-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let _ = std::fs::create_dir_all(&dir);
        (
            Optimizer::open(&dir),
            NeedsAnticipator::open(&dir),
            ExpressionBank::open(&dir),
        )
    }

    #[test]
    fn healthy_system_shortens_cooldown() {
        let (mut opt, mut antic, mut expr) = fixtures("healthy");
        let mut rng = StdRng::seed_from_u64(6);
        let before = opt.tuning().anticipation_cooldown_ms;
        opt.optimize_parameters(&summary(90.0, 500.0), &mut antic, &mut expr, &mut rng);
        assert_eq!(opt.tuning().anticipation_cooldown_ms, before - COOLDOWN_STEP_MS);
        assert_eq!(
            antic.cooldown().num_milliseconds(),
            opt.tuning().anticipation_cooldown_ms
        );
    }

    #[test]
    fn unhealthy_system_backs_off_and_caps() {
        let (mut opt, mut antic, mut expr) = fixtures("unhealthy");
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            opt.optimize_parameters(&summary(50.0, 3000.0), &mut antic, &mut expr, &mut rng);
        }
        assert_eq!(opt.tuning().anticipation_cooldown_ms, COOLDOWN_CEILING_MS);
    }

    #[test]
    fn cooldown_never_drops_below_floor() {
        let (mut opt, mut antic, mut expr) = fixtures("floor");
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            opt.optimize_parameters(&summary(100.0, 100.0), &mut antic, &mut expr, &mut rng);
        }
        assert_eq!(opt.tuning().anticipation_cooldown_ms, COOLDOWN_FLOOR_MS);
    }
}
