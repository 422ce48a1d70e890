use crate::channel::Channel;
use crate::knowledge::StoreError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Default per-pattern, per-channel cooldown. The optimizer nudges this
/// up and down at runtime.
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 30;

const PEAK_HOURS: std::ops::RangeInclusive<u32> = 18..=23;
const SERVER_KEYWORDS: &[&str] = &["servidor", "lag", "jogadores", "online"];
const HELP_KEYWORDS: &[&str] = &["não sei", "como faço", "ajuda", "perdido", "confuso"];

const HELP_PATTERN: &str = "precisa_ajuda";

/// A user-added keyword pattern, persisted in `anticipation.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordPattern {
    pub name: String,
    pub keywords: Vec<String>,
    pub suggestion: String,
}

/// A proactive suggestion the bot can make before being asked.
#[derive(Debug, Clone, PartialEq)]
pub struct AnticipatedAction {
    pub pattern: String,
    pub suggestion: String,
}

/// The one action worth sending this turn. Offering to help beats any
/// other suggestion; beyond that, first match wins. One nudge per turn
/// keeps the bot out of spam territory.
pub fn primary_action(actions: &[AnticipatedAction]) -> Option<&AnticipatedAction> {
    actions
        .iter()
        .find(|a| a.pattern == HELP_PATTERN)
        .or_else(|| actions.first())
}

/// Watches each message for signals that the user is about to need
/// something, and offers it first. Fired suggestions go on a cooldown per
/// pattern and channel so the bot does not nag.
pub struct NeedsAnticipator {
    path: PathBuf,
    added: Vec<KeywordPattern>,
    cooldown: Duration,
    last_fired: HashMap<(String, String), DateTime<Utc>>,
}

impl NeedsAnticipator {
    pub fn open(data_dir: &std::path::Path) -> Self {
        let path = data_dir.join("anticipation.json");
        let added = crate::knowledge::load_or_init(&path, Vec::new);
        Self {
            path,
            added,
            cooldown: Duration::minutes(DEFAULT_COOLDOWN_MINUTES),
            last_fired: HashMap::new(),
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn set_cooldown(&mut self, cooldown: Duration) {
        debug!(minutes = cooldown.num_minutes(), "anticipation cooldown updated");
        self.cooldown = cooldown;
    }

    /// List every pattern that matches this message and is off cooldown
    /// for this channel.
    pub fn anticipate(
        &self,
        message: &str,
        hour: u32,
        channel_id: &str,
    ) -> Vec<AnticipatedAction> {
        let lower = message.to_lowercase();
        let mut actions = Vec::new();

        if PEAK_HOURS.contains(&hour) && SERVER_KEYWORDS.iter().any(|k| lower.contains(k)) {
            actions.push(AnticipatedAction {
                pattern: "horario_pico".to_string(),
                suggestion:
                    "Estamos no horário de pico! Quer que eu verifique o status do servidor?"
                        .to_string(),
            });
        }

        if HELP_KEYWORDS.iter().any(|k| lower.contains(k)) {
            actions.push(AnticipatedAction {
                pattern: HELP_PATTERN.to_string(),
                suggestion:
                    "Parece que você está com dúvidas. Quer que eu liste o que posso fazer?"
                        .to_string(),
            });
        }

        for pattern in &self.added {
            if pattern.keywords.iter().any(|k| lower.contains(&k.to_lowercase())) {
                actions.push(AnticipatedAction {
                    pattern: pattern.name.clone(),
                    suggestion: pattern.suggestion.clone(),
                });
            }
        }

        actions.retain(|a| !self.on_cooldown(&a.pattern, channel_id));
        actions
    }

    fn on_cooldown(&self, pattern: &str, channel_id: &str) -> bool {
        self.last_fired
            .get(&(pattern.to_string(), channel_id.to_string()))
            .is_some_and(|fired| Utc::now() - *fired < self.cooldown)
    }

    /// Send the suggestion and stamp the cooldown. A failed send still
    /// stamps; retrying a nag immediately would be worse than missing one.
    pub async fn execute(
        &mut self,
        action: &AnticipatedAction,
        channel: &dyn Channel,
        channel_id: &str,
    ) {
        if let Err(e) = channel.send_message(channel_id, &action.suggestion).await {
            warn!("anticipated suggestion failed to send: {e}");
        }
        self.last_fired.insert(
            (action.pattern.clone(), channel_id.to_string()),
            Utc::now(),
        );
    }

    /// Register and persist a new keyword pattern. Duplicate names are
    /// rejected.
    pub fn add_pattern(&mut self, pattern: KeywordPattern) -> Result<bool, StoreError> {
        if self.added.iter().any(|p| p.name == pattern.name) {
            return Ok(false);
        }
        self.added.push(pattern);
        crate::knowledge::persist(&self.path, &self.added)?;
        Ok(true)
    }
}
