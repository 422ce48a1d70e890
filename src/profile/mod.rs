use crate::nlp::entities::ExtractedEntities;
use crate::nlp::intent::Intent;
use crate::nlp::sentiment::SentimentCategory;
use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

/// Reply style the bot adapts its wording to. Profiles only ever hold the
/// first three; the remaining tags are per-turn overrides derived from
/// sentiment and intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Pratico,
    Intelectual,
    Casual,
    Entusiasmado,
    Cauteloso,
    Direto,
}

/// Names, places and interests the bot has learned about a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextualData {
    pub names: Vec<String>,
    pub locations: Vec<String>,
    pub interests: Vec<String>,
}

/// Accumulated per-user behavioral state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub favorite_commands: HashMap<String, u32>,
    /// Exponential moving average of message length (0.9/0.1 weights).
    pub avg_message_length: f64,
    pub message_count: u64,
    /// Count of messages touching server-status keywords.
    pub server_interest: u32,
    pub style_preference: Style,
    pub contextual_data: ContextualData,
    pub implicit_preferences: HashMap<String, bool>,
    /// Hour-of-day histogram of this user's messages.
    pub active_hours: [u32; 24],
    pub last_updated: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}

impl UserProfile {
    fn new(user_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.to_string(),
            favorite_commands: HashMap::new(),
            avg_message_length: 0.0,
            message_count: 0,
            server_interest: 0,
            style_preference: Style::Pratico,
            contextual_data: ContextualData::default(),
            implicit_preferences: HashMap::new(),
            active_hours: [0; 24],
            last_updated: now,
            last_seen: now,
        }
    }

    /// TTL soft reset: counters go back to zero, identity data stays.
    fn soft_reset(&mut self, now: DateTime<Utc>) {
        self.favorite_commands.clear();
        self.avg_message_length = 0.0;
        self.message_count = 0;
        self.server_interest = 0;
        self.active_hours = [0; 24];
        self.last_updated = now;
    }
}

/// Per-turn rendering hints derived from the profile plus this message's
/// sentiment and intent.
#[derive(Debug, Clone, Copy)]
pub struct PersonalizationOptions {
    pub style: Style,
    /// Bounded to [0.2, 0.8] from the average message length.
    pub complexity: f64,
    /// Most active hour of day across all observed activity.
    pub peak_hour: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileMetrics {
    pub personalized_count: u64,
    pub avg_response_time_ms: f64,
    pub samples: u64,
    pub cache_evictions: u64,
    pub profiles_count: usize,
}

const SERVER_KEYWORDS: &[&str] = &["status", "servidor", "lag", "jogadores", "online", "conexão"];
const INTELLECTUAL_KEYWORDS: &[&str] = &["filosofia", "hegel", "intelectual", "reflexão"];

/// Average message length below which the style heuristic settles on
/// `pratico`.
const SHORT_MESSAGE_THRESHOLD: f64 = 120.0;

const MAX_NAMES: usize = 5;
const MAX_LOCATIONS: usize = 5;
const MAX_INTERESTS: usize = 10;

/// Bounded store of user profiles. Lazily populated, least-recently-updated
/// eviction at capacity, TTL-based soft reset for stale entries.
pub struct ProfileStore {
    profiles: HashMap<String, UserProfile>,
    max_profiles: usize,
    ttl: Duration,
    global_activity: [u64; 24],
    metrics: MetricsInner,
}

#[derive(Default)]
struct MetricsInner {
    personalized_count: u64,
    avg_response_time_ms: f64,
    samples: u64,
    cache_evictions: u64,
}

impl ProfileStore {
    pub fn new(max_profiles: usize, ttl: Duration) -> Self {
        Self {
            profiles: HashMap::new(),
            max_profiles,
            ttl,
            global_activity: [0; 24],
            metrics: MetricsInner::default(),
        }
    }

    /// Seed the global activity histogram by scanning a structured log file
    /// for `"timestamp":"..."` fields. Missing or unreadable logs are fine;
    /// the histogram just stays empty.
    pub fn analyze_logs_once(&mut self, path: &Path) {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!("activity log not readable ({e}), skipping histogram seed");
                return;
            }
        };
        for line in content.lines() {
            if let Some(ts) = extract_timestamp_field(line) {
                if let Ok(parsed) = DateTime::parse_from_rfc3339(&ts) {
                    let hour = parsed.hour() as usize;
                    self.global_activity[hour] += 1;
                }
            }
        }
    }

    /// Return the profile for a user, creating it if needed. Stale profiles
    /// get a TTL soft reset; at capacity the least-recently-updated profile
    /// is evicted first.
    pub fn ensure_profile(&mut self, user_id: &str) -> &mut UserProfile {
        self.ensure_profile_at(user_id, Utc::now())
    }

    fn ensure_profile_at(&mut self, user_id: &str, now: DateTime<Utc>) -> &mut UserProfile {
        if !self.profiles.contains_key(user_id) && self.profiles.len() >= self.max_profiles {
            self.evict_oldest();
        }

        let ttl = self.ttl;
        let profile = self
            .profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::new(user_id, now));
        if now - profile.last_updated > ttl {
            debug!(user_id, "profile TTL elapsed, soft reset");
            profile.soft_reset(now);
        }
        profile.last_seen = now;
        profile
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .profiles
            .values()
            .min_by_key(|p| p.last_updated)
            .map(|p| p.user_id.clone());
        if let Some(user_id) = oldest {
            self.profiles.remove(&user_id);
            self.metrics.cache_evictions += 1;
            debug!(%user_id, "evicted least-recently-updated profile");
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&UserProfile> {
        self.profiles.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Update counters and style heuristics from one plain message.
    pub fn track_message(&mut self, user_id: &str, content: &str, timestamp: DateTime<Utc>) {
        self.global_activity[timestamp.hour() as usize] += 1;

        let profile = self.ensure_profile_at(user_id, timestamp);
        let len = content.chars().count() as f64;
        profile.message_count += 1;
        profile.avg_message_length = if profile.avg_message_length == 0.0 {
            len
        } else {
            profile.avg_message_length * 0.9 + len * 0.1
        };
        profile.active_hours[timestamp.hour() as usize] += 1;

        let lower = content.to_lowercase();
        if SERVER_KEYWORDS.iter().any(|k| lower.contains(k)) {
            profile.server_interest += 1;
        }
        if INTELLECTUAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            profile.style_preference = Style::Intelectual;
        } else if profile.favorite_commands.get("filosofia").copied().unwrap_or(0) > 2 {
            profile.style_preference = Style::Intelectual;
        } else if profile.avg_message_length < SHORT_MESSAGE_THRESHOLD {
            profile.style_preference = Style::Pratico;
        }
        profile.last_updated = Utc::now();
    }

    /// Bump a command counter and nudge the style preference.
    pub fn track_command_usage(&mut self, user_id: &str, command: &str) {
        let profile = self.ensure_profile(user_id);
        let count = profile
            .favorite_commands
            .entry(command.to_string())
            .or_insert(0);
        *count += 1;
        let count = *count;

        match command {
            "filosofia" if count > 1 => profile.style_preference = Style::Intelectual,
            "minecraft" | "moderacao" => profile.style_preference = Style::Pratico,
            _ => {}
        }
        profile.last_updated = Utc::now();
    }

    /// Merge extracted entities into the profile's contextual data and flag
    /// implicit preferences for recognized interests.
    pub fn record_context_data(&mut self, user_id: &str, entities: &ExtractedEntities) {
        let profile = self.ensure_profile(user_id);

        merge_capped(&mut profile.contextual_data.names, &entities.names, MAX_NAMES);
        merge_capped(
            &mut profile.contextual_data.locations,
            &entities.locations,
            MAX_LOCATIONS,
        );
        merge_capped(
            &mut profile.contextual_data.interests,
            &entities.interests,
            MAX_INTERESTS,
        );

        for interest in &entities.interests {
            profile
                .implicit_preferences
                .insert(format!("interesse_{interest}"), true);
        }
        profile.last_updated = Utc::now();
    }

    /// Derive per-turn rendering hints. A very positive message pushes the
    /// style to `entusiasmado`, a very negative one to `cauteloso`; an
    /// explicit help intent asks for `direto`. Sentiment wins over intent.
    pub fn personalization_options(
        &mut self,
        user_id: &str,
        sentiment: SentimentCategory,
        intent: Intent,
    ) -> PersonalizationOptions {
        self.metrics.personalized_count += 1;
        let peak_hour = self.most_active_global_hour();
        let profile = self.ensure_profile(user_id);

        let mut style = profile.style_preference;
        if intent == Intent::Help {
            style = Style::Direto;
        }
        match sentiment {
            SentimentCategory::VeryPositive => style = Style::Entusiasmado,
            SentimentCategory::VeryNegative => style = Style::Cauteloso,
            _ => {}
        }

        let complexity = (profile.avg_message_length / 500.0).clamp(0.2, 0.8);

        PersonalizationOptions {
            style,
            complexity,
            peak_hour,
        }
    }

    /// Argmax over the 24-bucket global activity histogram.
    pub fn most_active_global_hour(&self) -> u32 {
        let mut best_hour = 0u32;
        let mut best_count = 0u64;
        for (hour, count) in self.global_activity.iter().enumerate() {
            if *count > best_count {
                best_count = *count;
                best_hour = hour as u32;
            }
        }
        best_hour
    }

    /// Feed one turn's response time into the store-level EMA.
    pub fn record_outcome(&mut self, response_time_ms: u64) {
        if response_time_ms == 0 {
            return;
        }
        let rt = response_time_ms as f64;
        self.metrics.samples += 1;
        self.metrics.avg_response_time_ms = if self.metrics.avg_response_time_ms == 0.0 {
            rt
        } else {
            self.metrics.avg_response_time_ms * 0.95 + rt * 0.05
        };
    }

    pub fn metrics(&self) -> ProfileMetrics {
        ProfileMetrics {
            personalized_count: self.metrics.personalized_count,
            avg_response_time_ms: self.metrics.avg_response_time_ms,
            samples: self.metrics.samples,
            cache_evictions: self.metrics.cache_evictions,
            profiles_count: self.profiles.len(),
        }
    }

    /// Persist a metrics snapshot to `personalization.json` in the data dir.
    pub fn flush_to_disk(&self, data_dir: &Path) -> bool {
        #[derive(Serialize)]
        struct Snapshot {
            metrics: ProfileMetrics,
            timestamp: DateTime<Utc>,
        }
        let snapshot = Snapshot {
            metrics: self.metrics(),
            timestamp: Utc::now(),
        };
        if let Err(e) = std::fs::create_dir_all(data_dir) {
            warn!("failed to create data dir: {e}");
            return false;
        }
        let path = data_dir.join("personalization.json");
        match serde_json::to_string_pretty(&snapshot)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&path, json).map_err(anyhow::Error::from))
        {
            Ok(()) => true,
            Err(e) => {
                warn!("failed to flush personalization snapshot: {e}");
                false
            }
        }
    }
}

fn merge_capped(target: &mut Vec<String>, additions: &[String], cap: usize) {
    for value in additions {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            continue;
        }
        if target.len() >= cap {
            break;
        }
        if !target.iter().any(|v| v == trimmed) {
            target.push(trimmed.to_string());
        }
    }
}

fn extract_timestamp_field(line: &str) -> Option<String> {
    let marker = "\"timestamp\":\"";
    let start = line.find(marker)? + marker.len();
    let rest = &line[start..];
    let end = rest.find('"')?;
    Some(rest[..end].replace(' ', "T"))
}
