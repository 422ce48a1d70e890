use crate::nlp::topics::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One remembered exchange: what the user said, what the bot answered,
/// and which topics the exchange touched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub response: String,
    pub topics: Vec<Topic>,
}

/// Per-user bounded ring of past interactions. Keyed by user id, capped
/// FIFO. Operations never fail; an unknown user yields empty defaults.
pub struct ConversationMemory {
    cap: usize,
    users: HashMap<String, Vec<MemoryEntry>>,
}

impl ConversationMemory {
    /// Create a memory store keeping at most `cap` entries per user.
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            users: HashMap::new(),
        }
    }

    /// Append an interaction and trim to the per-user cap (oldest first).
    pub fn remember(&mut self, user_id: &str, message: &str, response: &str, topics: Vec<Topic>) {
        let entries = self.users.entry(user_id.to_string()).or_default();
        entries.push(MemoryEntry {
            timestamp: Utc::now(),
            message: message.to_string(),
            response: response.to_string(),
            topics,
        });
        if entries.len() > self.cap {
            let drain_count = entries.len() - self.cap;
            entries.drain(..drain_count);
        }
    }

    /// The last `n` entries in chronological order.
    pub fn recent(&self, user_id: &str, n: usize) -> Vec<MemoryEntry> {
        match self.users.get(user_id) {
            Some(entries) => {
                let count = n.min(entries.len());
                entries[entries.len() - count..].to_vec()
            }
            None => Vec::new(),
        }
    }

    /// Topic frequency over the last 3 entries, sorted by descending
    /// frequency; ties keep first-occurrence order.
    pub fn current_topics(&self, user_id: &str) -> Vec<Topic> {
        let window = self.recent(user_id, 3);
        let mut order: Vec<Topic> = Vec::new();
        let mut freq: HashMap<Topic, usize> = HashMap::new();

        for entry in &window {
            for topic in &entry.topics {
                if !freq.contains_key(topic) {
                    order.push(*topic);
                }
                *freq.entry(*topic).or_insert(0) += 1;
            }
        }

        // Stable sort keeps insertion order among equal frequencies.
        order.sort_by(|a, b| freq[b].cmp(&freq[a]));
        order
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn entry_count(&self, user_id: &str) -> usize {
        self.users.get(user_id).map_or(0, |e| e.len())
    }
}

/// Whether a candidate reply is too close to any recent response:
/// word-set Jaccard overlap above 0.7.
pub fn is_repetitive(window: &[MemoryEntry], candidate: &str) -> bool {
    let candidate_norm = normalize_words(candidate);
    if candidate_norm.is_empty() {
        return false;
    }
    window.iter().any(|entry| {
        let response_norm = normalize_words(&entry.response);
        !response_norm.is_empty() && jaccard(&candidate_norm, &response_norm) > 0.7
    })
}

/// Whether the dominant topic changed between the last window and this
/// message.
pub fn detect_topic_shift(previous_topics: &[Topic], message: &str) -> bool {
    let now = crate::nlp::topics::extract_topics(message);
    match (previous_topics.first(), now.first()) {
        (Some(prev), Some(curr)) => prev != curr,
        _ => false,
    }
}

fn normalize_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.to_string())
        .collect()
}

fn jaccard(a: &[String], b: &[String]) -> f64 {
    use std::collections::HashSet;
    let sa: HashSet<&String> = a.iter().collect();
    let sb: HashSet<&String> = b.iter().collect();
    let inter = sa.intersection(&sb).count();
    let union = sa.union(&sb).count();
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::topics::Topic;

    #[test]
    fn empty_candidate_is_never_repetitive() {
        assert!(!is_repetitive(&[], ""));
    }

    #[test]
    fn identical_response_is_repetitive() {
        let mut memory = ConversationMemory::new(20);
        memory.remember("u1", "oi", "tudo bem por aqui", vec![]);
        let window = memory.recent("u1", 3);
        assert!(is_repetitive(&window, "tudo bem por aqui"));
        assert!(!is_repetitive(&window, "assunto completamente diferente agora"));
    }

    #[test]
    fn topic_shift_needs_both_sides() {
        assert!(!detect_topic_shift(&[], "minecraft lag"));
        assert!(detect_topic_shift(&[Topic::Xadrez], "o servidor de minecraft caiu"));
        assert!(!detect_topic_shift(&[Topic::Minecraft], "o servidor caiu"));
    }
}
