use crate::knowledge::patterns::PatternBank;
use crate::memory::{ConversationMemory, MemoryEntry};
use crate::nlp::intent::{IntentClassifier, IntentScore};
use crate::nlp::sentiment::{SentimentResult, analyze_sentiment};
use crate::nlp::topics::{Topic, extract_topics};
use crate::profile::{ProfileStore, UserProfile};
use rand::Rng;

const PATTERN_LIMIT: usize = 3;

/// Everything the response pipeline needs to know about one turn, assembled
/// up front so the generator stages stay pure over it.
#[derive(Debug, Clone)]
pub struct MessageContext {
    pub user_id: String,
    pub message: String,
    /// Snapshot of the sender's profile at the start of the turn.
    pub profile: UserProfile,
    /// The last few remembered exchanges, oldest first.
    pub window: Vec<MemoryEntry>,
    /// Topics in this message plus the dominant topics of the window.
    pub topics: Vec<Topic>,
    pub patterns: Vec<String>,
    pub sentiment: SentimentResult,
    pub intent: IntentScore,
}

impl MessageContext {
    /// Dominant topic for the turn: this message's first extracted topic,
    /// falling back to the window's most frequent one.
    pub fn dominant_topic(&self) -> Option<Topic> {
        self.topics.first().copied()
    }
}

/// Compose the per-turn context from the stores. Creates the sender's
/// profile if this is their first message. `window_size` is the number of
/// remembered exchanges to pull in (`memory.context_window` in the config).
pub fn build_context(
    user_id: &str,
    message: &str,
    window_size: usize,
    memory: &ConversationMemory,
    profiles: &mut ProfileStore,
    patterns: &PatternBank,
    classifier: &dyn IntentClassifier,
    rng: &mut impl Rng,
) -> MessageContext {
    let profile = profiles.ensure_profile(user_id).clone();
    let window = memory.recent(user_id, window_size);

    let mut topics = extract_topics(message);
    for topic in memory.current_topics(user_id) {
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }

    let thematic = patterns.thematic_patterns(&topics, PATTERN_LIMIT, rng);

    MessageContext {
        user_id: user_id.to_string(),
        message: message.to_string(),
        profile,
        window,
        topics,
        patterns: thematic,
        sentiment: analyze_sentiment(message),
        intent: classifier.classify(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::intent::{Intent, KeywordClassifier};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn temp_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("luana-ctx-{name}-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        dir
    }

    #[test]
    fn context_merges_message_and_window_topics() {
        let dir = temp_dir("merge");
        let mut memory = ConversationMemory::new(20);
        let mut profiles = ProfileStore::new(10, chrono::Duration::hours(24));
        let patterns = PatternBank::open(&dir);
        let classifier = KeywordClassifier::new();
        let mut rng = StdRng::seed_from_u64(7);

        memory.remember("u1", "meu servidor de minecraft caiu", "vou olhar", vec![Topic::Minecraft]);
        let ctx = build_context(
            "u1",
            "quem foi hegel?",
            3,
            &memory,
            &mut profiles,
            &patterns,
            &classifier,
            &mut rng,
        );

        assert_eq!(ctx.dominant_topic(), Some(Topic::Filosofia));
        assert!(ctx.topics.contains(&Topic::Minecraft));
        assert_eq!(ctx.intent.intent, Intent::Philosophy);
        assert_eq!(ctx.window.len(), 1);
    }

    #[test]
    fn unknown_user_gets_fresh_profile_and_empty_window() {
        let dir = temp_dir("fresh");
        let memory = ConversationMemory::new(20);
        let mut profiles = ProfileStore::new(10, chrono::Duration::hours(24));
        let patterns = PatternBank::open(&dir);
        let classifier = KeywordClassifier::new();
        let mut rng = StdRng::seed_from_u64(7);

        let ctx = build_context(
            "novo",
            "oi",
            3,
            &memory,
            &mut profiles,
            &patterns,
            &classifier,
            &mut rng,
        );

        assert!(ctx.window.is_empty());
        assert_eq!(ctx.profile.message_count, 0);
        assert_eq!(profiles.len(), 1);
    }

    #[test]
    fn window_size_limits_remembered_exchanges() {
        let dir = temp_dir("window");
        let mut memory = ConversationMemory::new(20);
        let mut profiles = ProfileStore::new(10, chrono::Duration::hours(24));
        let patterns = PatternBank::open(&dir);
        let classifier = KeywordClassifier::new();
        let mut rng = StdRng::seed_from_u64(7);

        for i in 0..4 {
            memory.remember("u1", &format!("mensagem {i}"), "ok", Vec::new());
        }

        let ctx = build_context(
            "u1",
            "oi",
            2,
            &memory,
            &mut profiles,
            &patterns,
            &classifier,
            &mut rng,
        );
        assert_eq!(ctx.window.len(), 2);
        assert_eq!(ctx.window[1].message, "mensagem 3");
    }
}
