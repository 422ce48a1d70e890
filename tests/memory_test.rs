use luana::memory::{ConversationMemory, detect_topic_shift, is_repetitive};
use luana::nlp::topics::Topic;

#[test]
fn memory_caps_per_user_history() {
    let mut memory = ConversationMemory::new(20);
    for i in 0..25 {
        memory.remember("u1", &format!("mensagem {i}"), "resposta", vec![]);
    }
    assert_eq!(memory.entry_count("u1"), 20);

    // Oldest entries were dropped.
    let recent = memory.recent("u1", 20);
    assert_eq!(recent.first().map(|e| e.message.as_str()), Some("mensagem 5"));
    assert_eq!(recent.last().map(|e| e.message.as_str()), Some("mensagem 24"));
}

#[test]
fn recent_returns_chronological_window() {
    let mut memory = ConversationMemory::new(20);
    memory.remember("u1", "primeira", "r1", vec![]);
    memory.remember("u1", "segunda", "r2", vec![]);
    memory.remember("u1", "terceira", "r3", vec![]);

    let window = memory.recent("u1", 2);
    assert_eq!(window.len(), 2);
    assert_eq!(window[0].message, "segunda");
    assert_eq!(window[1].message, "terceira");
}

#[test]
fn users_do_not_share_memory() {
    let mut memory = ConversationMemory::new(20);
    memory.remember("u1", "oi", "olá", vec![]);
    assert_eq!(memory.entry_count("u2"), 0);
    assert!(memory.recent("u2", 3).is_empty());
    assert_eq!(memory.user_count(), 1);
}

#[test]
fn current_topics_ranks_by_frequency() {
    let mut memory = ConversationMemory::new(20);
    memory.remember("u1", "m", "r", vec![Topic::Xadrez]);
    memory.remember("u1", "m", "r", vec![Topic::Minecraft, Topic::Xadrez]);
    memory.remember("u1", "m", "r", vec![Topic::Xadrez]);

    let topics = memory.current_topics("u1");
    assert_eq!(topics.first(), Some(&Topic::Xadrez));
    assert!(topics.contains(&Topic::Minecraft));
}

#[test]
fn repetition_uses_word_overlap_not_exact_match() {
    let mut memory = ConversationMemory::new(20);
    memory.remember("u1", "m", "o servidor de minecraft está online agora", vec![]);
    let window = memory.recent("u1", 3);

    assert!(is_repetitive(&window, "o servidor de minecraft está online agora"));
    assert!(is_repetitive(&window, "agora o servidor de minecraft está online"));
    assert!(!is_repetitive(&window, "vamos falar de filosofia hoje"));
}

#[test]
fn topic_shift_requires_dominant_topics_on_both_sides() {
    assert!(detect_topic_shift(
        &[Topic::Minecraft],
        "quero falar de xadrez agora"
    ));
    assert!(!detect_topic_shift(
        &[Topic::Minecraft],
        "o servidor de minecraft caiu"
    ));
    // No previous topics: nothing to shift from.
    assert!(!detect_topic_shift(&[], "quero falar de xadrez"));
    // Message without topics: nothing to shift to.
    assert!(!detect_topic_shift(&[Topic::Minecraft], "tudo bem?"));
}
