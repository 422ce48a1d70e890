use luana::nlp::entities::extract_entities;
use luana::nlp::intent::{Intent, IntentClassifier, KeywordClassifier};
use luana::nlp::sentiment::{SentimentCategory, analyze_sentiment};
use luana::nlp::topics::{Topic, extract_topics};

#[test]
fn topics_fire_on_keywords_case_insensitive() {
    assert_eq!(extract_topics("MINECRAFT é ótimo"), vec![Topic::Minecraft]);
    assert_eq!(
        extract_topics("o lag no tabuleiro"),
        vec![Topic::Minecraft, Topic::Xadrez]
    );
    assert!(extract_topics("nada relacionado").is_empty());
}

#[test]
fn intent_ties_break_by_declaration_order() {
    let classifier = KeywordClassifier::new();
    // "ajuda" scores Help, "erro" scores Debugging and the Suporte topic;
    // one hit each, Help is declared first.
    let scored = classifier.classify("ajuda com um erro");
    assert_eq!(scored.intent, Intent::Help);
}

#[test]
fn best_keyword_count_wins() {
    let classifier = KeywordClassifier::new();
    let scored = classifier.classify("lag no servidor de minecraft");
    assert_eq!(scored.intent, Intent::Minecraft);
    assert!(scored.score >= 3);
}

#[test]
fn question_without_keywords_falls_back_to_help() {
    let classifier = KeywordClassifier::new();
    let scored = classifier.classify("o que você faz aos domingos?");
    assert_eq!(scored.intent, Intent::Help);
    assert_eq!(scored.score, 1);

    let scored = classifier.classify("nada de especial");
    assert_eq!(scored.intent, Intent::Unknown);
    assert_eq!(scored.score, 0);
}

#[test]
fn sentiment_buckets_and_normalization() {
    let result = analyze_sentiment("isso é excelente e maravilhoso");
    assert!(result.raw_score > 0);
    assert!(result.normalized > 0.6);
    assert_eq!(result.category, SentimentCategory::VeryPositive);
    assert!(!result.positive.is_empty());

    let result = analyze_sentiment("que coisa péssima e horrível");
    assert_eq!(result.category, SentimentCategory::VeryNegative);
    assert!(!result.negative.is_empty());

    let result = analyze_sentiment("a reunião é amanhã");
    assert_eq!(result.category, SentimentCategory::Neutral);
    assert_eq!(result.raw_score, 0);
}

#[test]
fn normalized_score_is_clamped() {
    let result = analyze_sentiment("ótimo excelente maravilhoso fantástico incrível perfeito");
    assert!(result.normalized <= 1.0);
}

#[test]
fn entities_capture_names_and_skip_stoplist() {
    let entities = extract_entities("Oi, meu nome é Pedro Alves e moro em Curitiba");
    assert!(entities.names.iter().any(|n| n == "Pedro Alves"));
    assert!(!entities.names.iter().any(|n| n == "Oi"));
    assert!(entities.locations.iter().any(|l| l == "curitiba"));
}

#[test]
fn entities_capture_interests_from_topics() {
    let entities = extract_entities("adoro xadrez e filosofia");
    assert!(entities.interests.iter().any(|i| i == "xadrez"));
    assert!(entities.interests.iter().any(|i| i == "filosofia"));
}
