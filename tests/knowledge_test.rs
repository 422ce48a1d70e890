use luana::knowledge::corrections::{CorrectionBank, CorrectionRule};
use luana::knowledge::expressions::ExpressionBank;
use luana::knowledge::patterns::PatternBank;
use luana::knowledge::problems::{Problem, ProblemBank, Solution};
use luana::knowledge::synonyms::SynonymBank;
use luana::nlp::topics::Topic;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

fn fresh_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("luana-knowledge-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn expressions_seed_defaults_and_round_trip_additions() {
    let dir = fresh_dir("expr");
    let mut bank = ExpressionBank::open(&dir);
    assert!(bank.category_len("greetings") >= 5);
    assert!(bank.category_len("error") >= 5);

    assert!(bank.add("greetings", "E aí, beleza?").unwrap());
    // Duplicates are rejected without error.
    assert!(!bank.add("greetings", "E aí, beleza?").unwrap());

    // A fresh handle sees the persisted addition.
    let reopened = ExpressionBank::open(&dir);
    assert!(reopened.contains("greetings", "E aí, beleza?"));
}

#[test]
fn expressions_unknown_category_falls_back_to_thinking() {
    let dir = fresh_dir("expr-fallback");
    let bank = ExpressionBank::open(&dir);
    let mut rng = StdRng::seed_from_u64(1);
    let picked = bank.pick("categoria_inexistente", &mut rng);
    assert!(!picked.is_empty());
}

#[test]
fn synonyms_round_trip_and_detect_usage() {
    let dir = fresh_dir("syn");
    let mut bank = SynonymBank::open(&dir);
    assert!(bank.synonyms_of("ajudar").is_some());

    assert!(bank.add("rápido", "veloz").unwrap());
    assert!(!bank.add("rápido", "veloz").unwrap());

    let reopened = SynonymBank::open(&dir);
    assert!(reopened.contains("rápido", "veloz"));
    assert!(reopened.mentions_synonym("ele foi veloz na resposta"));
    assert!(!reopened.mentions_synonym("nada para ver aqui"));
}

#[test]
fn problems_identify_by_keyword_score() {
    let dir = fresh_dir("prob");
    let bank = ProblemBank::open(&dir);

    // Two keyword hits reach the threshold.
    let hit = bank.identify_problem("o servidor está com lag e travando");
    assert_eq!(hit.map(|(key, _)| key), Some("lag_servidor"));

    // A single hit does not.
    assert!(bank.identify_problem("um lag qualquer").is_none());
}

#[test]
fn problems_prefer_automated_solutions() {
    let dir = fresh_dir("prob-auto");
    let bank = ProblemBank::open(&dir);
    let plan = bank
        .solve("não consigo conectar no servidor de minecraft, dá erro")
        .unwrap();
    assert!(plan.automated);
    assert!(plan.response.contains("**Problema identificado**"));
    assert!(plan.response.contains("**Passos para resolver**"));
}

#[test]
fn problems_round_trip_additions() {
    let dir = fresh_dir("prob-add");
    let mut bank = ProblemBank::open(&dir);
    let added = bank
        .add(
            "mundo_corrompido",
            Problem {
                description: "Mundo corrompido após crash".to_string(),
                keywords: vec!["mundo".into(), "corrompido".into(), "crash".into()],
                solutions: vec![Solution {
                    title: "Restaurar backup".to_string(),
                    steps: vec!["Localize o backup mais recente".into()],
                    automated: false,
                }],
            },
        )
        .unwrap();
    assert!(added);

    let reopened = ProblemBank::open(&dir);
    assert!(reopened.get("mundo_corrompido").is_some());
    let plan = reopened.solve("meu mundo ficou corrompido depois do crash");
    assert!(plan.is_some());
}

#[test]
fn patterns_are_limited_and_topic_scoped() {
    let dir = fresh_dir("pat");
    let bank = PatternBank::open(&dir);
    let mut rng = StdRng::seed_from_u64(2);

    let picked = bank.thematic_patterns(&[Topic::Minecraft], 2, &mut rng);
    assert!(picked.len() <= 2);
    assert!(!picked.is_empty());

    assert!(bank.thematic_patterns(&[], 3, &mut rng).is_empty());
}

#[test]
fn corrections_detect_and_fill_template() {
    let dir = fresh_dir("corr");
    let bank = CorrectionBank::open(&dir);
    let mut rng = StdRng::seed_from_u64(3);

    assert_eq!(
        bank.detect_error("essa informação errada me atrapalhou"),
        Some("informacao_incorreta")
    );
    assert_eq!(bank.detect_error("tudo certo por aqui"), None);

    let apology = bank
        .generate_correction("informacao_incorreta", Some("a porta é 25565"), &mut rng)
        .unwrap();
    assert!(apology.contains("a porta é 25565") || !apology.contains("{correction}"));
}

#[test]
fn corrections_round_trip_additions() {
    let dir = fresh_dir("corr-add");
    let mut bank = CorrectionBank::open(&dir);
    assert!(
        bank.add(
            "resposta_lenta",
            CorrectionRule {
                patterns: vec!["demorou demais".into()],
                responses: vec!["Desculpe a demora! {correction}".into()],
            },
        )
        .unwrap()
    );

    let reopened = CorrectionBank::open(&dir);
    assert_eq!(reopened.detect_error("isso demorou demais"), Some("resposta_lenta"));
}

#[test]
fn corrupt_state_file_falls_back_to_defaults() {
    let dir = fresh_dir("corrupt");
    std::fs::write(dir.join("expressions.json"), "{ not json").unwrap();
    let bank = ExpressionBank::open(&dir);
    assert!(bank.category_len("greetings") >= 5);
}
