use serde::{Deserialize, Serialize};

/// Five-bucket sentiment category, at thresholds ±0.2 and ±0.6 on the
/// normalized score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SentimentCategory::VeryNegative => "very negative",
            SentimentCategory::Negative => "negative",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Positive => "positive",
            SentimentCategory::VeryPositive => "very positive",
        }
    }
}

/// Result of scoring one message against the lexicon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Sum of lexicon weights for matched tokens.
    pub raw_score: i32,
    /// Raw score divided by token count (length-normalized).
    pub comparative: f64,
    /// Raw score divided by [`NORMALIZATION_DIVISOR`], clamped to [-1, 1].
    pub normalized: f64,
    pub category: SentimentCategory,
    /// Tokens that contributed positively.
    pub positive: Vec<String>,
    /// Tokens that contributed negatively.
    pub negative: Vec<String>,
}

impl SentimentResult {
    pub fn neutral() -> Self {
        Self {
            raw_score: 0,
            comparative: 0.0,
            normalized: 0.0,
            category: SentimentCategory::Neutral,
            positive: Vec::new(),
            negative: Vec::new(),
        }
    }
}

/// Divisor mapping the raw integer score onto [-1, 1] before clamping.
pub const NORMALIZATION_DIVISOR: f64 = 5.0;

/// pt-BR sentiment lexicon, AFINN-style integer weights in [-5, 5].
const LEXICON: &[(&str, i32)] = &[
    // Positive
    ("bom", 2),
    ("boa", 2),
    ("ótimo", 4),
    ("otimo", 4),
    ("ótima", 4),
    ("excelente", 4),
    ("maravilhoso", 4),
    ("maravilhosa", 4),
    ("incrível", 4),
    ("incrivel", 4),
    ("fantástico", 4),
    ("fantastico", 4),
    ("legal", 2),
    ("adorei", 3),
    ("amei", 3),
    ("gostei", 2),
    ("gosto", 2),
    ("feliz", 3),
    ("alegre", 2),
    ("obrigado", 2),
    ("obrigada", 2),
    ("valeu", 2),
    ("perfeito", 4),
    ("perfeita", 4),
    ("funciona", 1),
    ("funcionou", 2),
    ("consegui", 2),
    ("sucesso", 3),
    ("top", 3),
    ("show", 3),
    ("parabéns", 3),
    ("parabens", 3),
    // Negative
    ("ruim", -2),
    ("péssimo", -4),
    ("pessimo", -4),
    ("péssima", -4),
    ("horrível", -4),
    ("horrivel", -4),
    ("terrível", -4),
    ("terrivel", -4),
    ("odeio", -3),
    ("odiei", -3),
    ("triste", -2),
    ("chato", -2),
    ("chata", -2),
    ("raiva", -3),
    ("problema", -1),
    ("problemas", -1),
    ("erro", -2),
    ("erros", -2),
    ("bug", -2),
    ("falha", -2),
    ("falhou", -2),
    ("quebrou", -2),
    ("quebrado", -2),
    ("lento", -1),
    ("travando", -2),
    ("travou", -2),
    ("difícil", -1),
    ("dificil", -1),
    ("impossível", -3),
    ("impossivel", -3),
    ("cansado", -2),
    ("frustrado", -3),
    ("frustrante", -3),
];

fn lookup(token: &str) -> Option<i32> {
    LEXICON
        .iter()
        .find(|(word, _)| *word == token)
        .map(|(_, weight)| *weight)
}

/// Lexicon-score a message. A text with zero lexicon hits yields category
/// `Neutral` and score 0 across the board.
pub fn analyze_sentiment(text: &str) -> SentimentResult {
    let tokens: Vec<String> = text
        .to_lowercase()
        .split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.is_empty() {
        return SentimentResult::neutral();
    }

    let mut raw_score = 0i32;
    let mut positive = Vec::new();
    let mut negative = Vec::new();

    for token in &tokens {
        if let Some(weight) = lookup(token) {
            raw_score += weight;
            if weight > 0 {
                positive.push(token.clone());
            } else {
                negative.push(token.clone());
            }
        }
    }

    let comparative = f64::from(raw_score) / tokens.len() as f64;
    let normalized = (f64::from(raw_score) / NORMALIZATION_DIVISOR).clamp(-1.0, 1.0);

    let category = if normalized > 0.6 {
        SentimentCategory::VeryPositive
    } else if normalized > 0.2 {
        SentimentCategory::Positive
    } else if normalized < -0.6 {
        SentimentCategory::VeryNegative
    } else if normalized < -0.2 {
        SentimentCategory::Negative
    } else {
        SentimentCategory::Neutral
    };

    SentimentResult {
        raw_score,
        comparative,
        normalized,
        category,
        positive,
        negative,
    }
}
