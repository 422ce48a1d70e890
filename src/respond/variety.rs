use super::words::{contains_whole_word, replace_whole_word};
use crate::knowledge::synonyms::SynonymBank;
use crate::nlp::intent::Intent;
use crate::nlp::sentiment::SentimentCategory;
use crate::profile::Style;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Upper bound on the per-word synonym substitution probability.
pub const SUBSTITUTION_CAP: f64 = 0.8;
/// Probability that a sentence gets structurally restructured.
pub const STRUCTURE_VARIATION_P: f64 = 0.3;
/// Probability of a sentiment-matched emoji.
pub const EMOJI_P: f64 = 0.4;
/// Probability of an intent-matched interjection prefix.
pub const INTERJECTION_P: f64 = 0.3;

/// Swap known words for random synonyms. The per-word probability is the
/// user's complexity score, capped at [`SUBSTITUTION_CAP`]. Text without
/// dictionary hits comes back unchanged.
pub fn enrich_text(
    text: &str,
    complexity: f64,
    synonyms: &SynonymBank,
    rng: &mut impl Rng,
) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }
    let p = complexity.min(SUBSTITUTION_CAP);
    let mut out = text.to_string();

    let words: Vec<String> = synonyms.words().map(str::to_string).collect();
    for word in words {
        if !contains_whole_word(&out, &word) {
            continue;
        }
        if rng.random::<f64>() >= p {
            continue;
        }
        if let Some(options) = synonyms.synonyms_of(&word) {
            if let Some(choice) = options.choose(rng) {
                out = replace_whole_word(&out, &word, choice);
            }
        }
    }
    out
}

/// Append a trailing question mark unless one is already there.
pub fn question_form(text: &str) -> String {
    let trimmed = text.trim_end();
    if trimmed.ends_with('?') {
        trimmed.to_string()
    } else {
        format!("{}?", trimmed.trim_end_matches(['.', '!']))
    }
}

/// Restructure a sentence with probability [`STRUCTURE_VARIATION_P`]. The
/// rewrite is lossy best-effort per surface shape; anything that does not
/// fit a shape comes back unchanged.
pub fn vary_structure(text: &str, rng: &mut impl Rng) -> String {
    if rng.random::<f64>() >= STRUCTURE_VARIATION_P {
        return text.to_string();
    }

    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        // pergunta: turn into an invitation to think together.
        let body = trimmed.trim_end_matches('?');
        return format!("Vamos pensar juntos: {body}.");
    }

    let lower = trimmed.to_lowercase();
    if lower.starts_with("sugiro") || lower.starts_with("recomendo") || lower.starts_with("que tal")
    {
        // sugestao: soften into a question.
        return question_form(&format!("O que você acha disso: {trimmed}"));
    }

    // afirmativa simples: lead with a connective.
    format!("Na verdade, {}", lower_first(trimmed))
}

/// Emoji, interjection and canned-joke layer. `user_message` is what the
/// user wrote this turn; a literal "piada" request always gets the joke.
pub fn add_creative_flair(
    text: &str,
    user_message: &str,
    sentiment: SentimentCategory,
    intent: Intent,
    rng: &mut impl Rng,
) -> String {
    let mut out = text.to_string();

    if rng.random::<f64>() < EMOJI_P {
        if let Some(emoji) = sentiment_emoji(sentiment) {
            out.push(' ');
            out.push_str(emoji);
        }
    }

    if rng.random::<f64>() < INTERJECTION_P {
        if let Some(interjection) = intent_interjection(intent) {
            out = format!("{interjection} {out}");
        }
    }

    if user_message.to_lowercase().contains("piada") {
        out.push_str(
            " Aliás: por que o livro de matemática ficou triste? Porque tinha muitos problemas!",
        );
    }

    out
}

fn sentiment_emoji(sentiment: SentimentCategory) -> Option<&'static str> {
    match sentiment {
        SentimentCategory::VeryPositive => Some("😄"),
        SentimentCategory::Positive => Some("🙂"),
        SentimentCategory::Neutral => None,
        SentimentCategory::Negative => Some("😕"),
        SentimentCategory::VeryNegative => Some("😔"),
    }
}

fn intent_interjection(intent: Intent) -> Option<&'static str> {
    match intent {
        Intent::Greeting => Some("Opa!"),
        Intent::Minecraft => Some("Boa!"),
        Intent::Philosophy => Some("Hmm,"),
        Intent::Help | Intent::Error | Intent::Debugging => Some("Calma,"),
        _ => None,
    }
}

const TRANSITIONS: &[&str] = &[
    "Além disso,",
    "Por outro lado,",
    "Nesse sentido,",
    "A propósito,",
    "Falando nisso,",
    "De qualquer forma,",
    "Enfim,",
    "Pensando bem,",
    "Aliás,",
    "Em todo caso,",
];

/// One of the fixed transition phrases, uniformly at random.
pub fn transitional_phrase(rng: &mut impl Rng) -> &'static str {
    TRANSITIONS.choose(rng).copied().unwrap_or(TRANSITIONS[0])
}

/// Synthetic typing delay: 500ms base, plus up to 1s for complexity, plus
/// up to 300ms for length.
pub fn compute_delay_ms(complexity: f64, response_len: usize) -> u64 {
    let complexity_part = (complexity * 1000.0).min(1000.0);
    let length_part = (response_len as f64 / 200.0 * 300.0).min(300.0);
    500 + complexity_part as u64 + length_part as u64
}

/// The fixed operator set for formulations. Each formulation applies one
/// to three distinct operators in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transform {
    Identity,
    Punctuate,
    Soften,
    Question,
    Register,
    FillerPrefix,
    ColloquialPunct,
    SoftenFiller,
    Emphasis,
    Rephrase,
}

const TRANSFORMS: &[Transform] = &[
    Transform::Identity,
    Transform::Punctuate,
    Transform::Soften,
    Transform::Question,
    Transform::Register,
    Transform::FillerPrefix,
    Transform::ColloquialPunct,
    Transform::SoftenFiller,
    Transform::Emphasis,
    Transform::Rephrase,
];

/// Produce `count` alternative phrasings of `base`, each via 1-3 distinct
/// random transforms.
pub fn generate_formulations(
    base: &str,
    style: Style,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<String> {
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let how_many = rng.random_range(1..=3);
        let mut picked: Vec<Transform> = Vec::with_capacity(how_many);
        while picked.len() < how_many {
            if let Some(t) = TRANSFORMS.choose(rng) {
                if !picked.contains(t) {
                    picked.push(*t);
                }
            }
        }
        let mut text = base.to_string();
        for t in picked {
            text = apply_transform(&text, t, style, rng);
        }
        out.push(text);
    }
    out
}

fn apply_transform(text: &str, t: Transform, style: Style, rng: &mut impl Rng) -> String {
    match t {
        Transform::Identity => text.to_string(),
        Transform::Punctuate => {
            let trimmed = text.trim_end_matches(['.', '!', '?']);
            format!("{trimmed}!")
        }
        Transform::Soften => format!("Talvez {}", lower_first(text)),
        Transform::Question => question_form(text),
        Transform::Register => match style {
            Style::Intelectual => format!("Do ponto de vista conceitual, {}", lower_first(text)),
            Style::Casual | Style::Entusiasmado => format!("Olha só, {}", lower_first(text)),
            Style::Pratico | Style::Direto | Style::Cauteloso => {
                format!("Direto ao ponto: {}", lower_first(text))
            }
        },
        Transform::FillerPrefix => format!("Bem, {}", lower_first(text)),
        Transform::ColloquialPunct => {
            let trimmed = text.trim_end_matches(['.', '!', '?']);
            format!("Então, {}...", lower_first(trimmed))
        }
        Transform::SoftenFiller => format!("Bem, talvez {}", lower_first(text)),
        Transform::Emphasis => format!("{} {}", transitional_phrase(rng), lower_first(text)),
        Transform::Rephrase => format!("Colocando de outra forma: {}", lower_first(text)),
    }
}

fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(text.len());
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}
