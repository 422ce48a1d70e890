use super::topics::extract_topics;
use serde::{Deserialize, Serialize};

/// Heuristically extracted mentions from one message: people, places and
/// interests. Pure function of the text, no state.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub names: Vec<String>,
    pub locations: Vec<String>,
    pub interests: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.locations.is_empty() && self.interests.is_empty()
    }
}

const MAX_NAMES: usize = 5;
const MAX_LOCATIONS: usize = 5;
const MAX_INTERESTS: usize = 10;

/// Sentence-start and brand words that look like names but are not.
const NAME_STOPLIST: &[&str] = &["olá", "oi", "bom", "boa", "luana", "discord", "minecraft"];

const KNOWN_LOCATIONS: &[&str] = &[
    "são paulo",
    "rio de janeiro",
    "lisboa",
    "porto",
    "curitiba",
    "bh",
    "belo horizonte",
    "fortaleza",
];

pub fn extract_entities(text: &str) -> ExtractedEntities {
    ExtractedEntities {
        names: extract_names(text),
        locations: extract_locations(text),
        interests: extract_interests(text),
    }
}

/// Capitalized-word sequences of up to 3 words, minus the stoplist.
pub fn extract_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    let flush = |run: &mut Vec<&str>, names: &mut Vec<String>| {
        if !run.is_empty() {
            if run.len() <= 3 {
                push_unique(names, run.join(" "));
            }
            run.clear();
        }
    };

    for word in text.split(|c: char| c.is_whitespace() || ",.;:!?()\"".contains(c)) {
        if word.is_empty() {
            flush(&mut run, &mut names);
            continue;
        }
        let stoplisted = NAME_STOPLIST.contains(&word.to_lowercase().as_str());
        if is_capitalized_word(word) && !stoplisted {
            run.push(word);
        } else {
            flush(&mut run, &mut names);
        }
    }
    flush(&mut run, &mut names);

    names.truncate(MAX_NAMES);
    names
}

fn is_capitalized_word(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase()),
        _ => false,
    }
}

/// Fixed gazetteer substring match plus the generic cues `cidade` and
/// `servidor`.
pub fn extract_locations(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut hits: Vec<String> = Vec::new();

    for known in KNOWN_LOCATIONS {
        if lower.contains(known) {
            push_unique(&mut hits, (*known).to_string());
        }
    }
    for cue in ["cidade", "servidor"] {
        if contains_word(&lower, cue) {
            push_unique(&mut hits, cue.to_string());
        }
    }

    hits.truncate(MAX_LOCATIONS);
    hits
}

/// Topic labels unioned with a few hard-coded keyword checks.
pub fn extract_interests(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut interests: Vec<String> = Vec::new();

    for topic in extract_topics(text) {
        push_unique(&mut interests, topic.label().to_string());
    }
    if lower.contains("xadrez") || lower.contains("chess") {
        push_unique(&mut interests, "xadrez".to_string());
    }
    if lower.contains("filosofia") || lower.contains("hegel") || lower.contains("kant") {
        push_unique(&mut interests, "filosofia".to_string());
    }
    if lower.contains("moderação") || lower.contains("moderacao") {
        push_unique(&mut interests, "moderacao".to_string());
    }

    interests.truncate(MAX_INTERESTS);
    interests
}

fn push_unique(list: &mut Vec<String>, value: String) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !list.iter().any(|v| v == trimmed) {
        list.push(trimmed.to_string());
    }
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let after_ok = haystack[start + word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stoplist_words_are_not_names() {
        let names = extract_names("Olá Pedro, tudo bem?");
        assert_eq!(names, vec!["Pedro"]);
    }

    #[test]
    fn multi_word_names_are_joined() {
        let names = extract_names("falei com Maria Clara ontem");
        assert_eq!(names, vec!["Maria Clara"]);
    }

    #[test]
    fn location_cue_requires_whole_word() {
        // "cidadela" must not trigger the "cidade" cue.
        assert!(extract_locations("a cidadela caiu").is_empty());
        assert_eq!(extract_locations("minha cidade é grande"), vec!["cidade"]);
    }

    #[test]
    fn interests_union_topics_and_keywords() {
        let interests = extract_interests("gosto de xadrez e de hegel");
        assert!(interests.contains(&"xadrez".to_string()));
        assert!(interests.contains(&"filosofia".to_string()));
    }
}
