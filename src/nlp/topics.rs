use serde::{Deserialize, Serialize};

/// Coarse domain label derived from keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Minecraft,
    Moderacao,
    Xadrez,
    Filosofia,
    Suporte,
}

impl Topic {
    /// The pt-BR label used in persisted data and user-facing text.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Minecraft => "minecraft",
            Topic::Moderacao => "moderacao",
            Topic::Xadrez => "xadrez",
            Topic::Filosofia => "filosofia",
            Topic::Suporte => "suporte",
        }
    }

    /// The four topics the bot considers its conversational core.
    /// Suporte is a routing aid, not a subject of its own.
    pub fn is_core(&self) -> bool {
        !matches!(self, Topic::Suporte)
    }
}

/// Keyword dictionary, in declaration order. A topic fires when any of its
/// keywords appears as a substring of the lower-cased message.
const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (
        Topic::Minecraft,
        &["minecraft", "servidor", "seed", "lag", "fps"],
    ),
    (
        Topic::Moderacao,
        &["moderacao", "moderação", "timeout", "limpar", "ban"],
    ),
    (Topic::Xadrez, &["xadrez", "chess", "carlsen", "tabuleiro"]),
    (
        Topic::Filosofia,
        &["filosofia", "hegel", "kant", "intelectual"],
    ),
    (Topic::Suporte, &["ajuda", "erro", "bug", "falha"]),
];

/// Extract topics from free text. Multiple topics may fire; order follows
/// the dictionary. Empty input yields an empty set.
pub fn extract_topics(text: &str) -> Vec<Topic> {
    let lower = text.to_lowercase();
    TOPIC_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(topic, _)| *topic)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_topics() {
        assert!(extract_topics("").is_empty());
    }

    #[test]
    fn multiple_topics_fire_in_dictionary_order() {
        let topics = extract_topics("o xadrez no servidor está com lag");
        assert_eq!(topics, vec![Topic::Minecraft, Topic::Xadrez]);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(extract_topics("MINECRAFT!"), vec![Topic::Minecraft]);
    }
}
