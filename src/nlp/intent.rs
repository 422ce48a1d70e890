use serde::{Deserialize, Serialize};

/// Canonical conversational-purpose label for one message.
///
/// Earlier iterations of the bot carried two overlapping vocabularies, one
/// for the conversation path and one for the automation path. This enum is
/// the single reconciliation; [`Intent::automation_label`] provides the
/// pt-BR name the automation router and persisted data use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Farewell,
    Help,
    Minecraft,
    Philosophy,
    Moderation,
    Chess,
    Programming,
    Debugging,
    Api,
    Database,
    Cloud,
    Error,
    Unknown,
}

impl Intent {
    pub fn automation_label(&self) -> &'static str {
        match self {
            Intent::Greeting => "saudacao",
            Intent::Farewell => "despedida",
            Intent::Help => "ajuda",
            Intent::Minecraft => "minecraft",
            Intent::Philosophy => "filosofia",
            Intent::Moderation => "moderacao",
            Intent::Chess => "xadrez",
            Intent::Programming => "programacao",
            Intent::Debugging => "depuracao",
            Intent::Api => "api",
            Intent::Database => "banco_de_dados",
            Intent::Cloud => "nuvem",
            Intent::Error => "erro",
            Intent::Unknown => "desconhecido",
        }
    }
}

/// A classified intent with its keyword-hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentScore {
    pub intent: Intent,
    pub score: u32,
}

/// Strategy seam for intent classification. The shipped implementation is
/// keyword-based; a model-backed classifier can be substituted without
/// touching callers.
pub trait IntentClassifier {
    fn classify(&self, text: &str) -> IntentScore;
}

/// Keyword table in declaration order. Declaration order is the tie-break:
/// when two intents score the same hit count, the earlier one wins.
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["olá", "ola", "oi", "bom dia", "hey", "e aí"],
    ),
    (
        Intent::Farewell,
        &["tchau", "adeus", "até logo", "até mais"],
    ),
    (Intent::Help, &["ajuda", "socorro", "help", "problema"]),
    (
        Intent::Minecraft,
        &["minecraft", "servidor", "seed", "craft", "lag", "fps"],
    ),
    (
        Intent::Philosophy,
        &["filosofia", "hegel", "kant", "intelectual", "pensamento"],
    ),
    (
        Intent::Moderation,
        &["moderação", "moderacao", "moderar", "ban", "timeout", "limpar", "regras"],
    ),
    (
        Intent::Chess,
        &["xadrez", "chess", "carlsen", "tabuleiro", "estratégia"],
    ),
    (
        Intent::Programming,
        &["programação", "código", "desenvolvimento"],
    ),
    (
        Intent::Debugging,
        &["depurar", "erro", "bug", "falha", "quebrou"],
    ),
    (Intent::Api, &["api", "interface de programação"]),
    (Intent::Database, &["banco de dados", "sql", "nosql"]),
    (
        Intent::Cloud,
        &["nuvem", "cloud", "aws", "azure", "gcp"],
    ),
];

/// Keyword-hit scorer over the full intent table.
///
/// Deterministic: a fixed input always yields the same label. With no
/// keyword match the result is `Unknown` at score 0, except that a message
/// ending in `?` falls back to `Help` at score 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> IntentScore {
        let lower = text.to_lowercase();
        let mut best = IntentScore {
            intent: Intent::Unknown,
            score: 0,
        };

        for (intent, words) in INTENT_KEYWORDS {
            let hits = words.iter().filter(|w| lower.contains(*w)).count() as u32;
            // Strict comparison keeps the first-declared intent on ties.
            if hits > best.score {
                best = IntentScore {
                    intent: *intent,
                    score: hits,
                };
            }
        }

        if best.score == 0 && lower.trim_end().ends_with('?') {
            best = IntentScore {
                intent: Intent::Help,
                score: 1,
            };
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_match_yields_unknown_at_zero() {
        let result = KeywordClassifier::new().classify("blablabla");
        assert_eq!(result.intent, Intent::Unknown);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn bare_question_falls_back_to_help() {
        let result = KeywordClassifier::new().classify("isso funciona mesmo?");
        assert_eq!(result.intent, Intent::Help);
        assert_eq!(result.score, 1);
    }

    #[test]
    fn higher_hit_count_wins() {
        // One greeting keyword vs three minecraft hits ("minecraft" also
        // contains "craft").
        let result = KeywordClassifier::new().classify("olá, o servidor de minecraft caiu");
        assert_eq!(result.intent, Intent::Minecraft);
        assert_eq!(result.score, 3);
    }
}
