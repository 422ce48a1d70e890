use crate::context::MessageContext;
use crate::knowledge::expressions::ExpressionBank;
use crate::nlp::intent::Intent;
use crate::nlp::sentiment::SentimentCategory;
use crate::nlp::topics::Topic;
use crate::types::GeneratedResponse;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Probability of prefixing the reply with the user's stored name.
pub const NAME_MENTION_P: f64 = 0.3;
/// Probability of referencing the last remembered exchange.
pub const HISTORY_REFERENCE_P: f64 = 0.2;
/// Probability of the "we've talked about something similar" callback.
pub const PATTERN_CALLBACK_P: f64 = 0.25;
/// Probability of mentioning a stored interest.
pub const CONTEXT_MENTION_P: f64 = 0.25;
/// Probability of mentioning the user's favorite command.
pub const FAVORITE_COMMAND_P: f64 = 0.2;
/// Probability of appending a steering question when off the dominant topic.
pub const STEERING_QUESTION_P: f64 = 0.3;
/// Probability of attaching a follow-up question.
pub const FOLLOW_UP_P: f64 = 0.4;

/// How many characters of the last remembered message the history
/// reference quotes.
const HISTORY_SNIPPET_CHARS: usize = 20;

/// Surface category of the user's message, mapped one-to-one onto
/// expression-bank categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Greetings,
    Farewells,
    Minecraft,
    Philosophy,
    Chess,
    Moderation,
    Thinking,
}

impl MessageType {
    pub fn category(&self) -> &'static str {
        match self {
            MessageType::Greetings => "greetings",
            MessageType::Farewells => "farewells",
            MessageType::Minecraft => "minecraft",
            MessageType::Philosophy => "philosophy",
            MessageType::Chess => "chess",
            MessageType::Moderation => "moderation",
            MessageType::Thinking => "thinking",
        }
    }

    /// Social niceties skip the topic-coherence guard; redirecting a "tchau"
    /// into a Minecraft pitch reads wrong.
    pub fn is_social(&self) -> bool {
        matches!(self, MessageType::Greetings | MessageType::Farewells)
    }
}

/// Keyword rules in priority order; anything unmatched is `Thinking`.
pub fn determine_message_type(text: &str) -> MessageType {
    let lower = text.to_lowercase();
    let any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if any(&["olá", "ola", "oi", "bom dia", "boa tarde", "boa noite", "e aí"]) {
        MessageType::Greetings
    } else if any(&["tchau", "adeus", "até logo", "até mais", "falou"]) {
        MessageType::Farewells
    } else if any(&["minecraft", "servidor", "seed", "craft"]) {
        MessageType::Minecraft
    } else if any(&["filosofia", "hegel", "kant", "pensamento"]) {
        MessageType::Philosophy
    } else if any(&["xadrez", "chess", "carlsen"]) {
        MessageType::Chess
    } else if any(&["moderação", "moderacao", "ban", "timeout", "limpar"]) {
        MessageType::Moderation
    } else {
        MessageType::Thinking
    }
}

const REDIRECTS: &[&str] = &[
    "Interessante! Mas me conta, como vão as coisas no servidor de Minecraft?",
    "Entendi. Aliás, que tal uma partida de xadrez qualquer hora?",
    "Hmm, isso me lembra algumas reflexões filosóficas. Quer conversar sobre filosofia?",
    "Certo! Se precisar de algo sobre moderação do servidor, é só falar.",
];

/// If neither the candidate nor the conversation context touches any core
/// topic, swap the candidate for a redirect back to the bot's subjects.
pub fn ensure_coherence(candidate: &str, topics: &[Topic], rng: &mut impl Rng) -> String {
    let lower = candidate.to_lowercase();
    let candidate_on_topic = [Topic::Minecraft, Topic::Moderacao, Topic::Xadrez, Topic::Filosofia]
        .iter()
        .any(|t| lower.contains(t.label()));
    let context_on_topic = topics.iter().any(Topic::is_core);

    if candidate_on_topic || context_on_topic {
        candidate.to_string()
    } else {
        REDIRECTS
            .choose(rng)
            .map(|s| s.to_string())
            .unwrap_or_else(|| candidate.to_string())
    }
}

/// If the candidate never names the dominant topic, sometimes append a
/// steering question bringing it back up.
pub fn ensure_relevance(candidate: &str, dominant: Option<Topic>, rng: &mut impl Rng) -> String {
    let Some(topic) = dominant else {
        return candidate.to_string();
    };
    if candidate.to_lowercase().contains(topic.label()) {
        return candidate.to_string();
    }
    if rng.random::<f64>() < STEERING_QUESTION_P {
        format!(
            "{candidate} Por falar nisso, o que você acha sobre {}?",
            topic.label()
        )
    } else {
        candidate.to_string()
    }
}

/// Pick a base template and layer the personalization touches on top.
pub fn generate(
    ctx: &MessageContext,
    expressions: &ExpressionBank,
    rng: &mut impl Rng,
) -> GeneratedResponse {
    let message_type = determine_message_type(&ctx.message);
    let mut response = expressions.pick(message_type.category(), rng);

    if rng.random::<f64>() < NAME_MENTION_P {
        if let Some(name) = ctx.profile.contextual_data.names.first() {
            response = format!("{name}, {}", lower_first(&response));
        }
    }

    if rng.random::<f64>() < HISTORY_REFERENCE_P {
        if let Some(last) = ctx.window.last() {
            let snippet: String = last.message.chars().take(HISTORY_SNIPPET_CHARS).collect();
            response = format!("Continuando nossa conversa sobre \"{snippet}...\", {response}");
        }
    }

    if rng.random::<f64>() < PATTERN_CALLBACK_P && !ctx.patterns.is_empty() {
        response.push_str(" Lembro que conversamos sobre algo similar anteriormente.");
    }

    if rng.random::<f64>() < CONTEXT_MENTION_P {
        if let Some(interest) = ctx.profile.contextual_data.interests.first() {
            response.push_str(&format!(" Sei que você curte {interest}, então isso deve te interessar."));
        }
    }

    if rng.random::<f64>() < FAVORITE_COMMAND_P {
        if let Some(cmd) = favorite_command(ctx) {
            response.push_str(&format!(" Vi que você usa bastante o comando {cmd}."));
        }
    }

    if !message_type.is_social() {
        response = ensure_coherence(&response, &ctx.topics, rng);
        response = ensure_relevance(&response, ctx.dominant_topic(), rng);
    }

    let follow_up = pick_follow_up(ctx, rng);

    GeneratedResponse { response, follow_up }
}

fn favorite_command(ctx: &MessageContext) -> Option<&str> {
    ctx.profile
        .favorite_commands
        .iter()
        .max_by_key(|(_, count)| **count)
        .map(|(cmd, _)| cmd.as_str())
}

/// Sentiment first, then intent, then topic; each path has one fixed
/// question. No match or a failed probability roll means no follow-up.
fn pick_follow_up(ctx: &MessageContext, rng: &mut impl Rng) -> Option<String> {
    if rng.random::<f64>() >= FOLLOW_UP_P {
        return None;
    }

    let question = match ctx.sentiment.category {
        SentimentCategory::VeryNegative | SentimentCategory::Negative => {
            Some("Posso ajudar em mais alguma coisa?")
        }
        SentimentCategory::VeryPositive => Some("Que bom! Quer explorar mais esse assunto?"),
        _ => None,
    }
    .or_else(|| match ctx.intent.intent {
        Intent::Help => Some("Consegue me dar mais detalhes do que está acontecendo?"),
        Intent::Minecraft => Some("Quer que eu verifique o status do servidor?"),
        Intent::Philosophy => Some("Qual pensador você mais gosta de ler?"),
        Intent::Chess => Some("Prefere partidas rápidas ou clássicas?"),
        _ => None,
    })
    .or_else(|| {
        ctx.dominant_topic().map(|topic| match topic {
            Topic::Minecraft => "Como está o seu mundo no Minecraft?",
            Topic::Moderacao => "Precisa de ajuda com alguma ação de moderação?",
            Topic::Xadrez => "Já estudou alguma abertura nova?",
            Topic::Filosofia => "Que tema filosófico tem te interessado?",
            Topic::Suporte => "O problema ainda está acontecendo?",
        })
    });

    question.map(str::to_string)
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

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn message_type_rules_fire_in_priority_order() {
        assert_eq!(determine_message_type("oi luana"), MessageType::Greetings);
        assert_eq!(determine_message_type("tchau!"), MessageType::Farewells);
        assert_eq!(
            determine_message_type("meu servidor caiu"),
            MessageType::Minecraft
        );
        assert_eq!(
            determine_message_type("qualquer outra coisa"),
            MessageType::Thinking
        );
    }

    #[test]
    fn coherence_keeps_on_topic_candidates() {
        let mut rng = StdRng::seed_from_u64(3);
        let kept = ensure_coherence("o servidor de minecraft está ok", &[], &mut rng);
        assert_eq!(kept, "o servidor de minecraft está ok");
    }

    #[test]
    fn coherence_redirects_off_topic_candidates() {
        let mut rng = StdRng::seed_from_u64(3);
        let redirected = ensure_coherence("falando de culinária", &[], &mut rng);
        assert!(REDIRECTS.contains(&redirected.as_str()));
    }

    #[test]
    fn coherence_respects_context_topics() {
        let mut rng = StdRng::seed_from_u64(3);
        let kept = ensure_coherence("falando de culinária", &[Topic::Xadrez], &mut rng);
        assert_eq!(kept, "falando de culinária");
    }

    #[test]
    fn relevance_leaves_matching_candidates_alone() {
        let mut rng = StdRng::seed_from_u64(3);
        let out = ensure_relevance("xadrez é ótimo", Some(Topic::Xadrez), &mut rng);
        assert_eq!(out, "xadrez é ótimo");
    }
}
