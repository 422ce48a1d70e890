use crate::channel::Channel;
use crate::nlp::topics::Topic;
use crate::respond::variety::question_form;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::warn;

/// Minimum keyword-overlap score for an FAQ rule to fire. Effectively
/// "every keyword present"; tunable via the automation tuning file.
pub const FAQ_CONFIDENCE_THRESHOLD: f64 = 0.95;

/// Messages shorter than this with no recognizable topic get an
/// information-gathering question instead of a guess.
const COLETA_INFO_MAX_CHARS: usize = 15;

pub struct FaqEntry {
    pub key: &'static str,
    keywords: &'static [&'static str],
    replies: &'static [&'static str],
}

/// Built-in FAQ table. Overlap score = keyword hits / keyword count.
const FAQ_TABLE: &[FaqEntry] = &[
    FaqEntry {
        key: "minecraft-servidor",
        keywords: &["como", "monta", "servidor", "minecraft"],
        replies: &[
            "Para montar um servidor de Minecraft: baixe o server.jar oficial, ajuste o server.properties e abra a porta 25565 no roteador.",
            "Montar servidor de Minecraft é tranquilo: Java atualizado, server.jar, 2GB+ de RAM e porta 25565 liberada.",
            "Você precisa do server.jar, Java instalado e a porta 25565 aberta. Depois é só configurar o server.properties.",
        ],
    },
    FaqEntry {
        key: "comandos",
        keywords: &["quais", "comandos", "disponíveis"],
        replies: &[
            "Os comandos disponíveis são: !minecraft, !moderacao, !xadrez e !filosofia.",
            "Você pode usar !minecraft, !moderacao, !xadrez e !filosofia. Cada um abre um assunto diferente.",
            "Temos !minecraft para o servidor, !moderacao para regras, !xadrez para partidas e !filosofia para reflexões.",
        ],
    },
    FaqEntry {
        key: "xadrez-dicas",
        keywords: &["dicas", "melhorar", "xadrez"],
        replies: &[
            "Para melhorar no xadrez: estude táticas diariamente, analise suas partidas e aprenda finais básicos.",
            "Minhas dicas de xadrez: controle o centro, desenvolva as peças antes de atacar e não mova a mesma peça duas vezes na abertura.",
            "Resolva exercícios de tática todo dia e revise suas derrotas. É o caminho mais rápido para melhorar no xadrez.",
        ],
    },
];

/// One fired automation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Faq { key: String, reply: String, confidence: f64 },
    PedidoPadrao,
    Roteamento { target: String },
    ColetaInfo { question: String },
    Confirmacao,
}

impl Trigger {
    pub fn label(&self) -> &'static str {
        match self {
            Trigger::Faq { .. } => "faq",
            Trigger::PedidoPadrao => "pedido_padrao",
            Trigger::Roteamento { .. } => "roteamento",
            Trigger::ColetaInfo { .. } => "coleta_info",
            Trigger::Confirmacao => "confirmacao",
        }
    }
}

/// Evaluate every rule against the message and return all that fired, in
/// rule order. Rules are independent; several can fire on one message.
pub fn evaluate_triggers(
    content: &str,
    topics: &[Topic],
    faq_threshold: f64,
    rng: &mut impl Rng,
) -> Vec<Trigger> {
    let lower = content.to_lowercase();
    let mut fired = Vec::new();

    for entry in FAQ_TABLE {
        let hits = entry.keywords.iter().filter(|k| lower.contains(*k)).count();
        let confidence = hits as f64 / entry.keywords.len() as f64;
        if confidence >= faq_threshold {
            if let Some(reply) = entry.replies.choose(rng) {
                fired.push(Trigger::Faq {
                    key: entry.key.to_string(),
                    reply: reply.to_string(),
                    confidence,
                });
            }
        }
    }

    if lower.contains("pedido") {
        fired.push(Trigger::PedidoPadrao);
    }

    if topics.contains(&Topic::Moderacao) {
        fired.push(Trigger::Roteamento {
            target: "moderacao".to_string(),
        });
    }

    if content.chars().count() < COLETA_INFO_MAX_CHARS && topics.is_empty() {
        fired.push(Trigger::ColetaInfo {
            question: question_form("Poderia me dar mais detalhes"),
        });
    }

    if lower.contains("confirma") {
        fired.push(Trigger::Confirmacao);
    }

    fired
}

/// Execute each trigger's canned side effect through the channel, in
/// order. A failed send is logged and skipped; the rest still run.
/// Returns the labels of the triggers that completed.
pub async fn run_automations(
    triggers: &[Trigger],
    channel: &dyn Channel,
    channel_id: &str,
) -> Vec<&'static str> {
    let mut performed = Vec::new();
    for trigger in triggers {
        let content = match trigger {
            Trigger::Faq { reply, .. } => reply.clone(),
            Trigger::PedidoPadrao => {
                "Recebi seu pedido! Vou encaminhar para a equipe responsável.".to_string()
            }
            Trigger::Roteamento { target } => {
                format!("Encaminhando sua mensagem para o módulo de {target}.")
            }
            Trigger::ColetaInfo { question } => question.clone(),
            Trigger::Confirmacao => "Confirmado! Pode deixar comigo.".to_string(),
        };
        match channel.send_message(channel_id, &content).await {
            Ok(()) => performed.push(trigger.label()),
            Err(e) => warn!("automation {} failed to send: {e}", trigger.label()),
        }
    }
    performed
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn faq_fires_only_with_near_full_overlap() {
        let mut rng = StdRng::seed_from_u64(4);
        let fired = evaluate_triggers(
            "como monta um servidor de minecraft?",
            &[Topic::Minecraft],
            FAQ_CONFIDENCE_THRESHOLD,
            &mut rng,
        );
        assert!(matches!(fired.first(), Some(Trigger::Faq { key, .. }) if key == "minecraft-servidor"));

        let fired = evaluate_triggers(
            "servidor de minecraft",
            &[Topic::Minecraft],
            FAQ_CONFIDENCE_THRESHOLD,
            &mut rng,
        );
        assert!(!fired.iter().any(|t| matches!(t, Trigger::Faq { .. })));
    }

    #[test]
    fn short_vague_message_asks_for_details() {
        let mut rng = StdRng::seed_from_u64(4);
        let fired = evaluate_triggers("me ajuda aí", &[], FAQ_CONFIDENCE_THRESHOLD, &mut rng);
        assert!(fired.iter().any(|t| matches!(
            t,
            Trigger::ColetaInfo { question } if question == "Poderia me dar mais detalhes?"
        )));
    }

    #[test]
    fn several_rules_can_fire_together() {
        let mut rng = StdRng::seed_from_u64(4);
        let fired = evaluate_triggers(
            "confirma o pedido",
            &[Topic::Moderacao],
            FAQ_CONFIDENCE_THRESHOLD,
            &mut rng,
        );
        assert!(fired.contains(&Trigger::PedidoPadrao));
        assert!(fired.contains(&Trigger::Confirmacao));
        assert!(fired.iter().any(|t| matches!(t, Trigger::Roteamento { .. })));
    }
}
