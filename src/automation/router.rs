use crate::channel::Channel;
use crate::knowledge::expressions::ExpressionBank;
use crate::knowledge::problems::ProblemBank;
use crate::nlp::intent::{Intent, IntentClassifier};
use crate::types::IncomingMessage;
use rand::Rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Pause before an automated reply so it does not land instantly.
const AUTO_RESPONSE_DELAY: Duration = Duration::from_millis(600);

#[derive(Debug, Clone)]
pub struct RoutedReply {
    pub text: String,
    /// False when the router fell through to the generic fallback.
    pub handled: bool,
}

/// Map a classified intent onto its module's canned or contextual reply.
/// Minecraft consults the problem solver before the expression bank.
pub fn route_to_module(
    intent: Intent,
    message: &str,
    problems: &ProblemBank,
    expressions: &ExpressionBank,
    rng: &mut impl Rng,
) -> RoutedReply {
    let handled = |text: String| RoutedReply { text, handled: true };

    match intent.automation_label() {
        "saudacao" => handled(expressions.pick("greetings", rng)),
        "despedida" => handled(expressions.pick("farewells", rng)),
        "ajuda" => handled(
            "Posso ajudar com Minecraft, moderação, xadrez e filosofia. Sobre o que você quer falar?"
                .to_string(),
        ),
        "minecraft" => match problems.solve(message) {
            Some(plan) => handled(plan.response),
            None => handled(expressions.pick("minecraft", rng)),
        },
        "filosofia" => handled(expressions.pick("philosophy", rng)),
        "xadrez" => handled(expressions.pick("chess", rng)),
        "moderacao" => handled(expressions.pick("moderation", rng)),
        "erro" => handled(expressions.pick("error", rng)),
        _ => RoutedReply {
            text: expressions.pick("thinking", rng),
            handled: false,
        },
    }
}

/// Answer well-known cases without waiting to be addressed. Only fires
/// when the classifier found at least one keyword hit; returns the sent
/// text so the caller can record the turn, or `None` when nothing
/// actually reached the channel.
pub async fn auto_respond_standard_cases(
    msg: &IncomingMessage,
    classifier: &dyn IntentClassifier,
    problems: &ProblemBank,
    expressions: &ExpressionBank,
    channel: &dyn Channel,
    rng: &mut impl Rng,
) -> Option<String> {
    let scored = classifier.classify(&msg.content);
    if scored.score < 1 {
        return None;
    }

    let routed = route_to_module(scored.intent, &msg.content, problems, expressions, rng);
    if !routed.handled {
        return None;
    }

    debug!(
        intent = scored.intent.automation_label(),
        score = scored.score,
        "auto-responding standard case"
    );

    if let Err(e) = channel.send_typing(&msg.channel_id).await {
        debug!("typing indicator failed: {e}");
    }
    tokio::time::sleep(AUTO_RESPONSE_DELAY).await;

    if let Err(e) = channel.send_message(&msg.channel_id, &routed.text).await {
        warn!("auto-response failed to send: {e}");
        return None;
    }
    Some(routed.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn banks() -> (ProblemBank, ExpressionBank) {
        let dir = std::env::temp_dir().join(format!("luana-router-{}", std::process::id()));
        let _ = std::fs::create_dir_all(&dir);
        (ProblemBank::open(&dir), ExpressionBank::open(&dir))
    }

    #[test]
    fn minecraft_with_known_problem_routes_to_solver() {
        let (problems, expressions) = banks();
        let mut rng = StdRng::seed_from_u64(5);
        let routed = route_to_module(
            Intent::Minecraft,
            "não consigo conectar no servidor, conexão recusada",
            &problems,
            &expressions,
            &mut rng,
        );
        assert!(routed.handled);
        assert!(routed.text.contains("Problema identificado"));
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_reports_no_auto_response() {
        struct DeadChannel;
        #[async_trait::async_trait]
        impl Channel for DeadChannel {
            async fn send_typing(&self, _: &str) -> anyhow::Result<()> {
                Ok(())
            }
            async fn send_message(&self, _: &str, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("socket closed")
            }
            async fn reply_to_message(&self, _: &str, _: &str, _: &str) -> anyhow::Result<()> {
                anyhow::bail!("socket closed")
            }
        }

        let (problems, expressions) = banks();
        let classifier = crate::nlp::intent::KeywordClassifier::new();
        let mut rng = StdRng::seed_from_u64(5);
        let msg = IncomingMessage::user("u1", "c1", "olá, tudo bem?");

        let sent = auto_respond_standard_cases(
            &msg,
            &classifier,
            &problems,
            &expressions,
            &DeadChannel,
            &mut rng,
        )
        .await;
        assert!(sent.is_none());
    }

    #[test]
    fn unknown_intent_falls_through() {
        let (problems, expressions) = banks();
        let mut rng = StdRng::seed_from_u64(5);
        let routed = route_to_module(
            Intent::Unknown,
            "qualquer coisa",
            &problems,
            &expressions,
            &mut rng,
        );
        assert!(!routed.handled);
    }
}
