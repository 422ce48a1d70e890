use crate::automation::anticipation::{NeedsAnticipator, primary_action};
use crate::automation::optimizer::Optimizer;
use crate::automation::router::auto_respond_standard_cases;
use crate::automation::triggers::{evaluate_triggers, run_automations};
use crate::channel::Channel;
use crate::config::LuanaConfig;
use crate::context::build_context;
use crate::knowledge::corrections::CorrectionBank;
use crate::knowledge::expressions::ExpressionBank;
use crate::knowledge::patterns::PatternBank;
use crate::knowledge::problems::ProblemBank;
use crate::knowledge::synonyms::SynonymBank;
use crate::memory::{ConversationMemory, is_repetitive};
use crate::nlp::entities::extract_entities;
use crate::nlp::intent::{IntentClassifier, KeywordClassifier};
use crate::nlp::topics::extract_topics;
use crate::profile::ProfileStore;
use crate::respond::generator::generate;
use crate::respond::tone::apply_tone;
use crate::respond::variety::{add_creative_flair, compute_delay_ms, enrich_text, generate_formulations, vary_structure};
use crate::telemetry::{EngagementMetrics, PerformanceStats};
use crate::types::IncomingMessage;
use chrono::{Timelike, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Alternative phrasings generated per turn.
const FORMULATION_COUNT: usize = 3;

/// The conversational core. Owns every store and runs the whole pipeline
/// for each inbound message; the chat platform only appears through the
/// [`Channel`] seam.
pub struct Engine {
    config: LuanaConfig,
    data_dir: PathBuf,
    memory: ConversationMemory,
    profiles: ProfileStore,
    expressions: ExpressionBank,
    synonyms: SynonymBank,
    problems: ProblemBank,
    patterns: PatternBank,
    corrections: CorrectionBank,
    anticipator: NeedsAnticipator,
    optimizer: Optimizer,
    stats: PerformanceStats,
    metrics: EngagementMetrics,
    classifier: Box<dyn IntentClassifier + Send + Sync>,
    rng: StdRng,
}

impl Engine {
    pub fn new(config: LuanaConfig) -> Self {
        Self::with_parts(config, Box::new(KeywordClassifier::new()), StdRng::from_os_rng())
    }

    /// Build an engine with an explicit classifier and RNG. Tests use this
    /// with a seeded RNG for reproducible pipelines.
    pub fn with_parts(
        config: LuanaConfig,
        classifier: Box<dyn IntentClassifier + Send + Sync>,
        rng: StdRng,
    ) -> Self {
        let data_dir = config.data.resolved_dir();
        let mut profiles = ProfileStore::new(
            config.profiles.max_profiles,
            chrono::Duration::hours(config.profiles.ttl_hours as i64),
        );
        if let Some(log) = &config.data.activity_log {
            profiles.analyze_logs_once(log);
        }

        Self {
            memory: ConversationMemory::new(config.memory.max_interactions),
            profiles,
            expressions: ExpressionBank::open(&data_dir),
            synonyms: SynonymBank::open(&data_dir),
            problems: ProblemBank::open(&data_dir),
            patterns: PatternBank::open(&data_dir),
            corrections: CorrectionBank::open(&data_dir),
            anticipator: NeedsAnticipator::open(&data_dir),
            optimizer: Optimizer::open(&data_dir),
            stats: PerformanceStats::open(&data_dir),
            metrics: EngagementMetrics::open(&data_dir),
            classifier,
            rng,
            config,
            data_dir,
        }
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn profiles(&self) -> &ProfileStore {
        &self.profiles
    }

    pub fn stats(&self) -> &PerformanceStats {
        &self.stats
    }

    pub fn metrics(&self) -> &EngagementMetrics {
        &self.metrics
    }

    pub fn synonyms(&self) -> &SynonymBank {
        &self.synonyms
    }

    /// Handle one inbound message end to end. Never propagates pipeline
    /// errors: a failed turn is recorded and the user gets nothing rather
    /// than half a reply.
    pub async fn handle_message(&mut self, msg: &IncomingMessage, channel: &dyn Channel) {
        if msg.is_bot {
            return;
        }
        let started = Instant::now();
        if let Err(e) = self.handle_inner(msg, channel, &started).await {
            warn!(user = %msg.author_id, "turn failed: {e:#}");
            self.stats
                .record_conversation(false, started.elapsed().as_millis() as u64);
        }
    }

    async fn handle_inner(
        &mut self,
        msg: &IncomingMessage,
        channel: &dyn Channel,
        started: &Instant,
    ) -> anyhow::Result<()> {
        let addressed = msg.addresses_bot(&self.config.bot.name);

        if self.config.bot.auto_respond {
            let auto = auto_respond_standard_cases(
                msg,
                self.classifier.as_ref(),
                &self.problems,
                &self.expressions,
                channel,
                &mut self.rng,
            )
            .await;
            if let Some(sent) = auto {
                let elapsed = started.elapsed().as_millis() as u64;
                self.stats.record_conversation(true, elapsed);
                self.metrics.record_interaction(&msg.author_id, &sent, false);
                if !addressed {
                    return Ok(());
                }
            }
        }

        if !addressed {
            return Ok(());
        }

        // Learn about the sender before building context.
        let now = Utc::now();
        let entities = extract_entities(&msg.content);
        if !entities.is_empty() {
            self.profiles.record_context_data(&msg.author_id, &entities);
        }
        self.profiles.track_message(&msg.author_id, &msg.content, now);

        let ctx = build_context(
            &msg.author_id,
            &msg.content,
            self.config.memory.context_window,
            &self.memory,
            &mut self.profiles,
            &self.patterns,
            self.classifier.as_ref(),
            &mut self.rng,
        );
        let opts = self.profiles.personalization_options(
            &msg.author_id,
            ctx.sentiment.category,
            ctx.intent.intent,
        );

        let generated = generate(&ctx, &self.expressions, &mut self.rng);
        let enriched = enrich_text(&generated.response, opts.complexity, &self.synonyms, &mut self.rng);
        let varied = vary_structure(&enriched, &mut self.rng);
        let flaired = add_creative_flair(
            &varied,
            &msg.content,
            ctx.sentiment.category,
            ctx.intent.intent,
            &mut self.rng,
        );

        let mut variants =
            generate_formulations(&flaired, opts.style, FORMULATION_COUNT, &mut self.rng);
        if is_repetitive(&ctx.window, &flaired) {
            debug!("candidate repeats recent replies, reversing formulations");
            variants.reverse();
        }
        let chosen = variants.first().cloned().unwrap_or(flaired);
        let mut toned = apply_tone(&chosen, opts.style, &ctx.sentiment);
        if let Some(follow_up) = &generated.follow_up {
            toned.push(' ');
            toned.push_str(follow_up);
        }

        if let Err(e) = channel.send_typing(&msg.channel_id).await {
            debug!("typing indicator failed: {e}");
        }
        let delay = compute_delay_ms(opts.complexity, toned.chars().count());
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;

        match &msg.message_id {
            Some(id) => channel.reply_with_fallback(&msg.channel_id, id, &toned).await?,
            None => channel.send_message(&msg.channel_id, &toned).await?,
        }

        // Mutations after the reply is out.
        self.memory.remember(
            &msg.author_id,
            &msg.content,
            &toned,
            extract_topics(&msg.content),
        );
        let elapsed = started.elapsed().as_millis() as u64;
        self.profiles.record_outcome(elapsed);

        let actions = self
            .anticipator
            .anticipate(&msg.content, now.hour(), &msg.channel_id);
        if let Some(action) = primary_action(&actions) {
            self.anticipator.execute(action, channel, &msg.channel_id).await;
        }

        if let Some(plan) = self.problems.solve(&msg.content) {
            if let Err(e) = channel.send_message(&msg.channel_id, &plan.response).await {
                warn!("failed to send solution plan: {e}");
            }
        }

        let triggers = evaluate_triggers(
            &msg.content,
            &ctx.topics,
            self.optimizer.tuning().faq_confidence_threshold,
            &mut self.rng,
        );
        let performed = run_automations(&triggers, channel, &msg.channel_id).await;
        if !performed.is_empty() {
            debug!(?performed, "automations executed");
        }

        if ctx.intent.score >= 1 {
            self.profiles
                .track_command_usage(&msg.author_id, ctx.intent.intent.automation_label());
        }

        if let Some(error_type) = self.corrections.detect_error(&msg.content) {
            let error_type = error_type.to_string();
            if let Some(apology) =
                self.corrections.generate_correction(&error_type, None, &mut self.rng)
            {
                if let Err(e) = channel.send_message(&msg.channel_id, &apology).await {
                    warn!("failed to send correction: {e}");
                }
            }
        }

        self.stats.record_conversation(true, elapsed);
        self.metrics
            .record_interaction(&msg.author_id, &toned, generated.follow_up.is_some());
        Ok(())
    }

    /// One self-optimization pass, wired for the hourly scheduler.
    pub fn optimize(&mut self) {
        let summary = self.stats.summarize();
        self.optimizer.optimize_parameters(
            &summary,
            &mut self.anticipator,
            &mut self.expressions,
            &mut self.rng,
        );
        self.profiles.flush_to_disk(&self.data_dir);
    }

    pub fn write_daily_report(&self) {
        self.stats.write_daily_report(&self.data_dir);
    }

    pub fn write_weekly_report(&self) {
        self.stats.write_weekly_report(&self.data_dir);
    }
}

/// Run the engine against stdin/stdout with background schedulers for
/// reports and optimization. Each tick body catches its own errors; a bad
/// pass never takes the loop down.
pub async fn run(config: LuanaConfig) -> anyhow::Result<()> {
    use tokio::io::AsyncBufReadExt;

    let bot_name = config.bot.name.clone();
    let engine = Arc::new(Mutex::new(Engine::new(config)));
    info!(bot = %bot_name, "engine started");

    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
            tick.tick().await;
            loop {
                tick.tick().await;
                engine.lock().await.optimize();
            }
        });
    }
    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut tick =
                tokio::time::interval(std::time::Duration::from_secs(24 * 60 * 60));
            tick.tick().await;
            loop {
                tick.tick().await;
                engine.lock().await.write_daily_report();
            }
        });
    }
    {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut tick =
                tokio::time::interval(std::time::Duration::from_secs(7 * 24 * 60 * 60));
            tick.tick().await;
            loop {
                tick.tick().await;
                engine.lock().await.write_weekly_report();
            }
        });
    }

    let channel = crate::channel::ConsoleChannel;
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    println!("luana pronta. Digite uma mensagem (ctrl-d para sair).");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let mut msg = IncomingMessage::user("console", "console", line);
        msg.mentions_bot = true;
        engine.lock().await.handle_message(&msg, &channel).await;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
