use clap::{Parser, Subcommand};
use luana::{config, engine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luana")]
#[command(about = "A context-aware conversational bot core")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the engine with a console demo channel
    Run,

    /// Show engine status and engagement metrics
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = config::load()?;
            engine::run(config).await
        }
        Commands::Status => {
            let config = config::load()?;
            let data_dir = config.data.resolved_dir();
            println!("luana v{}", env!("CARGO_PKG_VERSION"));
            println!("bot: {}", config.bot.name);
            println!("data dir: {}", data_dir.display());

            let synonyms = luana::knowledge::synonyms::SynonymBank::open(&data_dir);
            let metrics = luana::telemetry::EngagementMetrics::open(&data_dir);
            let stats = luana::telemetry::PerformanceStats::open(&data_dir);
            let summary = stats.summarize();
            println!(
                "conversas: {} | sucesso: {:.0}% | tempo médio: {:.0}ms",
                summary.total_conversations, summary.success_rate, summary.avg_response_time_ms
            );
            println!("{}", metrics.report(&synonyms));
            Ok(())
        }
    }
}
