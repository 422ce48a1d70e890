use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

/// Top-level configuration loaded from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LuanaConfig {
    pub bot: BotConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub profiles: ProfileConfig,
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Name the bot answers to when it appears in plain text.
    #[serde(default = "default_bot_name")]
    pub name: String,
    /// Let the automation router answer standard cases without a mention.
    #[serde(default = "default_auto_respond")]
    pub auto_respond: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            auto_respond: default_auto_respond(),
        }
    }
}

fn default_bot_name() -> String {
    "luana".into()
}
fn default_auto_respond() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Per-user cap on remembered interactions (FIFO beyond this).
    #[serde(default = "default_max_interactions")]
    pub max_interactions: usize,
    /// How many recent interactions make up the working context window.
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_interactions: default_max_interactions(),
            context_window: default_context_window(),
        }
    }
}

fn default_max_interactions() -> usize {
    20
}
fn default_context_window() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// Global cap on tracked profiles; least-recently-updated is evicted.
    #[serde(default = "default_max_profiles")]
    pub max_profiles: usize,
    /// Inactivity window after which a profile's counters are soft-reset.
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: u32,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            max_profiles: default_max_profiles(),
            ttl_hours: default_ttl_hours(),
        }
    }
}

fn default_max_profiles() -> usize {
    200
}
fn default_ttl_hours() -> u32 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory holding the JSON state files (expressions, synonyms,
    /// problems, patterns, metrics, tuning).
    pub dir: Option<PathBuf>,
    /// Optional log file scanned once at startup for the global
    /// activity-by-hour histogram.
    pub activity_log: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: None,
            activity_log: None,
        }
    }
}

impl DataConfig {
    /// Resolve the data directory, defaulting to `~/.luana/data`.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        PathBuf::from(home).join(".luana").join("data")
    }
}

/// Load configuration from file or use defaults.
///
/// Search order:
/// 1. `LUANA_CONFIG` env var
/// 2. `~/.luana/config.toml`
/// 3. Zero-config defaults (no file needed)
pub fn load() -> anyhow::Result<LuanaConfig> {
    let path = config_path();

    if path.exists() {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
        let config: LuanaConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;

        validate(&config)?;

        info!("loaded config from {}", path.display());
        Ok(config)
    } else {
        info!("no config file found, using zero-config defaults");
        Ok(LuanaConfig::default())
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("LUANA_CONFIG") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".luana").join("config.toml")
}

/// Validate the config and return clear error messages.
fn validate(config: &LuanaConfig) -> anyhow::Result<()> {
    if config.bot.name.trim().is_empty() {
        anyhow::bail!("bot.name must not be empty");
    }
    if config.memory.max_interactions == 0 {
        anyhow::bail!("memory.max_interactions must be > 0");
    }
    if config.memory.context_window == 0 {
        anyhow::bail!("memory.context_window must be > 0");
    }
    if config.profiles.max_profiles == 0 {
        anyhow::bail!("profiles.max_profiles must be > 0");
    }
    Ok(())
}
