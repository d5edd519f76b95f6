//! Strongly-typed service configuration.
//!
//! Loaded via the `config` crate from environment variables prefixed with
//! `SWITCHBOARD`, using `__` to separate nested keys, for example
//! `SWITCHBOARD__SESSION__TTL_MINUTES=60`. Every field has a default.

use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupportConfig {
    /// Contact session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Conversation settings.
    #[serde(default)]
    pub conversation: ConversationConfig,

    /// Automated agent settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Plugin secret synchronisation settings.
    #[serde(default)]
    pub plugins: PluginConfig,
}

impl SupportConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SWITCHBOARD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

/// Contact session settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Lifetime of a new or refreshed session, in minutes.
    #[serde(default = "default_session_ttl_minutes")]
    pub ttl_minutes: i64,

    /// Remaining lifetime below which a refresh extends the session, in
    /// minutes.
    #[serde(default = "default_refresh_threshold_minutes")]
    pub refresh_threshold_minutes: i64,

    /// Interval between expiry sweeps, in seconds.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

const fn default_session_ttl_minutes() -> i64 {
    24 * 60
}

const fn default_refresh_threshold_minutes() -> i64 {
    4 * 60
}

const fn default_sweep_interval_seconds() -> u64 {
    60 * 60
}

impl SessionConfig {
    /// Returns the session lifetime.
    #[must_use]
    pub fn ttl(&self) -> TimeDelta {
        TimeDelta::minutes(self.ttl_minutes)
    }

    /// Returns the refresh threshold.
    #[must_use]
    pub fn refresh_threshold(&self) -> TimeDelta {
        TimeDelta::minutes(self.refresh_threshold_minutes)
    }

    /// Returns the sweep interval.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_session_ttl_minutes(),
            refresh_threshold_minutes: default_refresh_threshold_minutes(),
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// Conversation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConversationConfig {
    /// Message appended by the agent when a conversation starts.
    #[serde(default)]
    pub greeting: Option<String>,
}

/// Automated agent settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Name recorded as the author of agent replies.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// System instructions passed to the generation engine.
    #[serde(default = "default_agent_instructions")]
    pub instructions: String,

    /// Upper bound on generation steps per visitor turn.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Number of knowledge passages requested per search.
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    /// Number of recent ledger entries given to the engine as context.
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

fn default_agent_name() -> String {
    "Customer Support Bot".to_owned()
}

fn default_agent_instructions() -> String {
    "You are a customer support agent. Use the search tool to answer questions \
     from the knowledge base. Resolve the conversation when the customer's issue \
     is settled and escalate it when the customer asks for a human or you cannot \
     help."
        .to_owned()
}

const fn default_max_steps() -> usize {
    3
}

const fn default_search_limit() -> usize {
    5
}

const fn default_context_messages() -> usize {
    10
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            instructions: default_agent_instructions(),
            max_steps: default_max_steps(),
            search_limit: default_search_limit(),
            context_messages: default_context_messages(),
        }
    }
}

/// Plugin secret synchronisation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    /// Attempts made to write a secret before giving up.
    #[serde(default = "default_sync_attempts")]
    pub sync_attempts: u32,

    /// Delay before the second attempt, in milliseconds. Doubles per attempt.
    #[serde(default = "default_sync_base_delay_ms")]
    pub sync_base_delay_ms: u64,

    /// Upper bound on the delay between attempts, in milliseconds.
    #[serde(default = "default_sync_max_delay_ms")]
    pub sync_max_delay_ms: u64,
}

const fn default_sync_attempts() -> u32 {
    5
}

const fn default_sync_base_delay_ms() -> u64 {
    250
}

const fn default_sync_max_delay_ms() -> u64 {
    30_000
}

impl PluginConfig {
    /// Returns the delay to wait after `attempt` failed attempts.
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1_u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let delay = self
            .sync_base_delay_ms
            .saturating_mul(factor)
            .min(self.sync_max_delay_ms);
        Duration::from_millis(delay)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            sync_attempts: default_sync_attempts(),
            sync_base_delay_ms: default_sync_base_delay_ms(),
            sync_max_delay_ms: default_sync_max_delay_ms(),
        }
    }
}
