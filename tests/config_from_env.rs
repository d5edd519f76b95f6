//! Environment-driven configuration loading.
#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert while propagating setup failures with eyre"
)]

mod test_helpers;

use chrono::TimeDelta;
use rstest::rstest;
use std::time::Duration;
use switchboard::config::SupportConfig;
use test_helpers::EnvVarGuard;

#[rstest]
fn defaults_apply_without_variables() -> eyre::Result<()> {
    let _env = EnvVarGuard::with_config(&[]);

    let config = SupportConfig::from_env()?;

    assert_eq!(config.session.ttl(), TimeDelta::hours(24));
    assert_eq!(config.session.refresh_threshold(), TimeDelta::hours(4));
    assert_eq!(config.agent.max_steps, 3);
    assert_eq!(config.agent.search_limit, 5);
    assert_eq!(config.agent.name, "Customer Support Bot");
    assert!(config.conversation.greeting.is_none());
    assert_eq!(config.plugins.sync_attempts, 5);
    Ok(())
}

#[rstest]
#[case("SWITCHBOARD__AGENT__MAX_STEPS", "7")]
#[case("SWITCHBOARD__AGENT__SEARCH_LIMIT", "7")]
#[case("SWITCHBOARD__AGENT__CONTEXT_MESSAGES", "7")]
fn agent_limits_are_read(#[case] key: &str, #[case] value: &str) -> eyre::Result<()> {
    let _env = EnvVarGuard::with_config(&[(key, value)]);

    let agent = SupportConfig::from_env()?.agent;

    let overridden = [agent.max_steps, agent.search_limit, agent.context_messages]
        .into_iter()
        .filter(|limit| *limit == 7)
        .count();
    assert_eq!(overridden, 1);
    Ok(())
}

#[rstest]
fn nested_sections_are_read_together() -> eyre::Result<()> {
    let _env = EnvVarGuard::with_config(&[
        ("SWITCHBOARD__SESSION__TTL_MINUTES", "90"),
        ("SWITCHBOARD__SESSION__SWEEP_INTERVAL_SECONDS", "30"),
        ("SWITCHBOARD__AGENT__NAME", "Helper"),
        ("SWITCHBOARD__CONVERSATION__GREETING", "Hello!"),
        ("SWITCHBOARD__PLUGINS__SYNC_ATTEMPTS", "2"),
    ]);

    let config = SupportConfig::from_env()?;

    assert_eq!(config.session.ttl(), TimeDelta::minutes(90));
    assert_eq!(config.session.sweep_interval(), Duration::from_secs(30));
    assert_eq!(config.agent.name, "Helper");
    assert_eq!(config.conversation.greeting.as_deref(), Some("Hello!"));
    assert_eq!(config.plugins.sync_attempts, 2);
    Ok(())
}

#[rstest]
fn malformed_number_is_rejected() {
    let _env = EnvVarGuard::with_config(&[("SWITCHBOARD__AGENT__MAX_STEPS", "many")]);

    assert!(SupportConfig::from_env().is_err());
}
