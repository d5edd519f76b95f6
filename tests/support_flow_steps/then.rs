//! Then steps for support flow scenarios.

use super::world::{SupportWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use switchboard::{
    conversation::ports::ConversationRepository,
    message::{
        domain::{Message, MessageAuthor},
        ports::MessageLedger,
    },
    pagination::PageRequest,
    plugin::domain::PluginService,
    tenant::domain::OrganizationId,
};

fn ledger_entries(world: &SupportWorld) -> Result<Vec<Message>, eyre::Report> {
    let thread_id = world.conversation()?.thread_id();
    let page = run_async(
        world
            .store
            .list_messages(thread_id, &PageRequest::oldest_first(100)),
    )
    .wrap_err("list ledger")?;
    Ok(page.items)
}

#[then(r#"the conversation status is "{status}""#)]
fn conversation_status_is(world: &SupportWorld, status: String) -> Result<(), eyre::Report> {
    let conversation_id = world.conversation()?.id();
    let stored = run_async(world.store.find_conversation(conversation_id))
        .wrap_err("load conversation")?
        .ok_or_else(|| eyre::eyre!("conversation missing from store"))?;
    if stored.status().as_str() != status {
        return Err(eyre::eyre!(
            "expected status {status}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("the agent ran")]
fn agent_ran(world: &SupportWorld) -> Result<(), eyre::Report> {
    let turn = world
        .last_turn
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no turn recorded; last error: {:?}", world.last_error))?;
    if !turn.agent_ran {
        return Err(eyre::eyre!("expected the agent to answer"));
    }
    Ok(())
}

#[then("the agent did not run")]
fn agent_did_not_run(world: &SupportWorld) -> Result<(), eyre::Report> {
    let turn = world
        .last_turn
        .as_ref()
        .ok_or_else(|| eyre::eyre!("no turn recorded; last error: {:?}", world.last_error))?;
    if turn.agent_ran {
        return Err(eyre::eyre!("expected the agent to stay silent"));
    }
    if !world.engine.requests().is_empty() {
        return Err(eyre::eyre!("generation engine was called"));
    }
    Ok(())
}

#[then(r#"the ledger reads "{expected}""#)]
fn ledger_reads(world: &SupportWorld, expected: String) -> Result<(), eyre::Report> {
    let contents = ledger_entries(world)?
        .iter()
        .map(|message| message.content().to_owned())
        .collect::<Vec<_>>();
    let wanted = expected.split('|').collect::<Vec<_>>();
    if contents != wanted {
        return Err(eyre::eyre!("expected ledger {wanted:?}, found {contents:?}"));
    }
    Ok(())
}

#[then("the ledger is empty")]
fn ledger_is_empty(world: &SupportWorld) -> Result<(), eyre::Report> {
    let entries = ledger_entries(world)?;
    if !entries.is_empty() {
        return Err(eyre::eyre!("expected an empty ledger, found {} entries", entries.len()));
    }
    Ok(())
}

#[then(r#"the last entry is written by operator "{family_name}""#)]
fn last_entry_by_operator(world: &SupportWorld, family_name: String) -> Result<(), eyre::Report> {
    let entries = ledger_entries(world)?;
    let last = entries
        .last()
        .ok_or_else(|| eyre::eyre!("ledger is empty"))?;
    match last.author() {
        MessageAuthor::Operator { display_name, .. } if *display_name == family_name => Ok(()),
        other => Err(eyre::eyre!("unexpected author {other:?}")),
    }
}

#[then(r#"the request fails with "{code}""#)]
fn request_fails_with(world: &SupportWorld, code: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the request to fail"))?;
    if err.code().as_str() != code {
        return Err(eyre::eyre!("expected {code}, got {err}"));
    }
    Ok(())
}

#[then(r#"the "{service}" secret of organization "{organization}" has key "{key}""#)]
fn secret_has_key(
    world: &SupportWorld,
    service: String,
    organization: String,
    key: String,
) -> Result<(), eyre::Report> {
    if let Some(err) = &world.last_error {
        return Err(eyre::eyre!("connect failed: {err}"));
    }
    let organization_id = OrganizationId::new(organization)
        .map_err(|err| eyre::eyre!("invalid organization: {err}"))?;
    let plugin = PluginService::try_from(service.as_str())
        .map_err(|err| eyre::eyre!("unknown plugin: {err}"))?;
    let secret = run_async(world.plugins.get_secret(&organization_id, plugin))
        .wrap_err("read secret")?
        .ok_or_else(|| eyre::eyre!("secret missing"))?;
    if secret.get("privateApiKey").and_then(|value| value.as_str()) != Some(key.as_str()) {
        return Err(eyre::eyre!("unexpected secret {secret}"));
    }
    Ok(())
}
