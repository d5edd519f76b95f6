//! When steps for support flow scenarios.

use super::world::{SupportWorld, operator, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use serde_json::json;
use switchboard::{conversation::domain::ConversationStatus, plugin::domain::PluginService};

#[when(r#""{name}" sends "{prompt}""#)]
fn visitor_sends(world: &mut SupportWorld, name: String, prompt: String) -> Result<(), eyre::Report> {
    let session_id = world.visitor(&name)?.id();
    let thread_id = world.conversation()?.thread_id();
    let result = run_async(world.orchestrator.post_message(thread_id, session_id, &prompt));
    world.last_turn = world.record(result);
    Ok(())
}

#[when(r#"an operator of organization "{organization}" sets the status to "{status}""#)]
fn operator_sets_status(
    world: &mut SupportWorld,
    organization: String,
    status: String,
) -> Result<(), eyre::Report> {
    let identity = operator(&organization, "Operator")?;
    let target = ConversationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("unknown status {status}: {err}"))?;
    let conversation_id = world.conversation()?.id();
    let result = run_async(
        world
            .conversations
            .update_status(&identity, conversation_id, target),
    );
    world.record(result);
    Ok(())
}

#[when(r#"operator "{family_name}" of organization "{organization}" replies "{content}""#)]
fn operator_replies(
    world: &mut SupportWorld,
    family_name: String,
    organization: String,
    content: String,
) -> Result<(), eyre::Report> {
    let identity = operator(&organization, &family_name)?;
    let conversation_id = world.conversation()?.id();
    let result = run_async(
        world
            .ledger
            .reply_as_operator(&identity, conversation_id, &content),
    );
    world.record(result);
    Ok(())
}

#[when(r#"the operator of organization "{organization}" connects "{service}" with key "{key}""#)]
fn operator_connects(
    world: &mut SupportWorld,
    organization: String,
    service: String,
    key: String,
) -> Result<(), eyre::Report> {
    let identity = operator(&organization, "Operator")?;
    let plugin = PluginService::try_from(service.as_str())
        .map_err(|err| eyre::eyre!("unknown plugin: {err}"))?;
    let sync = world
        .plugins
        .upsert(&identity, plugin, json!({ "privateApiKey": key }))
        .wrap_err("schedule plugin sync")?;
    let result = run_async(sync.wait());
    world.record(result);
    Ok(())
}
