//! Given steps for support flow scenarios.

use super::world::{SupportWorld, operator, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use serde_json::json;
use switchboard::{
    agent::domain::{GenerationStep, KnowledgeNamespace, ToolCall, ToolSpec},
    conversation::domain::ConversationStatus,
    plugin::domain::PluginService,
    session::services::CreateContactSessionRequest,
    tenant::domain::OrganizationId,
};

#[given(r#"a visitor "{name}" of organization "{organization}""#)]
fn visitor_of_organization(
    world: &mut SupportWorld,
    name: String,
    organization: String,
) -> Result<(), eyre::Report> {
    let email = format!("{}@example.com", name.to_lowercase());
    let session = run_async(
        world
            .sessions
            .create(CreateContactSessionRequest::new(organization, name.clone(), email)),
    )
    .wrap_err("open contact session")?;
    world.visitors.insert(name, session);
    Ok(())
}

#[given(r#""{name}" has opened a conversation"#)]
fn visitor_opened_conversation(world: &mut SupportWorld, name: String) -> Result<(), eyre::Report> {
    let session_id = world.visitor(&name)?.id();
    let conversation =
        run_async(world.conversations.create(session_id)).wrap_err("create conversation")?;
    world.conversation = Some(conversation);
    Ok(())
}

#[given(r#"the agent will reply "{text}" and escalate"#)]
fn agent_will_escalate(world: &mut SupportWorld, text: String) {
    world.engine.push_step(
        GenerationStep::text(text).with_tool_call(ToolCall::new(
            "call_escalate",
            ToolSpec::ESCALATE_CONVERSATION,
            json!({}),
        )),
    );
}

#[given(r#"the conversation has been {status}"#)]
fn conversation_has_been(world: &mut SupportWorld, status: String) -> Result<(), eyre::Report> {
    let thread_id = world.conversation()?.thread_id();
    let target = ConversationStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("unknown status {status}: {err}"))?;
    let update = match target {
        ConversationStatus::Escalated => run_async(world.conversations.escalate(thread_id)),
        ConversationStatus::Resolved => run_async(world.conversations.resolve(thread_id)),
        ConversationStatus::Unresolved => {
            return Err(eyre::eyre!("conversations cannot return to unresolved"));
        }
    }
    .wrap_err("apply status")?;
    world.conversation = Some(update.conversation);
    Ok(())
}

#[given(r#"an operator of organization "{organization}" has connected "{service}" with key "{key}""#)]
fn operator_has_connected(
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
    run_async(sync.wait()).wrap_err("connect plugin")?;
    Ok(())
}

#[given(r#"organization "{organization}" documents "{title}" as "{text}""#)]
fn organization_documents(
    world: &mut SupportWorld,
    organization: String,
    title: String,
    text: String,
) -> Result<(), eyre::Report> {
    let organization_id = OrganizationId::new(organization)
        .map_err(|err| eyre::eyre!("invalid organization in scenario: {err}"))?;
    world
        .knowledge
        .add_document(
            KnowledgeNamespace::for_organization(&organization_id),
            Some(title.as_str()),
            text,
        )
        .wrap_err("add knowledge document")?;
    Ok(())
}

#[given(r#"the agent will search for "{query}" and learn "{answer}""#)]
fn agent_will_search(world: &mut SupportWorld, query: String, answer: String) {
    world.engine.push_step(GenerationStep::default().with_tool_call(ToolCall::new(
        "call_search",
        ToolSpec::SEARCH,
        json!({ "query": query }),
    )));
    world.engine.push_completion(answer);
}
