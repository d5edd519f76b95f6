//! Tests for the in-process engine and knowledge index.

#![expect(
    clippy::panic_in_result_fn,
    reason = "Tests assert while propagating setup failures with eyre"
)]

use crate::agent::adapters::{ScriptedGenerationEngine, StaticKnowledgeBase};
use crate::agent::domain::{
    CompletionRequest, GenerationRequest, GenerationStep, KnowledgeNamespace,
};
use crate::agent::ports::{GenerationEngine, GenerationError, KnowledgeSearch};
use crate::conversation::domain::ThreadId;
use crate::tenant::domain::OrganizationId;
use eyre::Result;
use rstest::{fixture, rstest};

fn namespace(organization: &str) -> KnowledgeNamespace {
    KnowledgeNamespace::for_organization(&OrganizationId::new(organization).expect("org id"))
}

#[fixture]
fn knowledge() -> StaticKnowledgeBase {
    let base = StaticKnowledgeBase::new();
    base.add_document(
        namespace("org_a"),
        Some("Refunds"),
        "Refunds are issued within five days.",
    )
    .expect("add");
    base.add_document(
        namespace("org_a"),
        Some("Shipping"),
        "Refunds for shipping fees are not available. Orders ship in two days.",
    )
    .expect("add");
    base.add_document(namespace("org_b"), None, "Refunds at org b take a month.")
        .expect("add");
    base
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_ranks_by_matching_words(knowledge: StaticKnowledgeBase) -> Result<()> {
    let results = knowledge
        .search(&namespace("org_a"), "shipping refunds", 5)
        .await?;
    assert_eq!(results.titles(), ["Shipping", "Refunds"]);
    assert!(results.text.starts_with("Refunds for shipping fees"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_stays_inside_the_namespace(knowledge: StaticKnowledgeBase) -> Result<()> {
    let results = knowledge.search(&namespace("org_b"), "refunds", 5).await?;
    assert_eq!(results.entries.len(), 1);
    assert!(!results.text.contains("five days"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn search_honours_limit_and_unknown_namespaces(knowledge: StaticKnowledgeBase) -> Result<()> {
    let limited = knowledge.search(&namespace("org_a"), "refunds", 1).await?;
    assert_eq!(limited.entries.len(), 1);

    let unknown = knowledge.search(&namespace("org_c"), "refunds", 5).await?;
    assert!(unknown.entries.is_empty());
    assert!(unknown.text.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn scripted_engine_replays_and_records() -> Result<()> {
    let engine = ScriptedGenerationEngine::new();
    engine.push_step(GenerationStep::text("Hello"));
    engine.push_failure(GenerationError::Rejected("quota".to_owned()));
    let request = GenerationRequest {
        instructions: "Be kind".to_owned(),
        history: Vec::new(),
        exchanges: Vec::new(),
        tools: Vec::new(),
    };
    let thread_id = ThreadId::new();

    assert_eq!(
        engine.generate_reply(thread_id, &request).await?,
        GenerationStep::text("Hello")
    );
    assert!(engine.generate_reply(thread_id, &request).await.is_err());
    assert!(matches!(
        engine.generate_reply(thread_id, &request).await,
        Err(GenerationError::Rejected(reason)) if reason == "script exhausted"
    ));
    assert_eq!(engine.requests().len(), 3);

    let completion = CompletionRequest {
        system: "sys".to_owned(),
        prompt: "hi".to_owned(),
    };
    assert!(engine.complete(&completion).await.is_err());
    assert_eq!(engine.completion_requests(), vec![completion]);
    Ok(())
}
