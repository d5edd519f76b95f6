//! Shared world state for support flow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use switchboard::{
    agent::{
        adapters::{ScriptedGenerationEngine, StaticKnowledgeBase},
        domain::TurnOutcome,
        services::AgentOrchestrator,
    },
    config::SupportConfig,
    conversation::{domain::Conversation, services::ConversationService},
    error::SupportError,
    message::services::MessageLedgerService,
    plugin::{adapters::memory::InMemorySecretVault, services::PluginGateway},
    session::{domain::ContactSession, services::ContactSessionService},
    store::InMemoryStore,
    tenant::domain::{OperatorIdentity, OrganizationId},
};

/// Orchestrator type used by the BDD world.
pub type TestOrchestrator =
    AgentOrchestrator<InMemoryStore, StaticKnowledgeBase, ScriptedGenerationEngine, DefaultClock>;

/// Scenario world for support flow behaviour tests.
pub struct SupportWorld {
    pub store: Arc<InMemoryStore>,
    pub engine: Arc<ScriptedGenerationEngine>,
    pub knowledge: Arc<StaticKnowledgeBase>,
    pub sessions: ContactSessionService<InMemoryStore, DefaultClock>,
    pub conversations: ConversationService<InMemoryStore, DefaultClock>,
    pub ledger: MessageLedgerService<InMemoryStore, DefaultClock>,
    pub orchestrator: TestOrchestrator,
    pub plugins: PluginGateway<InMemoryStore, InMemorySecretVault, DefaultClock>,
    pub visitors: HashMap<String, ContactSession>,
    pub conversation: Option<Conversation>,
    pub last_turn: Option<TurnOutcome>,
    pub last_error: Option<SupportError>,
}

impl SupportWorld {
    /// Wires every service over one in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let config = SupportConfig::default();
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(DefaultClock);
        let engine = Arc::new(ScriptedGenerationEngine::new());
        let knowledge = Arc::new(StaticKnowledgeBase::new());

        Self {
            sessions: ContactSessionService::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                config.session,
            ),
            conversations: ConversationService::new(Arc::clone(&store), Arc::clone(&clock)),
            ledger: MessageLedgerService::new(Arc::clone(&store), Arc::clone(&clock)),
            orchestrator: AgentOrchestrator::new(
                Arc::clone(&store),
                Arc::clone(&knowledge),
                Arc::clone(&engine),
                Arc::clone(&clock),
                config.agent,
            ),
            plugins: PluginGateway::new(
                Arc::clone(&store),
                Arc::new(InMemorySecretVault::new()),
                clock,
                config.plugins,
            ),
            store,
            engine,
            knowledge,
            visitors: HashMap::new(),
            conversation: None,
            last_turn: None,
            last_error: None,
        }
    }

    /// Returns the conversation opened by the scenario.
    pub fn conversation(&self) -> Result<&Conversation, eyre::Report> {
        self.conversation
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing conversation in scenario world"))
    }

    /// Returns a visitor session by name.
    pub fn visitor(&self, name: &str) -> Result<&ContactSession, eyre::Report> {
        self.visitors
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown visitor {name} in scenario world"))
    }

    /// Records the outcome of a fallible request.
    pub fn record<T>(&mut self, result: Result<T, SupportError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                self.last_error = Some(err);
                None
            }
        }
    }
}

impl Default for SupportWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SupportWorld {
    SupportWorld::default()
}

/// Builds an operator identity scoped to an organization.
pub fn operator(organization: &str, family_name: &str) -> Result<OperatorIdentity, eyre::Report> {
    let organization_id = OrganizationId::new(organization)
        .map_err(|err| eyre::eyre!("invalid organization in scenario: {err}"))?;
    Ok(OperatorIdentity::new("operator_1")
        .with_family_name(family_name)
        .with_organization(organization_id))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
