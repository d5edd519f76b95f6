//! Agent turn orchestration and tool execution.

mod orchestrator;
mod toolbox;
mod turn;

pub use orchestrator::AgentOrchestrator;
pub use toolbox::SupportToolbox;
pub use turn::TurnLedger;
