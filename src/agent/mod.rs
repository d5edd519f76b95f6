//! Automated support agent.
//!
//! For each visitor prompt on an unresolved conversation the orchestrator runs
//! a bounded loop: ask the generation engine for a step, execute the tool
//! calls it requests, feed the results back and repeat until the engine
//! answers without tools or the step budget is spent.
//!
//! Tools may change the conversation status. Each such change is committed
//! together with every ledger entry staged so far, so readers never observe
//! an agent reply without the prompt that caused it.
//!
//! - Domain types in [`domain`]
//! - Generation and knowledge ports in [`ports`]
//! - Scripted and static adapters in [`adapters`]
//! - The toolbox and orchestrator in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
