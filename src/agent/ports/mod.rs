//! Ports for the generation engine and knowledge search.

mod generation;
mod knowledge;

pub use generation::{GenerationEngine, GenerationError, GenerationResult};
pub use knowledge::{KnowledgeError, KnowledgeResult, KnowledgeSearch};
