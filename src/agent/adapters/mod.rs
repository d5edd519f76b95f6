//! In-process generation engine and knowledge index.

pub mod knowledge;
pub mod scripted;

pub use knowledge::StaticKnowledgeBase;
pub use scripted::ScriptedGenerationEngine;
