//! Keyword-matching knowledge index held in memory.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::agent::{
    domain::{KnowledgeNamespace, SearchEntry, SearchResults},
    ports::{KnowledgeError, KnowledgeResult, KnowledgeSearch},
};

/// [`KnowledgeSearch`] over documents added at runtime.
///
/// Passages rank by how many distinct query words they contain, ignoring
/// case. Passages sharing no word with the query are never returned, and an
/// unknown namespace yields no passages.
#[derive(Debug, Clone, Default)]
pub struct StaticKnowledgeBase {
    documents: Arc<RwLock<HashMap<KnowledgeNamespace, Vec<SearchEntry>>>>,
}

impl StaticKnowledgeBase {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a passage to a namespace.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError::Unavailable`] if the internal lock is
    /// poisoned.
    pub fn add_document(
        &self,
        namespace: KnowledgeNamespace,
        title: Option<&str>,
        text: impl Into<String>,
    ) -> KnowledgeResult<()> {
        let mut documents = self.documents.write().map_err(|err| lock_error(&err))?;
        documents.entry(namespace).or_default().push(SearchEntry {
            title: title.map(str::to_owned),
            text: text.into(),
        });
        Ok(())
    }
}

fn lock_error(err: &impl std::fmt::Display) -> KnowledgeError {
    KnowledgeError::unavailable(std::io::Error::other(format!("lock poisoned: {err}")))
}

fn score(entry: &SearchEntry, words: &[String]) -> usize {
    let haystack = format!(
        "{} {}",
        entry.title.as_deref().unwrap_or_default(),
        entry.text
    )
    .to_lowercase();
    words
        .iter()
        .filter(|word| haystack.contains(word.as_str()))
        .count()
}

#[async_trait]
impl KnowledgeSearch for StaticKnowledgeBase {
    async fn search(
        &self,
        namespace: &KnowledgeNamespace,
        query: &str,
        limit: usize,
    ) -> KnowledgeResult<SearchResults> {
        let mut words: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        words.sort();
        words.dedup();

        let documents = self.documents.read().map_err(|err| lock_error(&err))?;
        let Some(entries) = documents.get(namespace) else {
            return Ok(SearchResults::default());
        };
        let mut ranked: Vec<(usize, &SearchEntry)> = entries
            .iter()
            .map(|entry| (score(entry, &words), entry))
            .filter(|(hits, _)| *hits > 0)
            .collect();
        ranked.sort_by(|left, right| right.0.cmp(&left.0));
        Ok(SearchResults::from_entries(
            ranked
                .into_iter()
                .take(limit)
                .map(|(_, entry)| entry.clone())
                .collect(),
        ))
    }
}
