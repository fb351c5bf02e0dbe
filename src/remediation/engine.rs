use std::sync::Arc;

use tracing::{debug, info};

use crate::models::{FindingCategory, RemediationSuggestion, SuggestionSource};
use super::fallback::fallback_guidance;
use super::index::KnowledgeIndex;

/// Number of chunks requested from the knowledge index.
pub const DEFAULT_TOP_K: usize = 3;

/// How the engine sources guidance.
#[derive(Clone)]
pub enum RemediationStrategy {
    /// Semantic lookup first, keyword library when it yields nothing.
    IndexThenFallback(Arc<dyn KnowledgeIndex>),
    /// Keyword library only.
    FallbackOnly,
}

impl RemediationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            RemediationStrategy::IndexThenFallback(_) => "index-then-fallback",
            RemediationStrategy::FallbackOnly => "fallback-only",
        }
    }
}

pub struct RemediationEngine {
    strategy: RemediationStrategy,
    top_k: usize,
}

impl RemediationEngine {
    pub fn new(strategy: RemediationStrategy) -> Self {
        Self { strategy, top_k: DEFAULT_TOP_K }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn strategy(&self) -> &RemediationStrategy {
        &self.strategy
    }

    /// Total: always returns a suggestion with non-empty guidance.
    pub async fn remediate(&self, category: FindingCategory, description: &str) -> RemediationSuggestion {
        if let RemediationStrategy::IndexThenFallback(index) = &self.strategy {
            let query = build_query(category, description);
            let chunks = index.similarity_search(&query, self.top_k).await;
            let chunks: Vec<&str> = chunks
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .collect();

            if !chunks.is_empty() {
                info!(category = %category, index = index.index_name(), chunks = chunks.len(), "Remediation from knowledge index");
                return RemediationSuggestion {
                    category,
                    source: SuggestionSource::KnowledgeIndex,
                    guidance_text: format_chunks(&chunks),
                };
            }
            debug!(category = %category, "Knowledge index returned nothing, using fallback library");
        }

        RemediationSuggestion {
            category,
            source: SuggestionSource::FallbackLibrary,
            guidance_text: fallback_guidance(description).to_string(),
        }
    }
}

/// Description plus a fixed instructional phrase.
pub fn build_query(category: FindingCategory, description: &str) -> String {
    format!(
        "{} how to fix {} secure coding pattern prevention",
        description.trim(),
        category.label()
    )
}

fn format_chunks(chunks: &[&str]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("### Security Pattern {}\n{}", i + 1, chunk))
        .collect::<Vec<_>>()
        .join("\n\n")
}
