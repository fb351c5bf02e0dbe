use serde::{Deserialize, Serialize};
use super::finding::FindingCategory;

/// Where a piece of remediation guidance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionSource {
    KnowledgeIndex,
    FallbackLibrary,
}

/// Remediation guidance for one finding category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationSuggestion {
    pub category: FindingCategory,
    pub source: SuggestionSource,
    pub guidance_text: String,
}
