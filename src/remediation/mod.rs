pub mod index;
pub mod fallback;
pub mod engine;

pub use engine::{RemediationEngine, RemediationStrategy, DEFAULT_TOP_K};
pub use fallback::{fallback_guidance, match_pattern, FixPattern, FIX_PATTERNS, GENERIC_CHECKLIST};
pub use index::{HttpKnowledgeIndex, KnowledgeIndex, UninitializedIndex};
