pub mod aggregator;
pub mod score;

pub use aggregator::{generator_version, Assessor};
pub use score::{penalty, summary_score};
