pub mod crawl;
pub mod finding;
pub mod remediation;
pub mod report;

pub use crawl::*;
pub use finding::*;
pub use remediation::*;
pub use report::*;
