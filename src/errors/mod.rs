pub mod types;
pub mod classification;

pub use types::SiteWardenError;
pub use classification::ErrorClassification;
