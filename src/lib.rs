//! Hybrid static/dynamic crawler and HTTP security posture assessment.
//!
//! [`assessment::Assessor`] crawls an origin, scans each discovered page
//! for transport and header gaps, and attaches remediation guidance drawn
//! from a knowledge index or the built-in pattern library.

pub mod assessment;
pub mod config;
pub mod crawler;
pub mod errors;
pub mod http;
pub mod models;
pub mod remediation;
pub mod scanner;

#[cfg(feature = "cli")]
pub mod cli;

pub use assessment::Assessor;
pub use errors::SiteWardenError;
pub use models::AssessmentReport;
