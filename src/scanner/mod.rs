pub mod posture;

pub use posture::{evaluate_posture, PostureScanner, ScanOutcome, SECURITY_HEADERS};
