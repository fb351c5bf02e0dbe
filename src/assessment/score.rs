use crate::models::{Finding, Severity};

/// Score deducted per finding of the given severity.
pub fn penalty(severity: Severity) -> u32 {
    match severity {
        Severity::High => 15,
        Severity::Medium => 8,
        Severity::Low => 3,
    }
}

/// 100 minus the summed penalties, floored at 0. Depends only on `findings`.
pub fn summary_score(findings: &[Finding]) -> u32 {
    let total: u32 = findings.iter().map(|f| penalty(f.severity())).sum();
    100u32.saturating_sub(total)
}
