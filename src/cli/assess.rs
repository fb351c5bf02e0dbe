use crate::assessment::Assessor;
use crate::cli::commands::AssessArgs;
use crate::config::{self, AssessmentSettings, SiteWardenConfig};
use crate::errors::SiteWardenError;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub async fn handle_assess(args: AssessArgs) -> Result<(), SiteWardenError> {
    info!(target = %args.target, "Starting assessment");

    let file_config = match &args.config {
        Some(config_path) => config::parse_config(&PathBuf::from(config_path)).await?,
        None => SiteWardenConfig::default(),
    };
    let settings = build_settings(&args, &file_config);

    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling assessment");
            ctrl_c_token.cancel();
        }
    });

    let assessor = Assessor::from_settings(&settings)?.with_cancel_token(cancel_token);
    let report = assessor.assess(&args.target, settings.max_pages).await?;

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            info!(path = %path, "Report written");
        }
        None => println!("{}", json),
    }

    info!(
        pages = report.pages.len(),
        findings = report.findings.len(),
        score = report.summary_score,
        "Assessment finished"
    );
    Ok(())
}

/// Config file values with command-line overrides applied.
fn build_settings(args: &AssessArgs, file_config: &SiteWardenConfig) -> AssessmentSettings {
    let mut settings = AssessmentSettings::from_config(file_config);
    if let Some(max_pages) = args.max_pages {
        settings.max_pages = max_pages;
    }
    if args.no_dynamic {
        settings.enable_dynamic = false;
    }
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CrawlConfig;

    fn args() -> AssessArgs {
        AssessArgs {
            target: "https://example.test".into(),
            max_pages: None,
            config: None,
            output: None,
            no_dynamic: false,
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let file_config = SiteWardenConfig {
            crawl: Some(CrawlConfig { max_pages: Some(9), ..Default::default() }),
            ..Default::default()
        };
        let settings = build_settings(&AssessArgs { max_pages: Some(2), no_dynamic: true, ..args() }, &file_config);
        assert_eq!(settings.max_pages, 2);
        assert!(!settings.enable_dynamic);
    }

    #[test]
    fn test_config_used_without_flags() {
        let file_config = SiteWardenConfig {
            crawl: Some(CrawlConfig { max_pages: Some(9), ..Default::default() }),
            ..Default::default()
        };
        let settings = build_settings(&args(), &file_config);
        assert_eq!(settings.max_pages, 9);
        assert!(settings.enable_dynamic);
    }
}
