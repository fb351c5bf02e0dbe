use std::path::Path;
use crate::errors::SiteWardenError;
use super::types::{SiteWardenConfig, MAX_WORKERS};
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<SiteWardenConfig, SiteWardenError> {
    if !path.exists() {
        return Err(SiteWardenError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(SiteWardenError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Parse YAML text into a validated config. An empty document yields defaults.
pub fn parse_config_str(content: &str) -> Result<SiteWardenConfig, SiteWardenError> {
    if content.trim().is_empty() {
        return Ok(SiteWardenConfig::default());
    }

    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    validate_schema(&yaml)?;

    let config: SiteWardenConfig = serde_yaml::from_value(yaml)?;

    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema. Advisory: problems are logged.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), SiteWardenError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| SiteWardenError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| SiteWardenError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %e, path = %e.instance_path, "Config schema warning");
        }
    }

    Ok(())
}

fn validate_semantics(config: &SiteWardenConfig) -> Result<(), SiteWardenError> {
    if let Some(crawl) = &config.crawl {
        if crawl.max_pages == Some(0) {
            return Err(SiteWardenError::Config("crawl.max_pages must be at least 1".into()));
        }
        if crawl.dynamic_threshold == Some(0) {
            return Err(SiteWardenError::Config("crawl.dynamic_threshold must be at least 1".into()));
        }
    }

    if let Some(timeouts) = &config.timeouts {
        for (name, value) in [
            ("static_fetch_secs", timeouts.static_fetch_secs),
            ("dynamic_render_secs", timeouts.dynamic_render_secs),
            ("index_query_secs", timeouts.index_query_secs),
        ] {
            if value == Some(0) {
                return Err(SiteWardenError::Config(format!("timeouts.{} must be greater than 0", name)));
            }
        }
    }

    if let Some(workers) = config.scan.as_ref().and_then(|s| s.workers) {
        if workers == 0 || workers > MAX_WORKERS {
            return Err(SiteWardenError::Config(format!(
                "scan.workers must be between 1 and {}, got {}",
                MAX_WORKERS, workers
            )));
        }
    }

    if let Some(knowledge) = &config.knowledge {
        if knowledge.top_k == Some(0) {
            return Err(SiteWardenError::Config("knowledge.top_k must be at least 1".into()));
        }
        if let Some(endpoint) = &knowledge.endpoint {
            if url::Url::parse(endpoint).is_err() {
                return Err(SiteWardenError::Config(format!("knowledge.endpoint is not a valid URL: {}", endpoint)));
            }
        }
        if knowledge.api_key.is_some() && knowledge.endpoint.is_none() {
            warn!("knowledge.api_key set without knowledge.endpoint; it will be ignored");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
crawl:
  max_pages: 15
  dynamic_threshold: 4
  enable_dynamic: false
timeouts:
  static_fetch_secs: 5
scan:
  workers: 3
knowledge:
  endpoint: "http://localhost:8900/search"
  top_k: 2
"#;
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.crawl.as_ref().unwrap().max_pages, Some(15));
        assert_eq!(config.scan.as_ref().unwrap().workers, Some(3));
        assert_eq!(config.knowledge.as_ref().unwrap().top_k, Some(2));
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_config_str("   \n").unwrap();
        assert!(config.crawl.is_none());
    }

    #[test]
    fn test_workers_out_of_range() {
        let err = parse_config_str("scan:\n  workers: 11\n").unwrap_err();
        assert!(matches!(err, SiteWardenError::Config(_)));
        assert!(parse_config_str("scan:\n  workers: 0\n").is_err());
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(parse_config_str("crawl:\n  dynamic_threshold: 0\n").is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = parse_config_str("timeouts:\n  index_query_secs: 0\n").unwrap_err();
        assert!(err.to_string().contains("index_query_secs"));
    }

    #[test]
    fn test_zero_settle_allowed() {
        assert!(parse_config_str("timeouts:\n  settle_secs: 0\n").is_ok());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        assert!(parse_config_str("knowledge:\n  endpoint: \"not a url\"\n").is_err());
    }

    #[test]
    fn test_malformed_yaml_is_yaml_error() {
        let err = parse_config_str("crawl: [unclosed").unwrap_err();
        assert!(matches!(err, SiteWardenError::Yaml(_)));
    }

    #[test]
    fn test_unknown_key_is_advisory() {
        assert!(parse_config_str("crawl:\n  max_pages: 2\n  speed: fast\n").is_ok());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = parse_config(Path::new("/nonexistent/sitewarden.yaml")).await.unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
