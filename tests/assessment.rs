use serde_json::json;
use sitewarden::config::{AssessmentSettings, SiteWardenConfig};
use sitewarden::models::{FetchMode, FindingCategory, PageStatus, SuggestionSource};
use sitewarden::{Assessor, SiteWardenError};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn html(paths: &[&str]) -> String {
    let anchors: String = paths.iter().map(|p| format!("<a href=\"{}\">link</a>\n", p)).collect();
    format!("<!DOCTYPE html><html><body>\n{}</body></html>", anchors)
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

fn static_only_settings() -> AssessmentSettings {
    let mut settings = AssessmentSettings::from_config(&SiteWardenConfig::default());
    settings.enable_dynamic = false;
    settings
}

#[tokio::test]
async fn test_static_site_over_plain_http() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(&["/a", "/b", "/c#section", "https://elsewhere.test/x"])).await;
    mount_page(&server, "/a", html(&["/", "/b"])).await;
    mount_page(&server, "/b", html(&[])).await;
    mount_page(&server, "/c", html(&["/a"])).await;

    let assessor = Assessor::from_settings(&static_only_settings()).unwrap();
    let report = assessor.assess(&server.uri(), 10).await.unwrap();

    let base = server.uri();
    let urls: Vec<&str> = report.pages.iter().map(|p| p.record.url.as_str()).collect();
    assert_eq!(urls, vec![
        format!("{}/", base),
        format!("{}/a", base),
        format!("{}/b", base),
        format!("{}/c", base),
    ]);
    assert!(report.pages.iter().all(|p| p.record.fetch_mode == FetchMode::Static));
    assert_eq!(report.crawl.mode, FetchMode::Static);

    // Plain HTTP with no security headers: five findings per page
    assert_eq!(report.findings.len(), 4 * 5);
    for page in &report.pages {
        let categories: Vec<FindingCategory> = report
            .findings_for_page(&page.record.url)
            .map(|f| f.category)
            .collect();
        assert_eq!(categories, vec![
            FindingCategory::NoHttps,
            FindingCategory::MissingCsp,
            FindingCategory::MissingFrameOptions,
            FindingCategory::MissingHsts,
            FindingCategory::MissingContentTypeOptions,
        ]);
    }
    assert_eq!(report.summary_score, 0);
    assert_eq!(report.remediations.len(), 5);
    assert!(report.remediations.iter().all(|r| r.source == SuggestionSource::FallbackLibrary));
}

#[tokio::test]
async fn test_hardened_headers_reduce_findings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Security-Policy", "default-src 'self'")
                .insert_header("X-Frame-Options", "DENY")
                .insert_header("X-Content-Type-Options", "nosniff")
                .set_body_raw(html(&["/a", "/b", "/c"]), "text/html"),
        )
        .mount(&server)
        .await;

    let assessor = Assessor::from_settings(&static_only_settings()).unwrap();
    let report = assessor.assess(&server.uri(), 1).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    let categories: Vec<FindingCategory> = report.findings.iter().map(|f| f.category).collect();
    assert_eq!(categories, vec![FindingCategory::NoHttps, FindingCategory::MissingHsts]);
    assert_eq!(report.summary_score, 100 - 15 - 8);
}

#[tokio::test]
async fn test_failing_page_is_marked_unreachable() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(&["/ok", "/broken", "/also-ok"])).await;
    mount_page(&server, "/ok", html(&[])).await;
    mount_page(&server, "/also-ok", html(&[])).await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let assessor = Assessor::from_settings(&static_only_settings()).unwrap();
    let report = assessor.assess(&server.uri(), 10).await.unwrap();

    assert_eq!(report.pages.len(), 4);
    let broken = report.page(&format!("{}/broken", server.uri())).unwrap();
    assert_eq!(broken.status, PageStatus::Unreachable);
    assert!(broken.error.as_deref().unwrap().contains("500"));
    assert_eq!(report.crawl.failed_fetches.len(), 1);
    assert!(report.findings.iter().all(|f| !f.page_url.ends_with("/broken")));
}

#[tokio::test]
async fn test_unreachable_origin_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let assessor = Assessor::from_settings(&static_only_settings()).unwrap();
    let err = assessor.assess(&server.uri(), 5).await.unwrap_err();
    match err {
        SiteWardenError::OriginUnreachable { origin, .. } => assert!(origin.starts_with(&server.uri())),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_invalid_target_rejected() {
    let assessor = Assessor::from_settings(&static_only_settings()).unwrap();
    let err = assessor.assess("not a url", 5).await.unwrap_err();
    assert!(matches!(err, SiteWardenError::InvalidTarget(_)));
}

#[tokio::test]
async fn test_knowledge_index_guidance_is_used() {
    let site = MockServer::start().await;
    mount_page(&site, "/", html(&["/a", "/b", "/c"])).await;

    let index = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer index-secret"))
        .and(body_partial_json(json!({"k": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chunks": ["Set the header on every response.", "Verify with a scanner."]
        })))
        .mount(&index)
        .await;

    let mut settings = static_only_settings();
    settings.knowledge_endpoint = Some(format!("{}/search", index.uri()));
    settings.knowledge_api_key = Some("index-secret".into());
    settings.top_k = 2;

    let report = Assessor::from_settings(&settings).unwrap().assess(&site.uri(), 1).await.unwrap();

    assert_eq!(report.remediations.len(), 5);
    for suggestion in &report.remediations {
        assert_eq!(suggestion.source, SuggestionSource::KnowledgeIndex);
        assert!(suggestion.guidance_text.starts_with("### Security Pattern 1\n"));
        assert!(suggestion.guidance_text.contains("### Security Pattern 2\nVerify with a scanner."));
    }
}

#[tokio::test]
async fn test_failing_knowledge_index_falls_back() {
    let site = MockServer::start().await;
    mount_page(&site, "/", html(&["/a", "/b", "/c"])).await;

    let index = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&index)
        .await;

    let mut settings = static_only_settings();
    settings.knowledge_endpoint = Some(index.uri());

    let report = Assessor::from_settings(&settings).unwrap().assess(&site.uri(), 1).await.unwrap();

    assert!(!report.findings.is_empty());
    for finding in &report.findings {
        let suggestion = report.remediation_for(finding).unwrap();
        assert_eq!(suggestion.source, SuggestionSource::FallbackLibrary);
        assert!(suggestion.guidance_text.starts_with("HOW TO FIX"));
    }
}
