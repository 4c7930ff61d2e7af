//! End-to-end pipeline tests with both external services mocked.

use checkit::{AssessmentConfig, Checkit, CheckitConfig, Error, Severity};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Wire a checkit client against a mock catalog and a mock chat-completion
/// endpoint.
fn checkit_client(catalog: &MockServer, openai: &MockServer) -> Checkit {
    let config = CheckitConfig::new("test_api_key", "http://localhost:54321", "test_anon_key")
        .with_catalog_url(&catalog.uri())
        .with_assessment(AssessmentConfig::new("test_api_key").with_base_url(&openai.uri()));
    Checkit::new(config).unwrap()
}

fn assessment_content() -> String {
    json!({
        "name": "Cola Classic",
        "brand": "Acme",
        "image": "https://example.com/cola.jpg",
        "quickFacts": [
            {"label": "ADDITIVES", "value": "1 concerning", "icon": "⚠️", "type": "warning"},
            {"label": "SUGAR", "value": "10.6g per 100g", "icon": "🍬", "type": "danger"},
            {"label": "PROCESSING", "value": "NOVA 4", "icon": "🏭", "type": "danger"},
            {"label": "PROTEIN", "value": "0g per 100g", "icon": "💪", "type": "warning"}
        ],
        "harmfulAdditives": [],
        "ingredients": [
            {"name": "Water", "safe": true, "desc": "Base ingredient"},
            {"name": "Sugar", "safe": false, "desc": "High amount"}
        ],
        "scientificEvidence": []
    })
    .to_string()
}

async fn mount_completion(openai: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ]
        })))
        .mount(openai)
        .await;
}

#[tokio::test]
async fn test_analyze_by_barcode_full_pipeline() {
    let catalog = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/5449000000996.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": {
                "product_name": "Cola Classic",
                "brands": "Acme",
                "ingredients_text": "Water, sugar, caramel coloring",
                "nutriments": {"energy_100g": 180.0, "sugars_100g": 10.6}
            }
        })))
        .mount(&catalog)
        .await;
    mount_completion(&openai, &assessment_content()).await;

    let assessment = checkit_client(&catalog, &openai)
        .analyze_by_barcode("5449000000996")
        .await
        .unwrap();

    assert!(assessment.id.starts_with("scanned-"));
    assert_eq!(assessment.name, "Cola Classic");
    assert_eq!(assessment.quick_facts.len(), 4);
    assert_eq!(assessment.quick_facts[1].severity, Severity::Danger);
    assert!(assessment.harmful_additives.is_empty());
    assert_eq!(assessment.ingredients.len(), 2);
}

#[tokio::test]
async fn test_unknown_barcode_still_produces_assessment() {
    let catalog = MockServer::start().await;
    let openai = MockServer::start().await;

    // Catalog reports not-found; the pipeline must keep going regardless.
    Mock::given(method("GET"))
        .and(path("/api/v0/product/5000112546415.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": 0})),
        )
        .mount(&catalog)
        .await;
    mount_completion(&openai, &assessment_content()).await;

    let result = checkit_client(&catalog, &openai)
        .analyze_by_barcode("5000112546415")
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_repeated_analysis_differs_only_in_id() {
    let catalog = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/X.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 1,
            "product": {
                "product_name": "Cola Classic",
                "brands": "Acme",
                "ingredients_text": "Water, sugar",
                "nutriments": {"sugars_100g": 10.6}
            }
        })))
        .mount(&catalog)
        .await;
    mount_completion(&openai, &assessment_content()).await;

    let client = checkit_client(&catalog, &openai);
    let first = client.analyze_by_barcode("X").await.unwrap();
    let second = client.analyze_by_barcode("X").await.unwrap();

    assert_ne!(first.id, second.id);
    let mut second_with_first_id = second.clone();
    second_with_first_id.id = first.id.clone();
    assert_eq!(first, second_with_first_id);
}

#[tokio::test]
async fn test_assessment_failure_surfaces_to_caller() {
    let catalog = MockServer::start().await;
    let openai = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v0/product/1.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": 0})),
        )
        .mount(&catalog)
        .await;
    mount_completion(&openai, "{not valid json").await;

    let err = checkit_client(&catalog, &openai)
        .analyze_by_barcode("1")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Assessment(_)));
}

#[tokio::test]
async fn test_analyze_by_name_skips_catalog() {
    let catalog = MockServer::start().await;
    let openai = MockServer::start().await;

    // No catalog mock: a catalog request would 404 and the test would still
    // pass lookup (sentinel), but the name path must not touch it at all.
    mount_completion(&openai, &assessment_content()).await;

    let assessment = checkit_client(&catalog, &openai)
        .analyze_by_name("Cola Classic")
        .await
        .unwrap();

    assert_eq!(assessment.name, "Cola Classic");
    assert_eq!(catalog.received_requests().await.unwrap().len(), 0);
}
