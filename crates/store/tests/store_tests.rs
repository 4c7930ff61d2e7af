use checkit_assessment::ProductAssessment;
use checkit_store::{SaveOutcome, StoreClient, StoreError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(mock_server: &MockServer) -> StoreClient {
    StoreClient::new(&mock_server.uri(), "test_anon_key", reqwest::Client::new()).unwrap()
}

fn sample_assessment(id: &str) -> ProductAssessment {
    ProductAssessment {
        id: id.to_string(),
        name: "Cola Classic".to_string(),
        brand: "Acme".to_string(),
        image: "https://example.com/cola.jpg".to_string(),
        quick_facts: vec![],
        harmful_additives: vec![],
        ingredients: vec![],
        scientific_evidence: vec![],
    }
}

#[tokio::test]
async fn test_save_scan_inserts_new_row() {
    let mock_server = MockServer::start().await;
    let product = sample_assessment("scanned-1700000000000-0");

    Mock::given(method("GET"))
        .and(path("/rest/v1/scans"))
        .and(query_param("user_id", "eq.user-1"))
        .and(query_param("product_id", "eq.scanned-1700000000000-0"))
        .and(header("apikey", "test_anon_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/scans"))
        .and(header("apikey", "test_anon_key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server).save_scan("user-1", &product).await.unwrap();
    assert!(outcome.is_new);
}

#[tokio::test]
async fn test_save_scan_refreshes_existing_row() {
    let mock_server = MockServer::start().await;
    let product = sample_assessment("scanned-1700000000000-1");

    Mock::given(method("GET"))
        .and(path("/rest/v1/scans"))
        .and(query_param("user_id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 7}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/scans"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = client(&mock_server).save_scan("user-1", &product).await.unwrap();
    assert!(!outcome.is_new);
}

#[tokio::test]
async fn test_list_scans_decodes_product_data() {
    let mock_server = MockServer::start().await;
    let product = sample_assessment("scanned-1700000000000-2");

    Mock::given(method("GET"))
        .and(path("/rest/v1/scans"))
        .and(query_param("user_id", "eq.user-1"))
        .and(query_param("order", "scanned_at.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 12,
                "user_id": "user-1",
                "product_id": product.id.clone(),
                "product_data": &product,
                "scanned_at": "2026-08-28T10:15:00Z"
            }
        ])))
        .mount(&mock_server)
        .await;

    let scans = client(&mock_server).list_scans("user-1").await.unwrap();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans[0].scan_id, 12);
    assert_eq!(scans[0].product, product);
}

#[tokio::test]
async fn test_save_product_short_circuits_when_already_saved() {
    let mock_server = MockServer::start().await;
    let product = sample_assessment("scanned-1700000000000-3");

    Mock::given(method("GET"))
        .and(path("/rest/v1/saved_products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    // No POST mock mounted: an insert attempt would fail the test via 404.
    let outcome = client(&mock_server).save_product("user-1", &product).await.unwrap();
    assert_eq!(outcome, SaveOutcome::AlreadySaved);
}

#[tokio::test]
async fn test_unsave_product() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/saved_products"))
        .and(query_param("user_id", "eq.user-1"))
        .and(query_param("product_id", "eq.scanned-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server).unsave_product("user-1", "scanned-9").await.unwrap();
}

#[tokio::test]
async fn test_get_profile_missing_returns_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .and(query_param("id", "eq.user-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let profile = client(&mock_server).get_profile("user-1").await.unwrap();
    assert!(profile.is_none());
}

#[tokio::test]
async fn test_get_profile_decodes_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "anna", "onboarding_completed": true}
        ])))
        .mount(&mock_server)
        .await;

    let profile = client(&mock_server).get_profile("user-1").await.unwrap().unwrap();
    assert_eq!(profile.username, "anna");
    assert!(profile.onboarding_completed);
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/profiles"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "JWT expired"
        })))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).get_profile("user-1").await.unwrap_err();
    match err {
        StoreError::Api { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("JWT expired"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
