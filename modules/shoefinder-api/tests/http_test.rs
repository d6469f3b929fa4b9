//! HTTP-level tests for `/analyze` and `/top-selling`.
//!
//! The router runs in-process against a canned text generator and a
//! recording catalog store, so no network or database is needed.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ai_client::{GenerateError, TextGenerator};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shoefinder_api::analysis::AnalysisGateway;
use shoefinder_api::catalog::{CatalogQuery, CatalogRow, CatalogStore, QueryParam};
use shoefinder_api::{build_router, AppState};
use shoefinder_common::CatalogTable;

// ---------------------------------------------------------------------------
// Doubles
// ---------------------------------------------------------------------------

enum Reply {
    Text(&'static str),
    Unauthorized,
}

struct FakeGenerator {
    reply: Reply,
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Unauthorized => Err(GenerateError::Api {
                provider: "Gemini",
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "API key not valid".to_string(),
            }),
        }
    }
}

#[derive(Default)]
struct RecordingCatalog {
    has_type_column: bool,
    fail: bool,
    rows: Vec<CatalogRow>,
    schema_lookups: Mutex<Vec<String>>,
    queries: Mutex<Vec<CatalogQuery>>,
}

#[async_trait]
impl CatalogStore for RecordingCatalog {
    async fn has_type_column(&self, table: CatalogTable) -> anyhow::Result<bool> {
        self.schema_lookups
            .lock()
            .unwrap()
            .push(table.as_str().to_string());
        if self.fail {
            anyhow::bail!("Lost connection to MySQL server during query");
        }
        Ok(self.has_type_column)
    }

    async fn fetch(&self, query: &CatalogQuery) -> anyhow::Result<Vec<CatalogRow>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail {
            anyhow::bail!("Lost connection to MySQL server during query");
        }
        Ok(self.rows.clone())
    }
}

struct Harness {
    app: axum::Router,
    generator: Arc<FakeGenerator>,
    catalog: Arc<RecordingCatalog>,
}

fn harness(reply: Reply, catalog: RecordingCatalog) -> Harness {
    let generator = Arc::new(FakeGenerator {
        reply,
        calls: AtomicUsize::new(0),
    });
    let catalog = Arc::new(catalog);
    let state = Arc::new(AppState {
        analyzer: AnalysisGateway::new(generator.clone()),
        catalog: catalog.clone(),
    });
    Harness {
        app: build_router(state, &[]),
        generator,
        catalog,
    }
}

fn row(value: Value) -> CatalogRow {
    value.as_object().cloned().unwrap()
}

async fn post_json(app: axum::Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

const RED_RUNNING_SHOES: &str = r#"Sure! Here's what I found:
```json
{"gender": "m", "footwear_type": "sport_shoes", "color": "red", "subtype": null, "price_range": {"min": null, "max": 3000}}
```"#;

// ---------------------------------------------------------------------------
// /analyze
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_red_running_shoes_for_men() {
    let h = harness(
        Reply::Text(RED_RUNNING_SHOES),
        RecordingCatalog {
            rows: vec![
                row(json!({"Product Name": "Runner X", "Price": 2499, "Rating": 4.6})),
                row(json!({"Product Name": "Runner Y", "Price": 1999, "Rating": 4.1})),
            ],
            ..Default::default()
        },
    );

    let (status, body) = post_json(
        h.app,
        "/analyze",
        r#"{"text": "red running shoes for men under 3000"}"#,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["Product Name"], "Runner X");

    assert_eq!(
        *h.catalog.schema_lookups.lock().unwrap(),
        vec!["m_product_details_sport_shoes_processed"]
    );
    let queries = h.catalog.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert!(queries[0]
        .sql
        .starts_with("SELECT * FROM m_product_details_sport_shoes_processed WHERE"));
    assert!(queries[0].sql.ends_with("ORDER BY Rating DESC"));
    assert_eq!(
        queries[0].params,
        vec![
            QueryParam::Text(r"(^|\s)red(\s|$)".into()),
            QueryParam::Number(0.0),
            QueryParam::Number(3000.0),
        ]
    );
}

#[tokio::test]
async fn analyze_empty_text_makes_no_outbound_calls() {
    let h = harness(Reply::Text(RED_RUNNING_SHOES), RecordingCatalog::default());

    let (status, body) = post_json(h.app, "/analyze", r#"{"text": ""}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No text provided"}));
    assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
    assert!(h.catalog.schema_lookups.lock().unwrap().is_empty());
    assert!(h.catalog.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_missing_text_field() {
    let h = harness(Reply::Text(RED_RUNNING_SHOES), RecordingCatalog::default());
    let (status, body) = post_json(h.app, "/analyze", r#"{"query": "heels"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No text provided"}));
}

#[tokio::test]
async fn analyze_unparseable_body() {
    let h = harness(Reply::Text(RED_RUNNING_SHOES), RecordingCatalog::default());
    let (status, body) = post_json(h.app, "/analyze", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "No text provided"}));
    assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn analyze_invalid_gender() {
    let h = harness(
        Reply::Text(r#"{"gender": "x", "footwear_type": "sport_shoes", "color": "blue"}"#),
        RecordingCatalog::default(),
    );

    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "blue sport shoes"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid gender or footwear type provided"}));
    assert!(h.catalog.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_type_not_sold_for_gender() {
    let h = harness(
        Reply::Text(r#"{"gender": "m", "footwear_type": "heels"}"#),
        RecordingCatalog::default(),
    );
    let (status, _) = post_json(h.app, "/analyze", r#"{"text": "heels for men"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_subtype_filter_when_type_column_exists() {
    let h = harness(
        Reply::Text(r#"{"gender": "f", "footwear_type": "heels", "subtype": "Stiletto"}"#),
        RecordingCatalog {
            has_type_column: true,
            ..Default::default()
        },
    );

    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "stilettos"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    let queries = h.catalog.queries.lock().unwrap();
    assert!(queries[0].sql.contains("FROM w_product_details_heels_processed"));
    assert!(queries[0].sql.contains("AND Type LIKE ?"));
    assert_eq!(
        queries[0].params.last(),
        Some(&QueryParam::Text("%stiletto%".into()))
    );
}

#[tokio::test]
async fn analyze_reply_without_json_is_500() {
    let h = harness(
        Reply::Text("I'm not sure what you are looking for."),
        RecordingCatalog::default(),
    );
    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "something"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Text analysis failed"}));
}

#[tokio::test]
async fn analyze_truncated_reply_is_500_not_400() {
    let h = harness(
        Reply::Text(r#"{"gender": "m", "footwear_type": "sport_shoes", "price_range": {"min": 0, "max": 3000}"#),
        RecordingCatalog::default(),
    );
    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "running shoes"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Text analysis failed"}));
    assert!(h.catalog.schema_lookups.lock().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_upstream_failure_is_500_without_detail() {
    let h = harness(Reply::Unauthorized, RecordingCatalog::default());
    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "sandals"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Text analysis failed"}));
    assert!(!body.to_string().contains("API key"));
}

#[tokio::test]
async fn analyze_database_failure_is_500() {
    let h = harness(
        Reply::Text(RED_RUNNING_SHOES),
        RecordingCatalog {
            fail: true,
            ..Default::default()
        },
    );
    let (status, body) = post_json(h.app, "/analyze", r#"{"text": "red shoes"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Database query failed"}));
    // Schema lookup failed, so the data query never ran
    assert!(h.catalog.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_injection_payload_stays_bound() {
    let h = harness(
        Reply::Text(
            r#"{"gender": "k", "footwear_type": "school_shoes", "color": "'; DROP TABLE x;--", "subtype": "'; DROP TABLE x;--"}"#,
        ),
        RecordingCatalog {
            has_type_column: true,
            ..Default::default()
        },
    );

    let (status, _) = post_json(h.app, "/analyze", r#"{"text": "school shoes"}"#).await;

    assert_eq!(status, StatusCode::OK);
    let queries = h.catalog.queries.lock().unwrap();
    assert!(!queries[0].sql.contains("DROP"));
    assert_eq!(
        queries[0].sql,
        "SELECT * FROM k_product_details_school_shoes_processed WHERE 1=1 \
         AND REGEXP_LIKE(Description, ?, 'i') AND Price >= ? AND Price <= ? AND Type LIKE ? \
         ORDER BY Rating DESC"
    );
}

// ---------------------------------------------------------------------------
// /top-selling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn top_selling_women() {
    let rows: Vec<CatalogRow> = (0..5)
        .map(|i| row(json!({"Product Name": format!("Shoe {i}"), "Ratings Count": 500 - i * 10})))
        .collect();
    let h = harness(
        Reply::Text("{}"),
        RecordingCatalog {
            rows,
            ..Default::default()
        },
    );

    let (status, body) = post_json(h.app, "/top-selling", r#"{"gender": "f"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["Ratings Count"], 500);

    let queries = h.catalog.queries.lock().unwrap();
    assert_eq!(
        queries[0].sql,
        "SELECT * FROM w_product_details_sport_shoes_processed ORDER BY `Ratings Count` DESC LIMIT 5"
    );
    assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn top_selling_gender_is_case_insensitive() {
    let h = harness(Reply::Text("{}"), RecordingCatalog::default());
    let (status, _) = post_json(h.app, "/top-selling", r#"{"gender": "M"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let queries = h.catalog.queries.lock().unwrap();
    assert!(queries[0]
        .sql
        .contains("FROM m_product_details_sport_shoes_processed"));
}

#[tokio::test]
async fn top_selling_rejects_other_genders() {
    for body in [r#"{"gender": "k"}"#, r#"{"gender": "x"}"#, r#"{}"#, "nope"] {
        let h = harness(Reply::Text("{}"), RecordingCatalog::default());
        let (status, json) = post_json(h.app, "/top-selling", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            json,
            json!({"error": "Invalid gender provided. Use \"m\" or \"f\"."})
        );
        assert!(h.catalog.queries.lock().unwrap().is_empty());
    }
}

#[tokio::test]
async fn top_selling_database_failure_is_500() {
    let h = harness(
        Reply::Text("{}"),
        RecordingCatalog {
            fail: true,
            ..Default::default()
        },
    );
    let (status, body) = post_json(h.app, "/top-selling", r#"{"gender": "m"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Database query failed"}));
}

#[tokio::test]
async fn health_is_ok() {
    let h = harness(Reply::Text("{}"), RecordingCatalog::default());
    let response = h
        .app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
