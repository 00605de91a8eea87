//! Handlers for the cloud search/add gateway.
//!
//! Serves the embedded form page and proxies its two actions to the
//! upstream APIs. Client and upstream failures both come back as HTTP 200
//! envelopes with `success: false`, which is the contract the page's
//! JavaScript expects.

use axum::{
    Json,
    body::Bytes,
    extract::{Form, State},
    response::Html,
};
use tracing::warn;

use crate::api::dto::{AddRequest, ApiResponse, SearchForm, TokenStatus};
use crate::external::cloud::AddTask;
use crate::state::GatewayState;

const INDEX_HTML: &str = include_str!("../../../assets/index.html");

/// GET / - embedded search/add form page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health - liveness envelope.
pub async fn health() -> Json<ApiResponse> {
    Json(ApiResponse::ok("ok"))
}

/// GET /token-status - debug view of the cached login token.
pub async fn token_status(State(state): State<GatewayState>) -> Json<TokenStatus> {
    let expires_at = state.cloud.token_status().await;
    Json(TokenStatus::new(state.cloud.credential_mode(), expires_at))
}

/// POST /search - form-encoded keyword search.
pub async fn search(
    State(state): State<GatewayState>,
    Form(form): Form<SearchForm>,
) -> Json<ApiResponse> {
    let keyword = form.keyword.trim();
    if keyword.is_empty() {
        return Json(ApiResponse::failure("keyword must not be empty"));
    }

    match state.search.search(keyword).await {
        Ok(results) => Json(ApiResponse::results(results)),
        Err(e) => {
            warn!(error = %e, "search failed");
            Json(ApiResponse::failure(e.to_string()))
        }
    }
}

/// POST /add - JSON add-resource request.
pub async fn add(State(state): State<GatewayState>, body: Bytes) -> Json<ApiResponse> {
    let request: AddRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            return Json(ApiResponse::failure(format!("invalid JSON body: {}", e)));
        }
    };

    if request.local_path.is_empty() || request.share_code.is_empty() {
        return Json(ApiResponse::failure(
            "localPath and shareCode are required",
        ));
    }

    let task = AddTask {
        local_path: request.local_path,
        share_code: request.share_code,
        share_access_code: request.share_access_code,
    };

    match state.cloud.add(&task).await {
        Ok(message) => Json(ApiResponse::ok(message)),
        Err(e) => {
            warn!(error = %e, "add failed");
            Json(ApiResponse::failure(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value as JsonValue, json};
    use tower::util::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::routes::gateway_router;
    use crate::config::GatewayConfig;
    use crate::state::GatewayState;

    fn router_for(server: &MockServer) -> axum::Router {
        gateway_router(GatewayState::new(GatewayConfig {
            search_api_url: format!("{}/api/search", server.uri()),
            add_api_url: format!("{}/api/add", server.uri()),
            auth_token: Some("Token secret".to_string()),
            ..Default::default()
        }))
    }

    async fn body_value(response: axum::response::Response) -> JsonValue {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_search_returns_results_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 0,
                "data": { "merged_by_type": { "tianyi": [{ "note": "Movie" }] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/search")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("keyword=movie"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["results"][0]["note"], "Movie");
    }

    #[tokio::test]
    async fn test_search_empty_keyword_fails_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/search")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("keyword=++"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], false);
    }

    #[tokio::test]
    async fn test_search_upstream_failure_is_200_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/search")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("keyword=movie"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], false);
    }

    #[tokio::test]
    async fn test_add_happy_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/add"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 42 })))
            .expect(1)
            .mount(&server)
            .await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/add")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"localPath":"/media","shareCode":"abc","shareAccessCode":""}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], true);
        assert!(envelope["message"].as_str().unwrap().contains("42"));
    }

    #[tokio::test]
    async fn test_add_missing_fields_fails_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/add")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"localPath":"/media"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], false);
    }

    #[tokio::test]
    async fn test_add_malformed_json_is_envelope_failure() {
        let server = MockServer::start().await;

        let response = router_for(&server)
            .oneshot(
                Request::post("/add")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], false);
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        let response = router_for(&server)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let envelope = body_value(response).await;
        assert_eq!(envelope["success"], true);
    }

    #[tokio::test]
    async fn test_token_status_static_mode() {
        let server = MockServer::start().await;
        let response = router_for(&server)
            .oneshot(Request::get("/token-status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let status = body_value(response).await;
        assert_eq!(status["mode"], "static");
        assert_eq!(status["cached"], false);
    }

    #[tokio::test]
    async fn test_index_serves_form_page() {
        let server = MockServer::start().await;
        let response = router_for(&server)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<form"));
    }
}
