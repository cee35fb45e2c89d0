//! HTTP API over the song service.

mod docs;
mod error;
mod handlers;

use axum::routing::get;
use axum::Router;
use songlib_service::SongService;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use docs::{OPENAPI_PATH, SWAGGER_PATH};

/// Build the API router, including the Swagger UI and its OpenAPI document.
pub fn router(service: SongService) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/songs",
            get(handlers::list_songs).post(handlers::create_song),
        )
        .route(
            "/songs/{id}",
            get(handlers::get_text)
                .put(handlers::update_song)
                .delete(handlers::delete_song),
        )
        .merge(SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, docs::ApiDoc::openapi()))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use songlib_service::{EnrichError, EnrichResult, MetadataSource, SongDetail};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StubSource {
        available: bool,
    }

    #[async_trait]
    impl MetadataSource for StubSource {
        fn name(&self) -> &str {
            "stub"
        }

        async fn fetch(&self, _group: &str, _song: &str) -> EnrichResult<SongDetail> {
            if self.available {
                Ok(SongDetail {
                    release_date: "2020".to_string(),
                    text: "verse1\n\nverse2\n\nverse3".to_string(),
                    link: "http://x".to_string(),
                })
            } else {
                Err(EnrichError::Status {
                    source_name: "stub".to_string(),
                    status: 503,
                })
            }
        }
    }

    fn app(dir: &TempDir, available: bool) -> Router {
        let service = SongService::new(
            dir.path().join("songs.db"),
            Arc::new(StubSource { available }),
        );
        router(service)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, group: &str, song: &str) -> i64 {
        let (status, body) = send(
            app,
            "POST",
            "/songs",
            Some(json!({"group": group, "song": song})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        let id = create(&app, "A", "B").await;
        create(&app, "A", "C").await;

        let (status, body) = send(&app, "GET", "/songs?group=A&song=B", None).await;
        assert_eq!(status, StatusCode::OK);
        let songs = body["songs"].as_array().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0]["id"], json!(id));
        assert_eq!(songs[0]["releaseDate"], json!("2020"));
        assert_eq!(songs[0]["verses"], json!(["verse1", "verse2", "verse3"]));
    }

    #[tokio::test]
    async fn test_list_with_bad_paging_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        create(&app, "A", "B").await;

        let (status, body) = send(&app, "GET", "/songs?offset=zero&limit=1000", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["songs"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_text_pages() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        let id = create(&app, "A", "B").await;

        let (status, body) = send(&app, "GET", &format!("/songs/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], json!("verse1\n\nverse2\n\nverse3"));

        let uri = format!("/songs/{id}?offset=2&limit=2");
        let (_, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(body["text"], json!("verse3"));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        let id = create(&app, "A", "B").await;

        let update = json!({
            "group": "A",
            "song": "B (Remastered)",
            "releaseDate": "2021",
            "text": "new verse",
            "link": "http://y",
        });
        let (status, _) = send(&app, "PUT", &format!("/songs/{id}"), Some(update)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, "GET", &format!("/songs/{id}"), None).await;
        assert_eq!(body["text"], json!("new verse"));

        let (status, _) = send(&app, "DELETE", &format!("/songs/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = send(&app, "GET", &format!("/songs/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_song_is_404() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        let update = json!({
            "group": "A",
            "song": "B",
            "releaseDate": "",
            "text": "",
            "link": "",
        });

        let (status, _) = send(&app, "PUT", "/songs/99", Some(update)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", "/songs/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "GET", "/songs/0", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_song_routes() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);

        let (status, body) = send(&app, "GET", OPENAPI_PATH, None).await;
        assert_eq!(status, StatusCode::OK);
        let paths = body["paths"].as_object().unwrap();
        assert!(paths.contains_key("/songs"));
        assert!(paths.contains_key("/songs/{id}"));
        assert!(paths["/songs"]["get"].is_object());
        assert!(paths["/songs"]["post"].is_object());
        assert!(paths["/songs/{id}"]["delete"].is_object());
        assert!(body["components"]["schemas"]["Song"].is_object());
    }

    #[tokio::test]
    async fn test_swagger_ui_is_served() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);

        let request = Request::builder()
            .uri(format!("{SWAGGER_PATH}/"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_query_is_400() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);

        let (status, body) = send(&app, "GET", "/songs/1?offset=1&offset=2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_bad_input_is_400() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);

        let (status, body) = send(&app, "GET", "/songs/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], json!("invalid song ID"));

        let (status, _) = send(&app, "POST", "/songs", Some(json!({"group": "A"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "POST", "/songs", Some(json!({"group": " ", "song": "B"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&app, "PUT", "/songs/1", Some(json!({"group": "A"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_500_and_stores_nothing() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, false);

        let (status, body) = send(&app, "POST", "/songs", Some(json!({"group": "A", "song": "B"}))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], json!("failed to create song"));

        let (_, body) = send(&app, "GET", "/songs", None).await;
        assert_eq!(body["songs"], json!([]));
    }
}
