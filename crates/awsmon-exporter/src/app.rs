//! HTTP exposition boundary: serves the registry's current snapshot.

use awsmon_collector::CollectorRegistry;
use awsmon_metrics::encode_text;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub struct AppState {
    pub registry: CollectorRegistry,
    pub metrics_path: String,
}

pub fn build_http_app(state: Arc<AppState>) -> Router {
    let metrics_path = state.metrics_path.clone();
    Router::new()
        .route("/", get(index))
        .route(&metrics_path, get(metrics))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        "<html><head><title>AWS API Exporter</title></head>\
         <body><h1>AWS API Exporter</h1>\
         <p><a href=\"{0}\">{0}</a></p></body></html>",
        state.metrics_path
    ))
}

/// One scrape: runs every registered collector and serializes the aggregated
/// families as Prometheus text.
async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let families = state.registry.collect_all().await;
    let body = encode_text(&families);
    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use awsmon_collector::ResourceCollector;
    use awsmon_metrics::MetricFamily;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    struct StubCollector {
        fail: bool,
    }

    #[async_trait::async_trait]
    impl ResourceCollector for StubCollector {
        fn name(&self) -> &'static str {
            "StubCollector"
        }

        async fn collect_metrics(&self) -> Result<Vec<MetricFamily>> {
            if self.fail {
                anyhow::bail!("simulated outage");
            }
            let mut family = MetricFamily::gauge("stub_metric", "Stub metric", &["id"]);
            family.add_sample(vec!["a".to_string()], 1.0);
            Ok(vec![family])
        }
    }

    fn test_app(fail: bool) -> Router {
        let mut registry = CollectorRegistry::new();
        registry.register(Box::new(StubCollector { fail }));
        build_http_app(Arc::new(AppState {
            registry,
            metrics_path: "/metrics".to_string(),
        }))
    }

    async fn get_body(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .uri(path)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("request succeeds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn should_serve_exposition_payload_on_metrics_path() {
        let (status, body) = get_body(test_app(false), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("# TYPE stub_metric gauge"));
        assert!(body.contains("stub_metric{id=\"a\"} 1"));
    }

    #[tokio::test]
    async fn should_surface_collector_failure_as_error_metric() {
        let (status, body) = get_body(test_app(true), "/metrics").await;

        // The scrape itself still succeeds; the failure is visible in-band.
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(awsmon_collector::ERROR_FAMILY_NAME));
        assert!(body.contains("collector_type=\"StubCollector\""));
        assert!(body.contains("simulated outage"));
    }

    #[tokio::test]
    async fn should_link_metrics_path_from_index() {
        let (status, body) = get_body(test_app(false), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("href=\"/metrics\""));
    }
}
