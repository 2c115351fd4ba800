use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use dotenvy::dotenv;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod config {
    pub mod app_config;
}
mod handlers {
    pub mod subscribe_handlers;
}
mod repositories {
    pub mod subscriber_log;
}
mod utils {
    pub mod mailer;
}

use config::app_config::AppConfig;
use handlers::subscribe_handlers;
use repositories::subscriber_log::SubscriberLog;
use utils::mailer::{Mailer, SmtpMailer};

pub struct AppState {
    pub mailer: Arc<dyn Mailer>,
    pub subscribers: SubscriberLog,
}

async fn health_check() -> &'static str {
    "OK"
}

pub fn app(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    let mut router = Router::new()
        .route("/api/health", get(health_check))
        .route(
            "/api/subscribe",
            post(subscribe_handlers::subscribe).fallback(subscribe_handlers::method_not_allowed),
        );

    // client-side routes like /checkout and /sucesso resolve to the wasm shell
    if let Some(dir) = static_dir {
        router = router.fallback_service(
            ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html"))),
        );
    }

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(
            CorsLayer::new()
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_origin(Any)
                .allow_headers([axum::http::header::CONTENT_TYPE]),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    let mailer = SmtpMailer::new(&config.smtp, &config.newsletter_from, &config.newsletter_to)
        .context("failed to set up the smtp transport")?;

    let state = Arc::new(AppState {
        mailer: Arc::new(mailer),
        subscribers: SubscriberLog::new(config.subscribers_csv.clone()),
    });

    let app = app(state, config.static_dir.as_deref());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::mailer::MockMailer;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn state(csv: &Path) -> Arc<AppState> {
        Arc::new(AppState {
            mailer: Arc::new(MockMailer::new()),
            subscribers: SubscriberLog::new(csv),
        })
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let dir = tempdir().unwrap();
        let response = app(state(&dir.path().join("log.csv")), None)
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn client_routes_fall_back_to_index() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>MovAccess</html>").unwrap();

        let response = app(state(&dir.path().join("log.csv")), Some(dir.path()))
            .oneshot(Request::builder().uri("/checkout?plano=premium").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>MovAccess</html>");
    }

    #[tokio::test]
    async fn unknown_api_route_without_static_dir_is_404() {
        let dir = tempdir().unwrap();
        let response = app(state(&dir.path().join("log.csv")), None)
            .oneshot(Request::builder().uri("/api/nothing").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
