use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    Form, Json,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::utils::mailer::OutgoingMail;
use crate::AppState;

pub const NEWSLETTER_SUBJECT: &str = "Nova inscrição nas atualizações (Site MovAccess)";

#[derive(Debug, Deserialize)]
pub struct SubscribeForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "success": false, "error": message })))
}

pub fn newsletter_mail(name: &str, email: &str, timestamp: &str) -> OutgoingMail {
    OutgoingMail {
        reply_to: email.to_string(),
        subject: NEWSLETTER_SUBJECT.to_string(),
        body: format!("Nova inscrição:\n\nNome: {name}\nE-mail: {email}\nData/Hora: {timestamp}"),
    }
}

pub async fn method_not_allowed() -> (StatusCode, Json<Value>) {
    failure(StatusCode::METHOD_NOT_ALLOWED, "Método não permitido")
}

pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SubscribeForm>, FormRejection>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let Form(form) = form.map_err(|rejection| {
        tracing::debug!("Rejected newsletter body: {}", rejection);
        failure(StatusCode::BAD_REQUEST, "Dados inválidos")
    })?;

    let name = form.name.trim();
    let email = form.email.trim();
    if name.is_empty() || email.is_empty() || !checkout::is_valid_email(email) {
        return Err(failure(StatusCode::BAD_REQUEST, "Dados inválidos"));
    }

    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let sent = state.mailer.send(newsletter_mail(name, email, &timestamp)).await;

    // the log is written whether or not the mail went out; a failed append only gets logged
    if let Err(e) = state.subscribers.append(&timestamp, name, email).await {
        tracing::warn!(
            "Could not append subscriber to {}: {}",
            state.subscribers.path().display(),
            e
        );
    }

    if let Err(e) = sent {
        tracing::error!("Failed to relay newsletter signup: {}", e);
        return Err(failure(StatusCode::INTERNAL_SERVER_ERROR, "Falha ao enviar e-mail"));
    }

    tracing::info!("Newsletter signup relayed");
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::subscriber_log::SubscriberLog;
    use crate::utils::mailer::{MailError, MockMailer};
    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use http_body_util::BodyExt;
    use lettre::message::Mailbox;
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn router(mailer: MockMailer, csv: &Path) -> Router {
        crate::app(
            Arc::new(AppState {
                mailer: Arc::new(mailer),
                subscribers: SubscriberLog::new(csv),
            }),
            None,
        )
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/subscribe")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn get_is_not_allowed() {
        let dir = tempdir().unwrap();
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let request = Request::builder()
            .uri("/api/subscribe")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(router(mailer, &dir.path().join("log.csv")), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"success": false, "error": "Método não permitido"}));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let dir = tempdir().unwrap();
        for body in ["name=&email=ana%40example.com", "name=Ana&email=ana", "name=Ana", ""] {
            let mut mailer = MockMailer::new();
            mailer.expect_send().never();

            let (status, json) = call(router(mailer, &dir.path().join("log.csv")), post_form(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(json, json!({"success": false, "error": "Dados inválidos"}));
        }
        assert!(!dir.path().join("log.csv").exists());
    }

    #[tokio::test]
    async fn wrong_content_type_is_bad_request() {
        let dir = tempdir().unwrap();
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/subscribe")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"Ana","email":"ana@example.com"}"#))
            .unwrap();
        let (status, _) = call(router(mailer, &dir.path().join("log.csv")), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn signup_is_mailed_and_logged() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("inscricoes.csv");
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|mail| {
                mail.reply_to == "ana@example.com"
                    && mail.subject == NEWSLETTER_SUBJECT
                    && mail.body.contains("Nome: Ana, Souza")
            })
            .times(1)
            .returning(|_| Ok(()));

        let (status, body) = call(
            router(mailer, &csv),
            post_form("name=+Ana%2C+Souza+&email=ana%40example.com"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        let logged = std::fs::read_to_string(&csv).unwrap();
        assert!(logged.ends_with(",Ana  Souza,ana@example.com\n"), "{logged}");
    }

    #[tokio::test]
    async fn mail_failure_is_server_error_but_signup_is_logged() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("inscricoes.csv");
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| {
            let err = "not a mailbox".parse::<Mailbox>().unwrap_err();
            Err(MailError::Address(err))
        });

        let (status, body) = call(
            router(mailer, &csv),
            post_form("name=Ana&email=ana%40example.com"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "error": "Falha ao enviar e-mail"}));
        let logged = std::fs::read_to_string(&csv).unwrap();
        assert!(logged.ends_with(",Ana,ana@example.com\n"), "{logged}");
    }

    #[tokio::test]
    async fn log_failure_still_succeeds() {
        let dir = tempdir().unwrap();
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let unwritable = dir.path().join("missing").join("inscricoes.csv");
        let (status, body) = call(
            router(mailer, &unwritable),
            post_form("name=Ana&email=ana%40example.com"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
    }

    #[test]
    fn mail_body_lists_the_signup() {
        let mail = newsletter_mail("Ana", "ana@example.com", "2026-10-19 09:30:00");
        assert_eq!(
            mail.body,
            "Nova inscrição:\n\nNome: Ana\nE-mail: ana@example.com\nData/Hora: 2026-10-19 09:30:00"
        );
        assert_eq!(mail.reply_to, "ana@example.com");
    }
}
