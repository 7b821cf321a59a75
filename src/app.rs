use std::net::SocketAddr;
use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;
use crate::{auth, wins};

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(auth::router())
        .merge(wins::router())
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!(
                        "http_request",
                        %method,
                        uri = %uri,
                        status = tracing::field::Empty
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        let latency_ms = latency.as_millis() as u64;
                        if status.is_server_error() {
                            tracing::error!(%status, latency_ms, "response");
                        } else {
                            tracing::info!(%status, latency_ms, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        TestServer::new(build_app(AppState::fake())).unwrap()
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn register_and_login(server: &TestServer, email: &str) -> String {
        let creds = json!({ "email": email, "password": "pw" });
        server.post("/register").json(&creds).await.assert_status_ok();
        let response = server.post("/login").json(&creds).await;
        response.assert_status_ok();
        response.json::<Value>()["access_token"]
            .as_str()
            .unwrap()
            .to_owned()
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = server().get("/health").await;
        response.assert_status_ok();
        response.assert_text("ok");
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let server = server();
        let creds = json!({ "email": "a@example.com", "password": "pw" });

        let response = server.post("/register").json(&creds).await;
        response.assert_status_ok();
        response.assert_json(&json!({ "msg": "Registered successfully" }));

        let response = server.post("/register").json(&creds).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "msg": "Email already registered" }));
    }

    #[tokio::test]
    async fn register_with_missing_password() {
        let response = server()
            .post("/register")
            .json(&json!({ "email": "a@example.com" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "msg": "Email and password required" }));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let response = server()
            .post("/register")
            .text("{not json")
            .content_type("application/json")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.json::<Value>()["msg"].is_string());
    }

    #[tokio::test]
    async fn login_with_wrong_password() {
        let server = server();
        register_and_login(&server, "a@example.com").await;

        let response = server
            .post("/login")
            .json(&json!({ "email": "a@example.com", "password": "wrong" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "msg": "Invalid credentials" }));
    }

    #[tokio::test]
    async fn wins_require_a_token() {
        let server = server();

        let response = server.get("/wins").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "msg": "Missing Authorization Header" }));

        let response = server
            .post("/wins")
            .add_header(header::AUTHORIZATION, bearer("garbage"))
            .json(&json!({ "date": "07.02", "desc": "x" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "msg": "Invalid or expired token" }));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let server = server();
        let token = register_and_login(&server, "a@example.com").await;

        for value in ["Basic abc".to_owned(), token.clone()] {
            let response = server
                .get("/wins")
                .add_header(header::AUTHORIZATION, HeaderValue::from_str(&value).unwrap())
                .await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            response.assert_json(&json!({ "msg": "Invalid Authorization header" }));
        }

        // scheme is matched case-insensitively
        let response = server
            .get("/wins")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("bearer {token}")).unwrap(),
            )
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn create_and_list_wins() {
        let server = server();
        let token = register_and_login(&server, "a@example.com").await;

        let response = server
            .post("/wins")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({ "date": "20240702", "desc": "x" }))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "msg": "Win added" }));

        server
            .post("/wins")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({ "date": "07.02", "subject": "y" }))
            .await
            .assert_status_ok();

        let response = server
            .get("/wins")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!([
            { "date": "07.02", "desc": "x", "subject": "x" },
            { "date": "07.02", "desc": "y", "subject": "y" },
        ]));
    }

    #[tokio::test]
    async fn win_without_description_is_unprocessable() {
        let server = server();
        let token = register_and_login(&server, "a@example.com").await;

        let response = server
            .post("/wins")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .json(&json!({ "date": "07.02" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        response.assert_json(&json!({ "msg": "Description required" }));

        let response = server
            .get("/wins")
            .add_header(header::AUTHORIZATION, bearer(&token))
            .await;
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn users_only_see_their_own_wins() {
        let server = server();
        let alice = register_and_login(&server, "alice@example.com").await;
        let bob = register_and_login(&server, "bob@example.com").await;

        server
            .post("/wins")
            .add_header(header::AUTHORIZATION, bearer(&alice))
            .json(&json!({ "date": "01.01", "desc": "alice's win" }))
            .await
            .assert_status_ok();

        let response = server
            .get("/wins")
            .add_header(header::AUTHORIZATION, bearer(&bob))
            .await;
        response.assert_status_ok();
        response.assert_json(&json!([]));
    }
}
