use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use clap::Parser;
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{json, Value};
use tower::ServiceExt;
use url::Url;

use service::config::Config;
use web::{router::define_routes, AppState};
use zalo_auth::providers::urls_with_base;

fn config(zalo_base: &str) -> Config {
    Config::parse_from([
        "zalo_login_rs",
        "--zalo-app-id",
        "app-1",
        "--zalo-app-secret",
        "app-secret",
        "--zalo-callback-url",
        "http://localhost:4000/auth/zalo/callback",
        "--http-max-retries",
        "0",
    ])
    .set_zalo_urls(urls_with_base(zalo_base))
}

fn app(server: &ServerGuard) -> Router {
    define_routes(AppState::new(config(&server.url())).unwrap())
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// The `name=value` part of the response's session cookie.
fn session_cookie(response: &Response<Body>) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("location header")
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn app_state_requires_zalo_credentials() {
    let config = Config::parse_from(["zalo_login_rs"]);
    assert!(AppState::new(config).is_err());
}

#[tokio::test]
async fn health_check_responds() {
    let server = Server::new_async().await;

    let response = app(&server).oneshot(get("/health", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn start_redirects_to_zalo_and_sets_lax_cookie() {
    let server = Server::new_async().await;

    let response = app(&server).oneshot(get("/auth/zalo", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("SameSite=Lax"));

    let url = Url::parse(&location(&response)).unwrap();
    let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
    assert_eq!(url.path(), "/v4/permission");
    assert_eq!(params["app_id"], "app-1");
    assert_eq!(
        params["redirect_uri"],
        "http://localhost:4000/auth/zalo/callback"
    );
    assert!(params.contains_key("code_challenge"));
    assert!(!params.contains_key("code_verifier"));
}

#[tokio::test]
async fn callback_without_session_is_unauthorized() {
    let mut server = Server::new_async().await;
    let token = server
        .mock("POST", "/v4/access_token")
        .expect(0)
        .create_async()
        .await;

    let response = app(&server)
        .oneshot(get("/auth/zalo/callback?code=abc", None))
        .await
        .unwrap();

    token.assert_async().await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_requires_login() {
    let server = Server::new_async().await;

    let response = app(&server).oneshot(get("/me", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_login_flow_stores_user_in_session() {
    let mut server = Server::new_async().await;
    let app = app(&server);

    let start = app.clone().oneshot(get("/auth/zalo", None)).await.unwrap();
    let cookie = session_cookie(&start);

    let token = server
        .mock("POST", "/v4/access_token")
        .match_header("secret_key", "app-secret")
        .match_body(Matcher::UrlEncoded("code".into(), "auth-code".into()))
        .with_status(200)
        .with_body(json!({ "access_token": "tok", "expires_in": "3600" }).to_string())
        .expect(1)
        .create_async()
        .await;
    let profile = server
        .mock("GET", "/v2.0/me")
        .match_header("access_token", "tok")
        .match_query(Matcher::UrlEncoded("access_token".into(), "tok".into()))
        .with_status(200)
        .with_body(
            json!({
                "id": "8000",
                "name": "Lan",
                "picture": { "data": { "url": "https://s120.zalo.me/a.jpg" } }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let callback = app
        .clone()
        .oneshot(get("/auth/zalo/callback?code=auth-code", Some(&cookie)))
        .await
        .unwrap();

    token.assert_async().await;
    profile.assert_async().await;
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "/me");

    // The session id is cycled on login.
    let cookie = session_cookie(&callback);
    let me = app.clone().oneshot(get("/me", Some(&cookie))).await.unwrap();
    assert_eq!(me.status(), StatusCode::OK);

    let body = to_bytes(me.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        body,
        json!({
            "status_code": 200,
            "data": {
                "id": "8000",
                "name": "Lan",
                "picture": "https://s120.zalo.me/a.jpg"
            }
        })
    );

    let logout = Request::builder()
        .method("POST")
        .uri("/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let logout = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = app.oneshot(get("/me", Some(&cookie))).await.unwrap();
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_code_is_unauthorized() {
    let mut server = Server::new_async().await;
    let app = app(&server);

    let start = app.clone().oneshot(get("/auth/zalo", None)).await.unwrap();
    let cookie = session_cookie(&start);

    let _token = server
        .mock("POST", "/v4/access_token")
        .with_status(200)
        .with_body(json!({ "error": -14014, "error_name": "Invalid code" }).to_string())
        .create_async()
        .await;

    let callback = app
        .oneshot(get("/auth/zalo/callback?code=stale", Some(&cookie)))
        .await
        .unwrap();

    assert_eq!(callback.status(), StatusCode::UNAUTHORIZED);
}
