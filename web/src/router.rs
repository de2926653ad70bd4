use crate::{
    controller::{auth_controller, health_check_controller, user_controller},
    middleware::auth::require_login,
    AppState,
};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

pub fn define_routes(app_state: AppState) -> Router {
    let session_layer = session_layer(&app_state);

    Router::new()
        .merge(health_routes())
        .merge(auth_routes(app_state.clone()))
        .merge(user_routes())
        .layer(session_layer)
}

fn session_layer(app_state: &AppState) -> SessionManagerLayer<MemoryStore> {
    let expiry_seconds = i64::try_from(app_state.config.session_expiry_seconds).unwrap_or(i64::MAX);

    // Lax, not Strict: the callback arrives as a cross-site navigation from Zalo
    // and must carry the cookie holding the PKCE verifier.
    SessionManagerLayer::new(MemoryStore::default())
        .with_same_site(SameSite::Lax)
        .with_secure(app_state.strategy.config().callback_url().scheme() == "https")
        .with_expiry(Expiry::OnInactivity(Duration::seconds(expiry_seconds)))
}

fn auth_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/zalo", get(auth_controller::authenticate))
        .route("/auth/zalo/callback", get(auth_controller::authenticate))
        .with_state(app_state)
}

fn user_routes() -> Router {
    Router::new()
        .route("/me", get(user_controller::me))
        .route_layer(from_fn(require_login))
        .route("/logout", post(user_controller::logout))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}
