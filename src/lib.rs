pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{TokenIssuer, TokenValidator};
use crate::config::AppConfig;
use crate::database::ForumStore;

/// Shared state handed to every handler. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ForumStore>,
    pub issuer: Arc<TokenIssuer>,
    pub validator: Arc<TokenValidator>,
    pub log_auth_diagnostics: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn ForumStore>, config: &AppConfig) -> Self {
        Self {
            store,
            issuer: Arc::new(TokenIssuer::from_config(&config.security)),
            validator: Arc::new(TokenValidator::from_config(&config.security)),
            log_auth_diagnostics: config.security.log_auth_diagnostics,
        }
    }
}

/// Full application router: public routes, protected routes behind the auth
/// gate, request tracing and CORS.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(state.clone()))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{categories, health, login, threads, users};

    Router::new()
        .route("/health", get(health::health))
        .route("/login", post(login::login))
        .route("/users", post(users::register))
        .route(
            "/threads",
            get(threads::list_threads).post(threads::create_thread),
        )
        .route("/threads/:id", get(threads::get_thread))
        .route("/threads/:id/comments", get(threads::thread_comments))
        .route("/categories", get(categories::list_categories))
        .route("/categories/:id", get(categories::get_category))
        .route("/categories/:id/threads", get(categories::category_threads))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{comments, threads, users};

    Router::new()
        .route("/users/:id", get(users::get_user).delete(users::delete_user))
        .route("/users/:id/threads", get(users::user_threads))
        .route("/users/:id/comments", get(users::user_comments))
        .route(
            "/threads/:id",
            put(threads::update_thread).delete(threads::delete_thread),
        )
        .route("/comments", post(comments::create_comment))
        .route(
            "/comments/:id",
            get(comments::get_comment)
                .put(comments::update_comment)
                .delete(comments::delete_comment),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Credentials cannot be combined with a wildcard origin
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    base.allow_origin(origins).allow_credentials(true)
}
