/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use onboard_api::{app::AppState, config::Config};
/// use onboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let state = AppState::new(pool, config);
/// let app = onboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use onboard_shared::{
    auth::middleware::authenticate,
    classifier::{CompletionProvider, OpenAiConfig, OpenAiProvider, PathClassifier, UnavailableProvider},
    db::DbPool,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: DbPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Onboarding path classifier
    pub classifier: PathClassifier,
}

impl AppState {
    /// Creates application state with the completion provider from `config`
    pub fn new(db: DbPool, config: Config) -> Self {
        let classifier = PathClassifier::new(completion_provider(&config));
        Self::with_classifier(db, config, classifier)
    }

    /// Creates application state around an existing classifier
    pub fn with_classifier(db: DbPool, config: Config, classifier: PathClassifier) -> Self {
        Self {
            db,
            config: Arc::new(config),
            classifier,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    pub fn token_lifetime(&self) -> chrono::Duration {
        self.config.token_lifetime()
    }
}

/// Chooses the completion provider for the configured credentials
///
/// Without an API key every completion call fails and the classifier
/// answers with its fallbacks.
pub fn completion_provider(config: &Config) -> Arc<dyn CompletionProvider> {
    let Some(api_key) = config.openai.api_key.clone() else {
        tracing::warn!("OPENAI_API_KEY not set; path classification will use fallbacks");
        return Arc::new(UnavailableProvider);
    };

    let settings = OpenAiConfig {
        api_key,
        model: config.openai.model.clone(),
        base_url: config.openai.base_url.clone(),
        timeout: Duration::from_secs(config.openai.timeout_seconds),
    };

    match OpenAiProvider::new(settings) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize completion client; using fallbacks");
            Arc::new(UnavailableProvider)
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /api
/// ├── GET  /health                      # Health check (public)
/// ├── GET  /paths                       # Path catalog (public)
/// ├── /auth/
/// │   ├── POST /signup                  # Create account (public)
/// │   ├── POST /login                   # Login (public)
/// │   └── GET  /me                      # Current user (bearer)
/// └── /users/                           # All bearer-authenticated
///     ├── GET  /                        # Admin user list
///     ├── GET  /profile                 # Profile and assigned path
///     ├── PUT  /profile                 # Submit profile, get a path
///     ├── GET  /checklist               # Checklist with progress
///     └── PUT  /checklist/:index        # Mark an item (un)completed
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_layer = || axum::middleware::from_fn_with_state(state.clone(), jwt_auth_layer);

    // Auth routes: signup and login are public, /me requires a token
    let auth_routes = Router::new()
        .route("/me", get(routes::auth::me))
        .route_layer(auth_layer())
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login));

    // User routes (require JWT authentication)
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route(
            "/profile",
            get(routes::users::get_profile).put(routes::users::update_profile),
        )
        .route("/checklist", get(routes::users::get_checklist))
        .route("/checklist/:index", put(routes::users::update_checklist_item))
        .route_layer(auth_layer());

    let api_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/paths", get(routes::paths::list_paths))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes);

    Router::new()
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

/// JWT authentication middleware layer
///
/// Verifies the bearer token and injects `AuthContext` into request
/// extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;

    tracing::debug!(user_id = %auth_context.user_id, "Authenticated request");
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
