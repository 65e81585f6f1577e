//! HTTP router.
//!
//! Returns a composable `Router` with the analysis routes and the
//! dashboard CRUD routes mounted at the root.

use std::sync::{Arc, LazyLock};

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use regex::Regex;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::MAX_UPLOAD_BYTES;
use crate::core_state::CoreState;

/// Request cap for one multipart analysis: four files plus form overhead.
/// Individual files are held to `MAX_UPLOAD_BYTES` by the upload reader.
const MAX_REQUEST_BYTES: usize = 4 * MAX_UPLOAD_BYTES + 5 * 1024 * 1024;

static LOCAL_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://(localhost|127\.0\.0\.1|0\.0\.0\.0)(:[0-9]+)?$").unwrap()
});

fn is_local_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|o| LOCAL_ORIGIN.is_match(o))
        .unwrap_or(false)
}

/// Browser frontends served from localhost only.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _parts| is_local_origin(origin)))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Build the API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/doctor/analyze", post(endpoints::doctor::analyze))
        .route("/patient/explain", post(endpoints::patient::explain))
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route("/patients/:id", get(endpoints::patients::get))
        .route("/patients/:id/records", get(endpoints::patients::records))
        .route("/patients/:id/ai-insights", get(endpoints::patients::ai_insights))
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES))
        .layer(cors_layer())
        .with_state(ctx)
}
