use crate::state::AppState;
use crate::views;
use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

/// Builds the application router: the index listing at `/`, every other
/// path resolved against the registry by prefix lookup.
pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/", get(views::index))
        .fallback(views::resolve)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
