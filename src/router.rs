use axum::{http::Method, middleware, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RelayConfig;
use crate::room::{get_room_clients, health_check};
use crate::shared::AppState;
use crate::websockets::{require_allowed_origin, websocket_handler};

/// Build the application router
///
/// Cross-origin requests are only allowed from the configured origin.
/// Socket upgrades from any other origin are refused with 403.
pub fn build_router(app_state: AppState, config: &RelayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([config.allowed_origin.clone()]))
        .allow_methods([Method::GET]);

    let socket_routes = Router::new()
        .route("/ws", get(websocket_handler))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_allowed_origin,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/rooms/:room_id/clients", get(get_room_clients))
        .merge(socket_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
