use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{instrument, warn};

use crate::shared::{AppError, AppState};

/// Origin guard for the socket endpoint.
/// Usage: .route_layer(middleware::from_fn_with_state(app_state.clone(), require_allowed_origin))
///
/// Browsers always send `Origin` on a WebSocket handshake but never enforce
/// CORS on it, so a foreign origin is refused here before the upgrade.
/// Requests without the header (non-browser clients) pass through.
#[instrument(skip(state, req, next))]
pub async fn require_allowed_origin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        if *origin != state.allowed_origin {
            let origin = origin.to_str().unwrap_or("<non-ascii>").to_string();
            warn!(
                origin = %origin,
                allowed_origin = ?state.allowed_origin,
                "Refusing socket from foreign origin"
            );
            return Err(AppError::Forbidden(format!(
                "Origin '{}' is not allowed",
                origin
            )));
        }
    }

    Ok(next.run(req).await)
}
