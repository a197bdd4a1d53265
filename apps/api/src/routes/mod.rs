pub mod health;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::require_session;
use crate::billing::handlers as billing;
use crate::chat;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Assembles the full route table. Everything except the health check and the
/// payment webhook sits behind the sign-in gate; the webhook authenticates
/// itself through its signature instead.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        // Chat assistant
        .route("/api/v1/chat", post(chat::handle_chat))
        // Resume editor
        .route(
            "/api/v1/resume/sessions",
            post(resume::handle_create_session),
        )
        .route(
            "/api/v1/resume/sessions/:session_id",
            get(resume::handle_get_session).delete(resume::handle_end_session),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/personal-info",
            put(resume::handle_update_personal_info),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/settings",
            put(resume::handle_update_settings),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/sections",
            post(resume::handle_add_section),
        )
        // static segment wins over :section_id, so reorder stays reachable
        .route(
            "/api/v1/resume/sessions/:session_id/sections/reorder",
            post(resume::handle_reorder_sections),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/sections/:section_id",
            put(resume::handle_update_section_content).delete(resume::handle_delete_section),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/sections/:section_id/generate",
            post(resume::handle_generate_section),
        )
        .route(
            "/api/v1/resume/sessions/:session_id/layout",
            get(resume::handle_layout),
        )
        // Billing
        .route(
            "/api/v1/billing/checkout-session",
            post(billing::handle_create_checkout),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/billing/webhooks/stripe",
            post(billing::handle_stripe_webhook),
        )
        .merge(protected)
        .with_state(state)
}
