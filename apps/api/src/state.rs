use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::billing::checkout::CheckoutClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resume::store::SessionManager;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// In-memory editing sessions; all state lives here for the session's
    /// lifetime and nowhere else.
    pub sessions: SessionManager,
    pub llm: LlmClient,
    pub billing: CheckoutClient,
    /// Pluggable identity boundary. Default: StaticTokenProvider from SESSION_TOKENS.
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Config,
}
