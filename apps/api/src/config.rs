use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails fast if required variables are missing.
///
/// Generation tunables (model, max tokens, temperature, timeout) are
/// configuration rather than constants so deployments can adjust them
/// without a rebuild.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public base URL of the deployment, used to build checkout redirect
    /// URLs (`{base_url}/success`, `{base_url}/cancel`).
    pub base_url: String,
    /// Where unauthenticated requests to protected routes are redirected.
    pub sign_in_url: String,

    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub generation_max_tokens: u32,
    pub generation_temperature: f32,
    pub chat_max_tokens: u32,
    /// Upper bound on any single provider call; also bounds how long a
    /// section generation can stay reserved.
    pub llm_timeout_secs: u64,

    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    pub stripe_api_url: String,
    pub webhook_tolerance_secs: i64,

    /// Static bearer-token table, `token:user_id` pairs separated by commas.
    /// Empty means no token is accepted.
    pub session_tokens: String,
    /// Editing sessions idle longer than this are discarded by the background
    /// sweep.
    pub session_idle_secs: i64,

    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let base_url = require_env("BASE_URL")?;
        let sign_in_url =
            std::env::var("SIGN_IN_URL").unwrap_or_else(|_| format!("{base_url}/sign-in"));

        Ok(Config {
            base_url,
            sign_in_url,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1/chat/completions".to_string()),
            openai_model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            generation_max_tokens: parse_env("GENERATION_MAX_TOKENS", 500)?,
            generation_temperature: parse_env("GENERATION_TEMPERATURE", 0.7)?,
            chat_max_tokens: parse_env("CHAT_MAX_TOKENS", 1024)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 30)?,
            stripe_secret_key: require_env("STRIPE_SECRET_KEY")?,
            stripe_webhook_secret: require_env("STRIPE_WEBHOOK_SECRET")?,
            stripe_api_url: std::env::var("STRIPE_API_URL")
                .unwrap_or_else(|_| "https://api.stripe.com".to_string()),
            webhook_tolerance_secs: parse_env("WEBHOOK_TOLERANCE_SECS", 300)?,
            session_tokens: std::env::var("SESSION_TOKENS").unwrap_or_default(),
            session_idle_secs: parse_env("SESSION_IDLE_SECS", 3600)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional environment variable, falling back to `default` when
/// unset and failing when set but unparseable.
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' must be a valid value, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
