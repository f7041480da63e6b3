//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 60;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;

/// Store key of the app-level client-credentials token.
pub const CLIENT_CREDENTIALS_KEY: &str = "__client_credentials__";

/// Authorization states older than this are rejected by the callback.
pub const PENDING_STATE_TTL_SECS: i64 = 600;
/// Outstanding authorization states kept at most; the oldest is evicted first.
pub const MAX_PENDING_STATES: usize = 10_000;

pub const PRODUCTION_BASE_URL: &str = "https://api.kroger.com";
pub const CERTIFICATION_BASE_URL: &str = "https://api-ce.kroger.com";

pub const TOKEN_PATH: &str = "/v1/connect/oauth2/token";
pub const AUTHORIZE_PATH: &str = "/v1/connect/oauth2/authorize";

pub const DEFAULT_CLIENT_SCOPE: &str = "product.compact";
pub const DEFAULT_USER_SCOPE: &str = "cart.basic:write profile.compact";
pub const DEFAULT_SESSION_COOKIE: &str = "session_id";
