//! Browser session identity. The session key is an opaque UUID kept in a
//! signed cookie; nothing else about the session lives client-side.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use tracing::info;
use uuid::Uuid;

pub fn current_session(jar: &SignedCookieJar, cookie_name: &str) -> Option<String> {
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|value| !value.is_empty())
}

/// Existing session key, or a new one added to the returned jar.
pub fn ensure_session(jar: SignedCookieJar, cookie_name: &str) -> (SignedCookieJar, String) {
    if let Some(session_key) = current_session(&jar, cookie_name) {
        return (jar, session_key);
    }
    let session_key = Uuid::new_v4().to_string();
    info!("initialized new session");
    let cookie = Cookie::build((cookie_name.to_owned(), session_key.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), session_key)
}

pub fn clear_session(jar: SignedCookieJar, cookie_name: &str) -> SignedCookieJar {
    jar.remove(Cookie::build((cookie_name.to_owned(), "")).path("/").build())
}
