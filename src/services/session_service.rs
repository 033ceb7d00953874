use crate::models::{AuthSession, UserInfo};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;

/// Session cookie: JSON `{accessToken, tokenExpiresAt, user}`.
pub const AUTH_COOKIE: &str = "auth_session";
/// Pending-state cookie: the raw state token of an in-flight sign-in.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the pending-state cookie. Bounds the window during which
/// an abandoned authorization attempt remains live.
pub const PENDING_STATE_MAX_AGE_SECS: i64 = 600;

/// Cookie attributes that vary by environment.
#[derive(Clone, Copy, Debug)]
pub struct CookieSettings {
    /// Sets the `Secure` attribute; enabled in production.
    pub secure: bool,
}

fn build_cookie(
    name: &'static str,
    value: String,
    max_age_secs: i64,
    settings: CookieSettings,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build(name).path("/").build()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

// ========================================
// Pending-state store (CSRF token round-trip)
// ========================================

/// Persist the outgoing state token for the redirect round-trip.
pub fn put_pending_state(jar: CookieJar, token: &str, settings: CookieSettings) -> CookieJar {
    jar.add(build_cookie(
        OAUTH_STATE_COOKIE,
        token.to_string(),
        PENDING_STATE_MAX_AGE_SECS,
        settings,
    ))
}

/// Retrieve and invalidate the stored state token in one operation.
/// Read-once: a second call within the same attempt returns `None`.
/// Callable when nothing was ever stored.
pub fn take_pending_state(jar: CookieJar) -> (CookieJar, Option<String>) {
    let token = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    let jar = jar.remove(removal_cookie(OAUTH_STATE_COOKIE));
    (jar, token)
}

// ========================================
// Session store
// ========================================

/// Create the session cookie from a fresh token grant. The absolute
/// expiry is computed once here; reads never re-derive it.
pub fn create_session(
    jar: CookieJar,
    access_token: &str,
    expires_in_secs: i64,
    user: &UserInfo,
    settings: CookieSettings,
) -> CookieJar {
    create_session_at(jar, access_token, expires_in_secs, user, settings, now_ms())
}

pub fn create_session_at(
    jar: CookieJar,
    access_token: &str,
    expires_in_secs: i64,
    user: &UserInfo,
    settings: CookieSettings,
    now_ms: i64,
) -> CookieJar {
    // Saturating arithmetic: the controller bounds expires_in, but the
    // store itself must never panic on a pathological lifetime
    let session = AuthSession {
        access_token: access_token.to_string(),
        token_expires_at: now_ms.saturating_add(expires_in_secs.saturating_mul(1000)),
        user: user.clone(),
    };

    write_session(jar, &session, expires_in_secs, settings)
}

/// Replace the cached profile, keeping the remaining token lifetime.
/// No-op when no session exists.
pub fn update_user(jar: CookieJar, user: &UserInfo, settings: CookieSettings) -> CookieJar {
    update_user_at(jar, user, settings, now_ms())
}

pub fn update_user_at(
    jar: CookieJar,
    user: &UserInfo,
    settings: CookieSettings,
    now_ms: i64,
) -> CookieJar {
    // Re-read immediately before writing; the write is not composed
    // from state captured across an await
    let (jar, session) = read_session_at(jar, now_ms);
    let Some(session) = session else {
        return jar;
    };

    let remaining_secs = ((session.token_expires_at - now_ms) / 1000).max(0);
    let session = AuthSession {
        user: user.clone(),
        ..session
    };

    write_session(jar, &session, remaining_secs, settings)
}

/// Read the current session. Self-healing: a cookie that fails to parse
/// or has expired is deleted and reported absent, never surfaced as an
/// error.
pub fn read_session(jar: CookieJar) -> (CookieJar, Option<AuthSession>) {
    read_session_at(jar, now_ms())
}

pub fn read_session_at(jar: CookieJar, now_ms: i64) -> (CookieJar, Option<AuthSession>) {
    let Some(cookie) = jar.get(AUTH_COOKIE) else {
        return (jar, None);
    };

    match serde_json::from_str::<AuthSession>(cookie.value()) {
        Ok(session) if !session.is_expired_at(now_ms) => (jar, Some(session)),
        Ok(_) => (clear_session(jar), None),
        Err(err) => {
            tracing::warn!(context = "session_store", error = %err, "unreadable session cookie, clearing");
            (clear_session(jar), None)
        }
    }
}

/// Validity check without write access to the jar, for per-request route
/// guards. Eviction of a stale cookie happens on the next mutating read.
pub fn peek_session(jar: &CookieJar) -> Option<AuthSession> {
    peek_session_at(jar, now_ms())
}

pub fn peek_session_at(jar: &CookieJar, now_ms: i64) -> Option<AuthSession> {
    let cookie = jar.get(AUTH_COOKIE)?;
    serde_json::from_str::<AuthSession>(cookie.value())
        .ok()
        .filter(|session| !session.is_expired_at(now_ms))
}

/// Delete the session cookie unconditionally.
pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(removal_cookie(AUTH_COOKIE))
}

fn write_session(
    jar: CookieJar,
    session: &AuthSession,
    max_age_secs: i64,
    settings: CookieSettings,
) -> CookieJar {
    match serde_json::to_string(session) {
        Ok(payload) => jar.add(build_cookie(AUTH_COOKIE, payload, max_age_secs, settings)),
        Err(err) => {
            // Serialization of a plain data struct should never fail;
            // leave the jar untouched if it somehow does
            tracing::error!(context = "session_store", error = %err, "failed to serialize session");
            jar
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTINGS: CookieSettings = CookieSettings { secure: false };

    fn user() -> UserInfo {
        UserInfo {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            picture: "http://x/p.png".to_string(),
        }
    }

    #[test]
    fn test_pending_state_round_trip() {
        let jar = put_pending_state(CookieJar::new(), "S1", SETTINGS);
        let (jar, token) = take_pending_state(jar);

        assert_eq!(token.as_deref(), Some("S1"));

        // Read-once: a second take in the same attempt returns absent
        let (_, token) = take_pending_state(jar);
        assert_eq!(token, None);
    }

    #[test]
    fn test_take_without_put_is_absent() {
        let (_, token) = take_pending_state(CookieJar::new());
        assert_eq!(token, None);
    }

    #[test]
    fn test_session_cookie_payload_shape() {
        let jar = create_session_at(CookieJar::new(), "tok", 3600, &user(), SETTINGS, 1_000);
        let raw = jar.get(AUTH_COOKIE).unwrap().value().to_string();

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["accessToken"], "tok");
        assert_eq!(value["tokenExpiresAt"], 1_000 + 3_600_000);
        assert_eq!(value["user"]["email"], "a@x.com");
    }

    #[test]
    fn test_session_expiry_boundary() {
        let expires_at = 1_000 + 3_600_000;
        let jar = create_session_at(CookieJar::new(), "tok", 3600, &user(), SETTINGS, 1_000);

        // Valid right up to the expiry instant
        let (jar, session) = read_session_at(jar, expires_at - 1);
        assert!(session.is_some());

        // Absent at the expiry instant, and evicted
        let (jar, session) = read_session_at(jar, expires_at);
        assert!(session.is_none());
        let (_, session) = read_session_at(jar, 0);
        assert!(session.is_none());
    }

    #[test]
    fn test_corrupt_cookie_self_heals() {
        let jar = CookieJar::new().add(build_cookie(
            AUTH_COOKIE,
            "not json at all".to_string(),
            60,
            SETTINGS,
        ));

        let (jar, session) = read_session_at(jar, 0);
        assert!(session.is_none());

        // The cookie is gone, not merely ignored
        let (_, session) = read_session_at(jar, 0);
        assert!(session.is_none());
        assert!(peek_session_at(&CookieJar::new(), 0).is_none());
    }

    #[test]
    fn test_update_user_preserves_expiry() {
        let jar = create_session_at(CookieJar::new(), "tok", 3600, &user(), SETTINGS, 1_000);
        let (_, before) = read_session_at(jar.clone(), 2_000);
        let before = before.unwrap();

        let new_user = UserInfo {
            name: "B".to_string(),
            ..user()
        };
        let jar = update_user_at(jar, &new_user, SETTINGS, 2_000);
        let jar = update_user_at(jar, &new_user, SETTINGS, 3_000);

        let (_, after) = read_session_at(jar, 4_000);
        let after = after.unwrap();

        assert_eq!(after.user.name, "B");
        assert_eq!(after.access_token, "tok");
        // Expiry is carried over, never re-derived
        assert_eq!(after.token_expires_at, before.token_expires_at);
    }

    #[test]
    fn test_create_session_saturates_on_huge_lifetime() {
        let jar = create_session_at(CookieJar::new(), "tok", i64::MAX, &user(), SETTINGS, 1_000);

        let (_, session) = read_session_at(jar, 1_000);
        let session = session.expect("saturated expiry is still a live session");
        assert_eq!(session.token_expires_at, i64::MAX);
    }

    #[test]
    fn test_update_user_without_session_is_noop() {
        let jar = update_user_at(CookieJar::new(), &user(), SETTINGS, 0);
        assert!(jar.get(AUTH_COOKIE).is_none());
    }

    #[test]
    fn test_clear_session() {
        let jar = create_session_at(CookieJar::new(), "tok", 3600, &user(), SETTINGS, 0);
        let jar = clear_session(jar);

        let (_, session) = read_session_at(jar, 0);
        assert!(session.is_none());
    }
}
