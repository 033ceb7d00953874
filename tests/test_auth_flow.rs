use async_trait::async_trait;
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tubedeck::api::middleware::{ApiError, ApiResult};
use tubedeck::models::{AuthState, Person, PersonEmail, PersonName, PersonPhoto, UserInfo};
use tubedeck::services::auth::{AuthController, INVALID_RESPONSE, INVALID_STATE, USER_INFO_UNAVAILABLE};
use tubedeck::services::profile_service::ProfileFetcher;
use tubedeck::services::session_service::{self, CookieSettings};

const SETTINGS: CookieSettings = CookieSettings { secure: false };

struct StubProfile {
    fail: bool,
}

#[async_trait]
impl ProfileFetcher for StubProfile {
    async fn fetch_profile(&self, _access_token: &str) -> ApiResult<Person> {
        if self.fail {
            return Err(ApiError::Upstream("profile API down".to_string()));
        }

        Ok(Person {
            names: vec![PersonName {
                display_name: Some("A".to_string()),
            }],
            email_addresses: vec![PersonEmail {
                value: Some("a@x.com".to_string()),
            }],
            photos: vec![PersonPhoto {
                url: Some("http://x/p.png".to_string()),
            }],
        })
    }
}

fn controller(fail_profile: bool) -> AuthController {
    AuthController::new(Arc::new(StubProfile { fail: fail_profile }), SETTINGS)
}

#[tokio::test]
async fn test_end_to_end_success() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    let (jar, outcome) = controller(false)
        .handle_callback(
            jar,
            "#access_token=ABC&token_type=Bearer&expires_in=3600&scope=x&state=S1",
        )
        .await;

    assert!(outcome.success);
    assert_eq!(outcome.access_token.as_deref(), Some("ABC"));
    assert_eq!(outcome.expires_in, Some(3600));
    assert_eq!(
        outcome.user,
        Some(UserInfo {
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            picture: "http://x/p.png".to_string(),
        })
    );

    // The session cookie now reads back exactly what was granted
    let (jar, session) = session_service::read_session(jar);
    let session = session.expect("session should exist after successful callback");
    assert_eq!(session.access_token, "ABC");
    assert_eq!(session.user.name, "A");

    // The pending-state cookie was consumed
    let (_, pending) = session_service::take_pending_state(jar);
    assert_eq!(pending, None);
}

#[tokio::test]
async fn test_end_to_end_state_mismatch() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    let (jar, outcome) = controller(false)
        .handle_callback(jar, "access_token=ABC&expires_in=3600&state=S2")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(INVALID_STATE));

    // No session was created
    let (jar, session) = session_service::read_session(jar);
    assert!(session.is_none());

    // The pending token was still consumed: the attempt is dead
    let (_, pending) = session_service::take_pending_state(jar);
    assert_eq!(pending, None);
}

#[tokio::test]
async fn test_replayed_callback_fails() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);
    let fragment = "access_token=ABC&expires_in=3600&state=S1";
    let controller = controller(false);

    let (jar, first) = controller.handle_callback(jar, fragment).await;
    assert!(first.success);

    // Same fragment again: the pending token is gone, so verification
    // fails. Intentional replay prevention.
    let jar = session_service::clear_session(jar);
    let (_, second) = controller.handle_callback(jar, fragment).await;
    assert!(!second.success);
    assert_eq!(second.error.as_deref(), Some(INVALID_STATE));
}

#[tokio::test]
async fn test_provider_error_fails_login() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    let (jar, outcome) = controller(false)
        .handle_callback(jar, "#error=access_denied&error_description=user+declined&state=S1")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("access_denied"));
    assert_eq!(outcome.error_description.as_deref(), Some("user declined"));

    let (_, session) = session_service::read_session(jar);
    assert!(session.is_none());
}

#[tokio::test]
async fn test_missing_expires_in_is_invalid_response() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    let (jar, outcome) = controller(false)
        .handle_callback(jar, "access_token=ABC&state=S1")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(INVALID_RESPONSE));

    // Terminal failure still consumed the pending token
    let (_, pending) = session_service::take_pending_state(jar);
    assert_eq!(pending, None);
}

#[tokio::test]
async fn test_overflowing_expires_in_is_invalid_response() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    // i64::MAX seconds: the naive expiry computation would overflow
    let (jar, outcome) = controller(false)
        .handle_callback(
            jar,
            "access_token=ABC&expires_in=9223372036854775807&state=S1",
        )
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(INVALID_RESPONSE));

    let (_, session) = session_service::read_session(jar);
    assert!(session.is_none());
}

#[tokio::test]
async fn test_non_positive_expires_in_is_invalid_response() {
    for fragment in [
        "access_token=ABC&expires_in=0&state=S1",
        "access_token=ABC&expires_in=-5&state=S1",
    ] {
        let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);
        let (jar, outcome) = controller(false).handle_callback(jar, fragment).await;

        assert!(!outcome.success, "accepted grant from {:?}", fragment);
        assert_eq!(outcome.error.as_deref(), Some(INVALID_RESPONSE));

        let (_, session) = session_service::read_session(jar);
        assert!(session.is_none());
    }
}

#[tokio::test]
async fn test_profile_failure_fails_login() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);

    let (jar, outcome) = controller(true)
        .handle_callback(jar, "access_token=ABC&expires_in=3600&state=S1")
        .await;

    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some(USER_INFO_UNAVAILABLE));

    let (_, session) = session_service::read_session(jar);
    assert!(session.is_none());
}

#[tokio::test]
async fn test_callback_without_state_drains_pending_token() {
    // A stale pending token from an abandoned attempt must not survive
    // a later callback that carries no state at all
    let jar = session_service::put_pending_state(CookieJar::new(), "STALE", SETTINGS);

    let (jar, outcome) = controller(false)
        .handle_callback(jar, "access_token=ABC&expires_in=3600")
        .await;

    assert!(outcome.success);

    let (_, pending) = session_service::take_pending_state(jar);
    assert_eq!(pending, None);
}

#[tokio::test]
async fn test_sign_out() {
    let jar = session_service::put_pending_state(CookieJar::new(), "S1", SETTINGS);
    let (jar, outcome) = controller(false)
        .handle_callback(jar, "access_token=ABC&expires_in=3600&state=S1")
        .await;
    assert!(outcome.success);

    let jar = session_service::clear_session(jar);

    let (_, session) = session_service::read_session(jar);
    assert!(session.is_none());

    let state = AuthState::from_session(session);
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
}
