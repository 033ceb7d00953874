use crate::api::middleware::ApiResult;
use crate::models::{AuthOutcome, CallbackResult};
use crate::services::{oauth, profile_service, session_service};
use crate::services::{profile_service::ProfileFetcher, session_service::CookieSettings};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

// Error codes surfaced to the presentation layer
pub const INVALID_RESPONSE: &str = "invalid_response";
pub const INVALID_STATE: &str = "invalid_state";
pub const USER_INFO_UNAVAILABLE: &str = "user_info_unavailable";
pub const UNEXPECTED_ERROR: &str = "unexpected_error";

/// Upper bound on an acceptable token lifetime. Implicit-flow grants
/// are on the order of an hour; anything wildly larger is a malformed
/// or forged response, not a longer session.
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 86_400;

/// Orchestrates one OAuth callback end to end: parse the fragment,
/// verify the state token, resolve the profile, persist the session.
/// Only an `AuthOutcome` leaves this boundary.
#[derive(Clone)]
pub struct AuthController {
    profile: Arc<dyn ProfileFetcher>,
    cookies: CookieSettings,
}

impl AuthController {
    pub fn new(profile: Arc<dyn ProfileFetcher>, cookies: CookieSettings) -> Self {
        Self { profile, cookies }
    }

    /// Handle a raw redirect fragment. The pending-state cookie is
    /// consumed on every path through here, success or failure, so a
    /// callback can never be replayed against a stale token.
    pub async fn handle_callback(&self, jar: CookieJar, fragment: &str) -> (CookieJar, AuthOutcome) {
        match self.run(jar.clone(), fragment).await {
            Ok(done) => done,
            Err(err) => {
                tracing::error!(context = "auth_callback", error = %err, "unexpected error handling OAuth callback");
                let (jar, _) = session_service::take_pending_state(jar);
                (
                    jar,
                    AuthOutcome::failed(
                        UNEXPECTED_ERROR,
                        Some("Authentication failed unexpectedly".to_string()),
                    ),
                )
            }
        }
    }

    async fn run(&self, jar: CookieJar, fragment: &str) -> ApiResult<(CookieJar, AuthOutcome)> {
        let parsed = oauth::parse_callback(fragment);

        // Drain the pending token exactly once per callback, before any
        // outcome is produced, so it cannot survive this attempt
        let (jar, pending) = session_service::take_pending_state(jar);

        let (access_token, expires_in, state) = match parsed {
            CallbackResult::Error { code, description } => {
                tracing::warn!(context = "auth_callback", error = %code, "provider returned an error");
                return Ok((jar, AuthOutcome::failed(code, description)));
            }
            CallbackResult::Empty => {
                return Ok((
                    jar,
                    AuthOutcome::failed(
                        INVALID_RESPONSE,
                        Some("No OAuth parameters in callback".to_string()),
                    ),
                ));
            }
            CallbackResult::Success {
                access_token,
                expires_in,
                state,
                ..
            } => (access_token, expires_in, state),
        };

        // Both the token and its lifetime are required; an absent or
        // unparseable expires_in is never defaulted
        let Some(expires_in) = expires_in else {
            return Ok((
                jar,
                AuthOutcome::failed(
                    INVALID_RESPONSE,
                    Some("Missing access_token or expires_in".to_string()),
                ),
            ));
        };

        // expires_in is attacker-controlled; a zero, negative, or
        // implausibly large lifetime is a malformed response
        if expires_in <= 0 || expires_in > MAX_TOKEN_LIFETIME_SECS {
            return Ok((
                jar,
                AuthOutcome::failed(
                    INVALID_RESPONSE,
                    Some("Implausible token lifetime".to_string()),
                ),
            ));
        }

        if let Some(incoming) = state.as_deref() {
            if !oauth::verify_state(incoming, pending.as_deref()) {
                tracing::warn!(
                    context = "auth_callback",
                    "state verification failed, possible CSRF"
                );
                return Ok((
                    jar,
                    AuthOutcome::failed(
                        INVALID_STATE,
                        Some("State verification failed".to_string()),
                    ),
                ));
            }
        }

        // Missing profile fails the login rather than producing an
        // anonymous-but-authenticated session
        let Some(user) = profile_service::resolve_profile(self.profile.as_ref(), &access_token).await
        else {
            return Ok((
                jar,
                AuthOutcome::failed(
                    USER_INFO_UNAVAILABLE,
                    Some("Could not resolve user profile".to_string()),
                ),
            ));
        };

        let jar = session_service::create_session(jar, &access_token, expires_in, &user, self.cookies);

        tracing::info!(context = "auth_callback", user = %user.email, "user authenticated");

        Ok((jar, AuthOutcome::authenticated(access_token, expires_in, user)))
    }
}
