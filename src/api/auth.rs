use crate::{
    api::middleware::{ApiError, ApiResult, AppState},
    models::{AuthState, CallbackRequest, SessionResponse, UserInfo},
    services::{oauth, profile_service, session_service},
    shared::state_token,
};
use axum::{extract::State, http::StatusCode, response::Redirect, Json};
use axum_extra::extract::cookie::CookieJar;

/// Initiate the sign-in flow: mint a state token, persist it for the
/// redirect round-trip, and send the browser to the provider.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Redirect)> {
    let token = state_token::generate_state_token();
    let jar = session_service::put_pending_state(jar, &token, state.cookies);
    let authorize_url = oauth::build_authorize_url(&state.oauth, &token)?;

    tracing::debug!(context = "auth_login", "redirecting to authorization endpoint");

    Ok((jar, Redirect::to(&authorize_url)))
}

/// Receive the raw redirect fragment forwarded by the callback page and
/// run the full callback pipeline.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<CallbackRequest>,
) -> (CookieJar, Json<crate::models::AuthOutcome>) {
    if !oauth::is_oauth_fragment(&request.fragment) {
        // Not an OAuth redirect; skip the pipeline entirely
        return (
            jar,
            Json(crate::models::AuthOutcome::failed(
                crate::services::auth::INVALID_RESPONSE,
                Some("No OAuth parameters in callback".to_string()),
            )),
        );
    }

    let (jar, outcome) = state
        .auth_controller
        .handle_callback(jar, &request.fragment)
        .await;

    (jar, Json(outcome))
}

/// Server-to-client handoff of the authentication state, projected
/// through the reducer so the client never sees the raw cookie.
pub async fn get_session(jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    let (jar, session) = session_service::read_session(jar);
    let auth_state = AuthState::from_session(session);

    (jar, Json(SessionResponse::from(auth_state)))
}

/// Sign out: delete the session cookie.
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (session_service::clear_session(jar), StatusCode::NO_CONTENT)
}

/// Refresh the cached profile from the People API and store it back in
/// the session, keeping the remaining token lifetime.
pub async fn refresh_profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<UserInfo>)> {
    let (jar, session) = session_service::read_session(jar);
    let session = session.ok_or(ApiError::Unauthorized)?;

    let user = profile_service::resolve_profile(state.profile.as_ref(), &session.access_token)
        .await
        .ok_or_else(|| ApiError::Upstream("User profile unavailable".to_string()))?;

    let jar = session_service::update_user(jar, &user, state.cookies);

    Ok((jar, Json(user)))
}
