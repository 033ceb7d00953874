use crate::services::{
    auth::AuthController, oauth::OAuthSettings, profile_service::ProfileFetcher, session_service,
    session_service::CookieSettings, video_service::VideoService,
};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub oauth: OAuthSettings,
    pub cookies: CookieSettings,
    pub auth_controller: AuthController,
    pub profile: Arc<dyn ProfileFetcher>,
    pub video_service: VideoService,
}

/// Route guard for private routes: without a valid session the request
/// is redirected to the public landing route. The decision is made from
/// the session cookie on every request, never from client state.
pub async fn require_session(request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let had_cookie = jar.get(session_service::AUTH_COOKIE).is_some();

    match session_service::peek_session(&jar) {
        Some(_) => next.run(request).await,
        None if had_cookie => {
            // Stale or corrupt cookie: evict it on the way out
            let jar = session_service::clear_session(jar);
            (jar, Redirect::to("/")).into_response()
        }
        None => Redirect::to("/").into_response(),
    }
}

/// Route guard for auth-only public routes: signed-in users are
/// redirected away instead of being offered the sign-in flow again.
pub async fn redirect_authenticated(request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());

    match session_service::peek_session(&jar) {
        Some(_) => Redirect::to("/").into_response(),
        None => next.run(request).await,
    }
}
