use crate::api::middleware::AppState;
use crate::config::Config;
use crate::services::{
    auth::AuthController,
    oauth::{OAuthSettings, YOUTUBE_SCOPES},
    profile_service::PeopleClient,
    session_service::CookieSettings,
    video_service::VideoService,
};
use std::sync::Arc;
use std::time::Duration;

/// Assemble the application state. Every collaborator is constructed
/// here and passed in explicitly; nothing reaches into process globals.
pub fn build_app_state(config: &Config) -> anyhow::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()?;

    let oauth = OAuthSettings {
        client_id: config.oauth_client_id.clone(),
        auth_endpoint: config.auth_endpoint.clone(),
        redirect_uri: config.public_origin.clone(),
        scopes: YOUTUBE_SCOPES.iter().map(|s| s.to_string()).collect(),
    };

    let cookies = CookieSettings {
        secure: config.production,
    };

    let profile: Arc<PeopleClient> = Arc::new(PeopleClient::new(
        http.clone(),
        config.people_api_base_url.clone(),
        config.google_api_key.clone(),
    ));

    let video_service = VideoService::new(
        http,
        config.youtube_api_base_url.clone(),
        config.google_api_key.clone(),
    );

    let auth_controller = AuthController::new(profile.clone(), cookies);

    Ok(AppState {
        oauth,
        cookies,
        auth_controller,
        profile,
        video_service,
    })
}
