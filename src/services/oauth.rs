use crate::api::middleware::{ApiError, ApiResult};
use crate::models::CallbackResult;
use crate::shared::state_token;
use url::Url;

/// Scopes requested on every sign-in.
pub const YOUTUBE_SCOPES: [&str; 4] = [
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube.upload",
];

/// Provider configuration for the implicit authorization flow.
#[derive(Clone, Debug)]
pub struct OAuthSettings {
    pub client_id: String,
    pub auth_endpoint: String,
    /// The application's own origin; the provider redirects back here.
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// Build the provider authorization URL for the implicit flow
/// (`response_type=token`, no client secret, no code exchange).
/// Pure construction; the caller navigates the browser.
pub fn build_authorize_url(settings: &OAuthSettings, state: &str) -> ApiResult<String> {
    let mut url = Url::parse(&settings.auth_endpoint)
        .map_err(|e| ApiError::Internal(format!("Invalid auth endpoint: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("client_id", &settings.client_id)
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("response_type", "token")
        .append_pair("scope", &settings.scopes.join(" "))
        .append_pair("state", state)
        .append_pair("include_granted_scopes", "true");

    Ok(url.into())
}

/// Cheap entry check: does this fragment look like an OAuth redirect at
/// all? Avoids running the full pipeline on ordinary navigations.
pub fn is_oauth_fragment(fragment: &str) -> bool {
    fragment.contains("access_token") || fragment.contains("error")
}

/// Parse the raw redirect fragment into a structured result.
///
/// An `error` parameter takes precedence over everything else. A
/// `Success` is produced only when `access_token` is present;
/// `expires_in` that fails to parse as an integer is treated as absent
/// (the orchestrator rejects it later as an invalid response). Anything
/// else is `Empty`. Pure and side-effect-free.
pub fn parse_callback(fragment: &str) -> CallbackResult {
    let fragment = fragment.trim_start_matches('#');

    let mut access_token = None;
    let mut token_type = None;
    let mut expires_in = None;
    let mut scope = None;
    let mut state = None;
    let mut error = None;
    let mut error_description = None;

    for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
        // Empty parameter values count as absent
        if value.is_empty() {
            continue;
        }
        let value = value.into_owned();
        match key.as_ref() {
            "access_token" => access_token = Some(value),
            "token_type" => token_type = Some(value),
            "expires_in" => expires_in = value.parse::<i64>().ok(),
            "scope" => scope = Some(value),
            "state" => state = Some(value),
            "error" => error = Some(value),
            "error_description" => error_description = Some(value),
            _ => {}
        }
    }

    if let Some(code) = error {
        return CallbackResult::Error {
            code,
            description: error_description,
        };
    }

    match access_token {
        Some(access_token) => CallbackResult::Success {
            access_token,
            token_type,
            expires_in,
            scope,
            state,
        },
        None => CallbackResult::Empty,
    }
}

/// Verify the state returned by the provider against the pending token.
/// Passes only when both are present and exactly equal; the comparison
/// does not short-circuit on a common prefix.
pub fn verify_state(incoming: &str, pending: Option<&str>) -> bool {
    match pending {
        Some(pending) => state_token::tokens_match(incoming, pending),
        None => false,
    }
}
