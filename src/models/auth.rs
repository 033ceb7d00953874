use serde::{Deserialize, Serialize};

/// Profile information cached alongside the access token.
///
/// All fields default to empty strings when the upstream profile
/// lookup omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub picture: String,
}

/// Authenticated session as persisted in the session cookie.
///
/// `token_expires_at` is an absolute epoch-millis timestamp, never a
/// duration; it is computed once at creation so repeated reads cannot
/// re-derive a different expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub access_token: String,
    pub token_expires_at: i64,
    pub user: UserInfo,
}

impl AuthSession {
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.token_expires_at
    }
}

/// Parsed OAuth2 redirect fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackResult {
    Success {
        access_token: String,
        token_type: Option<String>,
        expires_in: Option<i64>,
        scope: Option<String>,
        state: Option<String>,
    },
    Error {
        code: String,
        description: Option<String>,
    },
    /// Fragment was present but carried no recognizable OAuth parameters.
    Empty,
}

/// Terminal result of one callback-handling invocation. This is the only
/// shape that crosses into the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl AuthOutcome {
    pub fn authenticated(access_token: String, expires_in: i64, user: UserInfo) -> Self {
        Self {
            success: true,
            access_token: Some(access_token),
            expires_in: Some(expires_in),
            user: Some(user),
            error: None,
            error_description: None,
        }
    }

    pub fn failed(error: impl Into<String>, description: Option<String>) -> Self {
        Self {
            success: false,
            access_token: None,
            expires_in: None,
            user: None,
            error: Some(error.into()),
            error_description: description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    /// Raw URL fragment forwarded by the callback page, with or without
    /// the leading `#`.
    pub fragment: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_expires_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserInfo>,
}
