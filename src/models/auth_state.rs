use crate::models::{AuthSession, SessionResponse, UserInfo};

/// In-memory projection of the persisted session, seeded from whatever
/// `AuthSession` existed at the start of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub access_token: Option<String>,
    pub token_expires_at: Option<i64>,
    pub user: Option<UserInfo>,
}

/// The three transitions allowed on `AuthState`. No other mutation path
/// exists; every authentication state change on the client goes through
/// `AuthState::apply`.
#[derive(Debug, Clone)]
pub enum AuthAction {
    Login {
        access_token: String,
        expires_in: i64,
        user: Option<UserInfo>,
    },
    Logout,
    UpdateUser(UserInfo),
}

impl AuthState {
    pub fn from_session(session: Option<AuthSession>) -> Self {
        match session {
            Some(session) => Self {
                is_authenticated: true,
                access_token: Some(session.access_token),
                token_expires_at: Some(session.token_expires_at),
                user: Some(session.user),
            },
            None => Self::default(),
        }
    }

    pub fn apply(self, action: AuthAction, now_ms: i64) -> Self {
        match action {
            AuthAction::Login {
                access_token,
                expires_in,
                user,
            } => Self {
                is_authenticated: true,
                access_token: Some(access_token),
                token_expires_at: Some(now_ms.saturating_add(expires_in.saturating_mul(1000))),
                // Keep any previously resolved profile when the login
                // payload carries none
                user: user.or(self.user),
            },
            AuthAction::Logout => Self::default(),
            AuthAction::UpdateUser(user) => Self {
                user: Some(user),
                ..self
            },
        }
    }
}

impl From<AuthState> for SessionResponse {
    fn from(state: AuthState) -> Self {
        SessionResponse {
            authenticated: state.is_authenticated,
            token_expires_at: state.token_expires_at,
            user: state.user,
        }
    }
}
