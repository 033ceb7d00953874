use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Origin this application is served from; doubles as the OAuth redirect URI.
    pub public_origin: String,
    pub oauth_client_id: String,
    pub auth_endpoint: String,
    pub people_api_base_url: String,
    pub youtube_api_base_url: String,
    pub google_api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let public_origin = env::var("PUBLIC_ORIGIN")
            .unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

        let oauth_client_id =
            env::var("GOOGLE_OAUTH_CLIENT_ID").map_err(|_| ConfigError::MissingClientId)?;

        let auth_endpoint = env::var("OAUTH_AUTH_ENDPOINT")
            .unwrap_or_else(|_| "https://accounts.google.com/o/oauth2/v2/auth".to_string());

        let people_api_base_url = env::var("PEOPLE_API_BASE_URL")
            .unwrap_or_else(|_| "https://people.googleapis.com/v1".to_string());

        let youtube_api_base_url = env::var("YOUTUBE_API_BASE_URL")
            .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());

        let google_api_key = env::var("GOOGLE_API_KEY").ok();
        if google_api_key.is_none() {
            tracing::warn!("GOOGLE_API_KEY is not configured; API key query param will be omitted");
        }

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let production = env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        Ok(Config {
            server_host,
            server_port,
            public_origin,
            oauth_client_id,
            auth_endpoint,
            people_api_base_url,
            youtube_api_base_url,
            google_api_key,
            request_timeout_secs,
            production,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GOOGLE_OAUTH_CLIENT_ID environment variable not set")]
    MissingClientId,

    #[error("Invalid port number")]
    InvalidPort,
}
