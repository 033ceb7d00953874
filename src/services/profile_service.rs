use crate::api::middleware::{ApiError, ApiResult};
use crate::models::{Person, UserInfo};
use async_trait::async_trait;

/// Seam over the People API so the auth flow can be driven with a stub.
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    async fn fetch_profile(&self, access_token: &str) -> ApiResult<Person>;
}

/// `GET {base}/people/me` client.
#[derive(Clone)]
pub struct PeopleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PeopleClient {
    pub fn new(http: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl ProfileFetcher for PeopleClient {
    async fn fetch_profile(&self, access_token: &str) -> ApiResult<Person> {
        let mut request = self
            .http
            .get(format!("{}/people/me", self.base_url))
            .query(&[("personFields", "names,emailAddresses,photos")])
            .bearer_auth(access_token);

        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let person = request
            .send()
            .await?
            .error_for_status()?
            .json::<Person>()
            .await?;

        Ok(person)
    }
}

/// Resolve the profile for an access token, taking the first candidate
/// of each field and defaulting to empty strings.
///
/// Never fails the caller's flow: any upstream error is logged and
/// reported as "no profile". The orchestrator decides what that means
/// for the login.
pub async fn resolve_profile(fetcher: &dyn ProfileFetcher, access_token: &str) -> Option<UserInfo> {
    match fetcher.fetch_profile(access_token).await {
        Ok(person) => Some(user_info_from_person(person)),
        Err(err) => {
            tracing::error!(context = "profile_resolver", error = %err, "failed to fetch user profile");
            None
        }
    }
}

fn user_info_from_person(person: Person) -> UserInfo {
    UserInfo {
        name: person
            .names
            .into_iter()
            .find_map(|n| n.display_name)
            .unwrap_or_default(),
        email: person
            .email_addresses
            .into_iter()
            .find_map(|e| e.value)
            .unwrap_or_default(),
        picture: person
            .photos
            .into_iter()
            .find_map(|p| p.url)
            .unwrap_or_default(),
    }
}

// Errors from reqwest surface as upstream failures
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Upstream("Upstream request timed out".to_string())
        } else if let Some(status) = err.status() {
            ApiError::Upstream(format!("Upstream returned {}", status))
        } else {
            ApiError::Upstream(format!("Upstream request failed: {}", err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PersonEmail, PersonName, PersonPhoto};

    struct StubFetcher(ApiResult<Person>);

    #[async_trait]
    impl ProfileFetcher for StubFetcher {
        async fn fetch_profile(&self, _access_token: &str) -> ApiResult<Person> {
            match &self.0 {
                Ok(person) => Ok(person.clone()),
                Err(_) => Err(ApiError::Upstream("boom".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_takes_first_candidates() {
        let person = Person {
            names: vec![
                PersonName {
                    display_name: Some("A".to_string()),
                },
                PersonName {
                    display_name: Some("B".to_string()),
                },
            ],
            email_addresses: vec![PersonEmail {
                value: Some("a@x.com".to_string()),
            }],
            photos: vec![PersonPhoto {
                url: Some("http://x/p.png".to_string()),
            }],
        };

        let user = resolve_profile(&StubFetcher(Ok(person)), "tok").await.unwrap();

        assert_eq!(user.name, "A");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.picture, "http://x/p.png");
    }

    #[tokio::test]
    async fn test_resolve_defaults_missing_fields_to_empty() {
        let user = resolve_profile(&StubFetcher(Ok(Person::default())), "tok")
            .await
            .unwrap();

        assert_eq!(user, UserInfo::default());
    }

    #[tokio::test]
    async fn test_resolve_swallows_upstream_errors() {
        let fetcher = StubFetcher(Err(ApiError::Upstream("boom".to_string())));
        assert!(resolve_profile(&fetcher, "tok").await.is_none());
    }
}
