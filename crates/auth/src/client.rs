use serde::Deserialize;

use crate::error::AuthError;

/// The verified identity behind a bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Client for the hosted identity provider (GoTrue-style user endpoint).
pub struct AuthClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

impl AuthClient {
    /// Creates a new identity-provider client.
    ///
    /// `api_key` is the project-level key some providers require next to
    /// the per-user bearer token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(base_url: String, api_key: Option<String>) -> Result<Self, AuthError> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url, api_key })
    }

    /// Resolve a bearer token to its user, or fail with `Unauthorized`.
    ///
    /// # Errors
    /// `Unauthorized` on 401/403, `HttpStatus` on other non-success
    /// statuses, `HttpRequest` on transport failures.
    pub async fn get_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let mut request = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("Authorization", format!("Bearer {token}"));
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AuthError::Unauthorized);
        }
        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            return Err(AuthError::HttpStatus { code: status.as_u16(), body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AuthError::JsonParse {
            context: "identity provider user response".to_owned(),
            source: e,
        })
    }
}
