/// Google OAuth 2.0 authorization-code client
///
/// Covers the two server-side legs of the flow: building the consent URL the
/// browser is redirected to, and exchanging the returned code for the
/// user's profile. Everything in between happens at Google.
///
/// # Example
///
/// ```no_run
/// use workboard_shared::auth::oauth::{GoogleOAuthClient, GoogleOAuthConfig};
///
/// # async fn example(code: &str) -> Result<(), Box<dyn std::error::Error>> {
/// let client = GoogleOAuthClient::new(GoogleOAuthConfig {
///     client_id: "id.apps.googleusercontent.com".to_string(),
///     client_secret: "secret".to_string(),
///     redirect_url: "http://localhost:8080/api/auth/google/callback".to_string(),
/// });
///
/// println!("send the browser to {}", client.authorization_url());
/// let profile = client.exchange_code(code).await?;
/// println!("signed in as {}", profile.email);
/// # Ok(())
/// # }
/// ```

use serde::Deserialize;
use tracing::debug;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const SCOPES: &str = "openid email profile";

/// Error type for the OAuth exchange
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    /// Transport or decoding failure talking to Google
    #[error("OAuth request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Google answered with a non-success status
    #[error("OAuth provider rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Profile has no usable email
    #[error("OAuth profile is missing an email address")]
    MissingEmail,

    /// Google has not verified the profile's email
    #[error("OAuth profile email {0} is not verified")]
    UnverifiedEmail(String),
}

/// Client credentials registered with Google
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Our callback URL, as registered with Google
    pub redirect_url: String,
}

/// Profile returned by Google's userinfo endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleProfile {
    /// Google account id (`sub`)
    #[serde(rename = "sub")]
    pub id: String,

    #[serde(default)]
    pub email: String,

    /// Accounts are linked by email, so only verified ones are accepted
    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub picture: Option<String>,
}

impl GoogleProfile {
    /// Accepts the profile only with a verified email
    pub fn verified(self) -> Result<Self, OAuthError> {
        if self.email.is_empty() {
            return Err(OAuthError::MissingEmail);
        }
        if !self.email_verified {
            return Err(OAuthError::UnverifiedEmail(self.email));
        }
        Ok(self)
    }

    /// Display name, falling back to the email's local part
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self
                .email
                .split('@')
                .next()
                .unwrap_or_default()
                .to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth client
#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    config: GoogleOAuthConfig,
    http: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Consent screen URL for the browser redirect
    pub fn authorization_url(&self) -> String {
        let url = reqwest::Url::parse_with_params(
            AUTHORIZE_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("prompt", "select_account"),
            ],
        );

        match url {
            Ok(url) => url.to_string(),
            // The endpoint constant always parses
            Err(_) => AUTHORIZE_ENDPOINT.to_string(),
        }
    }

    /// Exchanges an authorization code for the signed-in user's profile
    ///
    /// # Errors
    ///
    /// - `OAuthError::Request` on transport failures
    /// - `OAuthError::Rejected` when Google refuses the code or token
    /// - `OAuthError::MissingEmail` when the profile carries no email
    /// - `OAuthError::UnverifiedEmail` when Google has not verified it
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleProfile, OAuthError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let token: TokenResponse = ensure_success(response).await?.json().await?;
        debug!("Exchanged Google authorization code");

        let response = self
            .http
            .get(USERINFO_ENDPOINT)
            .bearer_auth(&token.access_token)
            .send()
            .await?;

        let profile: GoogleProfile = ensure_success(response).await?.json().await?;
        profile.verified()
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, OAuthError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(OAuthError::Rejected { status, body })
}
