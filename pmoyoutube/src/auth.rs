//! Connexion Google OAuth 2.0 (authorization code)
//!
//! Le serveur redirige l'utilisateur vers la page de consentement Google,
//! puis échange le code reçu sur `/auth/callback` contre un token d'accès en
//! lecture seule sur YouTube.

use crate::config_ext::YouTubeConfigExt;
use crate::error::{Result, YouTubeError};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};
use url::Url;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Scope en lecture seule sur le compte YouTube
pub const YOUTUBE_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";

/// Token d'accès et sa date d'expiration
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expiration: DateTime<Utc>,
}

#[derive(Deserialize)]
struct TokenData {
    access_token: String,
    expires_in: u64,
}

impl<'de> Deserialize<'de> for Token {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token_data = TokenData::deserialize(deserializer)?;
        let seconds = i64::try_from(token_data.expires_in)
            .unwrap_or(i64::MAX)
            .saturating_sub(1);
        let expiration = Duration::try_seconds(seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Ok(Token {
            access_token: token_data.access_token,
            expiration,
        })
    }
}

/// Réponse d'erreur du token endpoint
#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client OAuth Google
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_url: String,
    auth_url: String,
    token_url: String,
}

impl OAuthClient {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }

    /// Remplace les endpoints Google (serveur de test)
    pub fn with_endpoints(mut self, auth_url: impl Into<String>, token_url: impl Into<String>) -> Self {
        self.auth_url = auth_url.into();
        self.token_url = token_url.into();
        self
    }

    /// Crée le client depuis `accounts.youtube.*`
    ///
    /// # Errors
    ///
    /// [`YouTubeError::Configuration`] si le client id ou le secret manque
    pub fn from_config() -> Result<Self> {
        let config = pmoconfig::get_config();
        match (
            config.get_youtube_client_id(),
            config.get_youtube_client_secret(),
        ) {
            (Some(id), Some(secret)) => {
                Ok(Self::new(id, secret, config.get_youtube_redirect_url()))
            }
            _ => Err(YouTubeError::Configuration(
                "YouTube OAuth client is not configured".to_string(),
            )),
        }
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// URL de la page de consentement
    pub fn authorize_url(&self, state: &str) -> Result<Url> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("response_type", "code"),
                ("scope", YOUTUBE_READONLY_SCOPE),
                ("access_type", "online"),
                ("include_granted_scopes", "true"),
                ("state", state),
            ],
        )
        .map_err(|e| YouTubeError::Configuration(format!("Invalid OAuth URL: {}", e)))
    }

    /// Échange un code d'autorisation contre un token
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        debug!("Exchanging OAuth code at {}", self.token_url);

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<TokenError>(&text) {
                Ok(err) => err.error_description.unwrap_or(err.error),
                Err(_) => text,
            };
            warn!("OAuth token exchange failed ({}): {}", status, message);
            return Err(YouTubeError::OAuth(message));
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_parameters() {
        let client = OAuthClient::new("cid", "secret", "http://localhost:8080/auth/callback");
        let url = client.authorize_url("xyz").unwrap();

        assert_eq!(url.host_str(), Some("accounts.google.com"));
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "cid");
        assert_eq!(params["redirect_uri"], "http://localhost:8080/auth/callback");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["scope"], YOUTUBE_READONLY_SCOPE);
        assert_eq!(params["state"], "xyz");
    }

    #[test]
    fn test_token_expiration() {
        let token: Token =
            serde_json::from_str(r#"{"access_token":"ya29.x","expires_in":3599,"token_type":"Bearer"}"#)
                .unwrap();
        assert_eq!(token.access_token, "ya29.x");
        assert!(token.expiration > Utc::now() + Duration::minutes(59));
        assert!(token.expiration < Utc::now() + Duration::minutes(61));
    }

    #[test]
    fn test_huge_expires_in_saturates() {
        let token: Token = serde_json::from_value(serde_json::json!({
            "access_token": "ya29.x",
            "expires_in": u64::MAX
        }))
        .unwrap();
        assert_eq!(token.expiration, DateTime::<Utc>::MAX_UTC);
    }
}
