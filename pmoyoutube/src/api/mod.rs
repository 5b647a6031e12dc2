//! Couche d'accès à l'API YouTube Data v3
//!
//! Ce module fournit une interface bas-niveau pour communiquer avec YouTube.
//! Chaque appel est authentifié soit par une clé API (lectures publiques),
//! soit par le token d'accès OAuth de l'utilisateur (lectures `mine=true`).

pub mod channels;
pub mod playlists;
pub mod resources;

use crate::config_ext::YouTubeConfigExt;
use crate::error::{Result, YouTubeError};
use resources::ErrorEnvelope;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// URL de base de l'API YouTube Data v3
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Nombre maximal de résultats par page accepté par YouTube
pub const MAX_RESULTS_CAP: u32 = 50;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("PMOTube/", env!("CARGO_PKG_VERSION"));

/// Credential utilisé pour un appel
#[derive(Debug, Clone, Copy)]
pub enum Credential<'a> {
    /// Clé API serveur, passée en paramètre `key=`
    ApiKey(&'a str),
    /// Token OAuth de l'utilisateur, passé en `Authorization: Bearer`
    AccessToken(&'a str),
}

/// Client API bas-niveau pour communiquer avec YouTube
#[derive(Debug, Clone)]
pub struct YouTubeApi {
    client: Client,
    api_base: String,
    max_results: u32,
}

impl YouTubeApi {
    /// Crée un client avec les paramètres par défaut
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> YouTubeApiBuilder {
        YouTubeApiBuilder::default()
    }

    /// Crée un client depuis la configuration (`youtube.*`)
    pub fn from_config() -> Result<Self> {
        let config = pmoconfig::get_config();
        Self::builder()
            .api_base(config.get_youtube_api_base_url())
            .max_results(config.get_youtube_max_results())
            .timeout(Duration::from_secs(config.get_youtube_timeout_secs()))
            .build()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Taille de page demandée à YouTube (plafonnée à 50)
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// Effectue une requête GET à l'API
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
        credential: Credential<'_>,
    ) -> Result<T> {
        let url = format!("{}{}", self.api_base, endpoint);

        debug!("GET {} with {} params", url, params.len());

        let mut request = self.client.get(&url).query(params);

        request = match credential {
            Credential::ApiKey(key) => request.query(&[("key", key)]),
            Credential::AccessToken(token) => request.bearer_auth(token),
        };

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Traite la réponse HTTP
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        debug!("Response status: {}", status);

        let text = response.text().await?;

        if !status.is_success() {
            warn!("YouTube API error ({}): {}", status_code, text);
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => YouTubeError::from_status_code(
                    envelope.error.code.unwrap_or(status_code),
                    envelope.error.message.clone().unwrap_or_default(),
                    envelope.error.reason(),
                ),
                Err(_) => YouTubeError::from_status_code(status_code, text, None),
            });
        }

        debug!(body = %text, "YouTube API response");

        serde_json::from_str(&text).map_err(|e| {
            warn!("Failed to parse response: {}", e);
            YouTubeError::JsonParse(e)
        })
    }
}

/// Builder pour configurer un [`YouTubeApi`]
#[derive(Debug)]
pub struct YouTubeApiBuilder {
    client: Option<Client>,
    api_base: String,
    max_results: u32,
    timeout: Duration,
}

impl Default for YouTubeApiBuilder {
    fn default() -> Self {
        Self {
            client: None,
            api_base: DEFAULT_API_BASE.to_string(),
            max_results: MAX_RESULTS_CAP,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl YouTubeApiBuilder {
    /// Utilise un client HTTP existant
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// URL de base de l'API (sans slash final)
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Taille de page, ramenée dans `1..=50`
    pub fn max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS_CAP);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<YouTubeApi> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout)
                .user_agent(USER_AGENT)
                .build()?,
        };

        Ok(YouTubeApi {
            client,
            api_base: self.api_base,
            max_results: self.max_results,
        })
    }
}
