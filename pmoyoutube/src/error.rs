//! Gestion des erreurs pour le client YouTube

use thiserror::Error;

/// Type Result personnalisé pour pmoyoutube
pub type Result<T> = std::result::Result<T, YouTubeError>;

/// Erreurs possibles lors de l'utilisation de l'API YouTube
#[derive(Error, Debug)]
pub enum YouTubeError {
    /// Requête invalide (paramètre obligatoire absent ou vide)
    #[error("{0}")]
    InvalidRequest(String),

    /// Pas de session, ou session sans token d'accès
    #[error("Not authenticated")]
    Unauthenticated,

    /// Token refusé par YouTube (401/403)
    #[error("Authorization rejected by YouTube: {0}")]
    Unauthorized(String),

    /// Ressource non trouvée (playlist, chaîne)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erreur HTTP
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur de parsing JSON
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur de configuration (anyhow)
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    /// Credential serveur manquant (clé API, client OAuth)
    #[error("{0}")]
    Configuration(String),

    /// Erreur de l'API YouTube
    #[error("YouTube API error (code {code}): {message}")]
    ApiError { code: u16, message: String },

    /// Quota journalier de l'API dépassé
    #[error("YouTube API quota exceeded")]
    QuotaExceeded,

    /// Quota dépassé (rate limiting)
    #[error("Rate limit exceeded, please try again later")]
    RateLimitExceeded,

    /// Erreur du miroir SQLite
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Erreur OAuth (échange du code)
    #[error("OAuth error: {0}")]
    OAuth(String),
}

impl YouTubeError {
    /// Crée une erreur API depuis un code de statut HTTP, le message et la
    /// raison (`errors[0].reason`) renvoyés par Google
    pub fn from_status_code(code: u16, message: impl Into<String>, reason: Option<&str>) -> Self {
        match (code, reason) {
            (403, Some("quotaExceeded" | "dailyLimitExceeded")) => Self::QuotaExceeded,
            (403, Some("rateLimitExceeded" | "userRateLimitExceeded")) | (429, _) => {
                Self::RateLimitExceeded
            }
            (401 | 403, _) => Self::Unauthorized(message.into()),
            (404, _) => Self::NotFound(message.into()),
            _ => Self::ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Vérifie si l'erreur vient d'un problème de credentials
    pub fn is_auth_error(&self) -> bool {
        matches!(self, YouTubeError::Unauthenticated | YouTubeError::Unauthorized(_))
    }

    /// Vérifie si l'erreur est une erreur de quota ou de rate limiting
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            YouTubeError::RateLimitExceeded | YouTubeError::QuotaExceeded
        )
    }
}
