//! Opérations métier de PMOTube
//!
//! [`YouTubeService`] regroupe les trois lectures exposées (playlists d'une
//! chaîne, playlists de l'utilisateur, items d'une playlist) et le miroir
//! SQLite. Les handlers HTTP et la vue web appellent les mêmes opérations.

use crate::api::{MAX_RESULTS_CAP, YouTubeApi};
use crate::config_ext::YouTubeConfigExt;
use crate::error::{Result, YouTubeError};
use crate::models::{Playlist, PlaylistItem};
use crate::provider::PlaylistProvider;
use crate::session::Session;
use crate::store::PlaylistStore;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const CHANNEL_ID_REQUIRED: &str = "Channel ID is required";
pub const API_KEY_NOT_CONFIGURED: &str = "YouTube API key is not configured";

// Messages génériques des échecs YouTube, les détails restent dans les logs
pub const FETCH_CHANNEL_PLAYLISTS_FAILED: &str = "Failed to fetch channel playlists";
pub const FETCH_PLAYLISTS_FAILED: &str = "Failed to fetch playlists";
pub const FETCH_PLAYLIST_ITEMS_FAILED: &str = "Failed to fetch playlist items";

/// Bilan d'une écriture dans le miroir
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub written: usize,
    pub failed: usize,
}

/// Service partagé par les handlers et la vue
#[derive(Clone)]
pub struct YouTubeService {
    provider: Arc<dyn PlaylistProvider>,
    store: Option<Arc<PlaylistStore>>,
    api_key: Option<String>,
    mirror_items: bool,
}

impl YouTubeService {
    pub fn new(provider: Arc<dyn PlaylistProvider>) -> Self {
        Self {
            provider,
            store: None,
            api_key: None,
            mirror_items: false,
        }
    }

    /// Active le miroir SQLite
    pub fn with_store(mut self, store: Arc<PlaylistStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clé API serveur utilisée pour les lectures publiques
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Écrit aussi les items de playlist dans le miroir
    pub fn with_mirror_items(mut self, enabled: bool) -> Self {
        self.mirror_items = enabled;
        self
    }

    /// Construit le service depuis la configuration
    ///
    /// Ouvre le client YouTube et la base SQLite désignée par
    /// `youtube.store.path`.
    pub fn from_config() -> Result<Self> {
        let config = pmoconfig::get_config();
        let api = YouTubeApi::from_config()?;
        let store_path = config.get_youtube_store_path()?;
        let store = PlaylistStore::open(&store_path)?;

        info!(store = %store_path.display(), "YouTube service ready");

        Ok(Self::new(Arc::new(api))
            .with_store(Arc::new(store))
            .with_api_key(config.get_youtube_api_key())
            .with_mirror_items(config.get_youtube_mirror_items()))
    }

    pub fn store(&self) -> Option<&Arc<PlaylistStore>> {
        self.store.as_ref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Playlists publiques d'une chaîne, avec valeurs par défaut
    ///
    /// # Errors
    ///
    /// - [`YouTubeError::InvalidRequest`] si `channel_id` est absent ou vide
    /// - [`YouTubeError::Configuration`] si la clé API n'est pas configurée
    /// - l'erreur du fournisseur sinon
    pub async fn channel_playlists(&self, channel_id: Option<&str>) -> Result<Vec<Playlist>> {
        let channel_id = channel_id.map(str::trim).unwrap_or_default();
        if channel_id.is_empty() {
            return Err(YouTubeError::InvalidRequest(CHANNEL_ID_REQUIRED.to_string()));
        }

        let Some(api_key) = self.api_key.as_deref() else {
            error!("YouTube API key is not configured");
            return Err(YouTubeError::Configuration(API_KEY_NOT_CONFIGURED.to_string()));
        };

        info!(channel_id, "Fetching channel playlists");

        let mut playlists = self
            .provider
            .channel_playlists(channel_id, api_key)
            .await
            .inspect_err(|e| error!(channel_id, "Error fetching channel playlists: {}", e))?;

        if playlists.is_empty() {
            warn!(channel_id, "No playlists found for channel");
        }

        playlists.truncate(MAX_RESULTS_CAP as usize);
        debug!(channel_id, count = playlists.len(), "Channel playlists fetched");

        Ok(playlists.into_iter().map(Playlist::with_defaults).collect())
    }

    /// Playlists de l'utilisateur connecté, écrites dans le miroir
    ///
    /// Un échec du miroir est journalisé et n'empêche pas la réponse.
    pub async fn my_playlists(&self, session: Option<&Session>) -> Result<Vec<Playlist>> {
        let session = authenticated(session)?;
        let playlists = self.fetch_my_playlists(Some(session)).await?;

        let report = self.mirror_playlists(&session.user_id, &playlists);
        debug!(
            user_id = %session.user_id,
            count = playlists.len(),
            written = report.written,
            failed = report.failed,
            "Playlists fetched"
        );

        Ok(playlists)
    }

    /// Playlists de l'utilisateur connecté, sans écriture dans le miroir
    pub async fn fetch_my_playlists(&self, session: Option<&Session>) -> Result<Vec<Playlist>> {
        let session = authenticated(session)?;

        let mut playlists = self
            .provider
            .my_playlists(&session.access_token)
            .await
            .inspect_err(|e| error!(user_id = %session.user_id, "Error fetching playlists: {}", e))?;
        playlists.truncate(MAX_RESULTS_CAP as usize);

        Ok(playlists)
    }

    /// Vidéos d'une playlist, pour l'utilisateur connecté
    pub async fn playlist_items(
        &self,
        session: Option<&Session>,
        playlist_id: &str,
    ) -> Result<Vec<PlaylistItem>> {
        let session = authenticated(session)?;

        let mut items = self
            .provider
            .playlist_items(playlist_id, &session.access_token)
            .await
            .inspect_err(|e| error!(playlist_id, "Error fetching playlist items: {}", e))?;
        items.truncate(MAX_RESULTS_CAP as usize);

        if self.mirror_items {
            self.mirror_playlist_items(playlist_id, &items);
        }

        debug!(playlist_id, count = items.len(), "Playlist items fetched");
        Ok(items)
    }

    /// Id de la chaîne associée à un token
    pub async fn my_channel_id(&self, access_token: &str) -> Result<String> {
        self.provider.my_channel_id(access_token).await
    }

    /// Écrit les playlists une par une dans le miroir
    pub fn mirror_playlists(&self, user_id: &str, playlists: &[Playlist]) -> MirrorReport {
        let mut report = MirrorReport::default();
        let Some(store) = &self.store else {
            return report;
        };

        for playlist in playlists {
            match store.upsert_playlist(user_id, playlist) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(playlist_id = %playlist.id, "Failed to store playlist: {}", e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Écrit les items d'une playlist dans le miroir
    pub fn mirror_playlist_items(&self, playlist_id: &str, items: &[PlaylistItem]) -> MirrorReport {
        let mut report = MirrorReport::default();
        let Some(store) = &self.store else {
            return report;
        };

        for item in items {
            match store.upsert_playlist_item(playlist_id, item) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(item_id = %item.id, playlist_id, "Failed to store playlist item: {}", e);
                    report.failed += 1;
                }
            }
        }
        report
    }
}

fn authenticated(session: Option<&Session>) -> Result<&Session> {
    match session {
        Some(s) if !s.access_token.is_empty() && !s.is_expired() => Ok(s),
        _ => Err(YouTubeError::Unauthenticated),
    }
}
