//! Abstraction du fournisseur de playlists
//!
//! [`PlaylistProvider`] est le point de jonction entre le service et YouTube.
//! [`YouTubeApi`] en est l'implémentation réelle ; les tests en fournissent
//! une version en mémoire.

use crate::api::YouTubeApi;
use crate::api::resources::ListResponse;
use crate::error::Result;
use crate::models::{Playlist, PlaylistItem};
use async_trait::async_trait;

/// Source de playlists et d'items de playlist
#[async_trait]
pub trait PlaylistProvider: Send + Sync {
    /// Playlists publiques d'une chaîne, lues avec la clé API serveur
    async fn channel_playlists(&self, channel_id: &str, api_key: &str) -> Result<Vec<Playlist>>;

    /// Playlists de l'utilisateur propriétaire du token
    async fn my_playlists(&self, access_token: &str) -> Result<Vec<Playlist>>;

    /// Vidéos d'une playlist
    async fn playlist_items(&self, playlist_id: &str, access_token: &str)
    -> Result<Vec<PlaylistItem>>;

    /// Id de la chaîne de l'utilisateur propriétaire du token
    async fn my_channel_id(&self, access_token: &str) -> Result<String>;
}

fn into_models<R, M: From<R>>(response: ListResponse<R>) -> Vec<M> {
    response.into_items().into_iter().map(M::from).collect()
}

#[async_trait]
impl PlaylistProvider for YouTubeApi {
    async fn channel_playlists(&self, channel_id: &str, api_key: &str) -> Result<Vec<Playlist>> {
        let response = self.list_channel_playlists(channel_id, api_key).await?;
        Ok(into_models(response))
    }

    async fn my_playlists(&self, access_token: &str) -> Result<Vec<Playlist>> {
        let response = self.list_my_playlists(access_token).await?;
        Ok(into_models(response))
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        access_token: &str,
    ) -> Result<Vec<PlaylistItem>> {
        let response = self.list_playlist_items(playlist_id, access_token).await?;
        Ok(into_models(response))
    }

    async fn my_channel_id(&self, access_token: &str) -> Result<String> {
        YouTubeApi::my_channel_id(self, access_token).await
    }
}
