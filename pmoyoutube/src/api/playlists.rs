//! Endpoints `playlists` et `playlistItems`

use super::resources::{ListResponse, PlaylistItemResource, PlaylistResource};
use super::{Credential, YouTubeApi};
use crate::error::Result;

/// Parts demandées pour une playlist
const PLAYLIST_PARTS: &str = "snippet,contentDetails,status";

impl YouTubeApi {
    /// Liste les playlists publiques d'une chaîne
    pub async fn list_channel_playlists(
        &self,
        channel_id: &str,
        api_key: &str,
    ) -> Result<ListResponse<PlaylistResource>> {
        let max_results = self.max_results().to_string();
        self.get(
            "/playlists",
            &[
                ("part", PLAYLIST_PARTS),
                ("channelId", channel_id),
                ("maxResults", &max_results),
            ],
            Credential::ApiKey(api_key),
        )
        .await
    }

    /// Liste les playlists de l'utilisateur authentifié (`mine=true`)
    pub async fn list_my_playlists(
        &self,
        access_token: &str,
    ) -> Result<ListResponse<PlaylistResource>> {
        let max_results = self.max_results().to_string();
        self.get(
            "/playlists",
            &[
                ("part", PLAYLIST_PARTS),
                ("mine", "true"),
                ("maxResults", &max_results),
            ],
            Credential::AccessToken(access_token),
        )
        .await
    }

    /// Liste les vidéos d'une playlist
    pub async fn list_playlist_items(
        &self,
        playlist_id: &str,
        access_token: &str,
    ) -> Result<ListResponse<PlaylistItemResource>> {
        let max_results = self.max_results().to_string();
        self.get(
            "/playlistItems",
            &[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", &max_results),
            ],
            Credential::AccessToken(access_token),
        )
        .await
    }
}
