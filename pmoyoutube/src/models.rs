//! Structures de données exposées par PMOTube (playlists, items, vignettes)
//!
//! Les champs sont sérialisés en camelCase. Un champ optionnel absent est
//! omis du JSON plutôt que sérialisé à `null`, sauf `publishedAt` dans
//! [`ChannelPlaylist`].

use crate::api::resources::{PlaylistItemResource, PlaylistResource};
use serde::{Deserialize, Serialize};

/// Titre substitué quand une playlist de chaîne n'a pas de titre
pub const UNTITLED_PLAYLIST: &str = "Untitled Playlist";

/// Statut de confidentialité substitué quand YouTube n'en fournit pas
pub const UNKNOWN_PRIVACY_STATUS: &str = "unknown";

/// Une vignette (url + dimensions)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Jeu de vignettes, une par résolution
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct Thumbnails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub standard: Option<Thumbnail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxres: Option<Thumbnail>,
}

impl Thumbnails {
    /// URL de la vignette `default`, projection stockée dans le miroir
    pub fn default_url(&self) -> Option<&str> {
        self.default.as_ref().map(|t| t.url.as_str())
    }
}

/// Représente une playlist YouTube
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct Playlist {
    /// Identifiant unique de la playlist
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
    /// Nombre de vidéos
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u32>,
    /// `public`, `unlisted` ou `private`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_status: Option<String>,
    /// Date de publication (RFC 3339, telle que fournie par YouTube)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl Playlist {
    /// Substitue des valeurs par défaut aux champs absents
    ///
    /// Titre vide ou absent → "Untitled Playlist", description → "",
    /// nombre de vidéos → 0, statut → "unknown". Les vignettes et la date
    /// de publication sont laissées telles quelles.
    pub fn with_defaults(mut self) -> Self {
        if self.title.as_deref().is_none_or(str::is_empty) {
            self.title = Some(UNTITLED_PLAYLIST.to_string());
        }
        if self.description.is_none() {
            self.description = Some(String::new());
        }
        if self.item_count.is_none() {
            self.item_count = Some(0);
        }
        if self.privacy_status.as_deref().is_none_or(str::is_empty) {
            self.privacy_status = Some(UNKNOWN_PRIVACY_STATUS.to_string());
        }
        self
    }

    /// Titre affichable (vide si absent)
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

/// Playlist d'une chaîne, telle que renvoyée par `/channel-playlists`
///
/// Les valeurs par défaut sont déjà appliquées ; `publishedAt` est toujours
/// présent et vaut `null` quand YouTube ne le fournit pas.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct ChannelPlaylist {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
    pub item_count: u32,
    pub privacy_status: String,
    pub published_at: Option<String>,
}

impl From<Playlist> for ChannelPlaylist {
    fn from(playlist: Playlist) -> Self {
        let playlist = playlist.with_defaults();
        ChannelPlaylist {
            id: playlist.id,
            title: playlist.title.unwrap_or_default(),
            description: playlist.description.unwrap_or_default(),
            thumbnails: playlist.thumbnails,
            item_count: playlist.item_count.unwrap_or_default(),
            privacy_status: playlist.privacy_status.unwrap_or_default(),
            published_at: playlist.published_at.filter(|d| !d.is_empty()),
        }
    }
}

impl From<PlaylistResource> for Playlist {
    fn from(resource: PlaylistResource) -> Self {
        let snippet = resource.snippet.unwrap_or_default();
        Playlist {
            id: resource.id.unwrap_or_default(),
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
            item_count: resource.content_details.and_then(|c| c.item_count),
            privacy_status: resource.status.and_then(|s| s.privacy_status),
            published_at: snippet.published_at,
        }
    }
}

/// Représente une vidéo dans une playlist
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "pmoserver", derive(utoipa::ToSchema))]
pub struct PlaylistItem {
    /// Identifiant unique de l'item (distinct de l'id de la vidéo)
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<Thumbnails>,
    /// Identifiant de la vidéo référencée
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    /// Position (à partir de 0) dans la playlist
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl PlaylistItem {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }
}

impl From<PlaylistItemResource> for PlaylistItem {
    fn from(resource: PlaylistItemResource) -> Self {
        let snippet = resource.snippet.unwrap_or_default();
        PlaylistItem {
            id: resource.id.unwrap_or_default(),
            title: snippet.title,
            description: snippet.description,
            thumbnails: snippet.thumbnails,
            video_id: snippet.resource_id.and_then(|r| r.video_id),
            position: snippet.position,
            published_at: snippet.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn playlist_resource(value: serde_json::Value) -> PlaylistResource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_playlist_from_full_resource() {
        let resource = playlist_resource(json!({
            "id": "PL1",
            "snippet": {
                "title": "Mix",
                "description": "desc",
                "publishedAt": "2024-01-02T03:04:05Z",
                "thumbnails": { "default": { "url": "https://i.ytimg.com/d.jpg", "width": 120, "height": 90 } }
            },
            "contentDetails": { "itemCount": 12 },
            "status": { "privacyStatus": "public" }
        }));

        let playlist = Playlist::from(resource);
        assert_eq!(playlist.id, "PL1");
        assert_eq!(playlist.title.as_deref(), Some("Mix"));
        assert_eq!(playlist.item_count, Some(12));
        assert_eq!(playlist.privacy_status.as_deref(), Some("public"));
        assert_eq!(
            playlist.thumbnails.as_ref().and_then(|t| t.default_url()),
            Some("https://i.ytimg.com/d.jpg")
        );
    }

    #[test]
    fn test_playlist_missing_fields_stay_absent() {
        let playlist = Playlist::from(playlist_resource(json!({ "id": "PL2" })));
        assert!(playlist.title.is_none());
        assert!(playlist.item_count.is_none());

        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(value, json!({ "id": "PL2" }));
    }

    #[test]
    fn test_with_defaults() {
        let playlist = Playlist::from(playlist_resource(json!({
            "id": "PL3",
            "snippet": { "title": "" }
        })))
        .with_defaults();

        assert_eq!(playlist.title.as_deref(), Some(UNTITLED_PLAYLIST));
        assert_eq!(playlist.description.as_deref(), Some(""));
        assert_eq!(playlist.item_count, Some(0));
        assert_eq!(playlist.privacy_status.as_deref(), Some("unknown"));
        assert!(playlist.published_at.is_none());
    }

    #[test]
    fn test_with_defaults_keeps_existing_values() {
        let playlist = Playlist {
            id: "PL4".into(),
            title: Some("Kept".into()),
            item_count: Some(7),
            privacy_status: Some("private".into()),
            ..Default::default()
        }
        .with_defaults();

        assert_eq!(playlist.title.as_deref(), Some("Kept"));
        assert_eq!(playlist.item_count, Some(7));
        assert_eq!(playlist.privacy_status.as_deref(), Some("private"));
    }

    #[test]
    fn test_channel_playlist_keeps_null_published_at() {
        let playlist = ChannelPlaylist::from(Playlist {
            id: "PL5".into(),
            ..Default::default()
        });

        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "PL5",
                "title": "Untitled Playlist",
                "description": "",
                "itemCount": 0,
                "privacyStatus": "unknown",
                "publishedAt": null
            })
        );
    }

    #[test]
    fn test_playlist_item_from_resource() {
        let resource: PlaylistItemResource = serde_json::from_value(json!({
            "id": "UExJVEVN",
            "snippet": {
                "title": "Video",
                "position": 3,
                "resourceId": { "kind": "youtube#video", "videoId": "dQw4w9WgXcQ" }
            }
        }))
        .unwrap();

        let item = PlaylistItem::from(resource);
        assert_eq!(item.video_id.as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(item.position, Some(3));
        assert!(item.description.is_none());

        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("description").is_none());
        assert_eq!(value["videoId"], "dQw4w9WgXcQ");
    }
}
