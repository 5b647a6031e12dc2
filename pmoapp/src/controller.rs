//! État de la vue et transitions
//!
//! Le contrôleur est pur : [`ViewState::update`] applique un [`Message`] et
//! retourne les [`Effect`] (requêtes) à exécuter. Le résultat de chaque
//! requête revient sous forme de message.

use pmoyoutube::service::{
    FETCH_CHANNEL_PLAYLISTS_FAILED, FETCH_PLAYLIST_ITEMS_FAILED, FETCH_PLAYLISTS_FAILED,
};
use pmoyoutube::{Playlist, PlaylistItem, YouTubeError};

/// Événements reçus par le contrôleur
#[derive(Debug)]
pub enum Message {
    /// La session apparaît (`true`) ou disparaît (`false`)
    SessionChanged(bool),
    /// Reconstruit la vue d'un coup à partir de l'adresse de la page
    Restore {
        signed_in: bool,
        channel: Option<String>,
        playlist: Option<String>,
    },
    /// Recherche des playlists d'une chaîne (texte brut du formulaire)
    SubmitChannel(String),
    /// "Show My Playlists"
    Reset,
    SelectPlaylist(String),
    OwnPlaylistsLoaded(Result<Vec<Playlist>, YouTubeError>),
    ChannelPlaylistsLoaded {
        channel_id: String,
        result: Result<Vec<Playlist>, YouTubeError>,
    },
    ItemsLoaded {
        playlist_id: String,
        result: Result<Vec<PlaylistItem>, YouTubeError>,
    },
}

/// Requêtes à exécuter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchOwnPlaylists,
    /// Relit les playlists de l'utilisateur sans toucher au miroir
    ReloadOwnPlaylists,
    FetchChannelPlaylists(String),
    FetchPlaylistItems(String),
}

/// État affiché, dérivé de [`ViewState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SignedOut,
    Loading,
    OwnPlaylists,
    ChannelSearch,
    Error,
}

/// État local de la vue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub signed_in: bool,
    pub search_mode: bool,
    pub channel_id: String,
    pub playlists: Vec<Playlist>,
    pub selected_playlist: Option<String>,
    pub items: Vec<PlaylistItem>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if !self.signed_in {
            Phase::SignedOut
        } else if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.search_mode {
            Phase::ChannelSearch
        } else {
            Phase::OwnPlaylists
        }
    }

    /// Applique un message et retourne les requêtes à lancer
    pub fn update(&mut self, message: Message) -> Vec<Effect> {
        match message {
            Message::SessionChanged(true) => {
                if self.signed_in {
                    return Vec::new();
                }
                self.signed_in = true;
                if self.search_mode {
                    return Vec::new();
                }
                self.start_fetch();
                vec![Effect::FetchOwnPlaylists]
            }

            Message::SessionChanged(false) => {
                *self = Self::default();
                Vec::new()
            }

            Message::Restore {
                signed_in,
                channel,
                playlist,
            } => {
                *self = Self::default();
                if !signed_in {
                    return Vec::new();
                }
                self.signed_in = true;

                let channel = channel.as_deref().map(str::trim).filter(|c| !c.is_empty());
                let playlist = playlist.filter(|id| !id.is_empty());
                let mut effects = Vec::with_capacity(2);

                match channel {
                    Some(channel_id) => {
                        self.search_mode = true;
                        self.channel_id = channel_id.to_string();
                        effects.push(Effect::FetchChannelPlaylists(self.channel_id.clone()));
                    }
                    None if playlist.is_some() => effects.push(Effect::ReloadOwnPlaylists),
                    None => effects.push(Effect::FetchOwnPlaylists),
                }
                if let Some(id) = playlist {
                    self.selected_playlist = Some(id.clone());
                    effects.push(Effect::FetchPlaylistItems(id));
                }

                self.start_fetch();
                effects
            }

            Message::SubmitChannel(raw) => {
                let channel_id = raw.trim();
                if !self.signed_in || channel_id.is_empty() {
                    return Vec::new();
                }
                self.search_mode = true;
                self.channel_id = channel_id.to_string();
                self.selected_playlist = None;
                self.items.clear();
                self.start_fetch();
                vec![Effect::FetchChannelPlaylists(self.channel_id.clone())]
            }

            Message::Reset => {
                if !self.signed_in {
                    return Vec::new();
                }
                self.search_mode = false;
                self.channel_id.clear();
                self.selected_playlist = None;
                self.items.clear();
                self.start_fetch();
                vec![Effect::FetchOwnPlaylists]
            }

            Message::SelectPlaylist(id) => {
                if !self.signed_in || id.is_empty() {
                    return Vec::new();
                }
                if self.selected_playlist.as_deref() == Some(id.as_str()) && self.error.is_none() {
                    return Vec::new();
                }
                self.selected_playlist = Some(id.clone());
                self.start_fetch();
                vec![Effect::FetchPlaylistItems(id)]
            }

            Message::OwnPlaylistsLoaded(result) => {
                if !self.signed_in || self.search_mode {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(playlists) => self.playlists = playlists,
                    Err(_) => self.error = Some(FETCH_PLAYLISTS_FAILED.to_string()),
                }
                Vec::new()
            }

            Message::ChannelPlaylistsLoaded { channel_id, result } => {
                if !self.search_mode || channel_id != self.channel_id {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(playlists) => self.playlists = playlists,
                    Err(_) => self.error = Some(FETCH_CHANNEL_PLAYLISTS_FAILED.to_string()),
                }
                Vec::new()
            }

            Message::ItemsLoaded {
                playlist_id,
                result,
            } => {
                if self.selected_playlist.as_deref() != Some(playlist_id.as_str()) {
                    return Vec::new();
                }
                self.loading = false;
                match result {
                    Ok(items) => self.items = items,
                    Err(_) => {
                        self.items.clear();
                        self.error = Some(FETCH_PLAYLIST_ITEMS_FAILED.to_string());
                    }
                }
                Vec::new()
            }
        }
    }

    fn start_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }
}
