//! # pmoyoutube - Client YouTube pour PMOTube
//!
//! Cette crate fournit l'accès aux playlists YouTube (API Data v3), un miroir
//! SQLite des playlists récupérées et, avec la feature `pmoserver`, les
//! endpoints HTTP et le flux de connexion Google.
//!
//! ## Vue d'ensemble
//!
//! - Playlists publiques d'une chaîne (clé API serveur)
//! - Playlists de l'utilisateur connecté (token OAuth), mirrorées en base
//! - Vidéos d'une playlist
//! - Sessions en mémoire référencées par cookie
//!
//! ## Structure des modules
//!
//! ```text
//! pmoyoutube/
//! ├── src/
//! │   ├── lib.rs              # Module principal (ce fichier)
//! │   ├── models.rs           # Playlist, PlaylistItem, vignettes
//! │   ├── api/
//! │   │   ├── mod.rs          # Client HTTP bas-niveau
//! │   │   ├── resources.rs    # JSON brut de YouTube
//! │   │   ├── playlists.rs    # playlists / playlistItems
//! │   │   └── channels.rs     # chaîne de l'utilisateur
//! │   ├── provider.rs         # Trait PlaylistProvider
//! │   ├── store.rs            # Miroir SQLite
//! │   ├── session.rs          # Sessions et cookie
//! │   ├── auth.rs             # OAuth Google
//! │   ├── service.rs          # Opérations métier
//! │   ├── api_rest.rs         # Handlers axum (feature pmoserver)
//! │   └── error.rs            # Gestion des erreurs
//! ```
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use pmoyoutube::YouTubeService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = YouTubeService::from_config()?;
//!
//!     for playlist in service.channel_playlists(Some("UC_x5XG1OV2P6uZZ5FSM9Ttw")).await? {
//!         println!("{} ({} videos)", playlist.display_title(), playlist.item_count.unwrap_or(0));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Gestion des erreurs
//!
//! ```rust,ignore
//! use pmoyoutube::YouTubeError;
//!
//! match service.my_playlists(session.as_ref()).await {
//!     Ok(playlists) => println!("{} playlists", playlists.len()),
//!     Err(YouTubeError::Unauthenticated) => println!("Sign in first"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config_ext;
pub mod error;
pub mod models;
pub mod provider;
pub mod service;
pub mod session;
pub mod store;

// Extension pmoserver (feature-gated)
#[cfg(feature = "pmoserver")]
pub mod api_rest;

#[cfg(feature = "pmoserver")]
pub mod pmoserver_ext;

#[cfg(feature = "pmoserver")]
mod pmoserver_impl;

pub use api::YouTubeApi;
pub use auth::{OAuthClient, Token};
pub use config_ext::YouTubeConfigExt;
pub use error::{Result, YouTubeError};
pub use models::{ChannelPlaylist, Playlist, PlaylistItem, Thumbnail, Thumbnails};
pub use provider::PlaylistProvider;
pub use service::{MirrorReport, YouTubeService};
pub use session::{SESSION_COOKIE, Session, SessionStore};
pub use store::PlaylistStore;

/// Ré-exporte le trait d'extension pmoserver
#[cfg(feature = "pmoserver")]
pub use pmoserver_ext::YouTubeServerExt;
