//! # pmoapp - Vue web de PMOTube
//!
//! Cette crate fournit la page de navigation des playlists YouTube : un état
//! de vue piloté par messages, l'exécution des requêtes correspondantes et le
//! rendu HTML. Avec la feature `pmoserver`, elle s'enregistre sur un
//! `pmoserver::Server` via le trait [`WebAppExt`].
//!
//! ## Organisation
//!
//! - [`controller`] : état de la vue et transitions, sans I/O
//! - [`driver`] : exécution des requêtes via `pmoyoutube::YouTubeService`
//! - [`render`] : production de la page HTML
//! - `view` : handler axum (feature `pmoserver`)
//!
//! ## Utilisation avec pmoserver
//!
//! ```rust,ignore
//! use pmoapp::WebAppExt;
//! use pmoyoutube::YouTubeServerExt;
//!
//! let state = server.init_youtube_configured().await?;
//! server.add_webapp_with_redirect(state, "/app").await;
//! ```
//!
//! La vue est servie sur `/app`, la feuille de style sur `/assets`, et `/`
//! redirige vers `/app`.

pub mod controller;
pub mod driver;
pub mod render;

#[cfg(feature = "pmoserver")]
pub mod view;

pub use controller::{Effect, Message, Phase, ViewState};
pub use driver::dispatch;
pub use render::render_page;

use rust_embed::RustEmbed;

/// Fichiers statiques de la vue, embarqués dans le binaire
#[derive(RustEmbed, Clone)]
#[folder = "webapp/static"]
pub struct Assets;

/// Trait pour étendre un serveur HTTP avec la vue PMOTube.
///
/// `pmoserver` ne connaît pas `pmoapp` : c'est `pmoapp` qui ajoute ces
/// méthodes à `pmoserver::Server`.
#[cfg(feature = "pmoserver")]
#[async_trait::async_trait]
pub trait WebAppExt {
    /// Monte la vue sur `path` et ses fichiers statiques sur `/assets`.
    async fn add_webapp(&mut self, state: pmoyoutube::api_rest::YouTubeState, path: &str);

    /// Comme [`add_webapp`](Self::add_webapp), avec une redirection de `/`
    /// vers la vue.
    async fn add_webapp_with_redirect(
        &mut self,
        state: pmoyoutube::api_rest::YouTubeState,
        path: &str,
    );
}

// Implémentation du trait pour pmoserver::Server (feature-gated)
#[cfg(feature = "pmoserver")]
mod pmoserver_impl;
