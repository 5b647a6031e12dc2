//! Extension de pmoserver::Server pour intégrer YouTube
//!
//! Ce module fournit un trait d'extension permettant d'ajouter le service
//! YouTube, ses endpoints JSON et les routes de connexion à un serveur
//! pmoserver.

use crate::api_rest::YouTubeState;
use crate::auth::OAuthClient;
use crate::service::YouTubeService;
use anyhow::Result;
use async_trait::async_trait;

/// Trait d'extension pour ajouter le support YouTube à un serveur pmoserver
///
/// `pmoserver` définit un serveur HTTP générique ; `pmoyoutube` l'étend via
/// ce trait sans que le serveur connaisse `pmoyoutube`.
///
/// # Exemple
///
/// ```rust,no_run
/// use pmoyoutube::YouTubeServerExt;
/// use pmoserver::ServerBuilder;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut server = ServerBuilder::new_configured().build();
///
///     server.init_youtube_configured().await?;
///
///     server.start().await;
///     server.wait().await;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait YouTubeServerExt {
    /// Enregistre le service YouTube et ses routes
    ///
    /// # Routes enregistrées
    ///
    /// - `GET /api/channel-playlists?channelId=` - Playlists publiques d'une chaîne
    /// - `GET /api/playlists` - Playlists de l'utilisateur connecté
    /// - `GET /api/playlist/{id}` - Vidéos d'une playlist
    /// - `GET /auth/signin`, `GET /auth/callback`, `POST /auth/signout` - Connexion Google
    /// - `GET /swagger-ui/youtube` - Documentation interactive
    ///
    /// # Returns
    ///
    /// L'état partagé, réutilisable par la vue web
    async fn init_youtube(
        &mut self,
        service: YouTubeService,
        oauth: Option<OAuthClient>,
    ) -> Result<YouTubeState>;

    /// Initialise le service YouTube depuis la configuration
    ///
    /// Utilise `accounts.youtube.*` et `youtube.*`. Sans client OAuth
    /// configuré, les routes de connexion répondent par une erreur 500.
    async fn init_youtube_configured(&mut self) -> Result<YouTubeState>;
}

// L'implémentation du trait est dans pmoserver_impl.rs
