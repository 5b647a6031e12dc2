//! Implémentation du trait YouTubeServerExt pour pmoserver::Server

use crate::api_rest::{YouTubeApiDoc, YouTubeState, create_auth_router, create_router};
use crate::auth::OAuthClient;
use crate::pmoserver_ext::YouTubeServerExt;
use crate::service::YouTubeService;
use crate::session::SessionStore;
use anyhow::Result;
use async_trait::async_trait;
use pmoserver::Server;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

#[async_trait]
impl YouTubeServerExt for Server {
    async fn init_youtube(
        &mut self,
        service: YouTubeService,
        oauth: Option<OAuthClient>,
    ) -> Result<YouTubeState> {
        if !service.has_api_key() {
            warn!("YouTube API key is not configured, channel lookups will fail");
        }

        let state = YouTubeState {
            service: Arc::new(service),
            sessions: SessionStore::new(),
            oauth: oauth.map(Arc::new),
        };

        self.add_openapi(create_router(state.clone()), YouTubeApiDoc::openapi(), "youtube")
            .await;
        self.add_router("/auth", create_auth_router(state.clone()))
            .await;

        info!("YouTube API available at /api/*, sign-in at /auth/signin");
        Ok(state)
    }

    async fn init_youtube_configured(&mut self) -> Result<YouTubeState> {
        info!("Initializing YouTube service from configuration");

        let service = YouTubeService::from_config()?;
        let oauth = match OAuthClient::from_config() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("{}, sign-in disabled", e);
                None
            }
        };

        self.init_youtube(service, oauth).await
    }
}
