//! Implémentation du trait WebAppExt pour le serveur pmoserver
//!
//! ```rust,ignore
//! use pmoapp::WebAppExt;
//! use pmoserver::ServerBuilder;
//!
//! let mut server = ServerBuilder::new("PMOTube", "http://localhost", 8080).build();
//! server.add_webapp_with_redirect(state, "/app").await;
//! ```

use crate::view::{WebAppState, view_handler};
use crate::{Assets, WebAppExt};
use async_trait::async_trait;
use pmoserver::Server;
use pmoyoutube::api_rest::YouTubeState;
use tracing::info;

/// Chemin des fichiers statiques
const ASSETS_PATH: &str = "/assets";

#[async_trait]
impl WebAppExt for Server {
    async fn add_webapp(&mut self, state: YouTubeState, path: &str) {
        let mount_path = normalize_mount_path(path);
        mount_view(self, state, &mount_path).await;
        self.add_dir::<Assets>(ASSETS_PATH).await;
        info!("PMOTube view available at {}", mount_path);
    }

    async fn add_webapp_with_redirect(&mut self, state: YouTubeState, path: &str) {
        let mount_path = normalize_mount_path(path);
        self.add_webapp(state, &mount_path).await;
        if mount_path != "/" {
            self.add_redirect("/", &mount_path).await;
        }
    }
}

/// `" app/ "` devient `"/app"`, `""` devient `"/"`.
fn normalize_mount_path(path: &str) -> String {
    let trimmed = path.trim();

    if trimmed.is_empty() || trimmed == "/" {
        "/".to_string()
    } else {
        format!("/{}", trimmed.trim_matches('/'))
    }
}

/// Monte le handler de la vue ; `base_path` sert aux liens de la page
async fn mount_view(server: &mut Server, youtube: YouTubeState, path: &str) {
    let state = WebAppState {
        youtube,
        base_path: path.to_string(),
    };
    server.add_handler_with_state(path, view_handler, state).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mount_path() {
        assert_eq!(normalize_mount_path("/app"), "/app");
        assert_eq!(normalize_mount_path(" app/ "), "/app");
        assert_eq!(normalize_mount_path("//app//"), "/app");
        assert_eq!(normalize_mount_path(""), "/");
        assert_eq!(normalize_mount_path("/"), "/");
    }
}
