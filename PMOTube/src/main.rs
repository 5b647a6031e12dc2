use pmoapp::WebAppExt;
use pmoconfig::get_config;
use pmoserver::ServerBuilder;
use pmoyoutube::YouTubeServerExt;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Infrastructure HTTP ==========

    let mut server = ServerBuilder::new_configured().name("PMOTube").build();
    server.init_logging().await;

    server
        .add_route("/info", || async {
            serde_json::json!({"version": env!("CARGO_PKG_VERSION")})
        })
        .await;

    // ========== PHASE 2 : API YouTube et vue ==========

    info!("📡 Initializing YouTube API...");
    let youtube = server.init_youtube_configured().await?;

    info!("📡 Registering web view...");
    server.add_webapp_with_redirect(youtube, "/app").await;

    // ========== PHASE 3 : Démarrage du serveur ==========

    info!("🌐 Starting HTTP server...");
    server.start().await;

    let config = get_config();
    info!(
        "✅ PMOTube is ready at http://{}:{}/app",
        config.get_base_url(),
        config.get_http_port()
    );
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    Ok(())
}
