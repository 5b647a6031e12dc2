//! Extension pour intégrer la configuration YouTube dans pmoconfig
//!
//! Ce module fournit le trait `YouTubeConfigExt` qui ajoute à
//! `pmoconfig::Config` les credentials et paramètres YouTube.

use crate::api::{DEFAULT_API_BASE, MAX_RESULTS_CAP};
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;
use std::path::PathBuf;

/// Variable d'environnement lue si `accounts.youtube.api_key` est vide
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

const DEFAULT_STORE_FILE: &str = "pmotube.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait d'extension pour gérer la configuration YouTube dans pmoconfig
///
/// # Exemple
///
/// ```rust,ignore
/// use pmoconfig::get_config;
/// use pmoyoutube::YouTubeConfigExt;
///
/// let config = get_config();
/// if config.get_youtube_api_key().is_none() {
///     eprintln!("YouTube API key is not configured");
/// }
/// ```
pub trait YouTubeConfigExt {
    /// Clé API serveur (`accounts.youtube.api_key`, sinon `YOUTUBE_API_KEY`)
    fn get_youtube_api_key(&self) -> Option<String>;

    /// Définit la clé API serveur
    fn set_youtube_api_key(&self, api_key: &str) -> Result<()>;

    /// Identifiant du client OAuth Google
    fn get_youtube_client_id(&self) -> Option<String>;

    /// Secret du client OAuth Google
    fn get_youtube_client_secret(&self) -> Option<String>;

    /// URL de retour OAuth
    ///
    /// Par défaut `http://{host.base_url}:{host.http_port}/auth/callback`.
    fn get_youtube_redirect_url(&self) -> String;

    /// URL de base de l'API Data v3
    fn get_youtube_api_base_url(&self) -> String;

    /// Nombre de résultats demandés par appel (plafonné à 50)
    fn get_youtube_max_results(&self) -> u32;

    /// Timeout HTTP en secondes
    fn get_youtube_timeout_secs(&self) -> u64;

    /// Chemin absolu de la base SQLite du miroir
    fn get_youtube_store_path(&self) -> Result<PathBuf>;

    /// Active le miroir des items de playlist
    fn get_youtube_mirror_items(&self) -> bool;
}

impl YouTubeConfigExt for Config {
    fn get_youtube_api_key(&self) -> Option<String> {
        self.get_string(&["accounts", "youtube", "api_key"]).or_else(|| {
            std::env::var(API_KEY_ENV)
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
        })
    }

    fn set_youtube_api_key(&self, api_key: &str) -> Result<()> {
        self.set_value(
            &["accounts", "youtube", "api_key"],
            Value::String(api_key.to_string()),
        )
    }

    fn get_youtube_client_id(&self) -> Option<String> {
        self.get_string(&["accounts", "youtube", "client_id"])
    }

    fn get_youtube_client_secret(&self) -> Option<String> {
        self.get_string(&["accounts", "youtube", "client_secret"])
    }

    fn get_youtube_redirect_url(&self) -> String {
        self.get_string(&["accounts", "youtube", "redirect_url"])
            .unwrap_or_else(|| {
                format!(
                    "http://{}:{}/auth/callback",
                    self.get_base_url(),
                    self.get_http_port()
                )
            })
    }

    fn get_youtube_api_base_url(&self) -> String {
        self.get_string(&["youtube", "api_base_url"])
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    fn get_youtube_max_results(&self) -> u32 {
        let value = self.get_u64_or(&["youtube", "max_results"], MAX_RESULTS_CAP as u64);
        value.clamp(1, MAX_RESULTS_CAP as u64) as u32
    }

    fn get_youtube_timeout_secs(&self) -> u64 {
        self.get_u64_or(&["youtube", "timeout_secs"], DEFAULT_TIMEOUT_SECS)
    }

    fn get_youtube_store_path(&self) -> Result<PathBuf> {
        self.get_managed_file(&["youtube", "store", "path"], DEFAULT_STORE_FILE)
    }

    fn get_youtube_mirror_items(&self) -> bool {
        self.get_bool_or(&["youtube", "store", "mirror_items"], false)
    }
}
