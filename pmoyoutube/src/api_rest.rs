//! Endpoints API REST et routes de connexion
//!
//! Ce module définit les handlers HTTP qui exposent les opérations de
//! [`YouTubeService`] et le flux de connexion Google.

use crate::auth::OAuthClient;
use crate::error::YouTubeError;
use crate::models::{ChannelPlaylist, Playlist, PlaylistItem, Thumbnail, Thumbnails};
use crate::service::{
    FETCH_CHANNEL_PLAYLISTS_FAILED, FETCH_PLAYLIST_ITEMS_FAILED, FETCH_PLAYLISTS_FAILED,
    YouTubeService,
};
use crate::session::{Session, SessionStore, removal_cookie, session_cookie};
use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, Path, Query, State},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::OpenApi;

/// Page vers laquelle les routes de connexion redirigent
pub const HOME_PATH: &str = "/app";

/// État partagé de l'application
#[derive(Clone)]
pub struct YouTubeState {
    pub service: Arc<YouTubeService>,
    pub sessions: SessionStore,
    /// Absent si le client OAuth n'est pas configuré
    pub oauth: Option<Arc<OAuthClient>>,
}

impl FromRef<YouTubeState> for SessionStore {
    fn from_ref(state: &YouTubeState) -> Self {
        state.sessions.clone()
    }
}

/// Corps JSON des réponses d'erreur
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Erreur HTTP : un statut et un message renvoyé en `{"error": ...}`
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            YouTubeError::Unauthenticated.to_string(),
        )
    }

    /// Traduit une erreur du service
    ///
    /// Les erreurs du fournisseur sont masquées derrière `fallback` ; leur
    /// détail est déjà journalisé par le service.
    pub fn from_youtube(err: YouTubeError, fallback: &str) -> Self {
        match err {
            YouTubeError::InvalidRequest(message) => Self::new(StatusCode::BAD_REQUEST, message),
            YouTubeError::Unauthenticated => Self::unauthenticated(),
            YouTubeError::Configuration(message) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            _ => Self::new(StatusCode::INTERNAL_SERVER_ERROR, fallback),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Extracteur de la session courante ; rejette la requête en 401 sinon
pub struct AuthSession(pub Session);

impl<S> FromRequestParts<S> for AuthSession
where
    SessionStore: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionStore::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        sessions
            .session_for(&jar)
            .map(AuthSession)
            .ok_or_else(AppError::unauthenticated)
    }
}

/// Paramètres de `/channel-playlists`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelQuery {
    pub channel_id: Option<String>,
}

/// Paramètres du retour OAuth
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Renseigné par Google si l'utilisateur refuse
    pub error: Option<String>,
}

/// Crée le router des endpoints JSON (monté sous `/api`)
pub fn create_router(state: YouTubeState) -> Router {
    Router::new()
        .route("/channel-playlists", get(get_channel_playlists))
        .route("/playlists", get(get_my_playlists))
        .route("/playlist/{id}", get(get_playlist_items))
        .with_state(state)
}

/// Crée le router de connexion (monté sous `/auth`)
pub fn create_auth_router(state: YouTubeState) -> Router {
    Router::new()
        .route("/signin", get(sign_in))
        .route("/callback", get(callback))
        .route("/signout", post(sign_out))
        .with_state(state)
}

// ============ Handlers ============

#[utoipa::path(
    get,
    path = "/channel-playlists",
    params(
        ("channelId" = String, Query, description = "Identifiant de la chaîne")
    ),
    responses(
        (status = 200, description = "Playlists publiques de la chaîne", body = Vec<ChannelPlaylist>),
        (status = 400, description = "Channel ID is required", body = ErrorResponse),
        (status = 500, description = "Clé API absente ou échec YouTube", body = ErrorResponse)
    ),
    tag = "youtube"
)]
async fn get_channel_playlists(
    State(state): State<YouTubeState>,
    Query(params): Query<ChannelQuery>,
) -> Result<Json<Vec<ChannelPlaylist>>, AppError> {
    let playlists = state
        .service
        .channel_playlists(params.channel_id.as_deref())
        .await
        .map_err(|e| AppError::from_youtube(e, FETCH_CHANNEL_PLAYLISTS_FAILED))?;
    Ok(Json(playlists.into_iter().map(ChannelPlaylist::from).collect()))
}

#[utoipa::path(
    get,
    path = "/playlists",
    responses(
        (status = 200, description = "Playlists de l'utilisateur connecté", body = Vec<Playlist>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Échec YouTube", body = ErrorResponse)
    ),
    tag = "youtube"
)]
async fn get_my_playlists(
    State(state): State<YouTubeState>,
    AuthSession(session): AuthSession,
) -> Result<Json<Vec<Playlist>>, AppError> {
    let playlists = state
        .service
        .my_playlists(Some(&session))
        .await
        .map_err(|e| AppError::from_youtube(e, FETCH_PLAYLISTS_FAILED))?;
    Ok(Json(playlists))
}

#[utoipa::path(
    get,
    path = "/playlist/{id}",
    params(
        ("id" = String, Path, description = "Identifiant de la playlist")
    ),
    responses(
        (status = 200, description = "Vidéos de la playlist", body = Vec<PlaylistItem>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Échec YouTube", body = ErrorResponse)
    ),
    tag = "youtube"
)]
async fn get_playlist_items(
    State(state): State<YouTubeState>,
    AuthSession(session): AuthSession,
    Path(id): Path<String>,
) -> Result<Json<Vec<PlaylistItem>>, AppError> {
    let items = state
        .service
        .playlist_items(Some(&session), &id)
        .await
        .map_err(|e| AppError::from_youtube(e, FETCH_PLAYLIST_ITEMS_FAILED))?;
    Ok(Json(items))
}

fn oauth_client(state: &YouTubeState) -> Result<&OAuthClient, AppError> {
    state.oauth.as_deref().ok_or_else(|| {
        AppError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "YouTube OAuth client is not configured",
        )
    })
}

async fn sign_in(State(state): State<YouTubeState>) -> Result<Redirect, AppError> {
    let oauth = oauth_client(&state)?;
    let csrf_state = state.sessions.new_oauth_state();
    let url = oauth
        .authorize_url(&csrf_state)
        .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Redirect::to(url.as_str()))
}

async fn callback(
    State(state): State<YouTubeState>,
    Query(params): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), AppError> {
    let oauth = oauth_client(&state)?;

    let known_state = params
        .state
        .as_deref()
        .is_some_and(|s| state.sessions.take_oauth_state(s));
    if !known_state {
        warn!("OAuth callback with unknown state");
        return Err(AppError::new(StatusCode::BAD_REQUEST, "Invalid OAuth state"));
    }

    if let Some(error) = params.error {
        warn!("Sign-in refused: {}", error);
        return Ok((jar, Redirect::to(HOME_PATH)));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(AppError::new(
            StatusCode::BAD_REQUEST,
            "Authorization code is required",
        ));
    };

    let sign_in_failed = |e: YouTubeError| {
        warn!("Sign-in failed: {}", e);
        AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign in")
    };

    let token = oauth.exchange_code(&code).await.map_err(sign_in_failed)?;
    let user_id = state
        .service
        .my_channel_id(&token.access_token)
        .await
        .map_err(sign_in_failed)?;

    let session = state
        .sessions
        .create(user_id, token.access_token, token.expiration);
    info!(user_id = %session.user_id, "User signed in");

    Ok((jar.add(session_cookie(&session.id)), Redirect::to(HOME_PATH)))
}

async fn sign_out(State(state): State<YouTubeState>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(session) = state.sessions.session_for(&jar) {
        state.sessions.remove(&session.id);
        info!(user_id = %session.user_id, "User signed out");
    }
    (jar.remove(removal_cookie()), Redirect::to(HOME_PATH))
}

/// Documentation OpenAPI de l'API YouTube
#[derive(OpenApi)]
#[openapi(
    info(
        title = "PMOTube API",
        version = "1.0.0",
        description = "Playlists YouTube : chaînes publiques, playlists et vidéos de l'utilisateur connecté"
    ),
    paths(get_channel_playlists, get_my_playlists, get_playlist_items),
    components(schemas(ChannelPlaylist, Playlist, PlaylistItem, Thumbnails, Thumbnail, ErrorResponse)),
    tags(
        (name = "youtube", description = "Lecture des playlists YouTube")
    )
)]
pub struct YouTubeApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let err = AppError::from_youtube(
            YouTubeError::InvalidRequest("Channel ID is required".into()),
            FETCH_CHANNEL_PLAYLISTS_FAILED,
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Channel ID is required");

        let err = AppError::from_youtube(YouTubeError::Unauthenticated, FETCH_PLAYLISTS_FAILED);
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.message, "Not authenticated");

        let err = AppError::from_youtube(
            YouTubeError::ApiError {
                code: 404,
                message: "secret detail".into(),
            },
            FETCH_PLAYLIST_ITEMS_FAILED,
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, FETCH_PLAYLIST_ITEMS_FAILED);
    }

    #[test]
    fn test_openapi_lists_paths() {
        let doc = YouTubeApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        assert!(paths.contains(&"/channel-playlists".to_string()));
        assert!(paths.contains(&"/playlist/{id}".to_string()));
    }
}
