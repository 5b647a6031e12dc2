//! Handler axum de la vue
//!
//! Chaque requête reconstruit l'état de la vue : la session est lue depuis le
//! cookie, puis la recherche de chaîne et la sélection de playlist sont
//! rejouées à partir des paramètres `channel` et `playlist`. Rejouer une
//! sélection ne réécrit pas le miroir des playlists.

use crate::controller::{Message, ViewState};
use crate::driver::dispatch;
use crate::render::render_page;
use axum::extract::{Query, State};
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;
use pmoyoutube::api_rest::YouTubeState;
use serde::Deserialize;
use tracing::debug;

/// État du handler de la vue
#[derive(Clone)]
pub struct WebAppState {
    pub youtube: YouTubeState,
    /// Chemin de montage de la vue, utilisé pour les liens
    pub base_path: String,
}

/// Paramètres de la vue
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    pub channel: Option<String>,
    pub playlist: Option<String>,
}

/// Construit l'état de la vue pour une requête
pub async fn build_view(state: &WebAppState, jar: &CookieJar, query: ViewQuery) -> ViewState {
    let session = state.youtube.sessions.session_for(jar);
    let service = state.youtube.service.as_ref();
    let mut view = ViewState::new();

    let restore = Message::Restore {
        signed_in: session.is_some(),
        channel: query.channel,
        playlist: query.playlist,
    };
    dispatch(&mut view, service, session.as_ref(), restore).await;

    debug!(phase = ?view.phase(), "View built");
    view
}

pub async fn view_handler(
    State(state): State<WebAppState>,
    jar: CookieJar,
    Query(query): Query<ViewQuery>,
) -> Html<String> {
    let view = build_view(&state, &jar, query).await;
    Html(render_page(&view, &state.base_path))
}
