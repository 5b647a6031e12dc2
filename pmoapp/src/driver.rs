//! Exécution des requêtes demandées par le contrôleur
//!
//! Les effets sont exécutés dans l'ordre d'émission, chacun produisant un
//! message réinjecté dans [`ViewState::update`].

use crate::controller::{Effect, Message, ViewState};
use pmoyoutube::{Session, YouTubeService};
use std::collections::VecDeque;
use tracing::debug;

/// Exécute un effet et retourne le message de résultat
pub async fn run_effect(
    service: &YouTubeService,
    session: Option<&Session>,
    effect: Effect,
) -> Message {
    match effect {
        Effect::FetchOwnPlaylists => {
            Message::OwnPlaylistsLoaded(service.my_playlists(session).await)
        }
        Effect::ReloadOwnPlaylists => {
            Message::OwnPlaylistsLoaded(service.fetch_my_playlists(session).await)
        }
        Effect::FetchChannelPlaylists(channel_id) => {
            let result = service.channel_playlists(Some(&channel_id)).await;
            Message::ChannelPlaylistsLoaded { channel_id, result }
        }
        Effect::FetchPlaylistItems(playlist_id) => {
            let result = service.playlist_items(session, &playlist_id).await;
            Message::ItemsLoaded {
                playlist_id,
                result,
            }
        }
    }
}

/// Applique un message puis exécute tous les effets qui en découlent
pub async fn dispatch(
    view: &mut ViewState,
    service: &YouTubeService,
    session: Option<&Session>,
    message: Message,
) {
    let mut pending: VecDeque<Effect> = view.update(message).into();

    while let Some(effect) = pending.pop_front() {
        debug!(?effect, "Running view effect");
        let message = run_effect(service, session, effect).await;
        pending.extend(view.update(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Phase;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use pmoyoutube::service::FETCH_PLAYLISTS_FAILED;
    use pmoyoutube::{Playlist, PlaylistItem, PlaylistProvider, YouTubeError};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingProvider {
        mine_calls: AtomicUsize,
        item_calls: AtomicUsize,
        fail_mine: bool,
    }

    #[async_trait]
    impl PlaylistProvider for CountingProvider {
        async fn channel_playlists(
            &self,
            channel_id: &str,
            _api_key: &str,
        ) -> pmoyoutube::Result<Vec<Playlist>> {
            Ok(vec![Playlist {
                id: format!("{}-PL", channel_id),
                ..Default::default()
            }])
        }

        async fn my_playlists(&self, _access_token: &str) -> pmoyoutube::Result<Vec<Playlist>> {
            self.mine_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_mine {
                return Err(YouTubeError::ApiError {
                    code: 500,
                    message: "down".into(),
                });
            }
            Ok(vec![Playlist {
                id: "PLmine".into(),
                title: Some("Mine".into()),
                ..Default::default()
            }])
        }

        async fn playlist_items(
            &self,
            playlist_id: &str,
            _access_token: &str,
        ) -> pmoyoutube::Result<Vec<PlaylistItem>> {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![PlaylistItem {
                id: format!("{}-1", playlist_id),
                ..Default::default()
            }])
        }

        async fn my_channel_id(&self, _access_token: &str) -> pmoyoutube::Result<String> {
            Ok("UCme".into())
        }
    }

    fn session() -> Session {
        Session {
            id: "sid".into(),
            user_id: "user-1".into(),
            access_token: "token".into(),
            expires_at: Utc::now() + Duration::hours(1),
        }
    }

    #[tokio::test]
    async fn test_sign_in_loads_own_playlists() {
        let service = YouTubeService::new(Arc::new(CountingProvider::default()));
        let session = session();
        let mut view = ViewState::new();

        dispatch(&mut view, &service, Some(&session), Message::SessionChanged(true)).await;

        assert_eq!(view.phase(), Phase::OwnPlaylists);
        assert_eq!(view.playlists[0].id, "PLmine");
    }

    #[tokio::test]
    async fn test_selection_fetches_items_once() {
        let provider = Arc::new(CountingProvider::default());
        let service = YouTubeService::new(provider.clone());
        let session = session();
        let mut view = ViewState::new();

        dispatch(&mut view, &service, Some(&session), Message::SessionChanged(true)).await;
        dispatch(
            &mut view,
            &service,
            Some(&session),
            Message::SelectPlaylist("PLmine".into()),
        )
        .await;
        dispatch(
            &mut view,
            &service,
            Some(&session),
            Message::SelectPlaylist("PLmine".into()),
        )
        .await;

        assert_eq!(provider.item_calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, "PLmine-1");
    }

    #[tokio::test]
    async fn test_channel_search_uses_api_key() {
        let service = YouTubeService::new(Arc::new(CountingProvider::default()))
            .with_api_key(Some("server-key".into()));
        let session = session();
        let mut view = ViewState::new();

        dispatch(&mut view, &service, Some(&session), Message::SessionChanged(true)).await;
        dispatch(
            &mut view,
            &service,
            Some(&session),
            Message::SubmitChannel("UCabc".into()),
        )
        .await;

        assert_eq!(view.phase(), Phase::ChannelSearch);
        assert_eq!(view.playlists[0].id, "UCabc-PL");
    }

    #[tokio::test]
    async fn test_restore_channel_with_selection() {
        let provider = Arc::new(CountingProvider::default());
        let service = YouTubeService::new(provider.clone()).with_api_key(Some("key".into()));
        let session = session();
        let mut view = ViewState::new();

        let restore = Message::Restore {
            signed_in: true,
            channel: Some("UCabc".into()),
            playlist: Some("UCabc-PL".into()),
        };
        dispatch(&mut view, &service, Some(&session), restore).await;

        assert_eq!(provider.mine_calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.item_calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.phase(), Phase::ChannelSearch);
        assert_eq!(view.items[0].id, "UCabc-PL-1");
    }

    #[tokio::test]
    async fn test_failure_sets_error() {
        let provider = CountingProvider {
            fail_mine: true,
            ..Default::default()
        };
        let service = YouTubeService::new(Arc::new(provider));
        let session = session();
        let mut view = ViewState::new();

        dispatch(&mut view, &service, Some(&session), Message::SessionChanged(true)).await;

        assert_eq!(view.phase(), Phase::Error);
        assert_eq!(view.error.as_deref(), Some(FETCH_PLAYLISTS_FAILED));
    }
}
