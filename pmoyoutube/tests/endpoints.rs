//! HTTP endpoint tests, run against an in-memory provider

#![cfg(feature = "pmoserver")]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use pmoyoutube::api_rest::{YouTubeState, create_auth_router, create_router};
use pmoyoutube::{
    OAuthClient, Playlist, PlaylistItem, PlaylistProvider, PlaylistStore, Result, SESSION_COOKIE,
    SessionStore, YouTubeError, YouTubeService,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tower::ServiceExt;

#[derive(Default)]
struct FakeProvider {
    playlists: Vec<Playlist>,
    items: Vec<PlaylistItem>,
    fail: bool,
    calls: AtomicUsize,
}

impl FakeProvider {
    fn answer<T: Clone>(&self, values: &[T]) -> Result<Vec<T>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(YouTubeError::ApiError {
                code: 500,
                message: "backend down".into(),
            })
        } else {
            Ok(values.to_vec())
        }
    }
}

#[async_trait]
impl PlaylistProvider for FakeProvider {
    async fn channel_playlists(&self, _channel_id: &str, _api_key: &str) -> Result<Vec<Playlist>> {
        self.answer(&self.playlists)
    }

    async fn my_playlists(&self, _access_token: &str) -> Result<Vec<Playlist>> {
        self.answer(&self.playlists)
    }

    async fn playlist_items(&self, _playlist_id: &str, _access_token: &str) -> Result<Vec<PlaylistItem>> {
        self.answer(&self.items)
    }

    async fn my_channel_id(&self, _access_token: &str) -> Result<String> {
        Ok("UCme".to_string())
    }
}

struct TestApp {
    router: Router,
    provider: Arc<FakeProvider>,
    state: YouTubeState,
    store: Arc<PlaylistStore>,
}

fn app_with(provider: FakeProvider, api_key: Option<&str>, oauth: Option<OAuthClient>) -> TestApp {
    let provider = Arc::new(provider);
    let store = Arc::new(PlaylistStore::open_in_memory().unwrap());
    let service = YouTubeService::new(provider.clone())
        .with_store(store.clone())
        .with_api_key(api_key.map(str::to_string));

    let state = YouTubeState {
        service: Arc::new(service),
        sessions: SessionStore::new(),
        oauth: oauth.map(Arc::new),
    };

    let router = Router::new()
        .nest("/api", create_router(state.clone()))
        .nest("/auth", create_auth_router(state.clone()));

    TestApp {
        router,
        provider,
        state,
        store,
    }
}

fn app(provider: FakeProvider) -> TestApp {
    app_with(provider, Some("server-key"), None)
}

fn sample_playlists() -> Vec<Playlist> {
    vec![
        Playlist {
            id: "PL1".into(),
            title: Some("Road trip".into()),
            description: Some("Songs".into()),
            item_count: Some(12),
            privacy_status: Some("public".into()),
            published_at: Some("2023-01-01T00:00:00Z".into()),
            ..Default::default()
        },
        Playlist {
            id: "PL2".into(),
            ..Default::default()
        },
    ]
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn get_with_session(uri: &str, session_id: &str) -> Request<Body> {
    Request::get(uri)
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id))
        .body(Body::empty())
        .unwrap()
}

fn signed_in(app: &TestApp) -> String {
    app.state
        .sessions
        .create("UCme", "user-token", Utc::now() + Duration::hours(1))
        .id
}

#[tokio::test]
async fn test_channel_id_required() {
    let app = app(FakeProvider::default());

    for uri in ["/api/channel-playlists", "/api/channel-playlists?channelId="] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Channel ID is required" }));
    }
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_channel_without_api_key() {
    let app = app_with(FakeProvider::default(), None, None);

    let (status, body) = send(&app.router, get("/api/channel-playlists?channelId=UCabc123")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "YouTube API key is not configured");
}

#[tokio::test]
async fn test_channel_playlists_with_defaults() {
    let app = app(FakeProvider {
        playlists: sample_playlists(),
        ..Default::default()
    });

    let (status, body) = send(&app.router, get("/api/channel-playlists?channelId=UCabc123")).await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], "PL1");
    assert_eq!(list[0]["itemCount"], 12);
    assert_eq!(list[0]["publishedAt"], "2023-01-01T00:00:00Z");
    assert_eq!(
        list[1],
        json!({
            "id": "PL2",
            "title": "Untitled Playlist",
            "description": "",
            "itemCount": 0,
            "privacyStatus": "unknown",
            "publishedAt": null
        })
    );
}

#[tokio::test]
async fn test_channel_with_no_playlists() {
    let app = app(FakeProvider::default());

    let (status, body) = send(&app.router, get("/api/channel-playlists?channelId=UCempty")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_channel_provider_failure() {
    let app = app(FakeProvider {
        fail: true,
        ..Default::default()
    });

    let (status, body) = send(&app.router, get("/api/channel-playlists?channelId=UCabc123")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch channel playlists" }));
}

#[tokio::test]
async fn test_my_playlists_requires_session() {
    let app = app(FakeProvider {
        playlists: sample_playlists(),
        ..Default::default()
    });

    let (status, body) = send(&app.router, get("/api/playlists")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Not authenticated" }));

    let (status, _) = send(&app.router, get_with_session("/api/playlists", "unknown")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app.router, get("/api/playlist/PL1")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let app = app(FakeProvider::default());
    let session = app
        .state
        .sessions
        .create("UCme", "old-token", Utc::now() - Duration::minutes(1));

    let (status, _) = send(&app.router, get_with_session("/api/playlists", &session.id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_my_playlists_are_returned_and_mirrored() {
    let app = app(FakeProvider {
        playlists: sample_playlists(),
        ..Default::default()
    });
    let session_id = signed_in(&app);

    let (status, body) = send(&app.router, get_with_session("/api/playlists", &session_id)).await;
    assert_eq!(status, StatusCode::OK);

    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1], json!({ "id": "PL2" }));

    let rows = app.store.playlists_for_user("UCme").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(app.store.get_playlist("PL1").unwrap().unwrap().item_count, Some(12));
}

#[tokio::test]
async fn test_my_playlists_empty() {
    let app = app(FakeProvider::default());
    let session_id = signed_in(&app);

    let (status, body) = send(&app.router, get_with_session("/api/playlists", &session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(app.store.count_playlists().unwrap(), 0);
}

#[tokio::test]
async fn test_my_playlists_provider_failure() {
    let app = app(FakeProvider {
        fail: true,
        ..Default::default()
    });
    let session_id = signed_in(&app);

    let (status, body) = send(&app.router, get_with_session("/api/playlists", &session_id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to fetch playlists" }));
}

#[tokio::test]
async fn test_playlist_items() {
    let app = app(FakeProvider {
        items: vec![
            PlaylistItem {
                id: "item-1".into(),
                title: Some("Video".into()),
                video_id: Some("vid1".into()),
                position: Some(0),
                ..Default::default()
            },
            PlaylistItem {
                id: "item-2".into(),
                ..Default::default()
            },
        ],
        ..Default::default()
    });
    let session_id = signed_in(&app);

    let (status, body) = send(&app.router, get_with_session("/api/playlist/PL1", &session_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["videoId"], "vid1");
    assert_eq!(body[0]["position"], 0);
    assert_eq!(body[1], json!({ "id": "item-2" }));
    assert_eq!(app.store.count_playlist_items().unwrap(), 0);
}

#[tokio::test]
async fn test_playlist_items_provider_failure() {
    let app = app(FakeProvider {
        fail: true,
        ..Default::default()
    });
    let session_id = signed_in(&app);

    let (status, body) = send(&app.router, get_with_session("/api/playlist/PL1", &session_id)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch playlist items");
}

#[tokio::test]
async fn test_signin_without_oauth_client() {
    let app = app(FakeProvider::default());

    let (status, body) = send(&app.router, get("/auth/signin")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "YouTube OAuth client is not configured");
}

#[tokio::test]
async fn test_signin_redirects_to_consent_page() {
    let oauth = OAuthClient::new("cid", "secret", "http://localhost:8080/auth/callback");
    let app = app_with(FakeProvider::default(), Some("server-key"), Some(oauth));

    let response = app.router.clone().oneshot(get("/auth/signin")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
    assert!(location.contains("client_id=cid"));
    assert!(location.contains("state="));
}

#[tokio::test]
async fn test_callback_rejects_unknown_state() {
    let oauth = OAuthClient::new("cid", "secret", "http://localhost:8080/auth/callback");
    let app = app_with(FakeProvider::default(), Some("server-key"), Some(oauth));

    let (status, body) = send(&app.router, get("/auth/callback?code=abc&state=forged")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid OAuth state");
    assert!(app.state.sessions.is_empty());
}

#[tokio::test]
async fn test_callback_creates_session() {
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let google = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh-token",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": "https://www.googleapis.com/auth/youtube.readonly"
        })))
        .expect(1)
        .mount(&google)
        .await;

    let oauth = OAuthClient::new("cid", "secret", "http://localhost:8080/auth/callback")
        .with_endpoints(format!("{}/auth", google.uri()), format!("{}/token", google.uri()));
    let app = app_with(FakeProvider::default(), Some("server-key"), Some(oauth));

    let state = app.state.sessions.new_oauth_state();
    let response = app
        .router
        .clone()
        .oneshot(get(&format!("/auth/callback?code=the-code&state={}", state)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/app");

    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with(&format!("{}=", SESSION_COOKIE)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let session_id = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value.to_string())
        .unwrap();
    let session = app.state.sessions.get(&session_id).unwrap();
    assert_eq!(session.user_id, "UCme");
    assert_eq!(session.access_token, "fresh-token");
}

#[tokio::test]
async fn test_signout_removes_session() {
    let app = app(FakeProvider::default());
    let session_id = signed_in(&app);

    let request = Request::post("/auth/signout")
        .header(header::COOKIE, format!("{}={}", SESSION_COOKIE, session_id))
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(app.state.sessions.get(&session_id).is_none());

    let (status, _) = send(&app.router, get_with_session("/api/playlists", &session_id)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
