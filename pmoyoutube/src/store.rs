//! Miroir SQLite des playlists récupérées
//!
//! Chaque playlist (et, si activé, chaque item) est écrite par upsert sur son
//! identifiant : une nouvelle récupération écrase la ligne existante. Les
//! lignes ne sont jamais supprimées.

use crate::models::{Playlist, PlaylistItem};
use chrono::Utc;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Ligne de la table `playlists`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaylistRow {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Projection de `thumbnails.default.url`
    pub thumbnail_url: Option<String>,
    pub item_count: Option<u32>,
    /// Date de la dernière écriture (RFC3339)
    pub updated_at: String,
}

impl PlaylistRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            thumbnail_url: row.get(4)?,
            item_count: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

/// Ligne de la table `playlist_items`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaylistItemRow {
    pub id: String,
    pub playlist_id: String,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub position: Option<u32>,
    pub updated_at: String,
}

impl PlaylistItemRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            playlist_id: row.get(1)?,
            video_id: row.get(2)?,
            title: row.get(3)?,
            description: row.get(4)?,
            thumbnail_url: row.get(5)?,
            position: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }
}

/// Base SQLite du miroir
#[derive(Debug)]
pub struct PlaylistStore {
    conn: Mutex<Connection>,
}

impl PlaylistStore {
    /// Ouvre (ou crée) la base et ses tables
    ///
    /// ```rust,no_run
    /// use pmoyoutube::PlaylistStore;
    /// use std::path::Path;
    ///
    /// let store = PlaylistStore::open(Path::new("pmotube.db")).unwrap();
    /// ```
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        Self::init(Connection::open(path)?)
    }

    /// Base en mémoire, perdue à la fermeture
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS playlists (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT,
                description TEXT,
                thumbnail_url TEXT,
                item_count INTEGER,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_playlists_user ON playlists (user_id);
            CREATE TABLE IF NOT EXISTS playlist_items (
                id TEXT PRIMARY KEY,
                playlist_id TEXT NOT NULL,
                video_id TEXT,
                title TEXT,
                description TEXT,
                thumbnail_url TEXT,
                position INTEGER,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_playlist_items_playlist ON playlist_items (playlist_id);",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Écrit ou remplace la ligne d'une playlist appartenant à `user_id`
    pub fn upsert_playlist(&self, user_id: &str, playlist: &Playlist) -> rusqlite::Result<()> {
        let thumbnail_url = playlist
            .thumbnails
            .as_ref()
            .and_then(|t| t.default_url());

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO playlists (id, user_id, title, description, thumbnail_url, item_count, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                 user_id = excluded.user_id,
                 title = excluded.title,
                 description = excluded.description,
                 thumbnail_url = excluded.thumbnail_url,
                 item_count = excluded.item_count,
                 updated_at = excluded.updated_at",
            params![
                playlist.id,
                user_id,
                playlist.title,
                playlist.description,
                thumbnail_url,
                playlist.item_count,
                Utc::now().to_rfc3339(),
            ],
        )?;

        debug!(playlist_id = %playlist.id, user_id, "Playlist upserted");
        Ok(())
    }

    /// Écrit ou remplace la ligne d'un item de `playlist_id`
    pub fn upsert_playlist_item(
        &self,
        playlist_id: &str,
        item: &PlaylistItem,
    ) -> rusqlite::Result<()> {
        let thumbnail_url = item.thumbnails.as_ref().and_then(|t| t.default_url());

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO playlist_items (id, playlist_id, video_id, title, description, thumbnail_url, position, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(id) DO UPDATE SET
                 playlist_id = excluded.playlist_id,
                 video_id = excluded.video_id,
                 title = excluded.title,
                 description = excluded.description,
                 thumbnail_url = excluded.thumbnail_url,
                 position = excluded.position,
                 updated_at = excluded.updated_at",
            params![
                item.id,
                playlist_id,
                item.video_id,
                item.title,
                item.description,
                thumbnail_url,
                item.position,
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    /// Récupère une playlist par son id
    pub fn get_playlist(&self, id: &str) -> rusqlite::Result<Option<PlaylistRow>> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, user_id, title, description, thumbnail_url, item_count, updated_at
             FROM playlists WHERE id = ?1",
            [id],
            PlaylistRow::from_row,
        )
        .optional()
    }

    /// Playlists mirrorées pour un utilisateur, triées par titre
    pub fn playlists_for_user(&self, user_id: &str) -> rusqlite::Result<Vec<PlaylistRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, user_id, title, description, thumbnail_url, item_count, updated_at
             FROM playlists WHERE user_id = ?1 ORDER BY title, id",
        )?;
        let rows = stmt.query_map([user_id], PlaylistRow::from_row)?;
        rows.collect()
    }

    /// Items mirrorés d'une playlist, dans l'ordre de leur position
    pub fn items_for_playlist(&self, playlist_id: &str) -> rusqlite::Result<Vec<PlaylistItemRow>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, playlist_id, video_id, title, description, thumbnail_url, position, updated_at
             FROM playlist_items WHERE playlist_id = ?1 ORDER BY position, id",
        )?;
        let rows = stmt.query_map([playlist_id], PlaylistItemRow::from_row)?;
        rows.collect()
    }

    /// Nombre de playlists dans le miroir
    pub fn count_playlists(&self) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM playlists", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Nombre d'items dans le miroir
    pub fn count_playlist_items(&self) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM playlist_items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Supprime les tables pour provoquer des erreurs d'écriture
    #[cfg(test)]
    pub(crate) fn drop_tables(&self) {
        self.conn
            .lock()
            .execute_batch("DROP TABLE playlists; DROP TABLE playlist_items;")
            .unwrap();
    }
}
