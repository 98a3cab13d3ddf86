//! Local store for user-uploaded background images.
//!
//! Records live in a single SQLite file. The connection is opened lazily on
//! first use and the schema is created before any operation proceeds.

use crate::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const OCTET_STREAM: &str = "application/octet-stream";

/// Ordered schema steps; index + 1 is the `user_version` each one produces.
const MIGRATIONS: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS backgrounds (
        id TEXT PRIMARY KEY NOT NULL,
        media_type TEXT NOT NULL,
        bytes BLOB NOT NULL,
        size_bytes INTEGER NOT NULL,
        sha256 TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_backgrounds_created_at ON backgrounds(created_at);",
];

/// Image bytes plus their declared media type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub media_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl Blob {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Infer the media type from the image's magic bytes.
    pub fn sniff(bytes: Vec<u8>) -> Self {
        let media_type = image::guess_format(&bytes)
            .map(|f| f.to_mime_type().to_string())
            .unwrap_or_else(|_| OCTET_STREAM.to_string());
        Self { media_type, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundRecord {
    pub id: String,
    pub file: Blob,
    /// Epoch milliseconds; only used for newest-first ordering.
    pub created_at: i64,
    pub sha256: String,
}

pub struct BackgroundStore {
    path: PathBuf,
    conn: Mutex<Option<Connection>>,
}

impl BackgroundStore {
    /// Does not touch the file system; the database opens on first use.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            conn: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the database and create the schema if needed. Idempotent.
    pub fn ensure_open(&self) -> Result<()> {
        self.with_conn(|_| Ok(()))
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.conn.lock().unwrap();
        let conn = match guard.take() {
            Some(conn) => conn,
            None => self.open()?,
        };
        let out = f(&conn);
        *guard = Some(conn);
        out
    }

    fn open(&self) -> Result<Connection> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(&self.path)?;
        let _ = conn.busy_timeout(std::time::Duration::from_millis(5000));
        let _ = conn.pragma_update(None, "journal_mode", "WAL");
        run_migrations(&conn)?;
        tracing::debug!(path = %self.path.display(), "background store opened");
        Ok(conn)
    }

    pub fn add(&self, file: Blob) -> Result<BackgroundRecord> {
        let id = uuid::Uuid::new_v4().to_string();
        let sha256 = hex::encode(Sha256::digest(&file.bytes));
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            let newest: Option<i64> =
                tx.query_row("SELECT MAX(created_at) FROM backgrounds", [], |r| r.get(0))?;
            let now = chrono::Utc::now().timestamp_millis();
            // keep creation times strictly increasing so ordering is total
            let created_at = match newest {
                Some(n) if n >= now => n + 1,
                _ => now,
            };
            tx.execute(
                "INSERT INTO backgrounds(id, media_type, bytes, size_bytes, sha256, created_at) VALUES(?1, ?2, ?3, ?4, ?5, ?6)",
                params![id, file.media_type, file.bytes, file.bytes.len() as i64, sha256, created_at],
            )?;
            tx.commit()?;
            tracing::debug!(%id, size = file.bytes.len(), "background added");
            Ok(BackgroundRecord {
                id,
                file,
                created_at,
                sha256,
            })
        })
    }

    /// Every record, newest first.
    pub fn get_all(&self) -> Result<Vec<BackgroundRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, media_type, bytes, created_at, sha256 FROM backgrounds ORDER BY created_at DESC, rowid DESC",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(record_from_row(row)?);
            }
            Ok(out)
        })
    }

    /// `Ok(None)` when the id is unknown.
    pub fn get_by_id(&self, id: &str) -> Result<Option<BackgroundRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, media_type, bytes, created_at, sha256 FROM backgrounds WHERE id = ?",
            )?;
            let rec = stmt.query_row([id], record_from_row).optional()?;
            Ok(rec)
        })
    }

    /// Unknown ids are a no-op.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM backgrounds WHERE id = ?", params![id])?;
            tracing::debug!(%id, removed = n, "background delete");
            Ok(())
        })
    }

    pub fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(1) FROM backgrounds", [], |r| r.get(0))?;
            Ok(n as usize)
        })
    }
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BackgroundRecord> {
    Ok(BackgroundRecord {
        id: row.get(0)?,
        file: Blob {
            media_type: row.get(1)?,
            bytes: row.get(2)?,
        },
        created_at: row.get(3)?,
        sha256: row.get(4)?,
    })
}

fn run_migrations(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    for (i, sql) in MIGRATIONS.iter().enumerate() {
        let ver = i as i64 + 1;
        if ver <= current {
            continue;
        }
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {ver}"))?;
        tx.commit()?;
        tracing::info!(version = ver, "background store schema migrated");
    }
    Ok(())
}
