// src/app/kv.rs — durable key/value storage behind the favourites list
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use super::error::StoreError;

/// Whole-value get/set storage. Values are opaque strings (JSON in practice).
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

const SQL_CREATE_KV: &str = r#"
CREATE TABLE IF NOT EXISTS kv (
  key   TEXT PRIMARY KEY,
  value TEXT NOT NULL
)
"#;

pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    /// Open (creating parent dirs and the `kv` table when needed).
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(SQL_CREATE_KV)?;
        info!("Opened key/value store at {}", path.display());
        Ok(Self { conn })
    }
}

impl KvStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        debug!("kv write {key} ({} bytes)", value.len());
        Ok(())
    }
}

/// Process-local map; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryKv {
    map: HashMap<String, String>,
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("casthour.db");
        {
            let mut kv = SqliteKv::open(&path).unwrap();
            assert_eq!(kv.get("favorites").unwrap(), None);
            kv.set("favorites", "[1]").unwrap();
            kv.set("favorites", "[2]").unwrap();
        }
        let kv = SqliteKv::open(&path).unwrap();
        assert_eq!(kv.get("favorites").unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn memory_store_is_a_plain_map() {
        let mut kv = MemoryKv::default();
        kv.set("a", "1").unwrap();
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(kv.get("b").unwrap(), None);
    }
}
