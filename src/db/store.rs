use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::db::migrations::run_migrations;
use crate::error::{TrackerError, TrackerResult};

/// One row of a sheet: every cell is text.
pub type Cells = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Writer,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Writer => "writer",
            Role::Owner => "owner",
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reader" => Ok(Role::Reader),
            "writer" => Ok(Role::Writer),
            "owner" => Ok(Role::Owner),
            _ => Err(anyhow::anyhow!("Unknown role: {}", s)),
        }
    }
}

/// Access granted to a collaborator when a collection is first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessGrant {
    pub identity: String,
    pub role: Role,
}

/// The spreadsheet-like service holding named collections of named tables.
///
/// `read_rows`, `clear` and `append_rows` report a missing collection or
/// table with `CollectionNotFound` / `TableNotFound` so callers can create
/// it on demand.
pub trait SheetBackend {
    fn create_collection(&self, collection: &str) -> TrackerResult<()>;

    fn share(&self, collection: &str, grant: &AccessGrant) -> TrackerResult<()>;

    fn grants(&self, collection: &str) -> TrackerResult<Vec<AccessGrant>>;

    fn create_table(&self, collection: &str, table: &str) -> TrackerResult<()>;

    /// All rows in order, header included.
    fn read_rows(&self, collection: &str, table: &str) -> TrackerResult<Vec<Cells>>;

    fn clear(&self, collection: &str, table: &str) -> TrackerResult<()>;

    fn append_rows(&self, collection: &str, table: &str, rows: &[Cells]) -> TrackerResult<()>;

    /// Replace every row of the table with `rows`.
    ///
    /// The default clears then appends and is not atomic: if the append
    /// fails the table is left empty or partial. Backends that can stage
    /// the new rows and swap them in should override it.
    fn replace_rows(&self, collection: &str, table: &str, rows: &[Cells]) -> TrackerResult<()> {
        self.clear(collection, table)?;
        self.append_rows(collection, table, rows)
    }
}

// ─── SQLite workbook ─────────────────────────────────────────────────────────

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> TrackerResult<Self> {
        let conn = Connection::open(path)?;
        // WAL lets a second reader see the last committed snapshot mid-write
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> TrackerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> TrackerResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    fn collection_id(&self, collection: &str) -> TrackerResult<i64> {
        self.conn
            .query_row(
                "SELECT id FROM collections WHERE name = ?1",
                params![collection],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| TrackerError::CollectionNotFound(collection.to_string()))
    }

    fn sheet_id(&self, collection: &str, table: &str) -> TrackerResult<i64> {
        let collection_id = self.collection_id(collection)?;
        self.conn
            .query_row(
                "SELECT id FROM sheets WHERE collection_id = ?1 AND title = ?2",
                params![collection_id, table],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| TrackerError::TableNotFound {
                collection: collection.to_string(),
                table: table.to_string(),
            })
    }
}

fn insert_rows(
    conn: &Connection,
    sheet_id: i64,
    first_row: i64,
    rows: &[Cells],
) -> TrackerResult<()> {
    let mut stmt =
        conn.prepare("INSERT INTO sheet_rows (sheet_id, row_num, cells) VALUES (?1, ?2, ?3)")?;
    for (offset, cells) in rows.iter().enumerate() {
        let encoded = serde_json::to_string(cells)?;
        stmt.execute(params![sheet_id, first_row + offset as i64, encoded])?;
    }
    Ok(())
}

impl SheetBackend for SqliteBackend {
    fn create_collection(&self, collection: &str) -> TrackerResult<()> {
        info!("Creating collection '{}'", collection);
        self.conn.execute(
            "INSERT OR IGNORE INTO collections (name) VALUES (?1)",
            params![collection],
        )?;
        Ok(())
    }

    fn share(&self, collection: &str, grant: &AccessGrant) -> TrackerResult<()> {
        let collection_id = self.collection_id(collection)?;
        debug!(
            "Granting {} access on '{}' to {}",
            grant.role.as_str(),
            collection,
            grant.identity
        );
        self.conn.execute(
            "INSERT INTO collection_grants (collection_id, identity, role) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection_id, identity) DO UPDATE SET role = ?3",
            params![collection_id, grant.identity, grant.role.as_str()],
        )?;
        Ok(())
    }

    fn grants(&self, collection: &str) -> TrackerResult<Vec<AccessGrant>> {
        let collection_id = self.collection_id(collection)?;
        let mut stmt = self.conn.prepare(
            "SELECT identity, role FROM collection_grants
             WHERE collection_id = ?1 ORDER BY identity",
        )?;
        let rows = stmt.query_map(params![collection_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (identity, role) = r?;
            result.push(AccessGrant {
                identity,
                role: Role::from_str(&role)
                    .map_err(|e| rusqlite::Error::InvalidParameterName(e.to_string()))?,
            });
        }
        Ok(result)
    }

    fn create_table(&self, collection: &str, table: &str) -> TrackerResult<()> {
        let collection_id = self.collection_id(collection)?;
        info!("Creating table '{}' in '{}'", table, collection);
        self.conn.execute(
            "INSERT OR IGNORE INTO sheets (collection_id, title) VALUES (?1, ?2)",
            params![collection_id, table],
        )?;
        Ok(())
    }

    fn read_rows(&self, collection: &str, table: &str) -> TrackerResult<Vec<Cells>> {
        let sheet_id = self.sheet_id(collection, table)?;
        let mut stmt = self
            .conn
            .prepare("SELECT cells FROM sheet_rows WHERE sheet_id = ?1 ORDER BY row_num")?;
        let encoded = stmt
            .query_map(params![sheet_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut rows = Vec::with_capacity(encoded.len());
        for e in encoded {
            rows.push(serde_json::from_str::<Cells>(&e)?);
        }
        Ok(rows)
    }

    fn clear(&self, collection: &str, table: &str) -> TrackerResult<()> {
        let sheet_id = self.sheet_id(collection, table)?;
        self.conn
            .execute("DELETE FROM sheet_rows WHERE sheet_id = ?1", params![sheet_id])?;
        Ok(())
    }

    fn append_rows(&self, collection: &str, table: &str, rows: &[Cells]) -> TrackerResult<()> {
        let sheet_id = self.sheet_id(collection, table)?;
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(row_num), -1) + 1 FROM sheet_rows WHERE sheet_id = ?1",
            params![sheet_id],
            |row| row.get(0),
        )?;
        let tx = self.conn.unchecked_transaction()?;
        insert_rows(&tx, sheet_id, next, rows)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_rows(&self, collection: &str, table: &str, rows: &[Cells]) -> TrackerResult<()> {
        let sheet_id = self.sheet_id(collection, table)?;
        // Clear and rewrite inside one transaction so readers never observe
        // a headerless or half-written table.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM sheet_rows WHERE sheet_id = ?1", params![sheet_id])?;
        insert_rows(&tx, sheet_id, 0, rows)?;
        tx.commit()?;
        debug!("Replaced '{}' with {} rows", table, rows.len());
        Ok(())
    }
}

// ─── Connection handle ───────────────────────────────────────────────────────

/// One open session against the backing store. Built once by the caller and
/// lent to each repository.
pub struct StoreConnection {
    backend: Box<dyn SheetBackend>,
    collection: String,
    grants: Vec<AccessGrant>,
}

impl StoreConnection {
    pub fn new(
        backend: impl SheetBackend + 'static,
        collection: impl Into<String>,
        grants: Vec<AccessGrant>,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            collection: collection.into(),
            grants,
        }
    }

    pub fn backend(&self) -> &dyn SheetBackend {
        self.backend.as_ref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn grants(&self) -> &[AccessGrant] {
        &self.grants
    }
}
