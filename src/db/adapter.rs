use log::{debug, info};

use crate::db::store::{Cells, StoreConnection};
use crate::error::{TrackerError, TrackerResult};
use crate::utils::dates::normalize_date_cell;

pub const DATE_COLUMN: &str = "Date";

/// Stable identity handed to a row when its table is loaded.
///
/// Ids come from a per-snapshot counter starting at 1 and are never reused
/// within that snapshot, so deleting one row does not shift the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u64);

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RowId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().trim_start_matches('#').parse().map(RowId)
    }
}

/// Rows exactly as read from the store, first row split off as the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header: Cells,
    pub rows: Vec<Cells>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RowId,
    pub cells: Cells,
}

/// A loaded table in canonical column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: &'static [&'static str],
    rows: Vec<Record>,
    next_id: u64,
}

impl Table {
    pub fn new(columns: &'static [&'static str], rows: Vec<Cells>) -> Self {
        let mut table = Self {
            columns,
            rows: Vec::with_capacity(rows.len()),
            next_id: 1,
        };
        for cells in rows {
            table.push(cells);
        }
        table
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column)
    }

    pub fn get(&self, id: RowId) -> Option<&Record> {
        self.rows.iter().find(|r| r.id == id)
    }

    /// Cell value by column name; `None` for an unknown column or id.
    pub fn value(&self, id: RowId, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.get(id)?.cells.get(idx).map(String::as_str)
    }

    /// Appends a row, padding or truncating it to the column count.
    pub fn push(&mut self, mut cells: Cells) -> RowId {
        cells.resize(self.columns.len(), String::new());
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(Record { id, cells });
        id
    }

    pub fn remove(&mut self, id: RowId) -> TrackerResult<Record> {
        let pos = self
            .rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(TrackerError::RowNotFound(id))?;
        Ok(self.rows.remove(pos))
    }

    pub fn set(&mut self, id: RowId, column: &str, value: impl Into<String>) -> TrackerResult<()> {
        let idx = self
            .column_index(column)
            .ok_or_else(|| TrackerError::UnknownColumn(column.to_string()))?;
        let record = self
            .rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(TrackerError::RowNotFound(id))?;
        record.cells[idx] = value.into();
        Ok(())
    }

    pub fn to_cells(&self) -> Vec<Cells> {
        self.rows.iter().map(|r| r.cells.clone()).collect()
    }
}

/// Loads `table` from the connection's collection, creating whatever is
/// missing on the way.
///
/// A missing collection is created, shared with every configured grant,
/// and given the table; a missing table is created with `header` as its
/// first row. An existing but blank table gets its header written.
pub fn open_or_create_table(
    conn: &StoreConnection,
    table: &str,
    header: &[&str],
) -> TrackerResult<RawTable> {
    let backend = conn.backend();
    let collection = conn.collection();

    let mut rows = match backend.read_rows(collection, table) {
        Ok(rows) => rows,
        Err(TrackerError::CollectionNotFound(_)) => {
            info!("Collection '{}' not found, creating it", collection);
            backend.create_collection(collection)?;
            for grant in conn.grants() {
                backend.share(collection, grant)?;
            }
            backend.create_table(collection, table)?;
            Vec::new()
        }
        Err(TrackerError::TableNotFound { .. }) => {
            info!("Table '{}' not found, creating it", table);
            backend.create_table(collection, table)?;
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    if rows.is_empty() {
        append_rows(conn, table, &[header_cells(header)])?;
        return Ok(RawTable {
            header: header_cells(header),
            rows: Vec::new(),
        });
    }

    let header_row = rows.remove(0);
    debug!("Loaded '{}': {} data rows", table, rows.len());
    Ok(RawTable {
        header: header_row,
        rows,
    })
}

/// Snapshot replace: writes `header` followed by `rows`, in order, over the
/// whole table.
///
/// Date cells are rewritten as `YYYY-MM-DD` when they parse and kept as-is
/// otherwise. Whether a failure mid-write can leave a partial table depends
/// on the backend's `replace_rows`.
pub fn replace_all(
    conn: &StoreConnection,
    table: &str,
    header: &[&str],
    rows: &[Cells],
) -> TrackerResult<()> {
    let date_idx = header.iter().position(|h| *h == DATE_COLUMN);

    let mut snapshot = Vec::with_capacity(rows.len() + 1);
    snapshot.push(header_cells(header));
    for cells in rows {
        let mut cells = cells.clone();
        if let Some(cell) = date_idx.and_then(|i| cells.get_mut(i)) {
            *cell = normalize_date_cell(cell);
        }
        snapshot.push(cells);
    }

    conn.backend()
        .replace_rows(conn.collection(), table, &snapshot)?;
    info!("Saved {} rows to '{}'", rows.len(), table);
    Ok(())
}

/// Appends rows after whatever the table already holds.
pub fn append_rows(conn: &StoreConnection, table: &str, rows: &[Cells]) -> TrackerResult<()> {
    conn.backend().append_rows(conn.collection(), table, rows)
}

fn header_cells(header: &[&str]) -> Cells {
    header.iter().map(|h| h.to_string()).collect()
}
