// Maintenance record store backed by a single SQLite table

use crate::error::{Error, ImportCause, Result};
use crate::exchange;
use crate::models::{MaintenanceRecord, RecordRow};
use fs2::FileExt;
use rusqlite::types::Value;
use rusqlite::{Connection, Row};
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, vehicle, task, last_date, last_mileage, notes FROM maintenance";

/// Append-only store of maintenance records
///
/// Holds the database connection and an exclusive lock on `<db>.lock` for
/// as long as it is open, so only one process writes at a time.
pub struct Store {
    path: PathBuf,
    db: Connection,
    lock: File,
}

impl Store {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Open or create the database at `path`, waiting at most `busy_timeout`
    /// on a locked database file
    ///
    /// Creates the parent directory and the `maintenance` table if missing.
    /// Safe to call on every startup.
    pub fn open_with_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::StorageIo {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let lock = Self::acquire_lock(&path)?;

        let db = Connection::open(&path)?;
        db.busy_timeout(busy_timeout)?;

        let store = Self { path, db, lock };
        store.create_schema()?;

        info!(db = ?store.path, "Opened maintenance store");
        Ok(store)
    }

    /// Get the path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(db_path: &Path) -> Result<File> {
        let mut lock_path = OsString::from(db_path.as_os_str());
        lock_path.push(".lock");
        let lock_path = PathBuf::from(lock_path);

        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| Error::StorageIo {
                path: lock_path.clone(),
                source,
            })?;

        if let Err(e) = file.try_lock_exclusive() {
            debug!(lock = ?lock_path, error = ?e, "Writer lock is held elsewhere");
            return Err(Error::Locked {
                path: db_path.to_path_buf(),
            });
        }

        Ok(file)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS maintenance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                vehicle TEXT,
                task TEXT,
                last_date TEXT,
                last_mileage INTEGER,
                notes TEXT
            );
            "#,
        )?;

        Ok(())
    }

    /// Release the connection and the writer lock
    pub fn close(self) -> Result<()> {
        let Store { path, db, lock } = self;
        db.close().map_err(|(_, e)| Error::Storage(e))?;
        drop(lock);
        debug!(db = ?path, "Closed maintenance store");
        Ok(())
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// List a vehicle's records in insertion order
    ///
    /// Returns an empty list when the vehicle has no history.
    pub fn list_records(&self, vehicle: &str) -> Result<Vec<MaintenanceRecord>> {
        let sql = format!("{} WHERE vehicle = ?1 ORDER BY id", SELECT_COLUMNS);
        let records = self.query_records(&sql, [vehicle])?;
        debug!(vehicle, count = records.len(), "Listed records");
        Ok(records)
    }

    /// Insert a user-entered record and return its new id
    ///
    /// The task must not be empty. The vehicle name is not checked.
    pub fn insert_record(&mut self, row: &RecordRow) -> Result<i64> {
        if row.task.trim().is_empty() {
            return Err(Error::Validation("Task name is required.".to_string()));
        }

        let id = self.insert_row(row)?;
        info!(id, vehicle = %row.vehicle, task = %row.task, "Inserted maintenance record");
        Ok(id)
    }

    /// All records across vehicles, in insertion order, without ids
    pub fn export_all(&self) -> Result<Vec<RecordRow>> {
        let sql = format!("{} ORDER BY id", SELECT_COLUMNS);
        let records = self.query_records(&sql, [])?;
        Ok(records.iter().map(MaintenanceRecord::to_row).collect())
    }

    /// Insert rows in order without task validation
    ///
    /// Each row commits on its own. The first failure, whether a row that
    /// could not be decoded or an insert that failed, stops the import. Rows
    /// committed before it stay in the store, and the returned error reports
    /// how many there were.
    pub fn import_all<I>(&mut self, source_name: &str, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = std::result::Result<RecordRow, ImportCause>>,
    {
        let mut committed = 0;

        for (index, row) in rows.into_iter().enumerate() {
            let outcome = row.and_then(|row| {
                self.insert_row(&row)
                    .map(|_| ())
                    .map_err(|source| ImportCause::Insert { index, source })
            });

            if let Err(cause) = outcome {
                warn!(from = source_name, committed, error = %cause, "Import stopped at first failure");
                return Err(Error::Import {
                    source_name: source_name.to_string(),
                    committed,
                    cause,
                });
            }
            committed += 1;
        }

        info!(from = source_name, count = committed, "Import complete");
        Ok(committed)
    }

    /// Write every record to a JSON export file and return the row count
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<usize> {
        let rows = self.export_all()?;
        exchange::write_rows(path.as_ref(), &rows)?;
        Ok(rows.len())
    }

    /// Import a JSON export file and return the number of rows committed
    pub fn import_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        let reader = exchange::read_rows(path).map_err(|cause| Error::Import {
            source_name: source_name.clone(),
            committed: 0,
            cause,
        })?;

        self.import_all(&source_name, reader)
    }

    /// Number of records across all vehicles
    pub fn count_records(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM maintenance", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn insert_row(&self, row: &RecordRow) -> rusqlite::Result<i64> {
        self.db.execute(
            "INSERT INTO maintenance (vehicle, task, last_date, last_mileage, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![row.vehicle, row.task, row.last_date, row.last_mileage, row.notes],
        )?;
        Ok(self.db.last_insert_rowid())
    }

    fn query_records<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<MaintenanceRecord>> {
        let mut stmt = self.db.prepare(sql)?;
        let rows = stmt.query_map(params, StoredRow::from_row)?;

        let mut results = Vec::new();
        for row_result in rows {
            results.push(row_result?.into_record()?);
        }
        Ok(results)
    }
}

/// A row as SQLite holds it
///
/// Databases written by earlier versions may hold NULL text columns or a
/// mileage that is not an integer, so values are checked after reading.
struct StoredRow {
    id: i64,
    vehicle: Option<String>,
    task: Option<String>,
    last_date: Option<String>,
    last_mileage: Value,
    notes: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            vehicle: row.get(1)?,
            task: row.get(2)?,
            last_date: row.get(3)?,
            last_mileage: row.get(4)?,
            notes: row.get(5)?,
        })
    }

    fn into_record(self) -> Result<MaintenanceRecord> {
        let last_mileage = mileage_from_value(self.id, self.last_mileage)?;
        Ok(MaintenanceRecord {
            id: self.id,
            vehicle: self.vehicle.unwrap_or_default(),
            task: self.task.unwrap_or_default(),
            last_date: self.last_date,
            last_mileage,
            notes: self.notes.unwrap_or_default(),
        })
    }
}

fn mileage_from_value(id: i64, value: Value) -> Result<Option<i64>> {
    let parsed = match &value {
        Value::Null => Some(None),
        Value::Integer(m) => Some(Some(*m)),
        Value::Real(m) if m.fract() == 0.0 => Some(Some(*m as i64)),
        Value::Text(s) if s.trim().is_empty() => Some(None),
        Value::Text(s) => s.trim().parse().ok().map(Some),
        _ => None,
    };

    parsed.ok_or_else(|| Error::CorruptRow {
        id,
        reason: format!("mileage {:?} is not a whole number", value),
    })
}
