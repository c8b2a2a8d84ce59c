//! SQLite-backed contribution store.
//!
//! The single `contributions` table is created on open. Dates are stored as
//! `YYYY-MM-DD` text; rows that fail to parse are reported as
//! [`RepositoryError::InvalidData`] rather than skipped. A busy or locked
//! database surfaces as [`RepositoryError::Unavailable`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::{error, info};

use super::super::domain::{Contribution, ContributionId, EmployeeId};
use super::repository::{ContributionRepository, RepositoryError};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS contributions (
    id TEXT PRIMARY KEY,
    employee_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    type TEXT NOT NULL,
    status TEXT NOT NULL,
    date TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);";

const SELECT_SQL: &str = "SELECT id, employee_id, title, type, status, date
FROM contributions
ORDER BY date DESC, created_at DESC";

pub struct SqliteContributionRepository {
    conn: Mutex<Connection>,
}

impl SqliteContributionRepository {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let started_at = Instant::now();
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|err| {
            error!(path = %path.display(), error = %err, "failed to open contribution store");
            err
        })?;
        let repository = Self::bootstrap(conn)?;
        info!(
            path = %path.display(),
            duration_ms = started_at.elapsed().as_millis() as u64,
            "contribution store opened"
        );
        Ok(repository)
    }

    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, RepositoryError> {
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl ContributionRepository for SqliteContributionRepository {
    fn list(&self) -> Result<Vec<Contribution>, RepositoryError> {
        let conn = self.lock()?;
        let mut statement = conn.prepare(SELECT_SQL).map_err(classify)?;
        let rows = statement.query_map([], read_row).map_err(classify)?;

        let mut contributions = Vec::new();
        for row in rows {
            contributions.push(decode_row(row.map_err(classify)?)?);
        }
        Ok(contributions)
    }

    fn insert(&self, contribution: Contribution) -> Result<Contribution, RepositoryError> {
        let conn = self.lock()?;
        insert_row(&conn, &contribution)?;
        Ok(contribution)
    }

    fn insert_all(&self, contributions: Vec<Contribution>) -> Result<usize, RepositoryError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(classify)?;
        for contribution in &contributions {
            // Dropping `tx` on error rolls the whole batch back.
            insert_row(&tx, contribution)?;
        }
        tx.commit().map_err(classify)?;
        Ok(contributions.len())
    }

    fn delete(&self, id: &ContributionId) -> Result<(), RepositoryError> {
        let conn = self.lock()?;
        let affected = conn
            .execute("DELETE FROM contributions WHERE id = ?1", params![id.as_str()])
            .map_err(classify)?;
        if affected == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}

impl SqliteContributionRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, RepositoryError> {
        self.conn
            .lock()
            .map_err(|_| RepositoryError::Unavailable("connection poisoned by a failed writer".to_string()))
    }
}

fn insert_row(conn: &Connection, contribution: &Contribution) -> Result<(), RepositoryError> {
    conn.execute(
        "INSERT INTO contributions (id, employee_id, title, type, status, date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            contribution.id.as_str(),
            contribution.employee_id.0,
            contribution.title.as_str(),
            contribution.kind.as_db(),
            contribution.status.as_db(),
            contribution.date.format("%Y-%m-%d").to_string(),
        ],
    )
    .map(|_| ())
    .map_err(classify)
}

fn classify(err: rusqlite::Error) -> RepositoryError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RepositoryError::Conflict,
        Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen) => {
            RepositoryError::Unavailable(err.to_string())
        }
        _ => RepositoryError::Sqlite(err),
    }
}

struct RawRow {
    id: String,
    employee_id: u32,
    title: String,
    kind: String,
    status: String,
    date: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok(RawRow {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        title: row.get(2)?,
        kind: row.get(3)?,
        status: row.get(4)?,
        date: row.get(5)?,
    })
}

fn decode_row(raw: RawRow) -> Result<Contribution, RepositoryError> {
    let kind = raw
        .kind
        .parse()
        .map_err(|err| RepositoryError::InvalidData(format!("{}: {err}", raw.id)))?;
    let status = raw
        .status
        .parse()
        .map_err(|err| RepositoryError::InvalidData(format!("{}: {err}", raw.id)))?;
    let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d").map_err(|err| {
        RepositoryError::InvalidData(format!("{}: date '{}' ({err})", raw.id, raw.date))
    })?;

    Ok(Contribution {
        id: ContributionId(raw.id),
        employee_id: EmployeeId(raw.employee_id),
        title: raw.title,
        kind,
        status,
        date,
    })
}
