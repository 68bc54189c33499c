use rusqlite::{params, Connection};

use citespine_core::errors::CiteResult;
use citespine_core::models::DegradationEvent;

use crate::to_storage_err;

pub fn insert_degradation(conn: &Connection, event: &DegradationEvent) -> CiteResult<()> {
    conn.execute(
        "INSERT INTO degradation_log (component, failure, fallback, timestamp)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            event.component,
            event.failure,
            event.fallback_used,
            event.timestamp.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn count_degradations(conn: &Connection, component: &str) -> CiteResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM degradation_log WHERE component = ?1",
        params![component],
        |row| row.get::<_, i64>(0),
    )
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}
