//! SQLite-backed document store.
//!
//! Each collection is a table holding the JSON document next to the
//! extracted key columns its indexes need. The uniqueness rules of the
//! collections are SQL unique indexes; a violated index surfaces as
//! [`StoreError::Duplicate`] for the caller to translate.

use std::path::PathBuf;

use rusqlite::types::ToSql;
use rusqlite::{Connection, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::models::race::Race;
use crate::models::race_result::RaceResult;
use crate::models::raceplan::Raceplan;
use crate::models::startlist::{StartEntry, Startlist};
use crate::models::time_event::TimeEvent;
use crate::storage::schema::{CURRENT_VERSION, SCHEMA, SCHEMA_VERSION_TABLE};
use crate::storage::store::{Store, StoreError};

/// Store implementation over a single SQLite connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a store at the given path.
    pub fn open(path: &PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        }

        let conn =
            Connection::open(path).map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;
        Self::initialize(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize(conn: &Connection) -> Result<(), StoreError> {
        conn.execute_batch(SCHEMA_VERSION_TABLE)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        let version = Self::schema_version(conn)?;
        if version < CURRENT_VERSION {
            Self::migrate(conn, version)?;
        }

        Ok(())
    }

    fn schema_version(conn: &Connection) -> Result<i32, StoreError> {
        let result = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        );

        match result {
            Ok(version) => Ok(version),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(e) => Err(StoreError::QueryFailed(e.to_string())),
        }
    }

    fn migrate(conn: &Connection, from_version: i32) -> Result<(), StoreError> {
        if from_version < 1 {
            conn.execute_batch(SCHEMA)
                .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

            conn.execute(
                "INSERT INTO schema_version (version, applied_at) VALUES (?, datetime('now'))",
                [CURRENT_VERSION],
            )
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

            tracing::info!("Store migrated to version {}", CURRENT_VERSION);
        }

        Ok(())
    }
}

fn map_sqlite(e: rusqlite::Error) -> StoreError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::Duplicate(e.to_string())
        }
        _ => StoreError::QueryFailed(e.to_string()),
    }
}

fn doc_from_row<T: DeserializeOwned>(row: &Row<'_>) -> rusqlite::Result<T> {
    let doc: String = row.get(0)?;
    serde_json::from_str(&doc).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn to_doc<T: Serialize>(value: &T) -> Result<String, StoreError> {
    serde_json::to_string(value).map_err(|e| StoreError::QueryFailed(e.to_string()))
}

fn require_id<'a>(id: &'a Option<String>, collection: &'static str) -> Result<&'a str, StoreError> {
    id.as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::QueryFailed(format!("{collection} document has no id")))
}

fn query_docs<T: DeserializeOwned>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> Result<Vec<T>, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(map_sqlite)?;
    let rows = stmt.query_map(params, doc_from_row::<T>).map_err(map_sqlite)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(map_sqlite)
}

fn query_doc<T: DeserializeOwned>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
    collection: &'static str,
    id: &str,
) -> Result<T, StoreError> {
    match conn.query_row(sql, params, doc_from_row::<T>) {
        Ok(doc) => Ok(doc),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(StoreError::NotFound(collection, id.to_string()))
        }
        Err(e) => Err(map_sqlite(e)),
    }
}

fn expect_row(affected: usize, collection: &'static str, id: &str) -> Result<(), StoreError> {
    if affected == 0 {
        return Err(StoreError::NotFound(collection, id.to_string()));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    // Raceplans

    async fn create_raceplan(&self, raceplan: &Raceplan) -> Result<(), StoreError> {
        let id = require_id(&raceplan.id, "raceplan")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO raceplans (id, event_id, doc) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, raceplan.event_id, to_doc(raceplan)?],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_raceplan_by_id(&self, id: &str) -> Result<Raceplan, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM raceplans WHERE id = ?1",
            &[&id],
            "raceplan",
            id,
        )
    }

    async fn get_raceplans_by_event_id(&self, event_id: &str) -> Result<Vec<Raceplan>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM raceplans WHERE event_id = ?1",
            &[&event_id],
        )
    }

    async fn get_all_raceplans(&self) -> Result<Vec<Raceplan>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(&conn, "SELECT doc FROM raceplans", &[])
    }

    async fn update_raceplan(&self, id: &str, raceplan: &Raceplan) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE raceplans SET event_id = ?2, doc = ?3 WHERE id = ?1",
                rusqlite::params![id, raceplan.event_id, to_doc(raceplan)?],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "raceplan", id)
    }

    async fn delete_raceplan(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM raceplans WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "raceplan", id)
    }

    // Races

    async fn create_race(&self, race: &Race) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO races (id, event_id, raceplan_id, raceclass, race_order, doc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                race.id(),
                race.event_id(),
                race.raceplan_id(),
                race.raceclass(),
                race.order(),
                to_doc(race)?,
            ],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_race_by_id(&self, id: &str) -> Result<Race, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM races WHERE id = ?1",
            &[&id],
            "race",
            id,
        )
    }

    async fn get_races_by_event_id(&self, event_id: &str) -> Result<Vec<Race>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM races WHERE event_id = ?1 ORDER BY race_order",
            &[&event_id],
        )
    }

    async fn get_races_by_raceplan_id(&self, raceplan_id: &str) -> Result<Vec<Race>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM races WHERE raceplan_id = ?1 ORDER BY race_order",
            &[&raceplan_id],
        )
    }

    async fn get_races_by_event_id_and_raceclass(
        &self,
        event_id: &str,
        raceclass: &str,
    ) -> Result<Vec<Race>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM races WHERE event_id = ?1 AND raceclass = ?2 ORDER BY race_order",
            &[&event_id, &raceclass],
        )
    }

    async fn update_race(&self, id: &str, race: &Race) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE races SET event_id = ?2, raceplan_id = ?3, raceclass = ?4,
                 race_order = ?5, doc = ?6 WHERE id = ?1",
                rusqlite::params![
                    id,
                    race.event_id(),
                    race.raceplan_id(),
                    race.raceclass(),
                    race.order(),
                    to_doc(race)?,
                ],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "race", id)
    }

    async fn delete_race(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM races WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "race", id)
    }

    // Startlists

    async fn create_startlist(&self, startlist: &Startlist) -> Result<(), StoreError> {
        let id = require_id(&startlist.id, "startlist")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO startlists (id, event_id, doc) VALUES (?1, ?2, ?3)",
            rusqlite::params![id, startlist.event_id, to_doc(startlist)?],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_startlist_by_id(&self, id: &str) -> Result<Startlist, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM startlists WHERE id = ?1",
            &[&id],
            "startlist",
            id,
        )
    }

    async fn get_startlists_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<Startlist>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM startlists WHERE event_id = ?1",
            &[&event_id],
        )
    }

    async fn get_all_startlists(&self) -> Result<Vec<Startlist>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(&conn, "SELECT doc FROM startlists", &[])
    }

    async fn update_startlist(&self, id: &str, startlist: &Startlist) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE startlists SET event_id = ?2, doc = ?3 WHERE id = ?1",
                rusqlite::params![id, startlist.event_id, to_doc(startlist)?],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "startlist", id)
    }

    async fn delete_startlist(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM startlists WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "startlist", id)
    }

    // Start entries

    async fn create_start_entry(&self, start_entry: &StartEntry) -> Result<(), StoreError> {
        let id = require_id(&start_entry.id, "start entry")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO start_entries (id, startlist_id, race_id, bib, starting_position, doc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id,
                start_entry.startlist_id,
                start_entry.race_id,
                start_entry.bib,
                start_entry.starting_position,
                to_doc(start_entry)?,
            ],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_start_entry_by_id(&self, id: &str) -> Result<StartEntry, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM start_entries WHERE id = ?1",
            &[&id],
            "start entry",
            id,
        )
    }

    async fn get_start_entries_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<StartEntry>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM start_entries WHERE race_id = ?1 ORDER BY starting_position",
            &[&race_id],
        )
    }

    async fn get_start_entries_by_race_id_and_startlist_id(
        &self,
        race_id: &str,
        startlist_id: &str,
    ) -> Result<Vec<StartEntry>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM start_entries WHERE race_id = ?1 AND startlist_id = ?2
             ORDER BY starting_position",
            &[&race_id, &startlist_id],
        )
    }

    async fn update_start_entry(
        &self,
        id: &str,
        start_entry: &StartEntry,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE start_entries SET startlist_id = ?2, race_id = ?3, bib = ?4,
                 starting_position = ?5, doc = ?6 WHERE id = ?1",
                rusqlite::params![
                    id,
                    start_entry.startlist_id,
                    start_entry.race_id,
                    start_entry.bib,
                    start_entry.starting_position,
                    to_doc(start_entry)?,
                ],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "start entry", id)
    }

    async fn delete_start_entry(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM start_entries WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "start entry", id)
    }

    // Time events

    async fn create_time_event(&self, time_event: &TimeEvent) -> Result<(), StoreError> {
        let id = require_id(&time_event.id, "time event")?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO time_events (id, event_id, race_id, timing_point, bib, doc)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                id,
                time_event.event_id,
                time_event.race_id,
                time_event.timing_point,
                time_event.bib,
                to_doc(time_event)?,
            ],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_time_event_by_id(&self, id: &str) -> Result<TimeEvent, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM time_events WHERE id = ?1",
            &[&id],
            "time event",
            id,
        )
    }

    async fn get_all_time_events(&self) -> Result<Vec<TimeEvent>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(&conn, "SELECT doc FROM time_events", &[])
    }

    async fn get_time_events_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Vec<TimeEvent>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM time_events WHERE event_id = ?1",
            &[&event_id],
        )
    }

    async fn get_time_events_by_event_id_and_timing_point(
        &self,
        event_id: &str,
        timing_point: &str,
    ) -> Result<Vec<TimeEvent>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM time_events WHERE event_id = ?1 AND timing_point = ?2",
            &[&event_id, &timing_point],
        )
    }

    async fn get_time_events_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<TimeEvent>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM time_events WHERE race_id = ?1",
            &[&race_id],
        )
    }

    async fn update_time_event(&self, id: &str, time_event: &TimeEvent) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE time_events SET event_id = ?2, race_id = ?3, timing_point = ?4,
                 bib = ?5, doc = ?6 WHERE id = ?1",
                rusqlite::params![
                    id,
                    time_event.event_id,
                    time_event.race_id,
                    time_event.timing_point,
                    time_event.bib,
                    to_doc(time_event)?,
                ],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "time event", id)
    }

    async fn delete_time_event(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM time_events WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "time event", id)
    }

    // Race results

    async fn create_race_result(&self, race_result: &RaceResult) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO race_results (id, race_id, timing_point, doc) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                race_result.id,
                race_result.race_id,
                race_result.timing_point,
                to_doc(race_result)?,
            ],
        )
        .map_err(map_sqlite)?;
        Ok(())
    }

    async fn get_race_result_by_id(&self, id: &str) -> Result<RaceResult, StoreError> {
        let conn = self.conn.lock().await;
        query_doc(
            &conn,
            "SELECT doc FROM race_results WHERE id = ?1",
            &[&id],
            "race result",
            id,
        )
    }

    async fn get_race_results_by_race_id(
        &self,
        race_id: &str,
    ) -> Result<Vec<RaceResult>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM race_results WHERE race_id = ?1",
            &[&race_id],
        )
    }

    async fn get_race_results_by_race_id_and_timing_point(
        &self,
        race_id: &str,
        timing_point: &str,
    ) -> Result<Vec<RaceResult>, StoreError> {
        let conn = self.conn.lock().await;
        query_docs(
            &conn,
            "SELECT doc FROM race_results WHERE race_id = ?1 AND timing_point = ?2",
            &[&race_id, &timing_point],
        )
    }

    async fn update_race_result(
        &self,
        id: &str,
        race_result: &RaceResult,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute(
                "UPDATE race_results SET race_id = ?2, timing_point = ?3, doc = ?4 WHERE id = ?1",
                rusqlite::params![
                    id,
                    race_result.race_id,
                    race_result.timing_point,
                    to_doc(race_result)?,
                ],
            )
            .map_err(map_sqlite)?;
        expect_row(affected, "race result", id)
    }

    async fn delete_race_result(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM race_results WHERE id = ?1", [&id])
            .map_err(map_sqlite)?;
        expect_row(affected, "race result", id)
    }
}
