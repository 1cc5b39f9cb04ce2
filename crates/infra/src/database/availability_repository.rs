//! SQLite-backed implementation of the `AvailabilityGateway` port.
//!
//! Each day is stored as independent rows and replaced wholesale inside one
//! transaction, so a failed write never leaves a half-updated day behind.

use std::sync::Arc;

use async_trait::async_trait;
use cadence_core::{parse_timezone, AvailabilityGateway};
use cadence_domain::constants::DEFAULT_TIMEZONE;
use cadence_domain::{
    BlockRecord, CadenceError, DayAvailability, InstructorId, Result, StoredSchedule, Weekday,
};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tokio::task;
use tracing::debug;
use uuid::Uuid;

use super::manager::{map_sql_error, DbConnection, DbManager};
use crate::errors::InfraError;

const SELECT_TIMEZONE: &str = "SELECT timezone FROM instructors WHERE id = ?1";

const SELECT_BLOCKS: &str = "SELECT day_of_week, start_time, end_time
     FROM availability_blocks
     WHERE instructor_id = ?1
     ORDER BY day_of_week, start_time";

/// SQLite availability gateway.
pub struct SqliteAvailabilityGateway {
    db: Arc<DbManager>,
}

impl SqliteAvailabilityGateway {
    /// Create a new gateway backed by the shared `DbManager`.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// Record the IANA zone the instructor's blocks are interpreted in.
    ///
    /// # Errors
    /// `InvalidArgument` for an unknown zone name.
    pub async fn set_timezone(&self, instructor: &InstructorId, timezone: &str) -> Result<()> {
        parse_timezone(timezone)?;
        let db = Arc::clone(&self.db);
        let instructor = instructor.clone();
        let timezone = timezone.to_owned();

        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.execute(
                "INSERT INTO instructors (id, timezone) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET timezone = excluded.timezone",
                params![instructor.as_str(), timezone],
            )
            .map_err(map_sql_error)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl AvailabilityGateway for SqliteAvailabilityGateway {
    async fn load_week(&self, instructor: &InstructorId) -> Result<StoredSchedule> {
        let db = Arc::clone(&self.db);
        let instructor = instructor.clone();

        task::spawn_blocking(move || -> Result<StoredSchedule> {
            let conn = db.get_connection()?;
            let timezone = query_timezone(&conn, &instructor)?;
            let blocks = query_records(&conn, &instructor)?;
            Ok(StoredSchedule { instructor_id: instructor, timezone, blocks })
        })
        .await
        .map_err(map_join_error)?
    }

    async fn replace_day(&self, instructor: &InstructorId, day: &DayAvailability) -> Result<()> {
        let db = Arc::clone(&self.db);
        let instructor = instructor.clone();
        let weekday = day.day_of_week();
        let records: Vec<BlockRecord> =
            day.blocks().iter().map(|interval| BlockRecord::new(weekday, *interval)).collect();

        task::spawn_blocking(move || -> Result<()> {
            let mut conn = db.get_connection()?;
            replace_rows(&mut conn, &instructor, weekday, &records)?;
            debug!(
                instructor = %instructor,
                day = %weekday,
                blocks = records.len(),
                "availability day replaced"
            );
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn query_timezone(conn: &DbConnection, instructor: &InstructorId) -> Result<String> {
    let timezone = conn
        .query_row(SELECT_TIMEZONE, params![instructor.as_str()], |row| row.get::<_, String>(0))
        .optional()
        .map_err(map_sql_error)?;
    Ok(timezone.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string()))
}

fn query_records(conn: &DbConnection, instructor: &InstructorId) -> Result<Vec<BlockRecord>> {
    let mut stmt = conn.prepare(SELECT_BLOCKS).map_err(map_sql_error)?;
    let rows = stmt
        .query_map(params![instructor.as_str()], map_block_row)
        .map_err(map_sql_error)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(map_sql_error)?;
    rows.into_iter().map(into_record).collect()
}

fn map_block_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn into_record((day, start_time, end_time): (i64, String, String)) -> Result<BlockRecord> {
    let day_of_week = u8::try_from(day).ok().and_then(Weekday::from_index).ok_or_else(|| {
        CadenceError::PersistenceFailure(format!("stored day_of_week {day} is out of range"))
    })?;
    Ok(BlockRecord { day_of_week, start_time, end_time })
}

fn replace_rows(
    conn: &mut DbConnection,
    instructor: &InstructorId,
    day: Weekday,
    records: &[BlockRecord],
) -> Result<()> {
    let tx = conn.transaction().map_err(map_sql_error)?;
    let day_index = day.index() as i64;

    tx.execute(
        "DELETE FROM availability_blocks WHERE instructor_id = ?1 AND day_of_week = ?2",
        params![instructor.as_str(), day_index],
    )
    .map_err(map_sql_error)?;

    let created_at = Utc::now().timestamp();
    {
        let mut insert = tx
            .prepare(
                "INSERT INTO availability_blocks
                     (id, instructor_id, day_of_week, start_time, end_time, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )
            .map_err(map_sql_error)?;
        for record in records {
            insert
                .execute(params![
                    Uuid::now_v7().to_string(),
                    instructor.as_str(),
                    day_index,
                    record.start_time,
                    record.end_time,
                    created_at,
                ])
                .map_err(map_sql_error)?;
        }
    }

    tx.commit().map_err(map_sql_error)
}

fn map_join_error(err: task::JoinError) -> CadenceError {
    CadenceError::from(InfraError::from(err))
}

#[cfg(test)]
mod tests {
    use cadence_domain::TimeInterval;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, SqliteAvailabilityGateway) {
        let temp_dir = TempDir::new().expect("temp dir created");
        let db = DbManager::new(temp_dir.path().join("gateway.db"), 2).expect("manager created");
        db.run_migrations().expect("migrations run");
        (temp_dir, SqliteAvailabilityGateway::new(Arc::new(db)))
    }

    fn monday(blocks: &[(i32, i32)]) -> DayAvailability {
        let intervals =
            blocks.iter().map(|(s, e)| TimeInterval::from_minutes(*s, *e).unwrap()).collect();
        DayAvailability::new(Weekday::Monday, intervals).unwrap()
    }

    #[tokio::test]
    async fn unknown_instructor_loads_empty_week_in_default_zone() {
        let (_dir, gateway) = setup();
        let stored = gateway.load_week(&InstructorId::new("mem_none")).await.unwrap();
        assert!(stored.blocks.is_empty());
        assert_eq!(stored.timezone, DEFAULT_TIMEZONE);
    }

    #[tokio::test]
    async fn replace_day_overwrites_previous_rows() {
        let (_dir, gateway) = setup();
        let instructor = InstructorId::new("mem_1");

        gateway.replace_day(&instructor, &monday(&[(540, 600), (780, 840)])).await.unwrap();
        gateway.replace_day(&instructor, &monday(&[(600, 660)])).await.unwrap();

        let stored = gateway.load_week(&instructor).await.unwrap();
        assert_eq!(
            stored.blocks,
            vec![BlockRecord {
                day_of_week: Weekday::Monday,
                start_time: "10:00".into(),
                end_time: "11:00".into(),
            }]
        );
    }

    #[tokio::test]
    async fn set_timezone_validates_zone_name() {
        let (_dir, gateway) = setup();
        let instructor = InstructorId::new("mem_tz");

        gateway.set_timezone(&instructor, "America/Chicago").await.unwrap();
        assert_eq!(gateway.load_week(&instructor).await.unwrap().timezone, "America/Chicago");

        let err = gateway.set_timezone(&instructor, "Not/AZone").await.unwrap_err();
        assert!(matches!(err, CadenceError::InvalidArgument(_)));
    }

    #[test]
    fn out_of_range_day_is_a_persistence_failure() {
        let err = into_record((9, "09:00".into(), "10:00".into())).unwrap_err();
        assert!(matches!(err, CadenceError::PersistenceFailure(_)));
    }
}
