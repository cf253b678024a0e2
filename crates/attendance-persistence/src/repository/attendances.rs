//! Attendance table access.

use async_trait::async_trait;
use attendance_domain::{Attendance, NewAttendance};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use super::traits::StoredEntity;
use crate::cache::keys;
use crate::error::Result;

const COLUMNS: &str = "attendance_id, student_id, class_id, time";

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    attendance_id: i64,
    student_id: i64,
    class_id: i64,
    time: DateTime<Utc>,
}

impl From<AttendanceRow> for Attendance {
    fn from(row: AttendanceRow) -> Self {
        Self {
            attendance_id: row.attendance_id,
            student_id: row.student_id,
            class_id: row.class_id,
            time: row.time,
        }
    }
}

/// Owner of attendance rows removed by cascade
#[derive(Debug, Clone, Copy)]
pub enum Parent {
    Student(i64),
    Class(i64),
}

/// Cache keys of the attendance rows owned by `parent`, plus the collection
/// key when there are any.
pub async fn dependent_keys(conn: &mut SqliteConnection, parent: Parent) -> Result<Vec<String>> {
    let (sql, id) = match parent {
        Parent::Student(id) => (
            format!("SELECT {COLUMNS} FROM attendances WHERE student_id = ?"),
            id,
        ),
        Parent::Class(id) => (
            format!("SELECT {COLUMNS} FROM attendances WHERE class_id = ?"),
            id,
        ),
    };

    let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
        .bind(id)
        .fetch_all(conn)
        .await?;

    let mut stale: Vec<String> = rows
        .into_iter()
        .map(Attendance::from)
        .flat_map(|a| a.cache_keys())
        .collect();

    if !stale.is_empty() {
        stale.push(keys::ATTENDANCES.to_string());
    }
    Ok(stale)
}

/// Attendance by its `(student_id, class_id)` pair
pub async fn fetch_by_pair(
    conn: &mut SqliteConnection,
    student_id: i64,
    class_id: i64,
) -> Result<Option<Attendance>> {
    let sql = format!("SELECT {COLUMNS} FROM attendances WHERE student_id = ? AND class_id = ?");
    let row = sqlx::query_as::<_, AttendanceRow>(&sql)
        .bind(student_id)
        .bind(class_id)
        .fetch_optional(conn)
        .await?;

    Ok(row.map(Attendance::from))
}

#[async_trait]
impl StoredEntity for Attendance {
    type Draft = NewAttendance;

    const COLLECTION_KEY: &'static str = keys::ATTENDANCES;

    fn id(&self) -> i64 {
        self.attendance_id
    }

    fn item_key(id: i64) -> String {
        keys::attendance(id)
    }

    fn cache_keys(&self) -> Vec<String> {
        let (student_id, class_id) = self.pair();
        vec![
            keys::attendance(self.attendance_id),
            keys::attendance_pair(student_id, class_id),
        ]
    }

    fn replace_with(&mut self, draft: NewAttendance) {
        self.student_id = draft.student_id;
        self.class_id = draft.class_id;
        self.time = draft.time;
    }

    async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let sql = format!("SELECT {COLUMNS} FROM attendances ORDER BY attendance_id");
        let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
            .fetch_all(conn)
            .await?;

        Ok(rows.into_iter().map(Attendance::from).collect())
    }

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>> {
        let sql = format!("SELECT {COLUMNS} FROM attendances WHERE attendance_id = ?");
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(row.map(Attendance::from))
    }

    async fn find_duplicate(
        conn: &mut SqliteConnection,
        draft: &NewAttendance,
    ) -> Result<Option<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM attendances WHERE time = ? AND student_id = ? AND class_id = ? LIMIT 1"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(draft.time)
            .bind(draft.student_id)
            .bind(draft.class_id)
            .fetch_optional(conn)
            .await?;

        Ok(row.map(Attendance::from))
    }

    async fn insert(conn: &mut SqliteConnection, draft: &NewAttendance) -> Result<Self> {
        let sql = format!(
            "INSERT INTO attendances (student_id, class_id, time) VALUES (?, ?, ?) RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AttendanceRow>(&sql)
            .bind(draft.student_id)
            .bind(draft.class_id)
            .bind(draft.time)
            .fetch_one(conn)
            .await?;

        Ok(row.into())
    }

    async fn save(conn: &mut SqliteConnection, entity: &Self) -> Result<()> {
        sqlx::query(
            "UPDATE attendances SET student_id = ?, class_id = ?, time = ? WHERE attendance_id = ?",
        )
        .bind(entity.student_id)
        .bind(entity.class_id)
        .bind(entity.time)
        .bind(entity.attendance_id)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<Vec<String>> {
        sqlx::query("DELETE FROM attendances WHERE attendance_id = ?")
            .bind(entity.attendance_id)
            .execute(conn)
            .await?;
        Ok(Vec::new())
    }
}
