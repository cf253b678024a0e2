//! Student table access.

use async_trait::async_trait;
use attendance_domain::{NewStudent, Student};
use sqlx::SqliteConnection;

use super::attendances::{self, Parent};
use super::traits::StoredEntity;
use crate::cache::keys;
use crate::error::Result;

#[derive(sqlx::FromRow)]
struct StudentRow {
    student_id: i64,
    student_name: String,
}

impl From<StudentRow> for Student {
    fn from(row: StudentRow) -> Self {
        Self {
            student_id: row.student_id,
            student_name: row.student_name,
        }
    }
}

#[async_trait]
impl StoredEntity for Student {
    type Draft = NewStudent;

    const COLLECTION_KEY: &'static str = keys::STUDENTS;

    fn id(&self) -> i64 {
        self.student_id
    }

    fn item_key(id: i64) -> String {
        keys::student(id)
    }

    fn replace_with(&mut self, draft: NewStudent) {
        self.student_name = draft.student_name;
    }

    async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, student_name FROM students ORDER BY student_id",
        )
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(Student::from).collect())
    }

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, student_name FROM students WHERE student_id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Student::from))
    }

    async fn find_duplicate(conn: &mut SqliteConnection, draft: &NewStudent) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, StudentRow>(
            "SELECT student_id, student_name FROM students WHERE student_name = ? ORDER BY student_id LIMIT 1",
        )
        .bind(&draft.student_name)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Student::from))
    }

    async fn insert(conn: &mut SqliteConnection, draft: &NewStudent) -> Result<Self> {
        let row = sqlx::query_as::<_, StudentRow>(
            "INSERT INTO students (student_name) VALUES (?) RETURNING student_id, student_name",
        )
        .bind(&draft.student_name)
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    async fn save(conn: &mut SqliteConnection, entity: &Self) -> Result<()> {
        sqlx::query("UPDATE students SET student_name = ? WHERE student_id = ?")
            .bind(&entity.student_name)
            .bind(entity.student_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<Vec<String>> {
        let dependents =
            attendances::dependent_keys(&mut *conn, Parent::Student(entity.student_id)).await?;

        sqlx::query("DELETE FROM students WHERE student_id = ?")
            .bind(entity.student_id)
            .execute(conn)
            .await?;

        Ok(dependents)
    }
}
