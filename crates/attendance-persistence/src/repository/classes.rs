//! Class table access.

use async_trait::async_trait;
use attendance_domain::{Class, NewClass};
use sqlx::SqliteConnection;

use super::attendances::{self, Parent};
use super::traits::StoredEntity;
use crate::cache::keys;
use crate::error::Result;

#[derive(sqlx::FromRow)]
struct ClassRow {
    class_id: i64,
    class_name: String,
}

impl From<ClassRow> for Class {
    fn from(row: ClassRow) -> Self {
        Self {
            class_id: row.class_id,
            class_name: row.class_name,
        }
    }
}

#[async_trait]
impl StoredEntity for Class {
    type Draft = NewClass;

    const COLLECTION_KEY: &'static str = keys::CLASSES;

    fn id(&self) -> i64 {
        self.class_id
    }

    fn item_key(id: i64) -> String {
        keys::class(id)
    }

    fn replace_with(&mut self, draft: NewClass) {
        self.class_name = draft.class_name;
    }

    async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ClassRow>(
            "SELECT class_id, class_name FROM classes ORDER BY class_id",
        )
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(Class::from).collect())
    }

    async fn fetch_by_id(conn: &mut SqliteConnection, id: i64) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ClassRow>(
            "SELECT class_id, class_name FROM classes WHERE class_id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Class::from))
    }

    async fn find_duplicate(conn: &mut SqliteConnection, draft: &NewClass) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, ClassRow>(
            "SELECT class_id, class_name FROM classes WHERE class_name = ? ORDER BY class_id LIMIT 1",
        )
        .bind(&draft.class_name)
        .fetch_optional(conn)
        .await?;

        Ok(row.map(Class::from))
    }

    async fn insert(conn: &mut SqliteConnection, draft: &NewClass) -> Result<Self> {
        let row = sqlx::query_as::<_, ClassRow>(
            "INSERT INTO classes (class_name) VALUES (?) RETURNING class_id, class_name",
        )
        .bind(&draft.class_name)
        .fetch_one(conn)
        .await?;

        Ok(row.into())
    }

    async fn save(conn: &mut SqliteConnection, entity: &Self) -> Result<()> {
        sqlx::query("UPDATE classes SET class_name = ? WHERE class_id = ?")
            .bind(&entity.class_name)
            .bind(entity.class_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn delete(conn: &mut SqliteConnection, entity: &Self) -> Result<Vec<String>> {
        let dependents =
            attendances::dependent_keys(&mut *conn, Parent::Class(entity.class_id)).await?;

        sqlx::query("DELETE FROM classes WHERE class_id = ?")
            .bind(entity.class_id)
            .execute(conn)
            .await?;

        Ok(dependents)
    }
}
