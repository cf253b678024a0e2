//! Cached repository: store access wrapped in the read/write strategies.

use attendance_domain::{Attendance, AttendanceUpdate, PatchOperation};
use serde::Serialize;
use sqlx::{Sqlite, Transaction};
use std::marker::PhantomData;
use std::time::Duration;

use super::attendances;
use super::store::SqliteStore;
use super::traits::StoredEntity;
use crate::cache::{SharedCacheClient, keys};
use crate::error::{PersistenceError, Result};
use crate::strategy::{ReadStrategy, Strategies, WriteOutcome, WriteStrategy};

// =============================================================================
// CACHED REPOSITORY
// =============================================================================

/// Repository for one entity type.
///
/// Reads go through the cache under the entity's canonical keys; writes run
/// in a store transaction and invalidate every stale key after commit.
pub struct CachedRepository<E> {
    store: SqliteStore,
    cache: SharedCacheClient,
    read_strategy: ReadStrategy,
    write_strategy: WriteStrategy,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for CachedRepository<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            read_strategy: self.read_strategy,
            write_strategy: self.write_strategy,
            _entity: PhantomData,
        }
    }
}

impl<E: StoredEntity> CachedRepository<E> {
    /// Create a repository with default strategies.
    pub fn new(store: SqliteStore, cache: SharedCacheClient) -> Self {
        Self::with_strategies(store, cache, Strategies::default())
    }

    /// Create with custom strategies.
    pub fn with_strategies(
        store: SqliteStore,
        cache: SharedCacheClient,
        strategies: Strategies,
    ) -> Self {
        Self {
            store,
            cache,
            read_strategy: strategies.read,
            write_strategy: strategies.write,
            _entity: PhantomData,
        }
    }

    pub const fn strategies(&self) -> Strategies {
        Strategies {
            read: self.read_strategy,
            write: self.write_strategy,
        }
    }

    // -------------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------------

    /// Every entity, ordered by identifier.
    pub async fn get_all(&self) -> Result<Vec<E>> {
        let key = E::COLLECTION_KEY;
        let ttl = self.cache.ttl().collection;

        let all = self
            .read_strategy
            .read(
                || self.cache.get_json::<Vec<E>>(key),
                || self.load_all(),
                Some(|all: Vec<E>| self.remember(key, all, ttl)),
            )
            .await?;

        Ok(all.unwrap_or_default())
    }

    /// Entity by identifier, `None` when absent.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<E>> {
        let key = E::item_key(id);
        let key = key.as_str();
        let ttl = self.cache.ttl().entity;

        tracing::debug!(entity = E::ENTITY, id, key, "Reading entity");

        self.read_strategy
            .read(
                || self.cache.get_json::<E>(key),
                || self.load_by_id(id),
                Some(|found: E| self.remember(key, found, ttl)),
            )
            .await
    }

    /// Entity by identifier straight from the store, bypassing the cache.
    pub async fn fetch_fresh(&self, id: i64) -> Result<Option<E>> {
        ReadStrategy::DbOnly
            .read_simple(|| std::future::ready(Ok(None)), || self.load_by_id(id))
            .await
    }

    // -------------------------------------------------------------------------
    // Writes
    // -------------------------------------------------------------------------

    /// Insert a new entity, or return the existing one with the same natural key.
    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        let created = self
            .write_strategy
            .write(|| self.insert_or_reuse(draft), |stale| self.invalidate(stale))
            .await?;

        tracing::info!(entity = E::ENTITY, id = created.id(), "Created entity");
        Ok(created)
    }

    /// Overwrite every mutable field of entity `id`.
    pub async fn update(&self, id: i64, draft: E::Draft) -> Result<E> {
        let updated = self
            .write_strategy
            .write(
                || async move {
                    let mut tx = self.store.begin().await?;
                    let found = E::fetch_by_id(&mut *tx, id).await?;
                    Self::commit_change(tx, found, id, |entity| {
                        entity.replace_with(draft);
                        Ok(())
                    })
                    .await
                },
                |stale| self.invalidate(stale),
            )
            .await?;

        tracing::info!(entity = E::ENTITY, id, "Updated entity");
        Ok(updated)
    }

    /// Apply a patch to entity `id`. Either every operation lands or none does.
    pub async fn patch(&self, id: i64, operations: &[PatchOperation]) -> Result<E> {
        let patched = self
            .write_strategy
            .write(
                || async move {
                    let mut tx = self.store.begin().await?;
                    let found = E::fetch_by_id(&mut *tx, id).await?;
                    Self::commit_change(tx, found, id, |entity| {
                        entity.apply_patch(operations)?;
                        Ok(())
                    })
                    .await
                },
                |stale| self.invalidate(stale),
            )
            .await?;

        tracing::info!(entity = E::ENTITY, id, ops = operations.len(), "Patched entity");
        Ok(patched)
    }

    /// Delete entity `id` and return it as it was.
    pub async fn delete(&self, id: i64) -> Result<E> {
        let deleted = self
            .write_strategy
            .write(|| self.remove_row(id), |stale| self.invalidate(stale))
            .await?;

        tracing::info!(entity = E::ENTITY, id, "Deleted entity");
        Ok(deleted)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    async fn load_all(&self) -> Result<Option<Vec<E>>> {
        let mut conn = self.store.acquire().await?;
        let all = E::fetch_all(&mut *conn).await?;
        Ok((!all.is_empty()).then_some(all))
    }

    async fn load_by_id(&self, id: i64) -> Result<Option<E>> {
        let mut conn = self.store.acquire().await?;
        E::fetch_by_id(&mut *conn, id).await
    }

    async fn remember<T>(&self, key: &str, value: T, ttl: Duration) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        self.cache.set_json(key, &value, ttl).await
    }

    async fn invalidate(&self, stale: Vec<String>) -> Result<()> {
        tracing::debug!(entity = E::ENTITY, keys = ?stale, "Invalidating cache keys");
        self.cache.remove_many(&stale).await
    }

    async fn insert_or_reuse(&self, draft: E::Draft) -> Result<WriteOutcome<E>> {
        let mut tx = self.store.begin().await?;

        if let Some(existing) = E::find_duplicate(&mut *tx, &draft).await? {
            tx.rollback().await?;
            tracing::debug!(entity = E::ENTITY, id = existing.id(), "Reusing existing entity");
            return Ok(WriteOutcome::new(existing, Vec::new()));
        }

        let created = E::insert(&mut *tx, &draft).await?;
        tx.commit().await?;

        let mut stale = created.cache_keys();
        stale.push(E::COLLECTION_KEY.to_string());
        Ok(WriteOutcome::new(created, stale))
    }

    async fn remove_row(&self, id: i64) -> Result<WriteOutcome<E>> {
        let mut tx = self.store.begin().await?;

        let Some(entity) = E::fetch_by_id(&mut *tx, id).await? else {
            tx.rollback().await?;
            return Err(PersistenceError::not_found(E::ENTITY, id));
        };

        let mut stale = E::delete(&mut *tx, &entity).await?;
        tx.commit().await?;

        stale.extend(entity.cache_keys());
        stale.push(E::COLLECTION_KEY.to_string());
        Ok(WriteOutcome::new(entity, stale))
    }

    /// Apply `change` to the row found inside `tx` and commit it.
    ///
    /// Stale keys cover the row both before and after the change, so a row
    /// whose natural key moved loses its old cache entries too.
    async fn commit_change(
        mut tx: Transaction<'static, Sqlite>,
        found: Option<E>,
        missing: impl ToString + Send,
        change: impl FnOnce(&mut E) -> Result<()> + Send,
    ) -> Result<WriteOutcome<E>> {
        let Some(mut entity) = found else {
            tx.rollback().await?;
            return Err(PersistenceError::not_found(E::ENTITY, missing));
        };

        let mut stale = entity.cache_keys();

        if let Err(e) = change(&mut entity) {
            tx.rollback().await?;
            return Err(e);
        }

        E::save(&mut *tx, &entity).await?;
        tx.commit().await?;

        stale.extend(entity.cache_keys());
        stale.push(E::COLLECTION_KEY.to_string());
        Ok(WriteOutcome::new(entity, stale))
    }
}

// =============================================================================
// ATTENDANCE PAIR ACCESS
// =============================================================================

impl CachedRepository<Attendance> {
    /// Attendance by its `(student_id, class_id)` pair.
    pub async fn get_by_pair(&self, student_id: i64, class_id: i64) -> Result<Option<Attendance>> {
        let key = keys::attendance_pair(student_id, class_id);
        let key = key.as_str();
        let ttl = self.cache.ttl().entity;

        self.read_strategy
            .read(
                || self.cache.get_json::<Attendance>(key),
                || self.load_by_pair(student_id, class_id),
                Some(|found: Attendance| self.remember(key, found, ttl)),
            )
            .await
    }

    /// Set the time of the attendance identified by its pair.
    pub async fn update_by_pair(
        &self,
        student_id: i64,
        class_id: i64,
        update: AttendanceUpdate,
    ) -> Result<Attendance> {
        let updated = self
            .write_strategy
            .write(
                || async move {
                    let mut tx = self.store.begin().await?;
                    let found = attendances::fetch_by_pair(&mut *tx, student_id, class_id).await?;
                    Self::commit_change(tx, found, format!("{student_id}:{class_id}"), |entity| {
                        entity.time = update.time;
                        Ok(())
                    })
                    .await
                },
                |stale| self.invalidate(stale),
            )
            .await?;

        tracing::info!(student_id, class_id, "Updated attendance by pair");
        Ok(updated)
    }

    async fn load_by_pair(&self, student_id: i64, class_id: i64) -> Result<Option<Attendance>> {
        let mut conn = self.store.acquire().await?;
        attendances::fetch_by_pair(&mut *conn, student_id, class_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheClient, CacheStore, CacheTtl, shared_cache};
    use async_trait::async_trait;
    use attendance_domain::{
        Class, NewAttendance, NewClass, NewStudent, PatchError, Student, timestamp,
    };
    use chrono::{TimeZone, Utc};
    use fake::Fake;
    use fake::faker::name::en::Name;
    use serde_json::json;

    struct Fixture {
        store: SqliteStore,
        cache: SharedCacheClient,
        students: CachedRepository<Student>,
        classes: CachedRepository<Class>,
        attendances: CachedRepository<Attendance>,
    }

    async fn fixture_with(cache: CacheClient) -> Fixture {
        let store = SqliteStore::in_memory().await.unwrap();
        let cache = shared_cache(cache);
        Fixture {
            students: CachedRepository::new(store.clone(), cache.clone()),
            classes: CachedRepository::new(store.clone(), cache.clone()),
            attendances: CachedRepository::new(store.clone(), cache.clone()),
            store,
            cache,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(CacheClient::in_memory()).await
    }

    fn new_student() -> NewStudent {
        NewStudent {
            student_name: Name().fake(),
        }
    }

    fn monday_nine() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap()
    }

    async fn enrolled(fx: &Fixture) -> (Student, Class, Attendance) {
        let student = fx.students.create(new_student()).await.unwrap();
        let class = fx
            .classes
            .create(NewClass {
                class_name: "Math101".into(),
            })
            .await
            .unwrap();
        let attendance = fx
            .attendances
            .create(NewAttendance {
                student_id: student.student_id,
                class_id: class.class_id,
                time: monday_nine(),
            })
            .await
            .unwrap();
        (student, class, attendance)
    }

    async fn cached<T: serde::de::DeserializeOwned>(fx: &Fixture, key: &str) -> Option<T> {
        fx.cache.get_json::<T>(key).await.unwrap()
    }

    /// Backend that fails every call.
    struct BrokenCache;

    #[async_trait]
    impl CacheStore for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(PersistenceError::Redis("connection refused".into()))
        }

        async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<()> {
            Err(PersistenceError::Redis("connection refused".into()))
        }

        async fn remove(&self, _key: &str) -> Result<()> {
            Err(PersistenceError::Redis("connection refused".into()))
        }

        fn backend(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let fx = fixture().await;
        let draft = new_student();

        let created = fx.students.create(draft.clone()).await.unwrap();
        let fetched = fx.students.get_by_id(created.student_id).await.unwrap();

        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(created.student_name, draft.student_name);
        assert_eq!(
            cached::<Student>(&fx, &keys::student(created.student_id)).await,
            Some(created)
        );
    }

    #[tokio::test]
    async fn test_create_reuses_matching_name() {
        let fx = fixture().await;
        let alice = NewStudent {
            student_name: "Alice".into(),
        };

        let first = fx.students.create(alice.clone()).await.unwrap();
        let second = fx.students.create(alice).await.unwrap();

        assert_eq!(first.student_id, second.student_id);
        assert_eq!(fx.students.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_reuses_matching_attendance() {
        let fx = fixture().await;
        let (student, class, attendance) = enrolled(&fx).await;

        let again = fx
            .attendances
            .create(NewAttendance {
                student_id: student.student_id,
                class_id: class.class_id,
                time: monday_nine(),
            })
            .await
            .unwrap();

        assert_eq!(again, attendance);
    }

    #[tokio::test]
    async fn test_get_missing_is_none_and_not_cached() {
        let fx = fixture().await;

        assert_eq!(fx.classes.get_by_id(42).await.unwrap(), None);
        assert_eq!(cached::<Class>(&fx, &keys::class(42)).await, None);
    }

    #[tokio::test]
    async fn test_empty_collection_not_cached() {
        let fx = fixture().await;

        assert!(fx.classes.get_all().await.unwrap().is_empty());
        assert_eq!(cached::<Vec<Class>>(&fx, keys::CLASSES).await, None);
    }

    #[tokio::test]
    async fn test_repeated_reads_served_from_cache() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();

        let first = fx.students.get_by_id(created.student_id).await.unwrap();

        // Change the row behind the cache's back
        sqlx::query("UPDATE students SET student_name = 'Changed' WHERE student_id = ?")
            .bind(created.student_id)
            .execute(fx.store.pool())
            .await
            .unwrap();

        let second = fx.students.get_by_id(created.student_id).await.unwrap();
        assert_eq!(first, second);

        let fresh = fx.students.fetch_fresh(created.student_id).await.unwrap();
        assert_eq!(fresh.unwrap().student_name, "Changed");
    }

    #[tokio::test]
    async fn test_collection_read_through() {
        let fx = fixture().await;
        fx.students.create(new_student()).await.unwrap();
        fx.students.create(new_student()).await.unwrap();

        let all = fx.students.get_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert!(all[0].student_id < all[1].student_id);
        assert_eq!(cached::<Vec<Student>>(&fx, keys::STUDENTS).await, Some(all));
    }

    #[tokio::test]
    async fn test_create_invalidates_collection() {
        let fx = fixture().await;
        fx.classes
            .create(NewClass {
                class_name: "Math101".into(),
            })
            .await
            .unwrap();
        fx.classes.get_all().await.unwrap();

        fx.classes
            .create(NewClass {
                class_name: "History".into(),
            })
            .await
            .unwrap();

        assert_eq!(cached::<Vec<Class>>(&fx, keys::CLASSES).await, None);
        assert_eq!(fx.classes.get_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_invalidates_entity_and_collection() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();
        fx.students.get_by_id(created.student_id).await.unwrap();
        fx.students.get_all().await.unwrap();

        let updated = fx
            .students
            .update(
                created.student_id,
                NewStudent {
                    student_name: "Renamed".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.student_name, "Renamed");
        assert_eq!(cached::<Student>(&fx, &keys::student(created.student_id)).await, None);
        assert_eq!(cached::<Vec<Student>>(&fx, keys::STUDENTS).await, None);

        let fetched = fx.students.get_by_id(created.student_id).await.unwrap();
        assert_eq!(fetched.unwrap().student_name, "Renamed");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let fx = fixture().await;

        let err = fx.students.update(7, new_student()).await.unwrap_err();

        assert!(matches!(err, PersistenceError::NotFound { entity_type: "Student", .. }));
    }

    #[tokio::test]
    async fn test_delete_invalidates_and_removes() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();
        fx.students.get_by_id(created.student_id).await.unwrap();

        let deleted = fx.students.delete(created.student_id).await.unwrap();

        assert_eq!(deleted, created);
        assert_eq!(cached::<Student>(&fx, &keys::student(created.student_id)).await, None);
        assert_eq!(fx.students.get_by_id(created.student_id).await.unwrap(), None);
        assert!(matches!(
            fx.students.delete(created.student_id).await,
            Err(PersistenceError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_patch_applies_and_invalidates() {
        let fx = fixture().await;
        let (_, class, _) = enrolled(&fx).await;
        fx.classes.get_by_id(class.class_id).await.unwrap();

        let patched = fx
            .classes
            .patch(
                class.class_id,
                &[PatchOperation::new("replace", "/ClassName", json!("Math102"))],
            )
            .await
            .unwrap();

        assert_eq!(patched.class_name, "Math102");
        assert_eq!(cached::<Class>(&fx, &keys::class(class.class_id)).await, None);
        assert_eq!(
            fx.classes.get_by_id(class.class_id).await.unwrap().unwrap().class_name,
            "Math102"
        );
    }

    #[tokio::test]
    async fn test_patch_is_all_or_nothing() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();

        let result = fx
            .students
            .patch(
                created.student_id,
                &[
                    PatchOperation::new("replace", "StudentName", json!("Bob")),
                    PatchOperation::new("replace", "Nickname", json!("Bobby")),
                ],
            )
            .await;

        assert!(matches!(result, Err(PersistenceError::Patch(_))));
        let stored = fx.students.fetch_fresh(created.student_id).await.unwrap();
        assert_eq!(stored, Some(created));
    }

    #[tokio::test]
    async fn test_patch_type_error_after_valid_op_persists_nothing() {
        let fx = fixture().await;
        let (_, _, attendance) = enrolled(&fx).await;
        fx.attendances.get_by_id(attendance.attendance_id).await.unwrap();

        let result = fx
            .attendances
            .patch(
                attendance.attendance_id,
                &[
                    PatchOperation::new("replace", "Time", json!("2024-09-02T10:30:00Z")),
                    PatchOperation::new("replace", "ClassId", json!("not a number")),
                ],
            )
            .await;

        assert!(matches!(
            result,
            Err(PersistenceError::Patch(PatchError::InvalidType { ref field })) if field == "ClassId"
        ));
        let stored = fx.attendances.fetch_fresh(attendance.attendance_id).await.unwrap();
        assert_eq!(stored, Some(attendance.clone()));
        assert_eq!(
            cached::<Attendance>(&fx, &keys::attendance(attendance.attendance_id)).await,
            Some(attendance)
        );
    }

    #[tokio::test]
    async fn test_patch_moving_pair_invalidates_old_pair() {
        let fx = fixture().await;
        let (student, class, attendance) = enrolled(&fx).await;
        let other = fx
            .classes
            .create(NewClass {
                class_name: "Physics".into(),
            })
            .await
            .unwrap();
        fx.attendances
            .get_by_pair(student.student_id, class.class_id)
            .await
            .unwrap();

        fx.attendances
            .patch(
                attendance.attendance_id,
                &[PatchOperation::new("replace", "ClassId", json!(other.class_id))],
            )
            .await
            .unwrap();

        let old_pair = keys::attendance_pair(student.student_id, class.class_id);
        assert_eq!(cached::<Attendance>(&fx, &old_pair).await, None);
        assert_eq!(
            fx.attendances
                .get_by_pair(student.student_id, class.class_id)
                .await
                .unwrap(),
            None
        );
        assert!(
            fx.attendances
                .get_by_pair(student.student_id, other.class_id)
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_patch_remove_resets_time() {
        let fx = fixture().await;
        let (_, _, attendance) = enrolled(&fx).await;

        let patched = fx
            .attendances
            .patch(
                attendance.attendance_id,
                &[PatchOperation::new("remove", "Time", serde_json::Value::Null)],
            )
            .await
            .unwrap();

        assert_eq!(patched.time, timestamp::zero());
    }

    #[tokio::test]
    async fn test_update_by_pair() {
        let fx = fixture().await;
        let (student, class, attendance) = enrolled(&fx).await;
        fx.attendances
            .get_by_id(attendance.attendance_id)
            .await
            .unwrap();
        let later = Utc.with_ymd_and_hms(2024, 9, 2, 10, 30, 0).unwrap();

        let updated = fx
            .attendances
            .update_by_pair(student.student_id, class.class_id, AttendanceUpdate { time: later })
            .await
            .unwrap();

        assert_eq!(updated.time, later);
        assert_eq!(
            cached::<Attendance>(&fx, &keys::attendance(attendance.attendance_id)).await,
            None
        );

        let missing = fx
            .attendances
            .update_by_pair(student.student_id, 999, AttendanceUpdate { time: later })
            .await;
        assert!(matches!(missing, Err(PersistenceError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_student_cascades_and_invalidates_attendance() {
        let fx = fixture().await;
        let (student, class, attendance) = enrolled(&fx).await;
        fx.attendances
            .get_by_id(attendance.attendance_id)
            .await
            .unwrap();
        fx.attendances
            .get_by_pair(student.student_id, class.class_id)
            .await
            .unwrap();
        fx.attendances.get_all().await.unwrap();

        fx.students.delete(student.student_id).await.unwrap();

        assert_eq!(
            cached::<Attendance>(&fx, &keys::attendance(attendance.attendance_id)).await,
            None
        );
        assert_eq!(
            cached::<Attendance>(&fx, &keys::attendance_pair(student.student_id, class.class_id))
                .await,
            None
        );
        assert_eq!(cached::<Vec<Attendance>>(&fx, keys::ATTENDANCES).await, None);
        assert!(fx.attendances.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attendance_requires_existing_parents() {
        let fx = fixture().await;

        let err = fx
            .attendances
            .create(NewAttendance {
                student_id: 1,
                class_id: 1,
                time: monday_nine(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PersistenceError::Database(ref msg) if msg.contains("FOREIGN KEY")));
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();
        let key = keys::student(created.student_id);
        fx.students.get_by_id(created.student_id).await.unwrap();

        sqlx::query("UPDATE students SET student_name = 'Expired' WHERE student_id = ?")
            .bind(created.student_id)
            .execute(fx.store.pool())
            .await
            .unwrap();

        // Clock is only paused around cache-only steps; the pool keeps real time
        tokio::time::pause();
        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cached::<Student>(&fx, &key).await, Some(created.clone()));
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cached::<Student>(&fx, &key).await, None);
        tokio::time::resume();

        let fetched = fx.students.get_by_id(created.student_id).await.unwrap();
        assert_eq!(fetched.unwrap().student_name, "Expired");
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let fx = fixture().await;
        let created = fx.students.create(new_student()).await.unwrap();
        let key = keys::student(created.student_id);
        fx.cache
            .set_raw(&key, "{not json", Duration::from_secs(60))
            .await
            .unwrap();

        let fetched = fx.students.get_by_id(created.student_id).await.unwrap();

        assert_eq!(fetched, Some(created.clone()));
        assert_eq!(cached::<Student>(&fx, &key).await, Some(created));
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_store() {
        let fx = fixture_with(CacheClient::new(BrokenCache, CacheTtl::default())).await;

        let created = fx.students.create(new_student()).await.unwrap();
        let fetched = fx.students.get_by_id(created.student_id).await.unwrap();
        let updated = fx
            .students
            .update(
                created.student_id,
                NewStudent {
                    student_name: "Still works".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(fetched, Some(created));
        assert_eq!(updated.student_name, "Still works");
        assert_eq!(fx.students.get_all().await.unwrap(), vec![updated]);
    }

    #[tokio::test]
    async fn test_db_only_strategies_skip_cache() {
        let fx = fixture().await;
        let repo: CachedRepository<Student> = CachedRepository::with_strategies(
            fx.store.clone(),
            fx.cache.clone(),
            Strategies::for_cache(false),
        );

        let created = repo.create(new_student()).await.unwrap();
        repo.get_by_id(created.student_id).await.unwrap();
        repo.get_all().await.unwrap();

        assert_eq!(cached::<Student>(&fx, &keys::student(created.student_id)).await, None);
        assert_eq!(cached::<Vec<Student>>(&fx, keys::STUDENTS).await, None);
    }
}
