//! Archive repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{ArchiveChangeSet, ArchiveRecord, CommitSummary};
use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, Executor, Sqlite, SqlitePool};
use tracing::debug;

/// Every archive read goes through this projection so `convention_name` is
/// always populated.
const SELECT_ARCHIVE: &str = r#"
    SELECT a.id, a.convention_id, COALESCE(c.name, '') AS convention_name, a.kind,
           a.source_url, a.parent_archive_id, a.name, a.description, a.thumbnail_url,
           a.folder, a.created_at, a.synchronized_at
    FROM convention_archives a
    LEFT JOIN conventions c ON c.id = a.convention_id
"#;

const DUE_PREDICATE: &str = r#"
    a.created_at >= ?
    AND (a.synchronized_at IS NULL OR a.synchronized_at <= ?)
    AND a.parent_archive_id IS NULL
"#;

/// Archive repository interface for data access operations
#[async_trait]
pub trait ArchiveRepository: Send + Sync {
    /// Find an archive record by its ID
    async fn find_by_id(&self, id: &str) -> Result<Option<ArchiveRecord>>;

    /// Top-level records eligible for refresh
    ///
    /// A record is due when it was created at or after `created_after`, was
    /// never synchronized or last synchronized at or before `synced_before`,
    /// and has no parent. Results are ordered by `synchronized_at` ascending
    /// with never-synchronized records first, then by creation time.
    ///
    /// `limit` of `None` returns every due record.
    async fn find_due_for_sync(
        &self,
        created_after: i64,
        synced_before: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ArchiveRecord>>;

    /// Children created by expanding the given playlist record
    async fn find_children(&self, parent_id: &str) -> Result<Vec<ArchiveRecord>>;

    /// Delete all children of the given record
    ///
    /// # Returns
    /// Number of child records removed
    async fn delete_children(&self, parent_id: &str) -> Result<u64>;

    /// Insert a new archive record
    ///
    /// # Errors
    /// Returns error if validation fails or the ID already exists
    async fn insert(&self, record: &ArchiveRecord) -> Result<()>;

    /// Update the mutable fields of an existing record
    ///
    /// # Errors
    /// Returns `NotFound` if no record has this ID
    async fn update(&self, record: &ArchiveRecord) -> Result<()>;

    /// Flush a change set atomically
    ///
    /// Child replacement, updates and inserts are applied in that order inside
    /// a single transaction. An empty change set is a successful no-op.
    async fn commit(&self, changes: &ArchiveChangeSet) -> Result<CommitSummary>;

    /// Count top-level records
    async fn count_top_level(&self) -> Result<i64>;

    /// Count records produced by playlist expansion
    async fn count_children(&self) -> Result<i64>;

    /// Count top-level records currently due for refresh
    async fn count_due(&self, created_after: i64, synced_before: i64) -> Result<i64>;
}

/// SQLite implementation of ArchiveRepository
pub struct SqliteArchiveRepository {
    pool: SqlitePool,
}

impl SqliteArchiveRepository {
    /// Create a new SqliteArchiveRepository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn invalid(record: &ArchiveRecord, message: String) -> LibraryError {
    LibraryError::InvalidInput {
        field: format!("ArchiveRecord {}", record.id),
        message,
    }
}

async fn insert_record<'e, E>(executor: E, record: &ArchiveRecord) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    record.validate().map_err(|e| invalid(record, e))?;

    query(
        r#"
        INSERT INTO convention_archives (
            id, convention_id, kind, source_url, parent_archive_id, name,
            description, thumbnail_url, folder, created_at, synchronized_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&record.id)
    .bind(&record.convention_id)
    .bind(record.kind.as_str())
    .bind(&record.source_url)
    .bind(&record.parent_archive_id)
    .bind(&record.name)
    .bind(&record.description)
    .bind(&record.thumbnail_url)
    .bind(&record.folder)
    .bind(record.created_at)
    .bind(record.synchronized_at)
    .execute(executor)
    .await?;

    Ok(())
}

async fn update_record<'e, E>(executor: E, record: &ArchiveRecord) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    record.validate().map_err(|e| invalid(record, e))?;

    let result = query(
        r#"
        UPDATE convention_archives
        SET source_url = ?, name = ?, description = ?, thumbnail_url = ?, synchronized_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&record.source_url)
    .bind(&record.name)
    .bind(&record.description)
    .bind(&record.thumbnail_url)
    .bind(record.synchronized_at)
    .bind(&record.id)
    .execute(executor)
    .await?;

    if result.rows_affected() == 0 {
        return Err(LibraryError::NotFound {
            entity_type: "ArchiveRecord".to_string(),
            id: record.id.clone(),
        });
    }

    Ok(())
}

async fn delete_children_of<'e, E>(executor: E, parent_id: &str) -> Result<u64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = query("DELETE FROM convention_archives WHERE parent_archive_id = ?")
        .bind(parent_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

#[async_trait]
impl ArchiveRepository for SqliteArchiveRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<ArchiveRecord>> {
        let sql = format!("{} WHERE a.id = ?", SELECT_ARCHIVE);
        let record = query_as::<_, ArchiveRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find_due_for_sync(
        &self,
        created_after: i64,
        synced_before: i64,
        limit: Option<u32>,
    ) -> Result<Vec<ArchiveRecord>> {
        let sql = format!(
            "{} WHERE {} ORDER BY a.synchronized_at ASC NULLS FIRST, a.created_at ASC, a.id ASC LIMIT ?",
            SELECT_ARCHIVE, DUE_PREDICATE
        );

        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map(i64::from).unwrap_or(-1);

        let records = query_as::<_, ArchiveRecord>(&sql)
            .bind(created_after)
            .bind(synced_before)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            created_after,
            synced_before,
            limit,
            found = records.len(),
            "Selected archive records due for sync"
        );

        Ok(records)
    }

    async fn find_children(&self, parent_id: &str) -> Result<Vec<ArchiveRecord>> {
        let sql = format!(
            "{} WHERE a.parent_archive_id = ? ORDER BY a.created_at ASC, a.rowid ASC",
            SELECT_ARCHIVE
        );
        let records = query_as::<_, ArchiveRecord>(&sql)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn delete_children(&self, parent_id: &str) -> Result<u64> {
        delete_children_of(&self.pool, parent_id).await
    }

    async fn insert(&self, record: &ArchiveRecord) -> Result<()> {
        insert_record(&self.pool, record).await
    }

    async fn update(&self, record: &ArchiveRecord) -> Result<()> {
        update_record(&self.pool, record).await
    }

    async fn commit(&self, changes: &ArchiveChangeSet) -> Result<CommitSummary> {
        let mut summary = CommitSummary::default();
        let mut tx = self.pool.begin().await?;

        if let Some(parent_id) = &changes.replace_children_of {
            summary.children_removed = delete_children_of(&mut *tx, parent_id).await?;
        }

        for record in &changes.updates {
            update_record(&mut *tx, record).await?;
            summary.updated += 1;
        }

        for record in &changes.inserts {
            insert_record(&mut *tx, record).await?;
            summary.inserted += 1;
        }

        tx.commit().await?;

        debug!(
            children_removed = summary.children_removed,
            updated = summary.updated,
            inserted = summary.inserted,
            "Committed archive change set"
        );

        Ok(summary)
    }

    async fn count_top_level(&self) -> Result<i64> {
        let count = query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM convention_archives WHERE parent_archive_id IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_children(&self) -> Result<i64> {
        let count = query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM convention_archives WHERE parent_archive_id IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_due(&self, created_after: i64, synced_before: i64) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM convention_archives a WHERE {}",
            DUE_PREDICATE
        );
        let count = query_scalar::<_, i64>(&sql)
            .bind(created_after)
            .bind(synced_before)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::{ArchiveKind, Convention};
    use crate::repositories::{ConventionRepository, SqliteConventionRepository};

    async fn setup() -> (SqliteArchiveRepository, Convention) {
        let pool = create_test_pool().await.unwrap();
        let convention = Convention::new("MyCon");
        SqliteConventionRepository::new(pool.clone())
            .insert(&convention)
            .await
            .unwrap();
        (SqliteArchiveRepository::new(pool), convention)
    }

    fn child(parent: &ArchiveRecord, video_id: &str, name: &str, created_at: i64) -> ArchiveRecord {
        ArchiveRecord::child_of(
            parent,
            format!("https://www.youtube.com/watch?v={}", video_id),
            name,
            "",
            "https://i.ytimg.com/thumb.jpg",
            created_at,
        )
    }

    fn record(convention: &Convention, kind: ArchiveKind, created_at: i64) -> ArchiveRecord {
        let mut record = ArchiveRecord::new(
            convention,
            kind,
            "https://www.youtube.com/watch?v=abcdefghijk",
        );
        record.created_at = created_at;
        record
    }

    #[tokio::test]
    async fn test_insert_and_find_joins_convention_name() {
        let (repo, convention) = setup().await;
        let record = record(&convention, ArchiveKind::Playlist, 1_000).with_folder("hall-a");
        repo.insert(&record).await.unwrap();

        let found = repo.find_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(found.convention_name, "MyCon");
        assert_eq!(found.kind, ArchiveKind::Playlist);
        assert_eq!(found.folder.as_deref(), Some("hall-a"));
        assert!(found.synchronized_at.is_none());
    }

    #[tokio::test]
    async fn test_unknown_kind_decodes_as_video() {
        let (repo, convention) = setup().await;
        let record = record(&convention, ArchiveKind::Playlist, 1_000);
        repo.insert(&record).await.unwrap();

        query("UPDATE convention_archives SET kind = 'legacy_stream' WHERE id = ?")
            .bind(&record.id)
            .execute(&repo.pool)
            .await
            .unwrap();

        let found = repo.find_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(found.kind, ArchiveKind::Video);
    }

    #[tokio::test]
    async fn test_update_missing_record_is_not_found() {
        let (repo, convention) = setup().await;
        let record = record(&convention, ArchiveKind::Video, 1_000);

        let err = repo.update(&record).await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_record() {
        let (repo, convention) = setup().await;
        let mut record = record(&convention, ArchiveKind::Video, 1_000);
        record.source_url = String::new();

        let err = repo.insert(&record).await.unwrap_err();
        assert!(matches!(err, LibraryError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_commit_replaces_children_atomically() {
        let (repo, convention) = setup().await;
        let mut parent = record(&convention, ArchiveKind::Playlist, 1_000);
        repo.insert(&parent).await.unwrap();

        let old = child(&parent, "old00000000", "Old", 1_000);
        repo.insert(&old).await.unwrap();

        let mut changes = ArchiveChangeSet::new();
        changes.replace_children_of(parent.id.clone());
        changes.insert(child(&parent, "new00000001", "New 1", 2_000));
        changes.insert(child(&parent, "new00000002", "New 2", 2_000));
        parent.synchronized_at = Some(2_000);
        changes.update(parent.clone());

        let summary = repo.commit(&changes).await.unwrap();
        assert_eq!(summary.children_removed, 1);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.updated, 1);

        let children = repo.find_children(&parent.id).await.unwrap();
        let names: Vec<_> = children.iter().filter_map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["New 1".to_string(), "New 2".to_string()]);

        let stored = repo.find_by_id(&parent.id).await.unwrap().unwrap();
        assert_eq!(stored.synchronized_at, Some(2_000));
    }

    #[tokio::test]
    async fn test_failed_commit_rolls_back() {
        let (repo, convention) = setup().await;
        let parent = record(&convention, ArchiveKind::Playlist, 1_000);
        repo.insert(&parent).await.unwrap();
        let old = child(&parent, "old00000000", "Old", 1_000);
        repo.insert(&old).await.unwrap();

        let mut changes = ArchiveChangeSet::new();
        changes.replace_children_of(parent.id.clone());
        // Updating a record that does not exist aborts the transaction.
        changes.update(record(&convention, ArchiveKind::Video, 1_000));

        assert!(repo.commit(&changes).await.is_err());
        assert_eq!(repo.find_children(&parent.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_commit_is_noop() {
        let (repo, _) = setup().await;
        let summary = repo.commit(&ArchiveChangeSet::new()).await.unwrap();
        assert_eq!(summary, CommitSummary::default());
    }

    #[tokio::test]
    async fn test_delete_children_and_counts() {
        let (repo, convention) = setup().await;
        let parent = record(&convention, ArchiveKind::Playlist, 1_000);
        repo.insert(&parent).await.unwrap();
        for i in 0..3 {
            let child = child(&parent, &format!("child{:06}", i), "c", 1_000);
            repo.insert(&child).await.unwrap();
        }

        assert_eq!(repo.count_top_level().await.unwrap(), 1);
        assert_eq!(repo.count_children().await.unwrap(), 3);

        assert_eq!(repo.delete_children(&parent.id).await.unwrap(), 3);
        assert_eq!(repo.count_children().await.unwrap(), 0);
        assert_eq!(repo.delete_children(&parent.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_due_for_sync_filters_and_orders() {
        let (repo, convention) = setup().await;
        let now = 10_000_000;
        let created_after = now - 30 * 86_400;
        let synced_before = now - 3_600;

        let mut stale = record(&convention, ArchiveKind::Video, now - 1_000);
        stale.synchronized_at = Some(now - 7_200);
        let mut staler = record(&convention, ArchiveKind::Video, now - 1_000);
        staler.synchronized_at = Some(now - 9_000);
        let never = record(&convention, ArchiveKind::Playlist, now - 500);
        let mut fresh = record(&convention, ArchiveKind::Video, now - 1_000);
        fresh.synchronized_at = Some(now - 60);
        let too_old = record(&convention, ArchiveKind::Video, created_after - 1);

        for r in [&stale, &staler, &never, &fresh, &too_old] {
            repo.insert(r).await.unwrap();
        }
        let child = child(&never, "child000000", "c", now);
        repo.insert(&child).await.unwrap();

        let due = repo
            .find_due_for_sync(created_after, synced_before, None)
            .await
            .unwrap();
        let ids: Vec<_> = due.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![never.id.as_str(), staler.id.as_str(), stale.id.as_str()]);
        assert_eq!(repo.count_due(created_after, synced_before).await.unwrap(), 3);

        let limited = repo
            .find_due_for_sync(created_after, synced_before, Some(2))
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, never.id);
    }

    #[tokio::test]
    async fn test_created_at_boundary_is_inclusive() {
        let (repo, convention) = setup().await;
        let on_boundary = record(&convention, ArchiveKind::Video, 5_000);
        repo.insert(&on_boundary).await.unwrap();

        let due = repo.find_due_for_sync(5_000, 0, None).await.unwrap();
        assert_eq!(due.len(), 1);

        let mut synced = on_boundary.clone();
        synced.synchronized_at = Some(4_000);
        repo.update(&synced).await.unwrap();
        assert_eq!(repo.find_due_for_sync(5_000, 4_000, None).await.unwrap().len(), 1);
        assert!(repo.find_due_for_sync(5_000, 3_999, None).await.unwrap().is_empty());
    }
}
