// SQLite QueueStore Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use courier_core::domain::{Queue, Tag};
use courier_core::port::QueueStore;
use courier_core::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

const SELECT_WITH_TAGS: &str = r#"
    SELECT q.id AS id, t.tag_key AS tag_key, t.tag_value AS tag_value
    FROM queues q
    LEFT JOIN queue_tags t ON t.queue_id = q.id
"#;

const ORDER_BY: &str = "ORDER BY q.seq, t.seq";

pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, sql: &str, id: Option<&str>) -> Result<Vec<Queue>> {
        let mut query = sqlx::query_as::<_, QueueTagRow>(sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(group_rows(rows))
    }
}

async fn insert_tags(tx: &mut Transaction<'_, Sqlite>, queue_id: &str, tags: &[Tag]) -> Result<()> {
    for tag in tags {
        sqlx::query("INSERT INTO queue_tags (queue_id, tag_key, tag_value) VALUES (?, ?, ?)")
            .bind(queue_id)
            .bind(&tag.key)
            .bind(&tag.value)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
    }
    Ok(())
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn create(&self, queue: &Queue) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO queues (id) VALUES (?)")
            .bind(&queue.id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        insert_tags(&mut tx, &queue.id, &queue.tags).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        debug!(queue_id = %queue.id, "Queue stored");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Queue>> {
        self.fetch(&format!("{} {}", SELECT_WITH_TAGS, ORDER_BY), None)
            .await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Queue>> {
        let sql = format!("{} WHERE q.id = ? {}", SELECT_WITH_TAGS, ORDER_BY);
        Ok(self.fetch(&sql, Some(id)).await?.into_iter().next())
    }

    async fn get_by_tags(&self, tags: &[Tag]) -> Result<Vec<Queue>> {
        if tags.is_empty() {
            return self.list().await;
        }

        // One subquery per requested pair; INTERSECT keeps queues carrying all of them
        let matching = vec![
            "SELECT queue_id FROM queue_tags WHERE tag_key = ? AND tag_value = ?";
            tags.len()
        ]
        .join(" INTERSECT ");
        let sql = format!(
            "{} WHERE q.id IN ({}) {}",
            SELECT_WITH_TAGS, matching, ORDER_BY
        );

        let mut query = sqlx::query_as::<_, QueueTagRow>(&sql);
        for tag in tags {
            query = query.bind(&tag.key).bind(&tag.value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_sqlx_error)?;
        Ok(group_rows(rows))
    }

    async fn replace_tags(&self, id: &str, tags: &[Tag]) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        if exists == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM queue_tags WHERE queue_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        insert_tags(&mut tx, id, tags).await?;

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        // queue_tags rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM queues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn total_count(&self) -> Result<Option<i64>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queues")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Some(count))
    }

    async fn tag_count(&self) -> Result<Option<i64>> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM queue_tags")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Some(count))
    }
}

/// One row per (queue, tag); tag columns are NULL for untagged queues
#[derive(Debug, sqlx::FromRow)]
struct QueueTagRow {
    id: String,
    tag_key: Option<String>,
    tag_value: Option<String>,
}

/// Fold ordered join rows into queues, keeping row order
fn group_rows(rows: Vec<QueueTagRow>) -> Vec<Queue> {
    let mut queues: Vec<Queue> = Vec::new();
    for row in rows {
        let start_new = queues.last().map_or(true, |q| q.id != row.id);
        if start_new {
            queues.push(Queue::new(row.id, Vec::new()));
        }
        if let (Some(key), Some(value), Some(queue)) = (row.tag_key, row.tag_value, queues.last_mut()) {
            queue.tags.push(Tag::new(key, value));
        }
    }
    queues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_store() -> SqliteQueueStore {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteQueueStore::new(pool)
    }

    fn queue(id: &str, tags: &[(&str, &str)]) -> Queue {
        Queue::new(id, tags.iter().map(|(k, v)| Tag::new(*k, *v)).collect())
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = setup_store().await;
        let q = queue("msg:queue:a", &[("env", "prod"), ("env", "eu"), ("team", "core")]);
        store.create(&q).await.unwrap();

        let found = store.get_by_id("msg:queue:a").await.unwrap().unwrap();
        assert_eq!(found, q);
        assert!(store.get_by_id("msg:queue:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order_and_untagged_queues() {
        let store = setup_store().await;
        store.create(&queue("msg:queue:b", &[("x", "1")])).await.unwrap();
        store.create(&queue("msg:queue:a", &[])).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "msg:queue:b");
        assert_eq!(listed[1], queue("msg:queue:a", &[]));
    }

    #[tokio::test]
    async fn test_get_by_tags_requires_every_pair() {
        let store = setup_store().await;
        store
            .create(&queue("msg:queue:a", &[("env", "prod"), ("team", "core")]))
            .await
            .unwrap();
        store.create(&queue("msg:queue:b", &[("env", "prod")])).await.unwrap();
        store.create(&queue("msg:queue:c", &[("team", "core")])).await.unwrap();

        let prod = store.get_by_tags(&[Tag::new("env", "prod")]).await.unwrap();
        assert_eq!(prod.len(), 2);

        let both = store
            .get_by_tags(&[Tag::new("team", "core"), Tag::new("env", "prod")])
            .await
            .unwrap();
        assert_eq!(both.len(), 1);
        // the full tag set comes back, not only the matched pairs
        assert_eq!(both[0].tags.len(), 2);

        let none = store.get_by_tags(&[Tag::new("env", "dev")]).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_replace_tags_and_cascade_delete() {
        let store = setup_store().await;
        store
            .create(&queue("msg:queue:a", &[("x", "1"), ("y", "2")]))
            .await
            .unwrap();

        assert!(store
            .replace_tags("msg:queue:a", &[Tag::new("z", "3")])
            .await
            .unwrap());
        assert!(!store.replace_tags("msg:queue:missing", &[]).await.unwrap());
        assert_eq!(
            store.get_by_id("msg:queue:a").await.unwrap().unwrap().tags,
            vec![Tag::new("z", "3")]
        );

        assert!(store.delete("msg:queue:a").await.unwrap());
        assert!(!store.delete("msg:queue:a").await.unwrap());
        assert_eq!(store.total_count().await.unwrap(), Some(0));
        assert_eq!(store.tag_count().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_storage_error() {
        let store = setup_store().await;
        let q = queue("msg:queue:a", &[]);
        store.create(&q).await.unwrap();

        let err = store.create(&q).await.unwrap_err();
        assert_eq!(err.kind(), courier_core::ErrorKind::StorageFailure);
    }
}
