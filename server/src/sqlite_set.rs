use crate::{BoardError, RankedSet};
use comingsoon_api::Score;
use futures_util::future::BoxFuture;
use r2d2::{CustomizeConnection, Pool};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::{
    path::Path,
    time::{Duration, Instant},
};
use tokio::task;

static SQL: &[&str] = &[include_str!("../sql/schema.sql")];

const INSERT_MEMBER: &str = r#"
INSERT INTO leaderboard (member, score)
VALUES      (?, ?)
ON CONFLICT (member) DO UPDATE SET score = excluded.score"#;

const TRIM_MEMBERS: &str = r#"
DELETE FROM leaderboard
WHERE       member NOT IN
            (
                     SELECT   member
                     FROM     leaderboard
                     ORDER BY score,
                              member
                     LIMIT    ?)"#;

const SELECT_LOWEST_MEMBERS: &str = r#"
SELECT   member
FROM     leaderboard
ORDER BY score,
         member
LIMIT    ?"#;

pub struct SqliteSet {
    pool: Pool<SqliteConnectionManager>,
    timeout: Duration,
}

impl SqliteSet {
    /// Opens the database at `path`. `timeout` bounds both waiting for a
    /// pooled connection and waiting on another writer's lock.
    pub fn open<P: AsRef<Path>>(path: P, timeout: Duration) -> Result<Self, BoardError> {
        // r2d2 rejects a zero connection timeout
        let timeout = timeout.max(Duration::from_millis(1));
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder()
            .max_size(4)
            .connection_timeout(timeout)
            .connection_customizer(Box::new(Customizer {
                busy_timeout: timeout,
            }))
            .build(manager)?;
        let conn = pool.get()?;
        let version = conn.query_row("PRAGMA user_version", [], |row| {
            Ok(row.get::<_, i64>(0)? as usize)
        })?;
        if version < SQL.len() {
            for upgrade in SQL[version..].iter() {
                conn.execute_batch(upgrade)?;
            }
            conn.execute_batch(&format!("PRAGMA user_version = {}", SQL.len()))?;
        }
        Ok(Self { pool, timeout })
    }

    fn run_read_only<F, T>(&self, f: F) -> Result<T, BoardError>
    where
        F: FnMut(Transaction) -> Result<T, BoardError>,
    {
        self.run_sql(TransactionBehavior::Deferred, f)
    }

    fn run_with_retry<F, T>(&self, f: F) -> Result<T, BoardError>
    where
        F: FnMut(Transaction) -> Result<T, BoardError>,
    {
        self.run_sql(TransactionBehavior::Immediate, f)
    }

    fn run_sql<F, T>(&self, behavior: TransactionBehavior, f: F) -> Result<T, BoardError>
    where
        F: FnMut(Transaction) -> Result<T, BoardError>,
    {
        task::block_in_place(|| self.run_blocking(behavior, f))
    }

    fn run_blocking<F, T>(&self, behavior: TransactionBehavior, mut f: F) -> Result<T, BoardError>
    where
        F: FnMut(Transaction) -> Result<T, BoardError>,
    {
        let start = Instant::now();
        let mut conn = self.pool.get()?;
        let mut attempt = 0;
        loop {
            let result = conn
                .transaction_with_behavior(behavior)
                .map_err(BoardError::from)
                .and_then(&mut f);
            match result {
                Err(e) if attempt < 5 && e.is_retriable() && start.elapsed() < self.timeout => {
                    attempt += 1
                }
                v => return v,
            }
        }
    }
}

impl RankedSet for SqliteSet {
    fn insert_and_trim(
        &self,
        member: String,
        score: Score,
        keep: usize,
    ) -> BoxFuture<'_, Result<(), BoardError>> {
        Box::pin(async move {
            self.run_with_retry(|tx| {
                tx.execute(INSERT_MEMBER, params![member, score.value() as i64])?;
                tx.execute(TRIM_MEMBERS, [keep as i64])?;
                tx.commit()?;
                Ok(())
            })
        })
    }

    fn lowest(&self, count: usize) -> BoxFuture<'_, Result<Vec<String>, BoardError>> {
        Box::pin(async move {
            self.run_read_only(|tx| {
                let mut stmt = tx.prepare_cached(SELECT_LOWEST_MEMBERS)?;
                let members = stmt
                    .query_map([count as i64], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(members)
            })
        })
    }
}

#[derive(Debug)]
struct Customizer {
    busy_timeout: Duration,
}

impl CustomizeConnection<Connection, rusqlite::Error> for Customizer {
    fn on_acquire(&self, conn: &mut Connection) -> Result<(), rusqlite::Error> {
        conn.busy_timeout(self.busy_timeout)?;
        Ok(())
    }

    fn on_release(&self, _: Connection) {}
}

#[cfg(test)]
mod test {
    use super::*;
    use tempfile::TempDir;

    fn open() -> (TempDir, SqliteSet) {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.db");
        let set = SqliteSet::open(path, Duration::from_secs(5)).unwrap();
        (temp_dir, set)
    }

    async fn insert(set: &SqliteSet, member: &str, score: u64, keep: usize) {
        set.insert_and_trim(member.to_string(), Score::from(score), keep)
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_empty() {
        let (_temp_dir, set) = open();
        assert!(set.lowest(10).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_orders_by_score_then_member() {
        let (_temp_dir, set) = open();
        insert(&set, "c", 2, 50).await;
        insert(&set, "b", 1, 50).await;
        insert(&set, "a", 2, 50).await;
        assert_eq!(set.lowest(10).await.unwrap(), vec!["b", "a", "c"]);
        assert_eq!(set.lowest(2).await.unwrap(), vec!["b", "a"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reinsert_moves_member() {
        let (_temp_dir, set) = open();
        insert(&set, "a", 5, 50).await;
        insert(&set, "b", 3, 50).await;
        insert(&set, "a", 1, 50).await;
        assert_eq!(set.lowest(10).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_trim_keeps_lowest() {
        let (_temp_dir, set) = open();
        for score in (0..10).rev() {
            insert(&set, &score.to_string(), score, 3).await;
        }
        assert_eq!(set.lowest(10).await.unwrap(), vec!["0", "1", "2"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reopen_keeps_members() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.db");
        let set = SqliteSet::open(&path, Duration::from_secs(5)).unwrap();
        insert(&set, "a", 1, 50).await;
        drop(set);
        let set = SqliteSet::open(&path, Duration::from_secs(5)).unwrap();
        assert_eq!(set.lowest(10).await.unwrap(), vec!["a"]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_locked_database_gives_up_after_timeout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("test.db");
        let set = SqliteSet::open(&path, Duration::from_millis(100)).unwrap();
        let writer = Connection::open(&path).unwrap();
        writer.execute_batch("BEGIN IMMEDIATE").unwrap();

        let start = Instant::now();
        let err = set
            .insert_and_trim("a".to_string(), Score::from(1), 50)
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
        assert!(start.elapsed() < Duration::from_secs(1));

        writer.execute_batch("ROLLBACK").unwrap();
        insert(&set, "a", 1, 50).await;
        assert_eq!(set.lowest(10).await.unwrap(), vec!["a"]);
    }
}
