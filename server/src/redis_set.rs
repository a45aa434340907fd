use crate::{BoardError, RankedSet};
use comingsoon_api::{Score, LEADERBOARD_KEY};
use futures_util::future::BoxFuture;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

pub struct RedisSet {
    conn: ConnectionManager,
}

impl RedisSet {
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(Self { conn })
    }
}

impl RankedSet for RedisSet {
    fn insert_and_trim(
        &self,
        member: String,
        score: Score,
        keep: usize,
    ) -> BoxFuture<'_, Result<(), BoardError>> {
        Box::pin(insert_and_trim(self.conn.clone(), member, score, keep))
    }

    fn lowest(&self, count: usize) -> BoxFuture<'_, Result<Vec<String>, BoardError>> {
        Box::pin(lowest(self.conn.clone(), count))
    }
}

// ZADD and ZREMRANGEBYRANK are applied as a single MULTI/EXEC unit.
async fn insert_and_trim(
    mut conn: ConnectionManager,
    member: String,
    score: Score,
    keep: usize,
) -> Result<(), BoardError> {
    let _: () = redis::pipe()
        .atomic()
        .zadd(LEADERBOARD_KEY, member, score.value())
        .ignore()
        .zremrangebyrank(LEADERBOARD_KEY, keep as isize, -1)
        .ignore()
        .query_async(&mut conn)
        .await?;
    Ok(())
}

async fn lowest(mut conn: ConnectionManager, count: usize) -> Result<Vec<String>, BoardError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let members: Vec<String> = conn
        .zrange(LEADERBOARD_KEY, 0, count as isize - 1)
        .await?;
    Ok(members)
}
