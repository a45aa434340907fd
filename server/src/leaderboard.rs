use crate::{BoardError, Store};
use comingsoon_api::{deserialize, serialize, LeaderboardEntry, RETAINED};
use log::{debug, warn};
use std::future::Future;
use tokio::time;

pub struct Leaderboard {
    store: Store,
}

impl Leaderboard {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn submit(&self, entry: &LeaderboardEntry) -> Result<(), BoardError> {
        let score = entry.score();
        let member = serialize(entry)?;
        self.bounded(async {
            let set = self.store.handle().await?;
            set.insert_and_trim(member, score, RETAINED).await
        })
        .await?;
        debug!("Recorded {:?} with score {}", entry.name, score);
        Ok(())
    }

    pub async fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let members = match self.lowest(n).await {
            Ok(members) => members,
            Err(e) => {
                warn!("Serving an empty leaderboard: {}", e);
                return Vec::new();
            }
        };
        members
            .iter()
            .filter_map(|member| match deserialize(member) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping leaderboard member: {}", e);
                    None
                }
            })
            .collect()
    }

    async fn lowest(&self, n: usize) -> Result<Vec<String>, BoardError> {
        self.bounded(async {
            let set = self.store.handle().await?;
            set.lowest(n).await
        })
        .await
    }

    // Covers waiting for a connection too.
    async fn bounded<F, T>(&self, f: F) -> Result<T, BoardError>
    where
        F: Future<Output = Result<T, BoardError>>,
    {
        let timeout = self.store.timeout();
        time::timeout(timeout, f)
            .await
            .map_err(|_| BoardError::Timeout(timeout))?
    }
}
