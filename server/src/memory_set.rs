use crate::{BoardError, RankedSet};
use comingsoon_api::Score;
use futures_util::future::BoxFuture;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::Mutex;

struct Members {
    ranked: BTreeSet<(Score, String)>,
    scores: HashMap<String, Score>,
}

impl Members {
    fn insert(&mut self, member: String, score: Score) {
        if let Some(old) = self.scores.insert(member.clone(), score) {
            self.ranked.remove(&(old, member.clone()));
        }
        self.ranked.insert((score, member));
    }

    fn trim(&mut self, keep: usize) {
        while self.ranked.len() > keep {
            if let Some((_, member)) = self.ranked.pop_last() {
                self.scores.remove(&member);
            }
        }
    }
}

pub struct MemorySet {
    members: Mutex<Members>,
}

impl MemorySet {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(Members {
                ranked: BTreeSet::new(),
                scores: HashMap::new(),
            }),
        }
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.members.lock().await.ranked.len()
    }
}

impl RankedSet for MemorySet {
    fn insert_and_trim(
        &self,
        member: String,
        score: Score,
        keep: usize,
    ) -> BoxFuture<'_, Result<(), BoardError>> {
        Box::pin(async move {
            let mut members = self.members.lock().await;
            members.insert(member, score);
            members.trim(keep);
            Ok(())
        })
    }

    fn lowest(&self, count: usize) -> BoxFuture<'_, Result<Vec<String>, BoardError>> {
        Box::pin(async move {
            let members = self.members.lock().await;
            Ok(members
                .ranked
                .iter()
                .take(count)
                .map(|(_, member)| member.clone())
                .collect())
        })
    }
}
