use crate::LeaderboardEntry;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{payload:?} is not a valid leaderboard entry")]
pub struct DecodeError {
    payload: String,
    #[source]
    source: serde_json::Error,
}

impl DecodeError {
    pub fn payload(&self) -> &str {
        &self.payload
    }
}

pub fn serialize(entry: &LeaderboardEntry) -> Result<String, serde_json::Error> {
    serde_json::to_string(entry)
}

pub fn deserialize(payload: &str) -> Result<LeaderboardEntry, DecodeError> {
    serde_json::from_str(payload).map_err(|source| DecodeError {
        payload: payload.to_string(),
        source,
    })
}
