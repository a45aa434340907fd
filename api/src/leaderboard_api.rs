use crate::LeaderboardEntry;
use serde::{Deserialize, Serialize};

pub const LEADERBOARD_KEY: &str = "leaderboard";
pub const RETAINED: usize = 50;
pub const PAGE_SIZE: usize = 10;
pub const MAX_NAME_LEN: usize = 20;

pub type SubmitRequest = LeaderboardEntry;

pub type LeaderboardResponse = Vec<LeaderboardEntry>;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
