use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fmt::{Display, Formatter},
};

const BAND: u64 = 1000;

/// Ranking key for a finished game, lower is better.
///
/// Every move costs a full band of 1000, so time only breaks ties between games with
/// the same number of moves. Times that would spill into the next band are clamped to
/// the last second of their own band.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Score(u64);

impl Score {
    pub const MAX_TIME: u32 = (BAND - 1) as u32;

    pub fn encode(moves: u32, time: u32) -> Self {
        Score(moves as u64 * BAND + time.min(Self::MAX_TIME) as u64)
    }

    pub fn moves(self) -> u64 {
        self.0 / BAND
    }

    pub fn time(self) -> u32 {
        (self.0 % BAND) as u32
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Score {
    fn from(value: u64) -> Self {
        Score(value)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

pub fn encode(moves: u32, time: u32) -> Score {
    Score::encode(moves, time)
}
