mod codec;
mod entry;
mod leaderboard_api;
mod score;

pub use codec::*;
pub use entry::*;
pub use leaderboard_api::*;
pub use score::*;
