use crate::{BoardError, Leaderboard};
use comingsoon_api::{LeaderboardResponse, SubmitRequest, SubmitResponse, PAGE_SIZE};
use log::error;
use std::convert::Infallible;
use warp::{reply::Json, Filter, Rejection};

const MAX_BODY_BYTES: u64 = 4 * 1024;

pub fn router(leaderboard: infallible!(&'static Leaderboard)) -> reply!() {
    let routes = top(leaderboard.clone()).or(submit(leaderboard));
    warp::path("api").and(routes.clone()).or(routes).boxed()
}

fn top(leaderboard: infallible!(&'static Leaderboard)) -> reply!() {
    async fn handle(leaderboard: &Leaderboard) -> Result<Json, Infallible> {
        let entries: LeaderboardResponse = leaderboard.top(PAGE_SIZE).await;
        Ok(warp::reply::json(&entries))
    }

    warp::path!("leaderboard")
        .and(warp::get())
        .and(leaderboard)
        .and_then(handle)
}

fn submit(leaderboard: infallible!(&'static Leaderboard)) -> reply!() {
    async fn handle(
        leaderboard: &Leaderboard,
        request: SubmitRequest,
    ) -> Result<Json, Rejection> {
        let entry = request.normalized().ok_or(BoardError::InvalidName)?;
        if let Err(e) = leaderboard.submit(&entry).await {
            error!("Failed to save score for {:?}: {}", entry.name, e);
            return Err(e.into());
        }
        Ok(warp::reply::json(&SubmitResponse { success: true }))
    }

    warp::path!("leaderboard")
        .and(warp::post())
        .and(leaderboard)
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and_then(handle)
}
