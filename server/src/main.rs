use crate::config::CONFIG;
use log::{info, warn};
use std::path::Path;
use warp::{http::header, http::Method, Filter};

#[macro_use]
mod macros;

mod asset_endpoints;
mod config;
mod error;
mod leaderboard;
mod leaderboard_endpoints;
mod memory_set;
mod redis_set;
mod sqlite_set;
mod store;

pub use error::*;
pub use leaderboard::*;
pub use memory_set::*;
pub use redis_set::*;
pub use sqlite_set::*;
pub use store::*;

fn app(leaderboard: &'static Leaderboard, assets_dir: &Path) -> recovered!() {
    let leaderboard = warp::any().map(move || leaderboard);
    leaderboard_endpoints::router(leaderboard)
        .or(asset_endpoints::router(assets_dir))
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec![Method::GET, Method::POST])
                .allow_header(header::CONTENT_TYPE)
                .build(),
        )
        .recover(error::handle_rejection)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if CONFIG.store_url.is_none() {
        warn!("No leaderboard connection string set, scores will not be saved");
    }
    let store = Store::new(CONFIG.store_url.clone(), CONFIG.store_timeout());
    let leaderboard = Leaderboard::new(store);
    let leaderboard = &*Box::leak(Box::new(leaderboard));

    let app = app(leaderboard, Path::new(&CONFIG.assets_dir)).with(warp::log("request"));
    info!("Listening on {}:{}", CONFIG.host, CONFIG.port);
    warp::serve(app).run((CONFIG.host, CONFIG.port)).await;
}
