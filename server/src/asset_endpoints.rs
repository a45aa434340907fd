use std::path::Path;
use warp::Filter;

pub fn router(dir: &Path) -> reply!() {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(dir.join("index.html")));
    let assets = warp::path("assets").and(warp::fs::dir(dir.to_owned()));
    index.or(assets)
}
