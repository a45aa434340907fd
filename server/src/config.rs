use log::info;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{
    env,
    fs::File,
    io::{BufReader, Read},
    net::{IpAddr, Ipv4Addr},
    path::Path,
    time::Duration,
};

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::load(
        env::args_os()
            .nth(1)
            .unwrap_or_else(|| "config.json".into()),
    )
});

const STORE_URL_VARS: [&str; 3] = ["VERCEL_KV_REDIS_URL", "REDIS_URL", "LEADERBOARD_URL"];

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub assets_dir: String,
    pub store_url: Option<String>,
    pub store_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            assets_dir: "./assets".to_string(),
            store_url: None,
            store_timeout_ms: 2000,
        }
    }
}

impl Config {
    fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let mut config = match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file))
                .unwrap_or_else(|e| panic!("{} is not a valid config: {}", path.display(), e)),
            Err(_) => {
                info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        };
        config.apply_env(|key| env::var(key).ok());
        config
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        let mut config: Config = serde_json::from_reader(reader)?;
        config.store_url = config.store_url.filter(|url| !url.trim().is_empty());
        Ok(config)
    }

    fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = STORE_URL_VARS
            .iter()
            .filter_map(|key| var(key))
            .find(|url| !url.trim().is_empty());
        if let Some(url) = url {
            self.store_url = Some(url);
        }
        if let Some(port) = var("PORT").and_then(|port| port.parse().ok()) {
            self.port = port;
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}
