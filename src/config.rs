use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_DATA_PATH: &str = "data/state.json";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
}

impl Config {
    /// Reads `APP_DATA_PATH` and `PORT`; an unparseable port falls back to
    /// the default.
    pub fn from_env() -> Self {
        Self::from_vars(env::var("APP_DATA_PATH").ok(), env::var("PORT").ok())
    }

    fn from_vars(data_path: Option<String>, port: Option<String>) -> Self {
        Self {
            data_path: data_path
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            port: port
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
