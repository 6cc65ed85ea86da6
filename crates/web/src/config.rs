use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

#[derive(Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub site: Site,
}

#[derive(Clone, Deserialize)]
pub struct Web {
    #[serde(default = "port_default")]
    pub port: u16,
    #[serde(default = "host_default")]
    pub host: String,
    /// How long a page waits for its data before answering anyway.
    #[serde(default = "view_timeout_default")]
    pub view_timeout_ms: u64,
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Clone, Deserialize, Default)]
pub struct Storage {
    /// SQLite database file. Without a path everything lives in memory.
    pub path: Option<PathBuf>,
    /// JSON rows imported when the database starts out empty.
    pub seed: Option<PathBuf>,
}

#[derive(Clone, Deserialize)]
pub struct Site {
    #[serde(default = "title_default")]
    pub title: String,
}

impl Web {
    pub fn view_timeout(&self) -> Duration {
        Duration::from_millis(self.view_timeout_ms)
    }
}

impl Default for Web {
    fn default() -> Self {
        Web {
            port: port_default(),
            host: host_default(),
            view_timeout_ms: view_timeout_default(),
            secure_cookies: false,
        }
    }
}

impl Storage {
    pub fn database_url(&self) -> String {
        match &self.path {
            Some(path) => path.to_string_lossy().into_owned(),
            None => String::from(db::database::IN_MEMORY),
        }
    }
}

impl Default for Site {
    fn default() -> Self {
        Site {
            title: title_default(),
        }
    }
}

fn host_default() -> String {
    String::from("0.0.0.0")
}

fn port_default() -> u16 {
    8081
}

fn view_timeout_default() -> u64 {
    2000
}

fn title_default() -> String {
    String::from("postroom")
}
