use anyhow::Context;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub http: HttpConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub playlists: PlaylistsConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path}"))?;
        toml::from_str(&contents).with_context(|| "Failed to parse config TOML")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    /// YouTube Data API v3 key. Absent means uncredentialed mode:
    /// video search/recommendations go through the Invidious mirrors only.
    pub youtube_api_key: Option<String>,

    /// Ordered list of Invidious mirror base URLs, tried first to last.
    #[serde(default = "default_invidious_instances")]
    pub invidious_instances: Vec<String>,

    /// Per-request timeout for every outbound call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SourcesConfig {
    pub fn credentialed(&self) -> bool {
        self.youtube_api_key.is_some()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaylistsConfig {
    pub path: PathBuf,
}

impl Default for PlaylistsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("playlists.json"),
        }
    }
}

fn default_invidious_instances() -> Vec<String> {
    vec![
        "https://invidious.io".to_string(),
        "https://inv.riverside.rocks".to_string(),
        "https://yewtu.be".to_string(),
    ]
}

fn default_timeout_secs() -> u64 {
    10
}
