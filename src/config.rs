use anyhow::{Context, bail};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub version: u32,
    pub api: ApiConfig,
    pub session: SessionConfig,
}

impl Config {
    pub fn load(path: &str) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read user config at {path}"))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        config.session.check()?;
        Ok(config)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    pub in_memory: bool,
    pub path: Option<PathBuf>,
}

impl SessionConfig {
    fn check(&self) -> anyhow::Result<()> {
        if !self.in_memory && self.path.is_none() {
            bail!("session.path is required unless session.in_memory = true");
        }
        Ok(())
    }
}
