use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/ivr/dialplan.conf";

const PRODUCTION_OUTPUT_DIR: &str = "/usr/scotip/userdialplans/";
const DEVELOPMENT_OUTPUT_DIR: &str = "./generated/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    Production,
    Development,
}

impl DeploymentMode {
    pub fn output_dir(&self) -> &'static Path {
        match self {
            DeploymentMode::Production => Path::new(PRODUCTION_OUTPUT_DIR),
            DeploymentMode::Development => Path::new(DEVELOPMENT_OUTPUT_DIR),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub db: String,
    #[serde(default)]
    pub production: bool,
    // overrides the directory picked by the deployment mode
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_reload_command")]
    pub reload_command: Vec<String>,
    /// Seconds.
    #[serde(default = "default_reload_timeout")]
    pub reload_timeout: u64,
    #[serde(default = "default_fetch_concurrency")]
    pub fetch_concurrency: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_reload_command() -> Vec<String> {
    vec![
        "asterisk".to_string(),
        "-rx".to_string(),
        "dialplan reload".to_string(),
    ]
}

fn default_reload_timeout() -> u64 {
    10
}

fn default_fetch_concurrency() -> usize {
    16
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Reads the TOML file at `path`; `PROD_SERVER=1` forces production mode.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        Ok(config.with_prod_server(std::env::var("PROD_SERVER").ok().as_deref()))
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        Ok(toml::from_str(contents)?)
    }

    fn with_prod_server(mut self, flag: Option<&str>) -> Config {
        if flag.map(str::trim) == Some("1") {
            self.production = true;
        }
        self
    }

    pub fn deployment_mode(&self) -> DeploymentMode {
        if self.production {
            DeploymentMode::Production
        } else {
            DeploymentMode::Development
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.deployment_mode().output_dir().to_path_buf())
    }

    pub fn reload_timeout(&self) -> Duration {
        Duration::from_secs(self.reload_timeout)
    }
}
