use serde::Deserialize;
use std::{fs, time::Duration};

use crate::transform::{colors::Palette, ChartOptions};

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub auth_bearer_token: Option<String>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub http_bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub show_daily_average: bool,
    #[serde(default)]
    pub palette: Palette,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            output_dir: default_output_dir(),
            show_daily_average: false,
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            palette: self.palette,
            show_daily_average: self.show_daily_average,
        }
    }
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    450
}

fn default_output_dir() -> String {
    "charts".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    /// UTC offset of the dashboard server, e.g. `"+03:00"`.
    #[serde(default = "default_server_utc_offset")]
    pub server_utc_offset: String,
    #[serde(default = "default_hours_ago")]
    pub hours_ago: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            server_utc_offset: default_server_utc_offset(),
            hours_ago: default_hours_ago(),
        }
    }
}

fn default_server_utc_offset() -> String {
    "+00:00".to_string()
}

fn default_hours_ago() -> u32 {
    24
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("CHART_SERVICE_CONFIG").unwrap_or_else(|_| "chart-service.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        Ok(cfg)
    }
}
