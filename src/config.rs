use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub window: WindowConfig,
    pub persistence: PersistenceConfig,
    pub host: HostConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Адрес, который открывается в новом окне
    pub url: String,
    /// Подстрока адреса вкладки, по которой узнаём окно Keep
    pub marker: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub debounce_ms: u64,
    pub path: PathBuf,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HostConfig {
    /// Умеет ли оконный менеджер разворачивать свёрнутые окна
    pub restore_supported: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            restore_supported: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            url: "https://keep.google.com/".to_string(),
            marker: "keep.google.com".to_string(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            path: PathBuf::from("keep-window-bounds.json"),
            key: "keep_window_bounds".to_string(),
        }
    }
}

impl PersistenceConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::new()
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("KEEP_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        if self.window.url.trim().is_empty() {
            anyhow::bail!("window.url не может быть пустым");
        }

        if self.window.marker.trim().is_empty() {
            anyhow::bail!("window.marker не может быть пустым");
        }

        // Иначе созданное окно никогда не найдётся при переборе
        if !self.window.url.contains(&self.window.marker) {
            anyhow::bail!(
                "window.url '{}' не содержит маркер '{}'",
                self.window.url,
                self.window.marker
            );
        }

        if self.persistence.debounce_ms == 0 {
            anyhow::bail!("debounce_ms должно быть больше 0");
        }

        if self.persistence.key.trim().is_empty() {
            anyhow::bail!("persistence.key не может быть пустым");
        }

        Ok(())
    }
}
