//! Viewer configuration supplied by the host page as a JSON string.
//!
//! Every field is optional; missing fields fall back to the defaults in
//! [`crate::consts`], which match the stock backend on `localhost:8008`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{
    DEFAULT_CONFIG_URL, DEFAULT_ICON_HEIGHT, DEFAULT_ICON_SRC, DEFAULT_ICON_WIDTH, DEFAULT_SCENE_URL,
    DEFAULT_SYNC_INTERVAL_MS,
};
use crate::error::ConfigError;
use crate::hit::IconSize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Endpoint answering `GET` with the current scene.
    pub scene_url: String,
    /// Endpoint accepting `POST` of the light/polygon config.
    pub config_url: String,
    /// Push/pull period while dragging, in milliseconds.
    pub sync_interval_ms: u32,
    /// Light icon size used for hit-testing until the image reports its own.
    pub icon_width: f64,
    pub icon_height: f64,
    /// Image URL for the light icon; `None` draws a plain disc.
    pub icon_src: Option<String>,
    /// Element id the canvas is appended to; `None` appends to `<body>`.
    pub container_id: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene_url: DEFAULT_SCENE_URL.to_owned(),
            config_url: DEFAULT_CONFIG_URL.to_owned(),
            sync_interval_ms: DEFAULT_SYNC_INTERVAL_MS,
            icon_width: DEFAULT_ICON_WIDTH,
            icon_height: DEFAULT_ICON_HEIGHT,
            icon_src: Some(DEFAULT_ICON_SRC.to_owned()),
            container_id: None,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a config object. An empty or blank string yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] when a value is out of range.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scene_url.trim().is_empty() {
            return Err(ConfigError::Invalid("scene_url must not be empty"));
        }
        if self.config_url.trim().is_empty() {
            return Err(ConfigError::Invalid("config_url must not be empty"));
        }
        if self.sync_interval_ms == 0 {
            return Err(ConfigError::Invalid("sync_interval_ms must be positive"));
        }
        if !(self.icon_width > 0.0 && self.icon_height > 0.0) {
            return Err(ConfigError::Invalid("icon size must be positive"));
        }
        Ok(())
    }

    #[must_use]
    pub fn icon_size(&self) -> IconSize {
        IconSize::new(self.icon_width, self.icon_height)
    }
}
