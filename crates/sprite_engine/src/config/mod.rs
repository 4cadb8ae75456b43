//! Configuration loading
//!
//! Settings types implement [`Config`] to gain TOML and RON file support;
//! the format is picked from the file extension.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec2;

/// File-backed configuration
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };
        Ok(std::fs::write(path, contents)?)
    }
}

/// Configuration load or save failure
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialize(String),

    /// Unsupported file extension
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Engine startup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial global time scale
    pub time_scale: f32,
    /// Ticks per second the embedder should aim for
    pub target_fps: u32,
    /// Initial camera position
    pub camera_x: f32,
    /// Initial camera position
    pub camera_y: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            target_fps: 60,
            camera_x: 0.0,
            camera_y: 0.0,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Initial camera position as a vector
    pub fn camera_position(&self) -> Vec2 {
        Vec2::new(self.camera_x, self.camera_y)
    }
}
