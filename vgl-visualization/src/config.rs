//! Viewer configuration loaded from TOML

use crate::camera::CameraState;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use vgl_core::Vec3f;

/// Errors raised while setting up a viewer
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid viewer configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Failed to serialize viewer configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

/// Window, camera and input settings for a [`Viewer`](crate::Viewer)
///
/// Every field has a default, so a config file only needs the keys it
/// changes:
///
/// ```toml
/// title = "bunny"
/// width = 1024
///
/// [camera]
/// position = [0.0, 1.0, 4.0]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA clear colour
    pub background: [f32; 4],
    /// Home state of the default arcball camera
    pub camera: CameraState,
    /// Fraction of the window width one wheel step dollies by
    pub dolly_step: f32,
    /// Multiple of the window width one wheel step zooms by
    pub zoom_step: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Unnamed".to_string(),
            width: 800,
            height: 600,
            background: [0.2, 0.2, 0.2, 1.0],
            camera: CameraState {
                position: Vec3f::new(0.0, 0.0, 5.0),
                ..CameraState::default()
            },
            dolly_step: 0.5,
            zoom_step: 2.0,
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}
