use std::{path::Path, time::Duration};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the controller decides that loading is over.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LoadingSignal {
    /// Cleared once every current model has finished decoding (or failed).
    DecodeCompletion,
    /// Cleared by a one-shot timer armed on every upload.
    FixedDelay { seconds: f32 },
}

impl Default for LoadingSignal {
    fn default() -> Self {
        LoadingSignal::DecodeCompletion
    }
}

impl LoadingSignal {
    /// The timer delay, or `None` in decode-completion mode.
    ///
    /// A delay that is not a representable duration (negative, NaN or too
    /// large) also yields `None`; [`ViewerConfig`] validation rejects those.
    pub fn fixed_delay(&self) -> Option<Duration> {
        match self {
            LoadingSignal::DecodeCompletion => None,
            LoadingSignal::FixedDelay { seconds } => match Duration::try_from_secs_f32(*seconds) {
                Ok(delay) => Some(delay),
                Err(e) => {
                    log::warn!("Ignoring loading delay {seconds}: {e}");
                    None
                }
            },
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 1.5, 3.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 50.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    pub min_distance: f32,
    pub max_distance: f32,
    pub enable_pan: bool,
    pub enable_zoom: bool,
    pub enable_rotate: bool,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            min_distance: 1.0,
            max_distance: 10.0,
            enable_pan: true,
            enable_zoom: true,
            enable_rotate: true,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_intensity: f32,
    pub directional_position: [f32; 3],
    pub directional_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.5,
            directional_position: [5.0, 5.0, 5.0],
            directional_intensity: 1.0,
        }
    }
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub allowed_extensions: Vec<String>,
    pub loading: LoadingSignal,
    pub default_clothing_color: String,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub lights: LightConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["glb".to_owned(), "gltf".to_owned()],
            loading: LoadingSignal::default(),
            default_clothing_color: "#ffffff".to_owned(),
            camera: CameraConfig::default(),
            orbit: OrbitConfig::default(),
            lights: LightConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_extensions.is_empty() {
            return Err(ConfigError::Invalid("allowed_extensions is empty".into()));
        }
        if !(self.orbit.min_distance > 0.0 && self.orbit.min_distance <= self.orbit.max_distance) {
            return Err(ConfigError::Invalid(format!(
                "orbit distance range [{}, {}] is empty",
                self.orbit.min_distance, self.orbit.max_distance
            )));
        }
        if let LoadingSignal::FixedDelay { seconds } = self.loading {
            Duration::try_from_secs_f32(seconds)
                .map_err(|e| ConfigError::Invalid(format!("loading delay {seconds}: {e}")))?;
        }
        if self.default_clothing_color.parse::<crate::Rgb>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "default_clothing_color '{}' is not a hex colour",
                self.default_clothing_color
            )));
        }
        Ok(())
    }

    pub fn default_clothing_rgb(&self) -> crate::Rgb {
        self.default_clothing_color.parse().unwrap_or(crate::Rgb::WHITE)
    }
}
