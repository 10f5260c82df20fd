use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::color::Rgb;
use crate::error::ConfigError;

pub const PARAMETERS_ENV: &str = "STARFIELD_PARAMETERS";
pub const DEFAULT_PARAMETERS_FILE: &str = "parameters.json";

pub const MAX_SURFACE_SIDE: u32 = 8192;
pub const MAX_DENSITY: u32 = 20_000;

/// Display parameters shared by every star for a given frame.
///
/// Values are kept in the units the controls emit: `speed` is the raw
/// slider value, `trail` a percentage, `glow` an intensity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub speed: f32,
    pub color: Rgb,
    pub density: u32,
    pub trail: u32,
    pub glow: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters {
            speed: 2.5,
            color: Rgb::WHITE,
            density: 500,
            trail: 80,
            glow: 5,
            width: 1280,
            height: 720,
        }
    }
}

impl Parameters {
    pub fn speed_factor(&self) -> f32 {
        self.speed / 5.0
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let parameters: Parameters = serde_json::from_str(content)?;
        Ok(parameters.clamped())
    }

    /// Limits the surface size and star count to what a frame can afford.
    pub fn clamped(self) -> Self {
        Parameters {
            width: self.width.max(1).min(MAX_SURFACE_SIDE),
            height: self.height.max(1).min(MAX_SURFACE_SIDE),
            density: self.density.min(MAX_DENSITY),
            ..self
        }
    }

    pub async fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(&path).await?;
        Self::from_json_str(&content)
    }

    /// `$STARFIELD_PARAMETERS`, falling back to `parameters.json`.
    pub fn path() -> PathBuf {
        env::var_os(PARAMETERS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| Path::new(DEFAULT_PARAMETERS_FILE).to_path_buf())
    }
}

/// Maximum trail length for a trail percentage.
pub fn max_trail_len(trail: u32) -> usize {
    (trail / 10) as usize + 1
}
