//! Render settings, loadable from JSON.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use whitted_math::Color;

use crate::error::RenderResult;

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// How primary rays are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Ask the camera for each pixel's ray.
    Camera,
    /// Direction `(x * aspect, y, -1)` from the camera position, ignoring
    /// its orientation and field of view.
    #[default]
    FixedAspect,
}

/// Nearest-hit search used over the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accelerator {
    Linear,
    #[default]
    Bvh,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum number of mirror bounces
    pub max_depth: u32,
    /// Returned for misses and once the depth limit is exceeded
    pub background: Color,
    /// Offset along the normal for shadow and reflection ray origins
    pub shadow_bias: f32,
    pub projection: Projection,
    pub accelerator: Accelerator,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Worker threads, `None` for the rayon default
    pub threads: Option<usize>,
    /// Base directory for relative texture paths
    pub texture_dir: Option<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            background: Color::splat(0.01),
            shadow_bias: 1e-4,
            projection: Projection::default(),
            accelerator: Accelerator::default(),
            bucket_size: DEFAULT_BUCKET_SIZE,
            threads: None,
            texture_dir: None,
        }
    }
}

impl RenderConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_accelerator(mut self, accelerator: Accelerator) -> Self {
        self.accelerator = accelerator;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_texture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.texture_dir = Some(dir.into());
        self
    }
}
