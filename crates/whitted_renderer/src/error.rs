//! Error types for scene preparation and rendering.
//!
//! Per-ray evaluation never fails; these cover everything that happens
//! before the first pixel is traced.

use thiserror::Error;
use whitted_core::{MeshError, TextureError};

/// Errors from building a bounding volume hierarchy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BvhError {
    #[error("Cannot build a BVH over an empty shape set")]
    Empty,

    #[error("Shape {index} has no bounding box")]
    MissingBoundingBox { index: usize },
}

/// Errors that can occur while preparing or running a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("BVH construction failed: {0}")]
    Bvh(#[from] BvhError),

    #[error("Texture error: {0}")]
    Texture(#[from] TextureError),

    #[error("Mesh error: {0}")]
    Mesh(#[from] MeshError),

    #[error("Invalid render config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid image resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;
