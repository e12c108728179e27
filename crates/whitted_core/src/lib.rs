//! Whitted Core - scene content shared by the renderer.
//!
//! This crate provides:
//!
//! - **Materials**: Phong coefficients, reflectivity and optional textures
//! - **Lights**: point lights with inverse-square falloff
//! - **Meshes**: polygon meshes and their fan triangulation
//! - **Textures**: image textures sampled by UV, with a path cache

pub mod light;
pub mod material;
pub mod mesh;
pub mod texture;

pub use light::{Illumination, PointLight};
pub use material::{Material, OPAQUE_KR};
pub use mesh::{MeshError, MeshResult, PolygonMesh, TriangleBuffers};
pub use texture::{Texture, TextureCache, TextureError, TextureResult};
