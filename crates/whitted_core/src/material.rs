//! Surface materials for the Whitted shading model.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use whitted_math::{Color, Vec2};

use crate::texture::{Texture, TextureCache, TextureResult};

/// Reflectivity reported for opaque materials.
///
/// Anything at or above this value means "no refraction blend and no
/// mirror bounce".
pub const OPAQUE_KR: f32 = 2.0;

/// A Phong-style material.
///
/// Reflectivity is modelled explicitly: `None` is an opaque surface, while
/// `Some(kr)` is a blend weight between the reflected and refracted local
/// terms and the weight of the mirror bounce.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Material name (for logging)
    pub name: String,

    /// Diffuse/albedo color (RGB, 0-1)
    pub diffuse_color: Color,

    /// Specular coefficient
    pub ks: f32,

    /// Diffuse coefficient
    pub kd: f32,

    /// Reflectivity weight, `None` for opaque surfaces
    pub reflectivity: Option<f32>,

    /// Phong exponent
    pub specular_exponent: f32,

    /// Path to diffuse texture, resolved by `resolve_texture`
    pub texture_path: Option<String>,

    #[serde(skip)]
    texture: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_color: Color::new(0.5, 0.5, 0.5), // Grey default
            ks: 0.0,
            kd: 1.0,
            reflectivity: None,
            specular_exponent: 1.0,
            texture_path: None,
            texture: None,
        }
    }
}

impl Material {
    /// Create a new material with just a name and diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: Color) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// Set diffuse and specular coefficients and the specular exponent.
    pub fn with_phong(mut self, kd: f32, ks: f32, specular_exponent: f32) -> Self {
        self.kd = kd;
        self.ks = ks;
        self.specular_exponent = specular_exponent;
        self
    }

    /// Make the material reflective with weight `kr`.
    pub fn with_reflectivity(mut self, kr: f32) -> Self {
        self.reflectivity = Some(kr);
        self
    }

    /// Point the material at a texture file.
    pub fn with_texture_path(mut self, path: impl Into<String>) -> Self {
        self.texture_path = Some(path.into());
        self
    }

    /// Attach an already decoded texture.
    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn diffuse_color(&self) -> Color {
        self.diffuse_color
    }

    pub fn ks(&self) -> f32 {
        self.ks
    }

    pub fn kd(&self) -> f32 {
        self.kd
    }

    /// Reflectivity weight in `[0, 1]`, or `None` when opaque.
    pub fn reflectivity(&self) -> Option<f32> {
        self.reflectivity.map(|kr| kr.clamp(0.0, 1.0))
    }

    /// Scalar view of reflectivity; opaque materials report `OPAQUE_KR`.
    pub fn kr(&self) -> f32 {
        self.reflectivity().unwrap_or(OPAQUE_KR)
    }

    /// True when the material has no reflection/refraction component.
    pub fn is_opaque(&self) -> bool {
        self.kr() >= OPAQUE_KR
    }

    pub fn specular_exponent(&self) -> f32 {
        self.specular_exponent
    }

    pub fn texture(&self) -> Option<&Arc<Texture>> {
        self.texture.as_ref()
    }

    /// Surface color at a texture coordinate: the texture when one is
    /// loaded, the diffuse color otherwise.
    pub fn color_at(&self, uv: Vec2) -> Color {
        match &self.texture {
            Some(texture) => texture.lookup(uv),
            None => self.diffuse_color,
        }
    }

    /// Decode the texture named by `texture_path`, if any.
    ///
    /// Must run before rendering; materials are read-only afterwards.
    pub fn resolve_texture(&mut self, cache: &mut TextureCache) -> TextureResult<()> {
        if self.texture.is_some() {
            return Ok(());
        }
        if let Some(path) = &self.texture_path {
            self.texture = Some(cache.load(path)?);
        }
        Ok(())
    }

    /// True if a texture path is set but nothing has been decoded for it.
    pub fn has_unresolved_texture(&self) -> bool {
        self.texture_path.is_some() && self.texture.is_none()
    }
}
