//! Point light sources.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use whitted_math::{Color, Vec3};

/// Below this distance a point is treated as coincident with the light.
const MIN_LIGHT_DISTANCE: f32 = 1e-6;

/// Light arriving at a surface point from one light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Illumination {
    /// Unit direction from the light towards the point
    pub direction: Vec3,
    /// Radiant intensity after inverse-square falloff
    pub intensity: Color,
    /// Distance from the point to the light
    pub distance: f32,
}

/// An isotropic point light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color::ONE,
            intensity: 100.0,
        }
    }
}

impl PointLight {
    /// White light with the default intensity.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_color(mut self, color: Color, intensity: f32) -> Self {
        self.color = color;
        self.intensity = intensity;
        self
    }

    /// Direction, distance and falloff-attenuated intensity at `point`.
    ///
    /// Returns `None` when the point sits on the light itself.
    pub fn illuminate(&self, point: Vec3) -> Option<Illumination> {
        let to_point = point - self.position;
        let r2 = to_point.length_squared();
        let distance = r2.sqrt();
        if distance < MIN_LIGHT_DISTANCE {
            return None;
        }

        Some(Illumination {
            direction: to_point / distance,
            intensity: self.color * self.intensity / (4.0 * PI * r2),
            distance,
        })
    }

    /// Intensity reaching a surface with the given normal, including the
    /// Lambert cosine. Zero for surfaces facing away from the light.
    pub fn intensity_at(&self, point: Vec3, normal: Vec3) -> Color {
        match self.illuminate(point) {
            Some(light) => light.intensity * normal.dot(-light.direction).max(0.0),
            None => Color::ZERO,
        }
    }
}
