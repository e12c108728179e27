use crate::Vec3;

/// What a ray is used for.
///
/// Only `Shadow` changes behaviour: nearest-hit searches may stop at the
/// first occluder instead of looking for the closest surface.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RayKind {
    /// Camera ray for a pixel
    #[default]
    Primary,
    /// Reflection ray spawned at a surface
    Secondary,
    /// Occlusion query towards a light
    Shadow,
}

/// A ray in 3D space with origin and direction.
///
/// The direction is not required to be unit length; callers normalize it
/// where a routine needs that.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: RayKind,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, kind: RayKind) -> Self {
        Self {
            origin,
            direction,
            kind,
        }
    }

    /// Create a primary ray.
    #[inline]
    pub fn primary(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, RayKind::Primary)
    }

    /// Create a shadow ray.
    #[inline]
    pub fn shadow(origin: Vec3, direction: Vec3) -> Self {
        Self::new(origin, direction, RayKind::Shadow)
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn is_shadow(&self) -> bool {
        self.kind == RayKind::Shadow
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            kind: RayKind::Primary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::primary(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_kinds() {
        let primary = Ray::primary(Vec3::ZERO, Vec3::Y);
        let shadow = Ray::shadow(Vec3::ZERO, Vec3::Y);

        assert_eq!(primary.kind, RayKind::Primary);
        assert!(!primary.is_shadow());
        assert!(shadow.is_shadow());
        assert_eq!(Ray::default().kind, RayKind::Primary);
    }

    #[test]
    fn test_ray_direction_not_normalized() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0), RayKind::Secondary);
        assert_eq!(ray.direction().length(), 2.0);
        assert_eq!(ray.at(0.5), Vec3::new(0.0, 0.0, -1.0));
    }
}
