//! Camera for ray generation.

use whitted_math::{Ray, Vec3};

/// Anything that can turn image-plane coordinates into primary rays.
///
/// `x` and `y` are normalised device coordinates in `[-1, 1]`, with `y`
/// pointing up.
pub trait Camera: Send + Sync {
    fn camera_ray(&self, x: f32, y: f32) -> Ray;
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn position(&self) -> Vec3;

    fn aspect_ratio(&self) -> f32 {
        self.width() as f32 / self.height().max(1) as f32
    }
}

/// Pinhole perspective camera.
#[derive(Clone, Debug)]
pub struct Pinhole {
    width: u32,
    height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f32, // Vertical field of view in degrees

    // Derived basis, kept in sync by the builders
    u: Vec3,
    v: Vec3,
    w: Vec3,
    half_width: f32,
    half_height: f32,
}

impl Pinhole {
    /// Camera at the origin looking down -Z with a 90 degree field of view.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self {
            width,
            height,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            half_width: 1.0,
            half_height: 1.0,
        };
        camera.update_basis();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.update_basis();
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.update_basis();
        self
    }

    fn update_basis(&mut self) {
        let theta = self.vfov.to_radians();
        self.half_height = (theta / 2.0).tan();
        self.half_width = self.half_height * self.aspect_ratio();

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize_or(Vec3::Z);
        self.u = self.vup.cross(self.w).normalize_or(Vec3::X);
        self.v = self.w.cross(self.u);
    }
}

impl Camera for Pinhole {
    fn camera_ray(&self, x: f32, y: f32) -> Ray {
        let direction =
            -self.w + x * self.half_width * self.u + y * self.half_height * self.v;
        Ray::primary(self.look_from, direction.normalize())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn position(&self) -> Vec3 {
        self.look_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera_looks_down_neg_z() {
        let camera = Pinhole::new(100, 100);

        let ray = camera.camera_ray(0.0, 0.0);
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-6);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_corner_rays_span_fov() {
        let camera = Pinhole::new(200, 100).with_fov(90.0);

        // 90 degree vertical fov: the top edge is 45 degrees up
        let top = camera.camera_ray(0.0, 1.0).direction();
        assert!((top.y - top.z.abs()).abs() < 1e-5);

        // Aspect 2: the right edge reaches x = 2 at unit depth
        let right = camera.camera_ray(1.0, 0.0).direction();
        assert!((right.x / right.z.abs() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_look_at() {
        let camera = Pinhole::new(64, 64).with_position(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::Y,
        );

        let ray = camera.camera_ray(0.0, 0.0);
        assert!((ray.direction() - Vec3::Z).length() < 1e-6);
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
    }
}
