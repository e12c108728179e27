//! Local shading: Phong diffuse and specular terms with an optional
//! reflection/refraction blend.

use whitted_core::Material;
use whitted_math::{Color, Vec3};

use crate::hittable::HitRecord;

/// Index of refraction used for the refraction highlight.
pub const INDEX_OF_REFRACTION: f32 = 1.3;

/// Mirror `incident` about `normal`: `I - 2(I·N)N`.
#[inline]
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    incident - 2.0 * incident.dot(normal) * normal
}

/// Snell refraction of `incident` through a surface with `normal`.
///
/// Handles rays entering (I·N < 0) and leaving the surface. Returns
/// `Vec3::ZERO` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, ior: f32) -> Vec3 {
    let mut cosi = incident.dot(normal).clamp(-1.0, 1.0);
    let (mut eta_i, mut eta_t) = (1.0, ior);
    let mut n = normal;

    if cosi < 0.0 {
        cosi = -cosi;
    } else {
        std::mem::swap(&mut eta_i, &mut eta_t);
        n = -normal;
    }

    let eta = eta_i / eta_t;
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        Vec3::ZERO
    } else {
        eta * incident + (eta * cosi - k.sqrt()) * n
    }
}

/// Specular lobe for a given lobe direction.
fn specular_term(ray_dir: Vec3, lobe: Vec3, material: &Material, base_color: Color) -> Color {
    ray_dir.dot(lobe).max(0.0).powf(material.specular_exponent()) * material.ks() * base_color
}

/// Radiance leaving `hit` towards the viewer from one light.
///
/// `light_dir` points from the light towards the surface and
/// `light_intensity` already includes falloff and the cosine term. Only the
/// diffuse part is gated by `visible`.
pub fn evaluate(
    ray_dir: Vec3,
    hit: &HitRecord,
    material: &Material,
    light_intensity: Color,
    base_color: Color,
    light_dir: Vec3,
    visible: bool,
) -> Color {
    let visibility = if visible { 1.0 } else { 0.0 };
    let diffuse = visibility * light_intensity * material.kd() * base_color;

    let mirrored = reflect(light_dir, hit.normal);
    let specular = specular_term(ray_dir, mirrored, material, base_color);

    let Some(kr) = material.reflectivity() else {
        return diffuse + specular;
    };

    let refracted = refract(light_dir, hit.normal, INDEX_OF_REFRACTION).normalize_or_zero();
    let specular_refr = specular_term(ray_dir, refracted, material, base_color);

    (diffuse + specular) * kr + (diffuse + specular_refr) * (1.0 - kr)
}
