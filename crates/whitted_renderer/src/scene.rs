//! Scene: the shapes and lights read by a render.

use std::sync::Arc;

use whitted_core::{Material, PointLight, PolygonMesh, TextureCache, TextureError};

use crate::bvh::BvhNode;
use crate::config::Accelerator;
use crate::error::{BvhError, RenderResult};
use crate::hittable::ShapeList;
use crate::mesh::TriangleMesh;
use crate::shape::Shape;

/// Everything a render reads. Immutable once rendering starts.
#[derive(Default)]
pub struct Scene {
    pub shapes: ShapeList,
    pub lights: Vec<PointLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: impl Into<Shape>) {
        self.shapes.add(shape);
    }

    pub fn add_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.add_shape(shape);
        self
    }

    pub fn with_light(mut self, light: PointLight) -> Self {
        self.add_light(light);
        self
    }

    /// Validate and triangulate `mesh`, then add it as one shape.
    pub fn add_polygon_mesh(
        &mut self,
        mesh: &PolygonMesh,
        material: Arc<Material>,
    ) -> RenderResult<()> {
        self.add_shape(TriangleMesh::new(mesh, material)?);
        Ok(())
    }

    /// Decode every texture named by a material in the scene.
    ///
    /// Shared materials are copied on write, so each shape ends up owning a
    /// resolved handle. Decoded images are shared through `cache`.
    pub fn resolve_textures(&mut self, cache: &mut TextureCache) -> RenderResult<()> {
        let mut resolved = 0;
        for shape in self.shapes.shapes_mut() {
            shape.try_for_each_material_mut(&mut |material| {
                if material.has_unresolved_texture() {
                    Arc::make_mut(material).resolve_texture(cache)?;
                    resolved += 1;
                }
                Ok::<(), TextureError>(())
            })?;
        }
        if resolved > 0 {
            log::debug!("Resolved textures for {} material handles", resolved);
        }
        Ok(())
    }

    /// Replace the flat shape list with a single BVH over the same shapes.
    ///
    /// An empty scene is left as it is.
    pub fn into_bvh(self) -> Result<Self, BvhError> {
        if self.shapes.is_empty() {
            return Ok(self);
        }

        let bvh = BvhNode::new(self.shapes.into_shapes())?;
        let mut shapes = ShapeList::new();
        shapes.add(bvh);

        Ok(Self {
            shapes,
            lights: self.lights,
        })
    }

    /// Apply the configured nearest-hit search.
    pub fn accelerate(self, accelerator: Accelerator) -> Result<Self, BvhError> {
        match accelerator {
            Accelerator::Linear => Ok(self),
            Accelerator::Bvh => self.into_bvh(),
        }
    }

    /// Materials that name a texture file that was never decoded.
    pub fn unresolved_textures(&self) -> Vec<&Material> {
        let mut unresolved = Vec::new();
        for shape in self.shapes.shapes() {
            shape.visit_materials(&mut |material| {
                if material.has_unresolved_texture() {
                    unresolved.push(material);
                }
            });
        }
        unresolved
    }
}
