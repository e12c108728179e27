//! Polygon mesh description for the triangle-mesh primitive.
//!
//! Meshes arrive as polygons: a vertex count per face, then one vertex
//! index per face corner. Normals and UVs, when present, are also given
//! per face corner. The renderer consumes the fan-triangulated form.

use std::f32::consts::PI;

use thiserror::Error;
use whitted_math::{Vec2, Vec3};

/// Errors from validating or triangulating a polygon mesh.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    #[error("Face {face} has {count} vertices, at least 3 are required")]
    DegenerateFace { face: usize, count: u32 },

    #[error("Faces reference {expected} corners but {actual} vertex indices were given")]
    CornerCount { expected: usize, actual: usize },

    #[error("Vertex index {index} out of range ({vertex_count} vertices)")]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("{attribute} buffer has {actual} entries, expected {expected} (one per face corner)")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A polygon mesh with per-corner attributes.
#[derive(Clone, Debug, Default)]
pub struct PolygonMesh {
    /// Number of vertices of each face
    pub face_vertex_counts: Vec<u32>,

    /// Vertex index for each face corner
    pub vertex_indices: Vec<u32>,

    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Normals, one per face corner
    pub normals: Option<Vec<Vec3>>,

    /// Texture coordinates, one per face corner
    pub uvs: Option<Vec<Vec2>>,
}

/// Fan-triangulated mesh buffers; attributes are stored per triangle corner.
#[derive(Clone, Debug, Default)]
pub struct TriangleBuffers {
    pub positions: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
    pub normals: Option<Vec<[Vec3; 3]>>,
    pub uvs: Option<Vec<[Vec2; 3]>>,
}

impl PolygonMesh {
    pub fn new(
        face_vertex_counts: Vec<u32>,
        vertex_indices: Vec<u32>,
        positions: Vec<Vec3>,
    ) -> Self {
        Self {
            face_vertex_counts,
            vertex_indices,
            positions,
            normals: None,
            uvs: None,
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.len()
    }

    /// Triangles produced by fan triangulation: the sum of `count - 2`
    /// over all faces.
    pub fn triangle_count(&self) -> usize {
        self.face_vertex_counts
            .iter()
            .map(|&n| n.saturating_sub(2) as usize)
            .sum()
    }

    /// Check face sizes, index ranges and attribute buffer lengths.
    pub fn validate(&self) -> MeshResult<()> {
        if let Some((face, &count)) = self
            .face_vertex_counts
            .iter()
            .enumerate()
            .find(|(_, &n)| n < 3)
        {
            return Err(MeshError::DegenerateFace { face, count });
        }

        let corners: usize = self.face_vertex_counts.iter().map(|&n| n as usize).sum();
        if corners != self.vertex_indices.len() {
            return Err(MeshError::CornerCount {
                expected: corners,
                actual: self.vertex_indices.len(),
            });
        }

        let vertex_count = self.positions.len();
        if let Some(&index) = self
            .vertex_indices
            .iter()
            .find(|&&i| i as usize >= vertex_count)
        {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        check_corner_attribute("normal", self.normals.as_ref().map(Vec::len), corners)?;
        check_corner_attribute("uv", self.uvs.as_ref().map(Vec::len), corners)?;

        Ok(())
    }

    /// Fan-triangulate every face around its first corner.
    pub fn triangulate(&self) -> MeshResult<TriangleBuffers> {
        self.validate()?;

        let triangle_count = self.triangle_count();
        let mut indices = Vec::with_capacity(triangle_count);
        let mut normals = self.normals.as_ref().map(|_| Vec::with_capacity(triangle_count));
        let mut uvs = self.uvs.as_ref().map(|_| Vec::with_capacity(triangle_count));

        let mut first_corner = 0usize;
        for &count in &self.face_vertex_counts {
            let count = count as usize;
            for j in 0..count - 2 {
                let corners = [first_corner, first_corner + j + 1, first_corner + j + 2];

                indices.push(corners.map(|c| self.vertex_indices[c]));
                if let (Some(out), Some(src)) = (normals.as_mut(), self.normals.as_ref()) {
                    out.push(corners.map(|c| src[c]));
                }
                if let (Some(out), Some(src)) = (uvs.as_mut(), self.uvs.as_ref()) {
                    out.push(corners.map(|c| src[c]));
                }
            }
            first_corner += count;
        }

        Ok(TriangleBuffers {
            positions: self.positions.clone(),
            indices,
            normals,
            uvs,
        })
    }

    /// Procedural UV sphere made of triangle caps and quad bands.
    ///
    /// `divisions` is the number of latitude bands and longitude segments
    /// (at least 3). Normals point outward and UVs span `[0, 1]`, with the
    /// longitude seam duplicated so no face wraps around.
    pub fn poly_sphere(center: Vec3, radius: f32, divisions: u32) -> Self {
        let divs = divisions.max(3);
        let columns = divs + 1;

        let mut positions = Vec::with_capacity(((divs - 1) * columns + 2) as usize);
        let mut vertex_normals = Vec::with_capacity(positions.capacity());
        let mut vertex_uvs = Vec::with_capacity(positions.capacity());

        // South pole
        positions.push(center - Vec3::Y * radius);
        vertex_normals.push(Vec3::NEG_Y);
        vertex_uvs.push(Vec2::new(0.5, 0.0));

        for ring in 0..divs - 1 {
            let latitude = -PI / 2.0 + (ring + 1) as f32 * PI / divs as f32;
            for column in 0..columns {
                let longitude = -PI + column as f32 * 2.0 * PI / divs as f32;
                let normal = Vec3::new(
                    latitude.cos() * longitude.cos(),
                    latitude.sin(),
                    latitude.cos() * longitude.sin(),
                );
                positions.push(center + normal * radius);
                vertex_normals.push(normal);
                vertex_uvs.push(Vec2::new(
                    column as f32 / divs as f32,
                    (ring + 1) as f32 / divs as f32,
                ));
            }
        }

        // North pole
        let north = positions.len() as u32;
        positions.push(center + Vec3::Y * radius);
        vertex_normals.push(Vec3::Y);
        vertex_uvs.push(Vec2::new(0.5, 1.0));

        let ring_vertex = |ring: u32, column: u32| 1 + ring * columns + column;

        let mut face_vertex_counts = Vec::with_capacity((divs * divs) as usize);
        let mut vertex_indices = Vec::new();

        for column in 0..divs {
            face_vertex_counts.push(3);
            vertex_indices.extend([0, ring_vertex(0, column), ring_vertex(0, column + 1)]);
        }
        for ring in 1..divs - 1 {
            for column in 0..divs {
                face_vertex_counts.push(4);
                vertex_indices.extend([
                    ring_vertex(ring - 1, column),
                    ring_vertex(ring, column),
                    ring_vertex(ring, column + 1),
                    ring_vertex(ring - 1, column + 1),
                ]);
            }
        }
        let top = divs - 2;
        for column in 0..divs {
            face_vertex_counts.push(3);
            vertex_indices.extend([ring_vertex(top, column), north, ring_vertex(top, column + 1)]);
        }

        let normals = vertex_indices.iter().map(|&i| vertex_normals[i as usize]).collect();
        let uvs = vertex_indices.iter().map(|&i| vertex_uvs[i as usize]).collect();

        log::debug!(
            "Generated poly sphere: {} vertices, {} faces",
            positions.len(),
            face_vertex_counts.len()
        );

        Self::new(face_vertex_counts, vertex_indices, positions)
            .with_normals(normals)
            .with_uvs(uvs)
    }
}

fn check_corner_attribute(
    attribute: &'static str,
    actual: Option<usize>,
    expected: usize,
) -> MeshResult<()> {
    match actual {
        Some(actual) if actual != expected => Err(MeshError::AttributeLength {
            attribute,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
