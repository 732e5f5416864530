//! Triangle mesh representation.
//!
//! A [`Model`] is an immutable, ordered list of [`Triangle`]s. Each triangle
//! carries its own three [`Vertex`] values, so shaders never need index
//! buffers. Traversal order never changes the final image; visibility is
//! resolved by the depth test.

use std::ops::Index;
use std::path::Path;

use log::{info, warn};

use crate::error::{RenderError, Result};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// A single mesh vertex in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }
}

/// Three vertices; winding order is significant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub const fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Unit face normal, `normalize(cross(v2 - v0, v1 - v0))`.
    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (c - a).cross(b - a).normalize()
    }
}

impl Index<usize> for Triangle {
    type Output = Vertex;

    fn index(&self, index: usize) -> &Self::Output {
        &self.vertices[index]
    }
}

/// An ordered, non-empty collection of triangles.
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    triangles: Vec<Triangle>,
}

impl Model {
    /// Create a model from triangles.
    ///
    /// Returns [`RenderError::EmptyModel`] for an empty list; an empty model
    /// is a caller error caught here rather than inside the rasterizer.
    pub fn new(name: impl Into<String>, triangles: Vec<Triangle>) -> Result<Self> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(RenderError::EmptyModel(name));
        }
        Ok(Self { name, triangles })
    }

    /// Load a model from an OBJ file.
    ///
    /// All objects/groups in the OBJ file are concatenated into one triangle
    /// list. Missing texture coordinates default to `(0, 0)` and missing
    /// normals fall back to the face normal.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (meshes, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
        )?;

        let mut triangles = Vec::new();
        for mesh in meshes.iter().map(|m| &m.mesh) {
            if mesh.normals.is_empty() {
                warn!("{}: mesh has no normals, using face normals", path.display());
            }
            for face in mesh.indices.chunks_exact(3) {
                let mut vertices = [Vertex::default(); 3];
                for (vertex, &index) in vertices.iter_mut().zip(face) {
                    let i = index as usize;
                    vertex.position = Vec3::new(
                        mesh.positions[3 * i],
                        mesh.positions[3 * i + 1],
                        mesh.positions[3 * i + 2],
                    );
                    if mesh.texcoords.len() >= 2 * (i + 1) {
                        vertex.uv = Vec2::new(mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]);
                    }
                    if mesh.normals.len() >= 3 * (i + 1) {
                        vertex.normal = Vec3::new(
                            mesh.normals[3 * i],
                            mesh.normals[3 * i + 1],
                            mesh.normals[3 * i + 2],
                        );
                    }
                }

                let mut triangle = Triangle { vertices };
                if mesh.normals.is_empty() {
                    // Outward for counter-clockwise winding.
                    let normal = -triangle.face_normal();
                    for vertex in &mut triangle.vertices {
                        vertex.normal = normal;
                    }
                }
                triangles.push(triangle);
            }
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("loaded model {} ({} triangles)", path.display(), triangles.len());
        Self::new(name, triangles)
    }

    /// Get the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all triangles as a slice.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Get the number of triangles in this model.
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}
