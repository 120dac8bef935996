//! Procedural mesh types
//!
//! Shared types for procedural mesh generation.

use glam::{Vec2, Vec3};
use thiserror::Error;

/// Trait for mesh construction - enables generic geometry generation
///
/// Generators only talk to this trait, so the same generator can fill the
/// plain [`Mesh`] used for GPU upload or any other layout a caller needs.
pub trait MeshBuilder: Default {
    /// Reserve room for the exact number of vertices and indices about to be added
    fn reserve(&mut self, vertex_count: usize, index_count: usize);

    /// Add a vertex with position and texture coordinates, returning its index
    fn add_vertex(&mut self, position: Vec3, texcoord: Vec2) -> u32;

    /// Add a triangle using three vertex indices
    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32);
}

/// Generated mesh data as three linked arrays
///
/// `vertices[i]` and `texcoords[i]` describe the same vertex; `indices` holds
/// triangles as consecutive triples into those arrays. The arrays are laid out
/// exactly as they are uploaded: positions to one vertex buffer, texcoords to a
/// second one and indices to an index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions as [x, y, z]
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates as [u, v], one per vertex
    pub texcoords: Vec<[f32; 2]>,
    /// Triangle indices, counter-clockwise seen from outside
    pub indices: Vec<u32>,
}

/// A mesh invariant that does not hold
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshDefect {
    #[error("{vertices} vertices but {texcoords} texcoords")]
    TexcoordCountMismatch { vertices: usize, texcoords: usize },
    #[error("index count {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("triangle {triangle} references vertex {index} but only {vertex_count} exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("triangle {triangle} repeats a vertex: {indices:?}")]
    DegenerateTriangle { triangle: usize, indices: [u32; 3] },
}

impl Mesh {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if the mesh holds no triangles
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over triangles as index triples
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Position of a vertex as a `Vec3`
    pub fn position(&self, index: u32) -> Vec3 {
        Vec3::from_array(self.vertices[index as usize])
    }

    /// Check the structural invariants every generated mesh must satisfy
    ///
    /// Returns the first violation found. Geometric properties (radius, seam,
    /// winding) are specific to the generator and are not checked here.
    pub fn check_invariants(&self) -> Result<(), MeshDefect> {
        if self.vertices.len() != self.texcoords.len() {
            return Err(MeshDefect::TexcoordCountMismatch {
                vertices: self.vertices.len(),
                texcoords: self.texcoords.len(),
            });
        }

        if self.indices.len() % 3 != 0 {
            return Err(MeshDefect::PartialTriangle(self.indices.len()));
        }

        let vertex_count = self.vertices.len();
        for (triangle, [a, b, c]) in self.triangles().enumerate() {
            for index in [a, b, c] {
                if index as usize >= vertex_count {
                    return Err(MeshDefect::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count,
                    });
                }
            }
            if a == b || b == c || a == c {
                return Err(MeshDefect::DegenerateTriangle {
                    triangle,
                    indices: [a, b, c],
                });
            }
        }

        Ok(())
    }
}

impl MeshBuilder for Mesh {
    fn reserve(&mut self, vertex_count: usize, index_count: usize) {
        self.vertices.reserve_exact(vertex_count);
        self.texcoords.reserve_exact(vertex_count);
        self.indices.reserve_exact(index_count);
    }

    fn add_vertex(&mut self, position: Vec3, texcoord: Vec2) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position.to_array());
        self.texcoords.push(texcoord.to_array());
        index
    }

    fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }
}
