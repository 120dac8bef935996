//! Procedural mesh generation
//!
//! The UV sphere generator plus the helpers that consume its output outside the
//! GPU path (OBJ export and a printable dump).
//!
//! Generated meshes are three linked arrays:
//! - positions: `[f32; 3]` per vertex
//! - texcoords: `[f32; 2]` per vertex, equirectangular, `v = 0` at the top pole
//! - indices: `u32` triples, counter-clockwise seen from outside

mod export;
mod sphere;
mod types;

#[cfg(test)]
mod tests;

pub use types::{Mesh, MeshBuilder, MeshDefect};

// Re-export OBJ export and debug listing
pub use export::{MeshDump, write_obj};

pub use sphere::{
    GenerationError, MAX_SECTORS, MAX_STACKS, MIN_SECTORS, MIN_STACKS, SphereSpec, generate,
    generate_sphere_uv, next_sector, wrap_sector,
};
