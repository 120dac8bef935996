//! UV sphere generation with equirectangular texture coordinates

use glam::{Vec2, Vec3};
use std::f32::consts::{FRAC_PI_2, PI};
use thiserror::Error;

use super::types::{Mesh, MeshBuilder};

/// Fewest stacks that still leave one ring between the poles
pub const MIN_STACKS: u32 = 2;
/// Fewest sectors that still close a ring of non-degenerate triangles
pub const MIN_SECTORS: u32 = 3;
/// Upper stack limit (keeps every index well inside `u32`)
pub const MAX_STACKS: u32 = 4096;
/// Upper sector limit (keeps every index well inside `u32`)
pub const MAX_SECTORS: u32 = 4096;

/// Why a sphere could not be generated
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GenerationError {
    #[error(
        "sphere needs at least 2 stacks and 3 sectors, got {stack_count} stacks and {sector_count} sectors"
    )]
    InsufficientResolution { stack_count: u32, sector_count: u32 },
    #[error(
        "sphere resolution of {stack_count} stacks by {sector_count} sectors exceeds the 4096 x 4096 limit"
    )]
    ResolutionTooHigh { stack_count: u32, sector_count: u32 },
    #[error("sphere radius must be finite and greater than 0, got {0}")]
    InvalidRadius(f32),
    #[error("sphere center must be finite, got {0}")]
    InvalidCenter(Vec3),
}

/// Parameters of a UV sphere
///
/// Stacks are latitude bands from the top pole (+Z) to the bottom pole (-Z);
/// sectors are longitude slices around the Z axis, starting at the +X meridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSpec {
    pub center: Vec3,
    pub radius: f32,
    pub stack_count: u32,
    pub sector_count: u32,
}

impl SphereSpec {
    pub fn new(center: Vec3, radius: f32, stack_count: u32, sector_count: u32) -> Self {
        Self {
            center,
            radius,
            stack_count,
            sector_count,
        }
    }

    /// Sphere centered at the origin
    pub fn centered(radius: f32, stack_count: u32, sector_count: u32) -> Self {
        Self::new(Vec3::ZERO, radius, stack_count, sector_count)
    }

    /// Check the parameters without generating anything
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.stack_count < MIN_STACKS || self.sector_count < MIN_SECTORS {
            return Err(GenerationError::InsufficientResolution {
                stack_count: self.stack_count,
                sector_count: self.sector_count,
            });
        }
        if self.stack_count > MAX_STACKS || self.sector_count > MAX_SECTORS {
            return Err(GenerationError::ResolutionTooHigh {
                stack_count: self.stack_count,
                sector_count: self.sector_count,
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GenerationError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(GenerationError::InvalidCenter(self.center));
        }
        Ok(())
    }

    /// Vertices per row, including the closing column at `u = 1.0`
    pub fn columns(&self) -> u32 {
        self.sector_count + 1
    }

    /// Number of vertices a valid spec generates: `(stacks + 1) × (sectors + 1)`
    pub fn vertex_count(&self) -> usize {
        (self.stack_count as usize + 1) * self.columns() as usize
    }

    /// Number of triangles a valid spec generates
    ///
    /// One fan triangle per sector at each pole plus two per sector for every
    /// band between interior rings: `2 × sectors × (stacks - 1)`.
    pub fn triangle_count(&self) -> usize {
        2 * self.sector_count as usize * (self.stack_count as usize).saturating_sub(1)
    }

    /// Number of indices a valid spec generates
    pub fn index_count(&self) -> usize {
        3 * self.triangle_count()
    }
}

/// Map any column number onto the sector whose meridian it lies on
///
/// Column `sector_count` (the closing column) maps back to sector 0.
#[inline]
pub fn wrap_sector(column: u32, sector_count: u32) -> u32 {
    column % sector_count
}

/// Sector to the right of `sector`, wrapping from the last sector to the first
#[inline]
pub fn next_sector(sector: u32, sector_count: u32) -> u32 {
    wrap_sector(sector + 1, sector_count)
}

/// Generate a UV sphere into a plain [`Mesh`]
pub fn generate(spec: &SphereSpec) -> Result<Mesh, GenerationError> {
    generate_sphere_uv(spec)
}

/// Generate a UV sphere mesh with equirectangular UV mapping
///
/// # Layout
/// Rows `0..=stack_count` of `sector_count + 1` vertices each. Row 0 holds the
/// top pole once per column and the last row the bottom pole, so every pole
/// copy can carry its own `u`. The last column repeats the positions of column
/// 0 bit for bit with `u = 1.0`, which closes the seam without UV wrap-around.
///
/// # UV Mapping
/// - U (horizontal): `column / sector_count`, 0 at the +X meridian, growing with theta
/// - V (vertical): `stack / stack_count`, 0 at the top pole, 1 at the bottom pole
///
/// # Winding
/// Triangles are counter-clockwise seen from outside the sphere, so
/// `cross(v1 - v0, v2 - v0)` points away from the center.
pub fn generate_sphere_uv<M: MeshBuilder>(spec: &SphereSpec) -> Result<M, GenerationError> {
    spec.validate()?;

    let SphereSpec {
        center,
        radius,
        stack_count,
        sector_count,
    } = *spec;

    let mut mesh = M::default();
    mesh.reserve(spec.vertex_count(), spec.index_count());

    let stacks = stack_count as f32;
    let sectors = sector_count as f32;

    // Top pole, once per column
    let top = center + Vec3::new(0.0, 0.0, radius);
    for column in 0..=sector_count {
        mesh.add_vertex(top, Vec2::new(column as f32 / sectors, 0.0));
    }

    // Interior rings, phi runs from +PI/2 (top) to -PI/2 (bottom)
    for stack in 1..stack_count {
        let phi = FRAC_PI_2 - PI * (stack as f32 / stacks);
        let ring_radius = radius * phi.cos();
        let z = radius * phi.sin();
        let v = stack as f32 / stacks;

        for column in 0..=sector_count {
            let sector = wrap_sector(column, sector_count);
            let theta = 2.0 * PI * (sector as f32 / sectors);
            let offset = Vec3::new(ring_radius * theta.cos(), ring_radius * theta.sin(), z);

            mesh.add_vertex(center + offset, Vec2::new(column as f32 / sectors, v));
        }
    }

    // Bottom pole, once per column
    let bottom = center - Vec3::new(0.0, 0.0, radius);
    for column in 0..=sector_count {
        mesh.add_vertex(bottom, Vec2::new(column as f32 / sectors, 1.0));
    }

    let columns = spec.columns();
    let vertex = |stack: u32, column: u32| stack * columns + column;
    let last_band = stack_count - 1;

    for stack in 0..stack_count {
        for sector in 0..sector_count {
            // The right-hand column of the last sector is the closing column
            let top_left = vertex(stack, sector);
            let top_right = vertex(stack, sector + 1);
            let bottom_left = vertex(stack + 1, sector);
            let bottom_right = vertex(stack + 1, sector + 1);

            if stack == 0 {
                // Top pole fan
                mesh.add_triangle(top_left, bottom_left, bottom_right);
            } else if stack == last_band {
                // Bottom pole fan
                mesh.add_triangle(top_left, bottom_left, top_right);
            } else {
                mesh.add_triangle(top_left, bottom_left, bottom_right);
                mesh.add_triangle(top_left, bottom_right, top_right);
            }
        }
    }

    Ok(mesh)
}
