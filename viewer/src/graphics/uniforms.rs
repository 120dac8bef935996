//! Per-sphere uniform data (`@group(0) @binding(0)` in globe.wgsl)

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Uniform block for one sphere draw
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SphereUniforms {
    /// projection × view × model, column-major
    pub mvp: [[f32; 4]; 4],
}

impl SphereUniforms {
    pub fn new(mvp: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
        }
    }

    /// Buffer size for one block
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;
}
