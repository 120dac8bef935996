//! GPU buffers for generated sphere meshes
//!
//! A mesh is uploaded once into three buffers that mirror its three arrays:
//! positions (vertex slot 0), texcoords (vertex slot 1) and `u32` indices.

use globe_core::procedural::{Mesh, MeshDefect};
use thiserror::Error;
use wgpu::util::DeviceExt;

/// Attributes of vertex slot 0: position
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![0 => Float32x3];

/// Attributes of vertex slot 1: texture coordinates
const TEXCOORD_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![1 => Float32x2];

/// Bytes per position (3 × f32)
pub const POSITION_STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;

/// Bytes per texcoord (2 × f32)
pub const TEXCOORD_STRIDE: u64 = std::mem::size_of::<[f32; 2]>() as u64;

/// Why a mesh was not uploaded
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("mesh '{0}' has no triangles")]
    Empty(String),
    #[error("mesh '{label}' is malformed: {defect}")]
    Malformed {
        label: String,
        #[source]
        defect: MeshDefect,
    },
}

/// Vertex buffer layouts matching [`MeshBuffers`], in slot order
pub fn vertex_buffer_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [
        wgpu::VertexBufferLayout {
            array_stride: POSITION_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRIBUTES,
        },
        wgpu::VertexBufferLayout {
            array_stride: TEXCOORD_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &TEXCOORD_ATTRIBUTES,
        },
    ]
}

/// Check that a mesh can be drawn before touching the GPU
pub fn check_uploadable(mesh: &Mesh, label: &str) -> Result<(), UploadError> {
    if mesh.is_empty() {
        return Err(UploadError::Empty(label.to_string()));
    }
    mesh.check_invariants()
        .map_err(|defect| UploadError::Malformed {
            label: label.to_string(),
            defect,
        })
}

/// Uploaded mesh, ready for indexed drawing
///
/// Owns its buffers and destroys them when dropped.
pub struct MeshBuffers {
    positions: wgpu::Buffer,
    texcoords: wgpu::Buffer,
    indices: wgpu::Buffer,
    vertex_count: u32,
    index_count: u32,
}

impl MeshBuffers {
    /// Upload all three arrays of `mesh`
    pub fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Result<Self, UploadError> {
        check_uploadable(mesh, label)?;

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Positions")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let texcoords = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Texcoords")),
            contents: bytemuck::cast_slice(&mesh.texcoords),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Indices")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let buffers = Self {
            positions,
            texcoords,
            indices,
            vertex_count: mesh.vertex_count() as u32,
            index_count: mesh.indices.len() as u32,
        };

        tracing::debug!(
            "Uploaded mesh '{}': {} vertices, {} indices, {} bytes",
            label,
            buffers.vertex_count,
            buffers.index_count,
            buffers.size_bytes()
        );

        Ok(buffers)
    }

    /// Bind the buffers and draw every triangle
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.positions.slice(..));
        pass.set_vertex_buffer(1, self.texcoords.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Total GPU memory held by the three buffers
    pub fn size_bytes(&self) -> u64 {
        self.positions.size() + self.texcoords.size() + self.indices.size()
    }
}

impl Drop for MeshBuffers {
    fn drop(&mut self) {
        self.positions.destroy();
        self.texcoords.destroy();
        self.indices.destroy();
    }
}
