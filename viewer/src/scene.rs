//! The globe and the space sphere around it
//!
//! Meshes are generated on the CPU first ([`SceneMeshes::generate`], both
//! spheres in parallel), then handed to [`Scene::upload`] which moves them to
//! the GPU and drops the host copies.

use std::path::Path;

use anyhow::{Context, Result};
use globe_core::config::Config;
use globe_core::procedural::{GenerationError, Mesh, MeshDump, SphereSpec, generate};

use crate::graphics::{
    Facing, Graphics, MeshBuffers, SphereTexture, SphereUniforms, decode_or_checkerboard,
};

/// Host-side meshes for both spheres
#[derive(Debug, Clone)]
pub struct SceneMeshes {
    pub earth: Mesh,
    pub space: Mesh,
}

impl SceneMeshes {
    /// Generate both spheres described by `config`, in parallel
    pub fn generate(config: &Config) -> Result<Self, GenerationError> {
        let earth_spec = config.earth.spec();
        let space_spec = config.space.spec();

        let (earth, space) = rayon::join(|| generate(&earth_spec), || generate(&space_spec));
        let meshes = Self {
            earth: earth?,
            space: space?,
        };

        log_mesh("earth", &earth_spec, &meshes.earth, config.debug.log_mesh);
        log_mesh("space", &space_spec, &meshes.space, config.debug.log_mesh);

        Ok(meshes)
    }
}

fn log_mesh(name: &str, spec: &SphereSpec, mesh: &Mesh, dump: bool) {
    tracing::debug!(
        "Generated {} sphere: {} stacks x {} sectors, {} vertices, {} triangles",
        name,
        spec.stack_count,
        spec.sector_count,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    if dump {
        tracing::trace!("{} mesh:\n{}", name, MeshDump(mesh));
    }
}

/// One uploaded, textured sphere
pub struct SphereObject {
    name: &'static str,
    facing: Facing,
    buffers: MeshBuffers,
    #[allow(dead_code)] // Keeps the texture alive for the bind group
    texture: SphereTexture,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl SphereObject {
    fn upload(
        graphics: &Graphics,
        name: &'static str,
        facing: Facing,
        mesh: &Mesh,
        texture_path: &Path,
    ) -> Result<Self> {
        let device = graphics.device();

        let buffers = MeshBuffers::upload(device, mesh, name)
            .with_context(|| format!("Failed to upload {name} mesh"))?;

        let pixels = decode_or_checkerboard(texture_path, graphics.max_texture_dimension());
        let texture = SphereTexture::upload(device, graphics.queue(), &pixels, name);

        let uniforms = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{name} Uniforms")),
            size: SphereUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name} Bind Group")),
            layout: &graphics.pipelines().bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(texture.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(graphics.sampler()),
                },
            ],
        });

        Ok(Self {
            name,
            facing,
            buffers,
            texture,
            uniforms,
            bind_group,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: SphereUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Record the draw; the matching pipeline must already be set
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        self.buffers.draw(pass);
    }
}

/// Everything drawn each frame
pub struct Scene {
    earth: SphereObject,
    space: SphereObject,
}

impl Scene {
    /// Upload both meshes and load both textures, consuming the host meshes
    pub fn upload(graphics: &Graphics, meshes: SceneMeshes, config: &Config) -> Result<Self> {
        let earth = SphereObject::upload(
            graphics,
            "Earth",
            Facing::Outside,
            &meshes.earth,
            &config.earth.texture,
        )?;
        let space = SphereObject::upload(
            graphics,
            "Space",
            Facing::Inside,
            &meshes.space,
            &config.space.texture,
        )?;

        tracing::info!(
            "Scene ready: {} + {} indices",
            earth.buffers.index_count(),
            space.buffers.index_count()
        );

        Ok(Self { earth, space })
    }

    /// Spheres in draw order
    pub fn spheres(&self) -> [&SphereObject; 2] {
        [&self.earth, &self.space]
    }
}
