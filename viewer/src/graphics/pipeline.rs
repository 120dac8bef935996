//! Sphere render pipelines
//!
//! One shader, two pipelines that differ only in culling: spheres seen from
//! outside (the globe) keep their front faces, spheres seen from inside (the
//! space backdrop) keep their back faces. Both meshes are wound
//! counter-clockwise seen from outside.

use super::buffer::vertex_buffer_layouts;

/// Which side of a sphere the camera sees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Outside,
    Inside,
}

impl Facing {
    /// Face to cull for this side
    pub fn cull_mode(self) -> wgpu::Face {
        match self {
            Facing::Outside => wgpu::Face::Back,
            Facing::Inside => wgpu::Face::Front,
        }
    }
}

/// Depth format shared by the pipelines and the depth buffer
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Create the layout for `@group(0)`: uniforms, texture, sampler
pub fn create_sphere_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Sphere Bind Group Layout"),
        entries: &[
            // Binding 0: MVP uniforms
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(super::SphereUniforms::SIZE),
                },
                count: None,
            },
            // Binding 1: surface texture
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            // Binding 2: sampler
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Both sphere pipelines plus their shared bind group layout
pub struct SpherePipelines {
    pub bind_group_layout: wgpu::BindGroupLayout,
    outside: wgpu::RenderPipeline,
    inside: wgpu::RenderPipeline,
}

impl SpherePipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        polygon_mode: wgpu::PolygonMode,
    ) -> Self {
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Globe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../../shaders/globe.wgsl").into()),
        });

        let bind_group_layout = create_sphere_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Sphere Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let outside = create_pipeline(
            device,
            &pipeline_layout,
            &shader_module,
            surface_format,
            polygon_mode,
            Facing::Outside,
        );
        let inside = create_pipeline(
            device,
            &pipeline_layout,
            &shader_module,
            surface_format,
            polygon_mode,
            Facing::Inside,
        );

        Self {
            bind_group_layout,
            outside,
            inside,
        }
    }

    pub fn get(&self, facing: Facing) -> &wgpu::RenderPipeline {
        match facing {
            Facing::Outside => &self.outside,
            Facing::Inside => &self.inside,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader_module: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
    facing: Facing,
) -> wgpu::RenderPipeline {
    let buffers = vertex_buffer_layouts();

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(match facing {
            Facing::Outside => "Sphere Pipeline (outside)",
            Facing::Inside => "Sphere Pipeline (inside)",
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader_module,
            entry_point: Some("vs_main"),
            buffers: &buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader_module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(facing.cull_mode()),
            unclipped_depth: false,
            polygon_mode,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cull_modes() {
        assert_eq!(Facing::Outside.cull_mode(), wgpu::Face::Back);
        assert_eq!(Facing::Inside.cull_mode(), wgpu::Face::Front);
    }
}
