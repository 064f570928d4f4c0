use anyhow::{bail, Result};
use wgpu::util::DeviceExt;

use super::mesh::{Vertex, TRIANGLE_VERTICES};

const SHADER_SRC: &str = include_str!("shaders/triangle.wgsl");

/// The loop only clears and redraws; black keeps the triangle color exact
/// against an unambiguous background.
const CLEAR_COLOR: wgpu::Color = wgpu::Color::BLACK;

/// Renderer for the fixed triangle.
///
/// All GPU resources are created up front, before the render loop starts,
/// and are never mutated afterwards. Dropping the renderer releases them.
pub struct TriangleRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
}

impl TriangleRenderer {
    /// Builds the pipeline and uploads the static vertex buffer.
    ///
    /// Shader and pipeline creation run inside a validation error scope so a
    /// broken shader surfaces as an error here rather than as a blank window.
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Result<Self> {
        let error_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("triangle shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SRC.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("triangle pipeline layout"),
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("triangle vbo"),
            contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        if let Some(err) = pollster::block_on(error_scope.pop()) {
            bail!("shader build failed: {err}");
        }

        Ok(Self {
            pipeline,
            vertex_buffer,
        })
    }

    /// Records one frame: clear, bind pipeline + vertex buffer, draw.
    pub fn draw(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("triangle pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_color_is_the_orange_constant() {
        // Every covered pixel must come out as RGBA (1.0, 0.5, 0.2, 1.0).
        assert!(SHADER_SRC.contains("vec4<f32>(1.0, 0.5, 0.2, 1.0)"));
    }

    #[test]
    fn shader_declares_both_entry_points() {
        assert!(SHADER_SRC.contains("fn vs_main"));
        assert!(SHADER_SRC.contains("fn fs_main"));
    }

    #[test]
    fn vertex_stage_reads_location_zero() {
        assert!(SHADER_SRC.contains("@location(0) pos: vec3<f32>"));
    }

    #[test]
    fn clear_color_is_opaque_black() {
        assert_eq!(CLEAR_COLOR.r, 0.0);
        assert_eq!(CLEAR_COLOR.g, 0.0);
        assert_eq!(CLEAR_COLOR.b, 0.0);
        assert_eq!(CLEAR_COLOR.a, 1.0);
    }
}
