use std::path::Path;

use wgpu::{Device, PrimitiveTopology, RenderPipeline as WgpuRenderPipeline, TextureFormat, TextureView};

use crate::config::CLEAR_COLOR;
use crate::gpu::buffers::{PatternBuffers, PointVertex, SlitVertex};
use crate::gpu::RenderError;

/// A render pipeline compiled from a WGSL file on disk
pub struct RenderPipeline {
    pipeline: WgpuRenderPipeline,
}

impl RenderPipeline {
    /// Read, compile and link the shader at `shader_path`.
    ///
    /// Validation errors from wgpu are captured and returned instead of
    /// reaching the uncaptured error handler.
    pub fn new(
        device: &Device,
        format: TextureFormat,
        shader_path: &Path,
        vertex_layout: wgpu::VertexBufferLayout<'static>,
        topology: PrimitiveTopology,
        blend: wgpu::BlendState,
    ) -> Result<Self, RenderError> {
        let path_str = shader_path.display().to_string();
        let source = read_shader(shader_path)?;
        log::info!("Compiling shader {}", path_str);

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(path_str.as_str()),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render-pipeline-layout"),
            bind_group_layouts: &[],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(path_str.as_str()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderError::ShaderCompile {
                path: path_str,
                message: error.to_string(),
            });
        }

        Ok(Self { pipeline })
    }
}

/// Load WGSL source from disk
pub fn read_shader(path: &Path) -> Result<String, RenderError> {
    std::fs::read_to_string(path).map_err(|source| RenderError::ShaderIo {
        path: path.display().to_string(),
        source,
    })
}

/// Owns every pipeline needed to draw a pattern and its slit overlay
pub struct Renderer {
    points: RenderPipeline,
    slits: RenderPipeline,
}

impl Renderer {
    pub fn new(
        device: &Device,
        format: TextureFormat,
        point_shader: &Path,
        slit_shader: &Path,
    ) -> Result<Self, RenderError> {
        log::info!("Creating point pipeline...");
        let points = RenderPipeline::new(
            device,
            format,
            point_shader,
            PointVertex::desc(),
            PrimitiveTopology::PointList,
            wgpu::BlendState::REPLACE,
        )?;

        log::info!("Creating slit overlay pipeline...");
        let slits = RenderPipeline::new(
            device,
            format,
            slit_shader,
            SlitVertex::desc(),
            PrimitiveTopology::TriangleList,
            wgpu::BlendState::ALPHA_BLENDING,
        )?;

        Ok(Self { points, slits })
    }

    /// Clear the target, plot the points, then the overlay if requested
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &TextureView,
        buffers: &PatternBuffers,
        show_slits: bool,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pattern-render-pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if buffers.point_count() > 0 {
            pass.set_pipeline(&self.points.pipeline);
            pass.set_vertex_buffer(0, buffers.point_buffer.slice(..));
            pass.draw(0..buffers.point_count(), 0..1);
        }

        if show_slits {
            pass.set_pipeline(&self.slits.pipeline);
            pass.set_vertex_buffer(0, buffers.slit_buffer.slice(..));
            pass.draw(0..buffers.slit_vertex_count(), 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{POINT_SHADER_PATH, SLIT_SHADER_PATH};

    #[test]
    fn test_missing_shader_is_reported() {
        let result = read_shader(Path::new("does/not/exist.wgsl"));
        match result {
            Err(RenderError::ShaderIo { path, .. }) => assert_eq!(path, "does/not/exist.wgsl"),
            other => panic!("expected ShaderIo, got {:?}", other),
        }
    }

    #[test]
    fn test_bundled_shaders_have_entry_points() {
        for path in [POINT_SHADER_PATH, SLIT_SHADER_PATH] {
            let source = read_shader(Path::new(path)).unwrap();
            assert!(source.contains("fn vs_main"), "{} lacks vs_main", path);
            assert!(source.contains("fn fs_main"), "{} lacks fs_main", path);
        }
    }
}
