use bytemuck::{Pod, Zeroable};
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::config::SLIT_OVERLAY_COLOR;
use crate::simulation::{Pattern, Sample, SlitConfiguration};

/// One plotted sample: NDC position plus probability color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointVertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl PointVertex {
    pub fn from_sample(sample: &Sample) -> Self {
        Self {
            position: sample.position,
            color: probability_color(sample.probability),
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

/// Slit aperture overlay vertex (RGBA, alpha blended)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SlitVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl SlitVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SlitVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: 8,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Red for certain hits, blue for none: (p, 0, 1 - p)
pub fn probability_color(probability: f32) -> [f32; 3] {
    [probability, 0.0, 1.0 - probability]
}

/// Two full-height rectangles centered at x = ±separation/2, six vertices each
pub fn slit_vertices(slits: &SlitConfiguration) -> Vec<SlitVertex> {
    let half_width = slits.width / 2.0;
    let centers = [-slits.separation / 2.0, slits.separation / 2.0];

    centers
        .iter()
        .flat_map(|&cx| {
            let (left, right) = (cx - half_width, cx + half_width);
            [
                [left, -1.0],
                [right, -1.0],
                [right, 1.0],
                [left, -1.0],
                [right, 1.0],
                [left, 1.0],
            ]
        })
        .map(|position| SlitVertex {
            position,
            color: SLIT_OVERLAY_COLOR,
        })
        .collect()
}

/// Vertex buffers for the current pattern and the slit overlay
pub struct PatternBuffers {
    pub point_buffer: Buffer,
    pub slit_buffer: Buffer,
    point_count: u32,
    point_capacity: usize,
    slit_vertex_count: u32,
}

impl PatternBuffers {
    /// Allocate buffers sized for `capacity` points and upload the slit geometry
    pub fn new(device: &Device, queue: &Queue, capacity: usize, slits: &SlitConfiguration) -> Self {
        let point_capacity = capacity.max(1);
        let point_buffer = create_point_buffer(device, point_capacity);

        let slit_data = slit_vertices(slits);
        let slit_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("slit-vertex-buffer"),
            size: (slit_data.len() * std::mem::size_of::<SlitVertex>()) as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        queue.write_buffer(&slit_buffer, 0, bytemuck::cast_slice(&slit_data));

        Self {
            point_buffer,
            slit_buffer,
            point_count: 0,
            point_capacity,
            slit_vertex_count: slit_data.len() as u32,
        }
    }

    /// Replace the point data with `pattern`, growing the buffer if needed
    pub fn upload(&mut self, device: &Device, queue: &Queue, pattern: &Pattern) {
        if pattern.len() > self.point_capacity {
            log::debug!(
                "Growing point buffer from {} to {} vertices",
                self.point_capacity,
                pattern.len()
            );
            self.point_capacity = pattern.len();
            self.point_buffer = create_point_buffer(device, self.point_capacity);
        }

        let vertices: Vec<PointVertex> = pattern.samples().iter().map(PointVertex::from_sample).collect();
        if !vertices.is_empty() {
            queue.write_buffer(&self.point_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        self.point_count = vertices.len() as u32;
    }

    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    pub fn slit_vertex_count(&self) -> u32 {
        self.slit_vertex_count
    }
}

fn create_point_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("point-vertex-buffer"),
        size: (capacity * std::mem::size_of::<PointVertex>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_vertex_layout() {
        assert_eq!(std::mem::size_of::<PointVertex>(), 20);
        let layout = PointVertex::desc();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes.len(), 2);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn test_slit_vertex_layout() {
        assert_eq!(std::mem::size_of::<SlitVertex>(), 24);
        let layout = SlitVertex::desc();
        assert_eq!(layout.array_stride, 24);
        assert_eq!(layout.attributes.len(), 2);
    }

    #[test]
    fn test_probability_color_endpoints() {
        assert_eq!(probability_color(0.0), [0.0, 0.0, 1.0]);
        assert_eq!(probability_color(1.0), [1.0, 0.0, 0.0]);
        assert_eq!(probability_color(0.25), [0.25, 0.0, 0.75]);
    }

    #[test]
    fn test_point_vertex_from_sample() {
        let vertex = PointVertex::from_sample(&Sample::new([0.5, -0.25], 0.8));
        assert_eq!(vertex.position, [0.5, -0.25]);
        assert!((vertex.color[0] - 0.8).abs() < 1e-6);
        assert_eq!(vertex.color[1], 0.0);
        assert!((vertex.color[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_slit_vertices_follow_configuration() {
        let slits = SlitConfiguration::new(0.22, 0.03, 1.0, 0.05).unwrap();
        let vertices = slit_vertices(&slits);
        assert_eq!(vertices.len(), 12);

        let (left, right) = vertices.split_at(6);
        let bounds = |quad: &[SlitVertex]| {
            quad.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
                (lo.min(v.position[0]), hi.max(v.position[0]))
            })
        };

        let (l_lo, l_hi) = bounds(left);
        assert!((l_lo - (-0.125)).abs() < 1e-6);
        assert!((l_hi - (-0.095)).abs() < 1e-6);

        let (r_lo, r_hi) = bounds(right);
        assert!((r_lo - 0.095).abs() < 1e-6);
        assert!((r_hi - 0.125).abs() < 1e-6);

        for v in &vertices {
            assert!(v.position[1] == -1.0 || v.position[1] == 1.0);
            assert_eq!(v.color, SLIT_OVERLAY_COLOR);
        }
    }
}
