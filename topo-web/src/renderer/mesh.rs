//! Terrain mesh - subdivided square grid in plane-local XY
//!
//! Vertices carry only their flat plane position; height is computed in the
//! vertex shader every frame.

use wgpu::util::DeviceExt;

/// Vertex of the flat terrain grid
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub plane_pos: [f32; 2],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Float32x2
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Grid vertices, row by row from +Y down to -Y, X increasing along each row
pub fn create_grid_vertices(size: f32, segments: u32) -> Vec<Vertex> {
    let segments = segments.max(1);
    let half = size * 0.5;
    let step = size / segments as f32;
    let row = segments as usize + 1;

    let mut vertices = Vec::with_capacity(row * row);
    for iy in 0..=segments {
        let y = half - iy as f32 * step;
        for ix in 0..=segments {
            vertices.push(Vertex {
                plane_pos: [ix as f32 * step - half, y],
            });
        }
    }
    vertices
}

/// Two counter-clockwise triangles per cell (front face toward +Z)
pub fn create_grid_indices(segments: u32) -> Vec<u32> {
    let segments = segments.max(1);
    let row = segments + 1;

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for iy in 0..segments {
        for ix in 0..segments {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = (ix + 1) + row * (iy + 1);
            let d = (ix + 1) + row * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    indices
}

/// Uploaded terrain grid
pub struct TerrainMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub size: f32,
    pub segments: u32,
}

impl TerrainMesh {
    pub fn new(device: &wgpu::Device, size: f32, segments: u32) -> Self {
        let vertices = create_grid_vertices(size, segments);
        let indices = create_grid_indices(segments);

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Terrain Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "🗺️ Terrain mesh: {} vertices, {} triangles",
            vertices.len(),
            indices.len() / 3
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            size,
            segments: segments.max(1),
        }
    }

    pub fn matches(&self, size: f32, segments: u32) -> bool {
        self.size == size && self.segments == segments.max(1)
    }
}
