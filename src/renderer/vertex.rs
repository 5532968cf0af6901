//! Vertex and uniform types for slice rendering

use bytemuck::{Pod, Zeroable};

/// Template position, uploaded once
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct TemplateVertex {
    pub position: [f32; 2],
}

/// Per-vertex translation, rewritten every frame for live slots
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct OffsetVertex {
    pub offset: [f32; 2],
}

impl TemplateVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TemplateVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

impl OffsetVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OffsetVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Slice colour uniform (one per draw, selected with a dynamic offset)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SliceUniform {
    pub colour: [f32; 4],
}

/// Dynamic uniform offsets must be multiples of this on every backend
pub const UNIFORM_STRIDE: u64 = 256;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::VERTEX_SIZE;

    #[test]
    fn test_vertex_sizes_match_buffer_stride() {
        assert_eq!(std::mem::size_of::<TemplateVertex>() as u64, VERTEX_SIZE);
        assert_eq!(std::mem::size_of::<OffsetVertex>() as u64, VERTEX_SIZE);
        assert_eq!(std::mem::size_of::<glam::Vec2>() as u64, VERTEX_SIZE);
    }
}
