//! Vertex data written into a batch.
//!
//! The layout mirrors what a 2D line/quad shader consumes: a homogeneous position and an
//! 8-bit RGBA color.

/// A vertex of chunk, boundary, or miner geometry.
///
/// # Memory Layout
/// - Position: 4x f32 (16 bytes)
/// - Color: 4x u8 (4 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Homogeneous world-space position (x, y, z, w)
    pub position: [f32; 4],
    /// RGBA color
    pub color: [u8; 4],
}

impl Vertex {
    /// Creates an opaque vertex from a position and an RGB color.
    pub fn new(position: [f32; 4], rgb: [u8; 3]) -> Self {
        Vertex {
            position,
            color: [rgb[0], rgb[1], rgb[2], u8::MAX],
        }
    }

    /// Returns the vertex buffer layout description for a wgpu pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec4<f32>)
    /// - `location = 1`: color (vec4<f32>, normalized from u8)
    #[cfg(feature = "wgpu")]
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 2] = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x4,
            },
            wgpu::VertexAttribute {
                offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                shader_location: 1,
                format: wgpu::VertexFormat::Unorm8x4,
            },
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        let vertex = Vertex::new([1.0, 2.0, 0.0, 1.0], [0x3e, 0x41, 0x4e]);
        assert_eq!(bytemuck::bytes_of(&vertex).len(), 20);
        assert_eq!(vertex.color, [0x3e, 0x41, 0x4e, 0xff]);
    }
}
