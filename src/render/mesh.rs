//! Static triangle geometry and its GPU layout.

use bytemuck::{Pod, Zeroable};

/// One vertex: a position in normalized device coordinates.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct Vertex {
    pub pos: [f32; 3],
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];

    /// Tightly packed, one attribute at shader location 0.
    pub(super) fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Counter-clockwise triangle: bottom-left, bottom-right, top.
pub(super) const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex { pos: [-0.5, -0.5, 0.0] },
    Vertex { pos: [0.5, -0.5, 0.0] },
    Vertex { pos: [0.0, 0.5, 0.0] },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_is_nine_floats() {
        let raw: &[f32] = bytemuck::cast_slice(&TRIANGLE_VERTICES);
        assert_eq!(raw.len(), 9);
    }

    #[test]
    fn triangle_coordinates_are_exact() {
        assert_eq!(TRIANGLE_VERTICES[0].pos, [-0.5, -0.5, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[1].pos, [0.5, -0.5, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[2].pos, [0.0, 0.5, 0.0]);
    }

    #[test]
    fn triangle_winding_is_counter_clockwise() {
        // Positive z of the 2D cross product of the two edges means CCW
        // with +Y up, which is the NDC convention.
        let [a, b, c] = TRIANGLE_VERTICES.map(|v| v.pos);
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross > 0.0, "winding flipped: cross = {cross}");
    }

    #[test]
    fn vertex_layout_matches_shader_input() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, 0);
        assert_eq!(layout.attributes[0].offset, 0);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }
}
