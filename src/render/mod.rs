//! GPU rendering.
//!
//! The renderer owns its GPU resources (pipeline, vertex buffer) and issues
//! commands via wgpu. Geometry is authored directly in normalized device
//! coordinates; the vertex shader passes positions through unchanged.

mod mesh;
mod triangle;

pub use triangle::TriangleRenderer;
