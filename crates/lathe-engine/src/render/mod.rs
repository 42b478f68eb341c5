//! GPU rendering helpers for drawables built on the wgpu backend.
//!
//! Convention:
//! - CPU geometry is in physical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.
//! - Depth is in `[0, 1]`, nearer is smaller.

mod common;
mod quad;

pub use quad::{Quad, QuadRenderer};
