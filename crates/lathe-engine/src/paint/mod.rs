//! Color primitives shared by renderers.

mod color;

pub use color::Color;
