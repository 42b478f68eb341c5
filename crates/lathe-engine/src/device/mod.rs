//! wgpu backend.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain) plus depth/MSAA targets
//! - validating the requested sample count against the adapter
//! - acquiring frames and exposing a [`PassTarget`] to drawables

mod frame;
mod gpu;
mod init;
mod surface;
mod targets;

pub use frame::PassTarget;
pub use gpu::WgpuBackend;
pub use init::GpuInit;
pub use targets::DEPTH_FORMAT;
