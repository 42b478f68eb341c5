use crate::config::Configuration;
use crate::paint::Color;

/// Initialization parameters for the GPU layer.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior). Derived from `vsync`.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,

    /// Multisample count for color and depth. Must be supported by the adapter.
    pub sample_count: u32,

    /// Color the frame is cleared to before the opaque pass.
    pub clear_color: Color,
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
            sample_count: 1,
            clear_color: Color::from_premul(0.02, 0.02, 0.03, 1.0),
        }
    }
}

impl GpuInit {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            present_mode: present_mode_for(config.vsync),
            sample_count: config.sample_count,
            ..Self::default()
        }
    }
}

pub(crate) fn present_mode_for(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::Fifo
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_maps_vsync_and_samples() {
        let config = Configuration {
            vsync: false,
            sample_count: 4,
            ..Configuration::default()
        };
        let init = GpuInit::from_config(&config);
        assert_eq!(init.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(init.sample_count, 4);

        let init = GpuInit::from_config(&Configuration::default());
        assert_eq!(init.present_mode, wgpu::PresentMode::Fifo);
        assert_eq!(init.sample_count, 1);
    }
}
