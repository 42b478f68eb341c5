use winit::dpi::PhysicalSize;

use crate::config::SUPPORTED_SAMPLE_COUNTS;
use crate::core::FrameError;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    choose_format(&caps.formats, prefer_srgb)
}

fn choose_format(formats: &[wgpu::TextureFormat], prefer_srgb: bool) -> Option<wgpu::TextureFormat> {
    let first = *formats.first()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Falls back to FIFO, which every surface supports.
pub(crate) fn choose_present_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: wgpu::PresentMode,
) -> wgpu::PresentMode {
    match requested {
        wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync => requested,
        mode if caps.present_modes.contains(&mode) => mode,
        mode => {
            log::warn!("present mode {mode:?} unsupported; using Fifo");
            wgpu::PresentMode::Fifo
        }
    }
}

/// Sample counts usable for both the color format and the depth format.
pub(crate) fn supported_sample_counts(
    color: wgpu::TextureFormatFeatureFlags,
    depth: wgpu::TextureFormatFeatureFlags,
) -> Vec<u32> {
    SUPPORTED_SAMPLE_COUNTS
        .into_iter()
        .filter(|&n| n == 1 || (color.sample_count_supported(n) && depth.sample_count_supported(n)))
        .collect()
}

pub(crate) fn apply_resize(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &mut wgpu::SurfaceConfiguration,
    size: &mut PhysicalSize<u32>,
    new_size: PhysicalSize<u32>,
) -> bool {
    *size = new_size;

    // wgpu does not accept a 0x0 configuration; defer until a real size arrives.
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }

    config.width = new_size.width;
    config.height = new_size.height;
    surface.configure(device, config);
    true
}

pub(crate) fn map_surface_error(
    surface: &wgpu::Surface,
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    err: wgpu::SurfaceError,
) -> FrameError {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
            if size.width > 0 && size.height > 0 {
                surface.configure(device, config);
            }
            FrameError::Transient(format!("surface {err}; reconfigured"))
        }
        wgpu::SurfaceError::OutOfMemory => FrameError::Lost(err.to_string()),
        wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => {
            FrameError::Transient(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wgpu::TextureFormat as F;
    use wgpu::TextureFormatFeatureFlags as Flags;

    #[test]
    fn prefers_srgb_when_available() {
        let formats = [F::Bgra8Unorm, F::Rgba8UnormSrgb];
        assert_eq!(choose_format(&formats, true), Some(F::Rgba8UnormSrgb));
        assert_eq!(choose_format(&formats, false), Some(F::Bgra8Unorm));
    }

    #[test]
    fn no_formats_is_none() {
        assert_eq!(choose_format(&[], true), None);
    }

    #[test]
    fn sample_counts_require_both_formats() {
        let color = Flags::MULTISAMPLE_X4 | Flags::MULTISAMPLE_X8;
        let depth = Flags::MULTISAMPLE_X4;
        assert_eq!(supported_sample_counts(color, depth), vec![1, 4]);
    }

    #[test]
    fn single_sample_is_always_supported() {
        assert_eq!(supported_sample_counts(Flags::empty(), Flags::empty()), vec![1]);
    }
}
