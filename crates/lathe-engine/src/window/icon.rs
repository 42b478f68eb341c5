use std::path::Path;

use anyhow::{Context, Result};
use winit::window::Icon;

/// Loads a window icon from an image file.
pub fn load_icon(path: &Path) -> Result<Icon> {
    let image = image::open(path)
        .with_context(|| format!("failed to decode icon {}", path.display()))?
        .into_rgba8();
    let (width, height) = image.dimensions();

    Icon::from_rgba(image.into_raw(), width, height).context("icon pixel data rejected")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_icon_is_an_error() {
        let err = load_icon(Path::new("/nonexistent/lathe/icon.png")).unwrap_err();
        assert!(err.to_string().contains("failed to decode icon"));
    }
}
