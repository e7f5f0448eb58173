//! Render configuration shared by the scheduler and compositor.

use serde::{Deserialize, Serialize};

use crate::types::Resolution;

/// Background color of the preview canvas.
pub const DEFAULT_BACKGROUND: [u8; 4] = [0x10, 0x15, 0x1c, 0xff];

/// Settings for the render target.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Output buffer dimensions.
    pub resolution: Resolution,
    /// Opaque background color, painted before the base layer.
    pub background: [u8; 4],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            resolution: Resolution::HD,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl RenderSettings {
    pub fn with_resolution(resolution: Resolution) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let s = RenderSettings::default();
        assert_eq!(s.resolution, Resolution::HD);
        assert_eq!(s.background[3], 0xff);
    }

    #[test]
    fn with_resolution_keeps_background() {
        let s = RenderSettings::with_resolution(Resolution::new(640, 360));
        assert_eq!(s.resolution, Resolution::new(640, 360));
        assert_eq!(s.background, DEFAULT_BACKGROUND);
    }
}
