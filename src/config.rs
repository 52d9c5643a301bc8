//! Tunable constants of the lighting model

use serde::{Deserialize, Serialize};

/// Light circles are drawn this far higher on walls than on the floor
pub const WALL_Y_OFFSET: f32 = 50.0;

/// Wall shadow height is the shadow's reach past the baseline times this
pub const WALL_SHADOW_LENGTH: f32 = 1.5;

/// Interactive resizing never shrinks a light below this radius
pub const MIN_LIGHT_RADIUS: f32 = 20.0;

/// Lighting parameters shared by every light in a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Upward shift of the wall lightmap relative to the floor lightmap
    pub wall_y_offset: f32,
    /// Amplification of wall shadow bands
    pub wall_shadow_length: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            wall_y_offset: WALL_Y_OFFSET,
            wall_shadow_length: WALL_SHADOW_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: LightingConfig = serde_json::from_str(r#"{ "wall_shadow_length": 1.4 }"#).unwrap();
        assert_eq!(cfg.wall_shadow_length, 1.4);
        assert_eq!(cfg.wall_y_offset, WALL_Y_OFFSET);
    }
}
