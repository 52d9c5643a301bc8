//! Colors and the light palette.
//!
//! All channels are normalized to 0.0-1.0. Colors handed to a raster are
//! unpremultiplied; colors read back from one are premultiplied.

/// RGBA color with floating point components
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl RGBA {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        RGBA { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        RGBA { r, g, b, a: 1.0 }
    }

    pub const fn transparent() -> Self {
        RGBA { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }
}

/// Colors a light can cycle through
pub const PALETTE: [RGBA; 7] = [
    RGBA::rgb(1.0, 1.0, 1.0),
    RGBA::rgb(1.0, 0.0, 0.0),
    RGBA::rgb(0.0, 1.0, 0.0),
    RGBA::rgb(0.0, 0.0, 1.0),
    RGBA::rgb(1.0, 1.0, 0.0),
    RGBA::rgb(1.0, 0.0, 1.0),
    RGBA::rgb(0.0, 1.0, 1.0),
];

pub fn palette_color(index: usize) -> RGBA {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_basics() {
        let color = RGBA::new(0.5, 0.75, 0.25, 0.9);
        assert_eq!((color.r, color.g, color.b, color.a), (0.5, 0.75, 0.25, 0.9));
        assert_eq!(RGBA::rgb(0.1, 0.2, 0.3).a, 1.0);
        assert_eq!(RGBA::transparent().a, 0.0);
    }

    #[test]
    fn test_palette_wraps() {
        assert_eq!(PALETTE.len(), 7);
        assert_eq!(palette_color(0), palette_color(7));
        assert_eq!(palette_color(3), RGBA::rgb(0.0, 0.0, 1.0));
    }
}
