//! Turning lighting layers into displayable pixels and image files

use crate::color::RGBA;
use crate::raster::{BlendMode, Raster};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Convert a float value (0.0-1.0) to a byte (0-255)
#[inline]
pub fn to_byte(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Pack a color as 0x00RRGGBB (the layout minifb expects)
#[inline]
pub fn to_argb(color: RGBA) -> u32 {
    let r = to_byte(color.r) as u32;
    let g = to_byte(color.g) as u32;
    let b = to_byte(color.b) as u32;
    (r << 16) | (g << 8) | b
}

/// Light a base image: `base * (ambient screen floor screen wall)`.
///
/// The floor layer is already dark under walls and the wall layer is empty
/// off wall faces, so the two can simply be screened together.
pub fn shade(base: &Raster, floor: &Raster, wall: &Raster, ambient: RGBA) -> Raster {
    let mut light = Raster::new(base.width(), base.height());
    light.origin = base.origin;
    light.fill(ambient);
    light.draw(floor, BlendMode::Screen, None);
    light.draw(wall, BlendMode::Screen, None);

    let mut out = base.clone();
    out.draw(&light, BlendMode::Multiply, None);
    out
}

/// Save a raster to a plain-text PPM file
pub fn save_ppm(raster: &Raster, filename: &str) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "P3")?;
    writeln!(file, "{} {}", raster.width(), raster.height())?;
    writeln!(file, "255")?;

    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let pixel = raster.get(x, y);
            write!(file, "{} {} {} ", to_byte(pixel.r), to_byte(pixel.g), to_byte(pixel.b))?;
        }
        writeln!(file)?;
    }

    file.flush()
}
