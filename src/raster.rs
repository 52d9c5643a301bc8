//! Raster buffers backed by tiny-skia pixmaps.
//!
//! A [`Raster`] is a [`Pixmap`] placed in scene space by its `origin`.
//! Shapes are given in scene coordinates and filled without anti-aliasing,
//! so adjacent shadow quads never leave seams.
//!
//! Pixels are premultiplied RGBA, as tiny-skia stores them. For a light
//! layer the color channels are the light's contribution at that pixel, and
//! screen/multiply apply per channel to those values.

use std::fmt;

use tiny_skia::{
    Color, FillRule, FilterQuality, GradientStop, IntSize, Mask, Paint, PathBuilder, Pixmap,
    PixmapPaint, Point, PremultipliedColorU8, RadialGradient, Rect, SpreadMode, Transform,
};

use crate::color::RGBA;
use crate::geometry::Vec2;

/// How source pixels combine with the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// `1 - (1 - dst)(1 - src)`
    Screen,
    /// `dst * src`
    Multiply,
}

impl From<BlendMode> for tiny_skia::BlendMode {
    fn from(mode: BlendMode) -> Self {
        match mode {
            BlendMode::Screen => tiny_skia::BlendMode::Screen,
            BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        }
    }
}

fn to_color(c: RGBA) -> Color {
    let unit = |v: f32| v.clamp(0.0, 1.0);
    Color::from_rgba(unit(c.r), unit(c.g), unit(c.b), unit(c.a)).unwrap_or(Color::TRANSPARENT)
}

fn to_rgba(p: PremultipliedColorU8) -> RGBA {
    let unit = |v: u8| v as f32 / 255.0;
    RGBA::new(unit(p.red()), unit(p.green()), unit(p.blue()), unit(p.alpha()))
}

/// Maps scene space onto the pixel grid of something anchored at `origin`
fn local(origin: Vec2) -> Transform {
    Transform::from_translate(-origin.x, -origin.y)
}

fn solid(color: RGBA) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_color(color));
    paint.blend_mode = tiny_skia::BlendMode::Source;
    paint.anti_alias = false;
    paint
}

// ============================================================================
// Paths
// ============================================================================

/// A set of closed polygon contours in scene space
#[derive(Debug, Clone, Default)]
pub struct Path {
    contours: Vec<Vec<Vec2>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn polygon(points: &[Vec2]) -> Self {
        let mut path = Path::new();
        path.add_polygon(points);
        path
    }

    /// Add a closed contour. Fewer than three points describe no area and
    /// are ignored.
    pub fn add_polygon(&mut self, points: &[Vec2]) {
        if points.len() >= 3 {
            self.contours.push(points.to_vec());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    fn push_contour(pb: &mut PathBuilder, contour: &[Vec2]) {
        let Some((first, rest)) = contour.split_first() else {
            return;
        };
        pb.move_to(first.x, first.y);
        for p in rest {
            pb.line_to(p.x, p.y);
        }
        pb.close();
    }

    /// `None` when there is nothing to fill
    fn build(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        for contour in &self.contours {
            Self::push_contour(&mut pb, contour);
        }
        pb.finish()
    }
}

// ============================================================================
// Clip mask
// ============================================================================

/// Coverage used to restrict drawing, aligned with the raster it was built
/// for. Empty rasters get an empty mask.
#[derive(Clone)]
pub struct ClipMask {
    mask: Option<Mask>,
    origin: Vec2,
}

impl ClipMask {
    /// Rasterize `path` into the pixel grid of `target`.
    pub fn from_path(path: &Path, target: &Raster) -> Self {
        let origin = target.origin;
        let mut mask = Mask::new(target.width() as u32, target.height() as u32);
        if let (Some(mask), Some(shape)) = (mask.as_mut(), path.build()) {
            mask.fill_path(&shape, FillRule::Winding, false, local(origin));
        }
        ClipMask { mask, origin }
    }

    /// Remove the area of `path` from the mask. Every contour is cut out on
    /// its own, so overlapping cut-outs stay cut.
    pub fn exclude(&mut self, path: &Path) {
        let Some(mask) = self.mask.as_mut() else {
            return;
        };
        let Some(frame) = Rect::from_xywh(
            self.origin.x,
            self.origin.y,
            mask.width() as f32,
            mask.height() as f32,
        ) else {
            return;
        };

        for contour in &path.contours {
            // Everything but the contour: the frame plus the contour under even-odd
            let mut pb = PathBuilder::new();
            pb.push_rect(frame);
            Path::push_contour(&mut pb, contour);
            if let Some(outside) = pb.finish() {
                mask.intersect_path(&outside, FillRule::EvenOdd, false, local(self.origin));
            }
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.mask.as_ref().is_some_and(|m| {
            let width = m.width() as usize;
            x < width && m.data().get(y * width + x).is_some_and(|&v| v > 0)
        })
    }

    pub fn coverage(&self) -> usize {
        self.mask.as_ref().map_or(0, |m| m.data().iter().filter(|&&v| v > 0).count())
    }
}

// ============================================================================
// Raster
// ============================================================================

/// A pixmap anchored at a scene-space origin.
///
/// tiny-skia has no zero-sized pixmaps, so an empty raster holds none and
/// every drawing operation on it is a no-op.
#[derive(Clone)]
pub struct Raster {
    pixmap: Option<Pixmap>,
    /// Scene position of the top-left corner of pixel (0, 0)
    pub origin: Vec2,
}

impl fmt::Debug for Raster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raster")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("origin", &self.origin)
            .finish()
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.width() == other.width()
            && self.height() == other.height()
            && self.data() == other.data()
    }
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Self {
        Raster { pixmap: Pixmap::new(width as u32, height as u32), origin: Vec2::ZERO }
    }

    pub fn width(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| p.width() as usize)
    }

    pub fn height(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| p.height() as usize)
    }

    fn data(&self) -> &[u8] {
        self.pixmap.as_ref().map(|p| p.data()).unwrap_or(&[])
    }

    /// Pixels in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = RGBA> + '_ {
        self.pixmap.iter().flat_map(|p| p.pixels().iter().copied().map(to_rgba))
    }

    /// Pixel at `(x, y)`; transparent outside the raster
    pub fn get(&self, x: usize, y: usize) -> RGBA {
        self.pixmap
            .as_ref()
            .and_then(|p| p.pixel(x as u32, y as u32))
            .map_or(RGBA::transparent(), to_rgba)
    }

    /// Pixel covering a scene-space point, if inside the raster
    pub fn sample(&self, p: Vec2) -> Option<RGBA> {
        let local = p - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let (x, y) = (local.x as usize, local.y as usize);
        (x < self.width() && y < self.height()).then(|| self.get(x, y))
    }

    /// Change dimensions, keeping the allocation when it is large enough.
    /// Contents become transparent.
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut data = self.pixmap.take().map(Pixmap::take).unwrap_or_default();
        data.clear();
        data.resize(width * height * 4, 0);
        self.pixmap = IntSize::from_wh(width as u32, height as u32)
            .and_then(|size| Pixmap::from_vec(data, size));
    }

    pub fn clear(&mut self) {
        self.fill(RGBA::transparent());
    }

    pub fn fill(&mut self, color: RGBA) {
        if let Some(p) = self.pixmap.as_mut() {
            p.fill(to_color(color));
        }
    }

    /// Radial gradient from `inner` at `center` to `outer` at `radius` and
    /// beyond. `center` is in scene space.
    pub fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, inner: RGBA, outer: RGBA) {
        let origin = self.origin;
        let Some(p) = self.pixmap.as_mut() else {
            return;
        };
        let c = Point::from_xy(center.x - origin.x, center.y - origin.y);
        let stops = vec![GradientStop::new(0.0, to_color(inner)), GradientStop::new(1.0, to_color(outer))];
        let Some(shader) =
            RadialGradient::new(c, c, radius, stops, SpreadMode::Pad, Transform::identity())
        else {
            log::trace!("no gradient for radius {radius}");
            return;
        };
        let Some(rect) = Rect::from_xywh(0.0, 0.0, p.width() as f32, p.height() as f32) else {
            return;
        };

        let paint = Paint {
            shader,
            blend_mode: tiny_skia::BlendMode::Source,
            anti_alias: false,
            ..Paint::default()
        };
        p.fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Fill `path` (scene space) with a solid color, optionally clipped.
    /// Covered pixels are replaced, not blended.
    pub fn fill_path(&mut self, path: &Path, color: RGBA, clip: Option<&ClipMask>) {
        let origin = self.origin;
        let (Some(p), Some(shape)) = (self.pixmap.as_mut(), path.build()) else {
            return;
        };
        let mask = clip.and_then(|c| c.mask.as_ref());
        p.fill_path(&shape, &solid(color), FillRule::Winding, local(origin), mask);
    }

    pub fn fill_polygon(&mut self, points: &[Vec2], color: RGBA) {
        self.fill_path(&Path::polygon(points), color, None);
    }

    /// Blend `src` onto this raster at `src`'s position relative to ours.
    /// The offset is rounded to whole pixels.
    pub fn draw(&mut self, src: &Raster, mode: BlendMode, clip: Option<&ClipMask>) {
        let offset = (src.origin - self.origin).round();
        let (Some(dst), Some(src)) = (self.pixmap.as_mut(), src.pixmap.as_ref()) else {
            return;
        };
        let paint = PixmapPaint {
            opacity: 1.0,
            blend_mode: mode.into(),
            quality: FilterQuality::Nearest,
        };
        let mask = clip.and_then(|c| c.mask.as_ref());
        dst.draw_pixmap(
            offset.x as i32,
            offset.y as i32,
            src.as_ref(),
            &paint,
            Transform::identity(),
            mask,
        );
    }

    /// Pixels that are not fully transparent black
    pub fn lit_pixel_count(&self) -> usize {
        self.pixmap.as_ref().map_or(0, |p| {
            p.pixels().iter().filter(|px| **px != PremultipliedColorU8::TRANSPARENT).count()
        })
    }
}
