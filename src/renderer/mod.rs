//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! A type implementing [`Renderer`] fills its own frame for a given scene
//! and camera, then loans the finished buffer to the presentation layer.
//!
//! * Pixels are linear RGB floats ([`Rgb`]); [`pack_rgb`] converts them to
//!   the `0x00RRGGBB` words a window expects.
//! * A blanket-impl [`RendererExt`] adds `draw_frame` so call-sites stay
//!   short.

use glam::Vec3;

use crate::world::{Camera, Scene};

/// One pixel, each channel in `[0, 1]`.
pub type Rgb = Vec3;

/// Row-major RGB float frame (row 0 = top of the screen).
#[derive(Clone, Debug, Default)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Vec3::ZERO; width * height],
        }
    }

    /// Reallocate for a new resolution; contents are unspecified afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, Vec3::ZERO);
    }

    pub fn fill(&mut self, c: Rgb) {
        self.pixels.fill(c);
    }

    #[inline(always)]
    pub fn put(&mut self, x: usize, y: usize, c: Rgb) {
        self.pixels[y * self.width + x] = c;
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }
}

/// `[0,1]` RGB → `0x00RRGGBB`.
#[inline]
pub fn pack_rgb(c: Rgb) -> u32 {
    let c = (c.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    ((c.x as u32) << 16) | ((c.y as u32) << 8) | (c.z as u32)
}

/// Pack a whole frame into `out` (resized to fit).
pub fn pack_frame(src: &[Rgb], out: &mut Vec<u32>) {
    out.clear();
    out.extend(src.iter().copied().map(pack_rgb));
}

/// A renderer that owns an internal scratch buffer for the whole frame.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Render the view of `camera` into the internal buffer.
    fn draw_view(&mut self, scene: &Scene, camera: &Camera);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// `submit(&[Rgb], w, h)` is run exactly once per frame.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgb], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        scene: &Scene,
        camera: &Camera,
        submit: F,
    ) where
        F: FnOnce(&[Rgb], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_view(scene, camera);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::{ColumnHit, Software};
