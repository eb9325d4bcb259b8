use crate::config::RenderConfig;

/// Constants that depend on the *frame-buffer*, not on the map.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    pub half_h: f32, // pre-derived for speed
    pub aspect: f32,
}

impl Screen {
    pub fn new(cfg: &RenderConfig) -> Self {
        Self {
            w: cfg.width,
            h: cfg.height,
            half_h: cfg.height as f32 * 0.5,
            aspect: cfg.aspect,
        }
    }

    /// Screen row (0 = top, may lie off-screen) of world height `z` seen at
    /// `depth` from an eye at `eye_z`:
    ///
    /// ```text
    /// y = h/2 − h/2 · (z − eye_z) / (depth · aspect)
    /// ```
    #[inline]
    pub fn project(&self, z: f32, eye_z: f32, depth: f32) -> f32 {
        self.half_h - self.half_h * (z - eye_z) / (depth * self.aspect)
    }

    /// Clamp a projected row to `0 ..= h`.
    #[inline]
    pub fn clamp_row(&self, y: f32) -> i32 {
        y.clamp(0.0, self.h as f32) as i32
    }
}

/// Projected ceiling and floor lines of one sector at one depth, unclamped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub ceil: f32,
    pub floor: f32,
}

impl Extent {
    #[inline]
    pub fn of(screen: &Screen, ceil_z: f32, floor_z: f32, eye_z: f32, depth: f32) -> Self {
        Self {
            ceil: screen.project(ceil_z, eye_z, depth),
            floor: screen.project(floor_z, eye_z, depth),
        }
    }

    /// Pixel height of the span between the two lines.
    #[inline]
    pub fn span(&self) -> f32 {
        self.floor - self.ceil
    }
}

/// Horizontal texel index for a hit at fraction `s` along a wall of
/// (estimated) length `wall_len`.
#[inline]
pub fn tex_u(s: f32, wall_len: f32, density: f32) -> i32 {
    (s * wall_len * density).floor() as i32
}

/// Vertical texel index for screen row `y`: world height above the floor
/// line (`(ceil_z − floor_z) / span` map units per pixel) times `density`.
#[inline]
pub fn tex_v(y: f32, extent: &Extent, wall_h: f32, density: f32) -> i32 {
    let span = extent.span();
    if span <= 0.0 {
        return 0;
    }
    let height = (extent.floor - y) * wall_h / span;
    (height * density).floor() as i32
}
