//! Tunables for the renderer and the movement resolver.
//!
//! Defaults mirror the constants the engine was tuned with; the binary
//! overrides a few of them from the command line.

use glam::Vec3;

pub const SCR_WIDTH: usize = 640;
pub const SCR_HEIGHT: usize = 480;
pub const FOCAL_LEN: f32 = 1.0;

/// Texels per map unit, horizontally and vertically.
pub const TEXEL_DENSITY: f32 = 16.0;

pub const AMBIENT: f32 = 0.1;
pub const HEADLAMP: f32 = 0.3;
pub const HEADLAMP_CAP: f32 = 0.5;

/// Floor/ceiling darkening per portal crossing.
pub const FOG_PER_SECTOR: f32 = 0.15;

/// Colour for wall columns hit within `EDGE_LIM` of a vertex.
pub const EDGE_COLOUR: Vec3 = Vec3::new(1.0, 0.85, 0.2);

pub const MAX_STEP: f32 = 1.0;
pub const CORNER_MARGIN: f32 = 0.05;
pub const MAX_SLIDES: u32 = 10;
pub const SKIN: f32 = 1e-3;
pub const MOVE_SPEED: f32 = 3.0; // map-units / second
pub const TURN_SPEED: f32 = 3.0; // rad / second

#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub focal_len: f32,
    /// `width / height` unless overridden.
    pub aspect: f32,
    /// Ordered black/white dithering of greyscale surfaces.
    pub dither: bool,
    pub texel_density: f32,
    pub ambient: f32,
    pub headlamp: f32,
    pub headlamp_cap: f32,
    pub fog_per_sector: f32,
    pub edge_colour: Vec3,
}

impl RenderConfig {
    /// Defaults for a `width × height` frame.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
            ..Self::default()
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: SCR_WIDTH,
            height: SCR_HEIGHT,
            focal_len: FOCAL_LEN,
            aspect: SCR_WIDTH as f32 / SCR_HEIGHT as f32,
            dither: false,
            texel_density: TEXEL_DENSITY,
            ambient: AMBIENT,
            headlamp: HEADLAMP,
            headlamp_cap: HEADLAMP_CAP,
            fog_per_sector: FOG_PER_SECTOR,
            edge_colour: EDGE_COLOUR,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveConfig {
    /// Largest floor rise a portal crossing accepts (exclusive).
    pub max_step: f32,
    /// Portal crossings this close (map units) to an endpoint are refused.
    pub corner_margin: f32,
    /// Slide recursion cap; reaching it rejects the move.
    pub max_slides: u32,
    /// Distance a slide target is kept off the blocking wall.
    pub skin: f32,
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Default for MoveConfig {
    fn default() -> Self {
        Self {
            max_step: MAX_STEP,
            corner_margin: CORNER_MARGIN,
            max_slides: MAX_SLIDES,
            skin: SKIN,
            move_speed: MOVE_SPEED,
            turn_speed: TURN_SPEED,
        }
    }
}
