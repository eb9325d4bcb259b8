//! Per-column wall illumination and ordered dithering.

use glam::{Vec2, Vec3};

use super::math::{dot, normalize};
use crate::{config::RenderConfig, world::Light};

/// Channels closer than this count as grey.
pub const GREY_FUDGE: f32 = 0.05;

/// Classic 8×8 Bayer index matrix, values 0‥63.
pub const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Scalar light level for one (wall, ray) pair, clamped to `[0, 1]`.
///
/// `Σ max(0, L̂·n)·intensity` over the lights, plus a camera headlamp that
/// falls off with `1/depth²` (capped), plus the ambient floor.
pub fn illumination(
    hit_point: Vec2,
    normal: Vec2,
    depth: f32,
    lights: &[Light],
    cfg: &RenderConfig,
) -> f32 {
    let diffuse: f32 = lights
        .iter()
        .map(|l| {
            let to_light = normalize(l.pos - hit_point);
            dot(to_light, normal).max(0.0) * l.intensity
        })
        .sum();

    let headlamp = if depth > 0.0 {
        (cfg.headlamp / (depth * depth)).min(cfg.headlamp_cap)
    } else {
        cfg.headlamp_cap
    };

    (diffuse + headlamp + cfg.ambient).clamp(0.0, 1.0)
}

#[inline]
pub fn is_greyscale(c: Vec3) -> bool {
    (c.x - c.y).abs() < GREY_FUDGE && (c.y - c.z).abs() < GREY_FUDGE && (c.x - c.z).abs() < GREY_FUDGE
}

/// Threshold in `(0, 1)` for screen pixel `(x, y)`.
#[inline]
pub fn bayer_threshold(x: usize, y: usize) -> f32 {
    (BAYER_8X8[y % 8][x % 8] as f32 + 0.5) / 64.0
}

/// `base · intensity`, or, with dithering on and a grey `base`, pure black or
/// white chosen by the Bayer threshold at `(x, y)`.
#[inline]
pub fn shade(base: Vec3, intensity: f32, x: usize, y: usize, dither: bool) -> Vec3 {
    if dither && is_greyscale(base) {
        let lum = (base.x + base.y + base.z) / 3.0 * intensity;
        if lum > bayer_threshold(x, y) {
            Vec3::ONE
        } else {
            Vec3::ZERO
        }
    } else {
        base * intensity
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
