//! Small vector helpers shared by the ray caster, the shader and the
//! movement resolver.

use glam::Vec2;

/// Below this a determinant is treated as zero (parallel lines).
pub const FUDGE: f32 = 1e-6;

/// Alpha-max-plus-beta-min coefficients (max error ≈ 4 %).
const AMBM_ALPHA: f32 = 0.960_433_87;
const AMBM_BETA: f32 = 0.397_824_73;

#[inline(always)]
pub fn dot(a: Vec2, b: Vec2) -> f32 {
    a.x * b.x + a.y * b.y
}

/// `1 / sqrt(x)` via the bit-level initial guess plus one Newton step.
/// Relative error stays under 0.2 % for positive finite input.
#[inline]
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let guess = f32::from_bits(0x5f37_59df - (x.to_bits() >> 1));
    guess * (1.5 - half * guess * guess)
}

/// Approximately unit-length copy of `v`; the zero vector stays zero.
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    let len_sq = dot(v, v);
    if len_sq <= FUDGE * FUDGE {
        return Vec2::ZERO;
    }
    v * fast_inv_sqrt(len_sq)
}

/// `dir` rotated 90° clockwise and normalised.  For a clockwise-wound
/// sector this faces into the sector.
#[inline]
pub fn wall_normal(dir: Vec2) -> Vec2 {
    normalize(Vec2::new(dir.y, -dir.x))
}

/// Cheap Euclidean length estimate, `α·max + β·min` of the abs components.
#[inline]
pub fn approx_len(v: Vec2) -> f32 {
    let (ax, ay) = (v.x.abs(), v.y.abs());
    AMBM_ALPHA * ax.max(ay) + AMBM_BETA * ax.min(ay)
}
