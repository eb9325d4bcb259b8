//! Per-column viewing rays and the ray/wall test.
//!
//! Ray directions are **not** normalised: `dir = focal·forward + u·right`,
//! so a hit's `t` is depth measured along the view axis in units of the
//! focal length.  Using that value directly as the column scale avoids the
//! fisheye bulge a Euclidean distance would give.

use glam::Vec2;

use super::math::FUDGE;
use crate::world::{Camera, Wall};

/// `s` closer than this to either end flags the hit as a vertex/edge.
pub const EDGE_LIM: f32 = 0.003;

/// Parametric ray `origin + t·dir`.  The origin borrows the camera position.
#[derive(Clone, Copy, Debug)]
pub struct Ray<'a> {
    pub origin: &'a Vec2,
    pub dir: Vec2,
}

/// Accepted ray/wall crossing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Ray parameter (depth).
    pub t: f32,
    /// Fraction along the wall, 0 = start, 1 = end.
    pub s: f32,
    /// `s` lies within [`EDGE_LIM`] of an endpoint.
    pub near_vertex: bool,
}

/// Screen column → symmetric image-plane coordinate in `[-1, 1]`
/// (pixel centres, so the extremes are never reached exactly).
#[inline]
pub fn column_to_u(x: usize, width: usize) -> f32 {
    -1.0 + 2.0 * (x as f32 + 0.5) / width as f32
}

impl<'a> Ray<'a> {
    /// Ray through image-plane coordinate `u` (−1 = left edge, +1 = right).
    #[inline]
    pub fn through(camera: &'a Camera, u: f32, focal_len: f32) -> Self {
        Ray {
            origin: &camera.pos,
            dir: camera.forward() * focal_len + camera.right() * u,
        }
    }

    /// Ray through the centre of screen column `x`.
    #[inline]
    pub fn for_column(camera: &'a Camera, x: usize, width: usize, focal_len: f32) -> Self {
        Self::through(camera, column_to_u(x, width), focal_len)
    }

    #[inline(always)]
    pub fn at(&self, t: f32) -> Vec2 {
        *self.origin + self.dir * t
    }

    /// Cramer's rule on `origin + t·dir = start + s·(end − start)`.
    ///
    /// Rejects parallel lines, hits outside the segment and hits with
    /// `t < min_t`.
    pub fn intersect(&self, wall: &Wall, min_t: f32) -> Option<Intersection> {
        let w = wall.dir();
        let p = *self.origin - wall.start_f();

        let denom = w.perp_dot(self.dir);
        if denom.abs() < FUDGE {
            return None;
        }

        let s = p.perp_dot(self.dir) / denom;
        if !(0.0..=1.0).contains(&s) {
            return None;
        }

        let t = -w.perp_dot(p) / denom;
        if t < min_t {
            return None;
        }

        Some(Intersection {
            t,
            s,
            near_vertex: s < EDGE_LIM || s > 1.0 - EDGE_LIM,
        })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
