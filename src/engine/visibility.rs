//! Nearest-wall search and portal traversal.

use smallvec::SmallVec;

use super::ray::{Intersection, Ray};
use crate::world::{Level, Sector, SectorId};

/// Relative amount `min_t` is pushed past a portal before searching the
/// neighbour; stays above one f32 ULP of `t` for any map-sized depth.
pub const PORTAL_EPS: f32 = 1e-4;

/// Sectors visited by one traversal, camera sector first.
pub type Trace = SmallVec<[SectorId; 8]>;

/// Closest wall of one sector along a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHit {
    /// Index into the sector's wall list.
    pub wall: usize,
    pub isect: Intersection,
}

/// Result of a full traversal: the first non-portal wall along the ray.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub sector: SectorId,
    pub wall: usize,
    pub isect: Intersection,
    pub trace: Trace,
}

impl Hit {
    #[inline]
    pub fn depth(&self) -> f32 {
        self.isect.t
    }

    /// Number of portals the ray passed through.
    #[inline]
    pub fn crossings(&self) -> usize {
        self.trace.len() - 1
    }
}

/// `min_t` to use after passing through a portal at depth `t`.
#[inline]
pub fn past(t: f32) -> f32 {
    t + PORTAL_EPS * t.abs().max(1.0)
}

/// Scan every wall of `sector` and keep the minimum-depth intersection.
pub fn nearest_wall(ray: &Ray, sector: &Sector, min_t: f32) -> Option<WallHit> {
    let mut best: Option<WallHit> = None;
    for (i, wall) in sector.walls.iter().enumerate() {
        let Some(isect) = ray.intersect(wall, min_t) else {
            continue;
        };
        if best.is_none_or(|b| isect.t < b.isect.t) {
            best = Some(WallHit { wall: i, isect });
        }
    }
    best
}

/// Follow `ray` from `start` through portals until it strikes a solid wall.
///
/// This is the query form of the walk; the column renderer takes the same
/// steps ([`nearest_wall`], then [`past`]) while drawing each sector.
///
/// Returns `None` when some sector on the way has no wall in front of the
/// ray (a map error: the column simply stays empty) or a portal handle is
/// dangling.
pub fn first_hit(ray: &Ray, level: &Level, start: SectorId, min_t: f32) -> Option<Hit> {
    let mut trace = Trace::new();
    let mut id = start;
    let mut min_t = min_t;

    loop {
        let sector = match level.sector(id) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("portal traversal stopped: {e}");
                return None;
            }
        };
        trace.push(id);

        let hit = nearest_wall(ray, sector, min_t)?;
        match sector.walls[hit.wall].portal {
            Some(next) => {
                min_t = past(hit.isect.t);
                id = next;
            }
            None => {
                return Some(Hit {
                    sector: id,
                    wall: hit.wall,
                    isect: hit.isect,
                    trace,
                });
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
