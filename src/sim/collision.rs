//! Camera movement against the sector graph.
//!
//! * The straight path is tested against every wall of the current sector.
//! * Solid walls and refused portals slide the remaining motion along the
//!   wall, recursing at most `max_slides` times.
//! * Portals are gated by corner margin, step height and clearance; past an
//!   accepted portal the rest of the path is resolved inside the neighbour.

use glam::Vec2;
use thiserror::Error;

use crate::config::MoveConfig;
use crate::engine::math::{FUDGE, dot, normalize};
use crate::world::{Camera, Level, LevelError, Sector, SectorId, Wall};

/// What the caller gets back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Camera state untouched.
    Unchanged,
    /// Position changed inside the same sector.
    Moved,
    /// Position changed and the camera now lives in `to`.
    Crossed { from: SectorId, to: SectorId },
}

impl MoveOutcome {
    #[inline]
    pub fn changed(self) -> bool {
        self != MoveOutcome::Unchanged
    }
}

/// Why a portal refused the camera.
#[derive(Error, Debug, PartialEq)]
pub enum CrossingRefused {
    #[error("crossing point within {margin} of a wall endpoint")]
    Corner { margin: f32 },

    #[error("floor rises by {delta}, limit {max_step}")]
    Step { delta: f32, max_step: f32 },

    #[error("clearance {clearance} too low for eye height {eye}")]
    Clearance { clearance: f32, eye: f32 },

    #[error("wall is solid")]
    Solid,

    #[error(transparent)]
    Level(#[from] LevelError),
}

/// Crossing of the movement path with one wall.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PathHit {
    wall: usize,
    /// Fraction along the path.
    u: f32,
    /// Fraction along the wall.
    s: f32,
}

/* ─────────────────────────  SEGMENT TEST  ───────────────────────────── */

/// Cramer's rule on `from + u·(to − from) = start + s·(end − start)`;
/// both parameters must lie in `[0, 1]`.
fn segment_hit(from: Vec2, to: Vec2, wall: &Wall) -> Option<(f32, f32)> {
    let d = to - from;
    let w = wall.dir();
    let denom = d.perp_dot(w);
    if denom.abs() < FUDGE {
        return None;
    }

    let c = wall.start_f() - from;
    let u = c.perp_dot(w) / denom;
    let s = c.perp_dot(d) / denom;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&s) {
        return None;
    }
    Some((u, s))
}

/// Earliest wall the path leaves the sector through.  A wall only counts
/// when `to` lies strictly on the far side of it from the sector interior,
/// so a camera resting on a wall line can always move back inside.
fn first_crossing(sector: &Sector, from: Vec2, to: Vec2) -> Option<PathHit> {
    let inside = sector.centroid();
    let mut best: Option<PathHit> = None;
    for (i, wall) in sector.walls.iter().enumerate() {
        let side = |p: Vec2| wall.dir().perp_dot(p - wall.start_f());
        if side(inside) * side(to) >= 0.0 {
            continue;
        }
        if let Some((u, s)) = segment_hit(from, to, wall)
            && best.is_none_or(|b| u < b.u)
        {
            best = Some(PathHit { wall: i, u, s });
        }
    }
    best
}

/* ─────────────────────────  PORTAL GATE  ────────────────────────────── */

/// Check whether the camera may pass through portal `wall` of `current` at
/// fraction `s`.  All comparisons are strict: a step exactly at `max_step`
/// or a clearance exactly equal to the eye height is refused.
pub fn check_crossing<'l>(
    level: &'l Level,
    camera: &Camera,
    current: &Sector,
    wall: &Wall,
    s: f32,
    cfg: &MoveConfig,
) -> Result<(SectorId, &'l Sector), CrossingRefused> {
    let Some(next) = wall.portal else {
        return Err(CrossingRefused::Solid);
    };

    let len = wall.dir().length();
    if s * len < cfg.corner_margin || (1.0 - s) * len < cfg.corner_margin {
        return Err(CrossingRefused::Corner {
            margin: cfg.corner_margin,
        });
    }

    let nb = level.sector(next)?;

    let delta = nb.floor_z - current.floor_z;
    if !(delta < cfg.max_step) {
        return Err(CrossingRefused::Step {
            delta,
            max_step: cfg.max_step,
        });
    }

    let eye = camera.eye_z() - current.floor_z;
    if !(eye < nb.clearance()) {
        return Err(CrossingRefused::Clearance {
            clearance: nb.clearance(),
            eye,
        });
    }

    Ok((next, nb))
}

/* ─────────────────────────  SLIDE  ──────────────────────────────────── */

/// Unit normal of `wall` on the side `p` lies on.
fn normal_toward(wall: &Wall, p: Vec2) -> Vec2 {
    let n = wall.normal();
    if dot(n, p - wall.start_f()) >= 0.0 { n } else { -n }
}

/// Replacement target after hitting `wall` at path fraction `u`: the crossing
/// point plus the tangential part of the remaining motion, nudged `skin`
/// toward `inside`, an interior point of the camera's sector.
fn slide_target(from: Vec2, to: Vec2, wall: &Wall, u: f32, inside: Vec2, skin: f32) -> Vec2 {
    let hit = from + (to - from) * u;
    let remaining = to - hit;

    let tangent = normalize(wall.dir());
    let slide = tangent * dot(remaining, tangent);

    hit + slide + normal_toward(wall, inside) * skin
}

/* ─────────────────────────  DRIVER  ─────────────────────────────────── */

/// Move `camera` toward `target`, sliding along walls and crossing portals
/// that admit it.  The camera is written only when the result is not
/// [`MoveOutcome::Unchanged`].
pub fn resolve_move(
    level: &Level,
    camera: &mut Camera,
    target: Vec2,
    cfg: &MoveConfig,
) -> MoveOutcome {
    try_move(level, camera, target, 0, cfg)
}

fn try_move(
    level: &Level,
    camera: &mut Camera,
    target: Vec2,
    depth: u32,
    cfg: &MoveConfig,
) -> MoveOutcome {
    if target == camera.pos {
        return MoveOutcome::Unchanged;
    }
    if depth >= cfg.max_slides {
        log::debug!("move rejected after {depth} slides");
        return MoveOutcome::Unchanged;
    }

    let current = match level.sector(camera.sector) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("camera in invalid sector: {e}");
            return MoveOutcome::Unchanged;
        }
    };

    let Some(hit) = first_crossing(current, camera.pos, target) else {
        camera.pos = target;
        return MoveOutcome::Moved;
    };
    let wall = &current.walls[hit.wall];
    let inside = current.centroid();

    if wall.is_portal() {
        match check_crossing(level, camera, current, wall, hit.s, cfg) {
            Ok((next, nb)) => {
                let from = camera.sector;
                let crossing = camera.pos + (target - camera.pos) * hit.u;
                camera.eye_z += nb.floor_z - current.floor_z;
                camera.sector = next;
                camera.pos = crossing - normal_toward(wall, inside) * cfg.skin;
                log::debug!("camera crossed {from} -> {next}");

                // the camera already sits consistently in `next`, so a
                // rejected remainder still counts as a crossing
                try_move(level, camera, target, depth + 1, cfg);
                return if camera.sector == from {
                    MoveOutcome::Moved
                } else {
                    MoveOutcome::Crossed {
                        from,
                        to: camera.sector,
                    }
                };
            }
            Err(reason) => log::debug!("portal refused: {reason}"),
        }
    }

    let slid = slide_target(camera.pos, target, wall, hit.u, inside, cfg.skin);
    try_move(level, camera, slid, depth + 1, cfg)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures::{chain, room};
    use glam::vec2;

    fn one_room() -> Level {
        Level::new(vec![room(0, 0, 4, 4, 0.0, 3.0)]).unwrap()
    }

    fn cam(level: &Level, x: f32, y: f32, eye: f32) -> Camera {
        Camera::spawn(level, vec2(x, y), 0.0, eye).unwrap()
    }

    #[test]
    fn same_position_is_unchanged() {
        let level = one_room();
        let mut c = cam(&level, 2.0, 2.0, 1.5);
        let before = c;
        let out = resolve_move(&level, &mut c, before.pos(), &MoveConfig::default());
        assert_eq!(out, MoveOutcome::Unchanged);
        assert!(!out.changed());
        assert_eq!(c, before);
    }

    #[test]
    fn free_move_is_accepted() {
        let level = one_room();
        let mut c = cam(&level, 2.0, 2.0, 1.5);
        let out = resolve_move(&level, &mut c, vec2(2.5, 1.0), &MoveConfig::default());
        assert_eq!(out, MoveOutcome::Moved);
        assert_eq!(c.pos(), vec2(2.5, 1.0));
    }

    #[test]
    fn shallow_hit_slides_along_wall() {
        let level = one_room();
        let mut c = cam(&level, 1.0, 3.8, 1.5);
        let out = resolve_move(&level, &mut c, vec2(3.0, 4.1), &MoveConfig::default());
        assert_eq!(out, MoveOutcome::Moved);

        let p = c.pos();
        assert!(p.y < 4.0, "penetrated north wall: {p}");
        assert!(p.x > 2.9 && p.x <= 3.0 + 1e-4, "no tangential progress: {p}");
        assert_eq!(c.sector(), SectorId(0));
    }

    #[test]
    fn head_on_hit_stops_at_wall() {
        let level = one_room();
        let mut c = cam(&level, 2.0, 3.5, 1.5);
        resolve_move(&level, &mut c, vec2(2.0, 4.5), &MoveConfig::default());
        let p = c.pos();
        assert!(p.y < 4.0 && p.y > 3.9, "{p}");
        assert!((p.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn slide_cap_rejects_move() {
        let level = one_room();
        let cfg = MoveConfig {
            max_slides: 1,
            ..MoveConfig::default()
        };
        let mut c = cam(&level, 2.0, 3.5, 1.5);
        let before = c;
        assert_eq!(
            resolve_move(&level, &mut c, vec2(2.0, 4.5), &cfg),
            MoveOutcome::Unchanged
        );
        assert_eq!(c, before);
        // free moves still succeed under the same cap
        assert_eq!(
            resolve_move(&level, &mut c, vec2(2.0, 3.0), &cfg),
            MoveOutcome::Moved
        );
    }

    #[test]
    fn portal_crossing_updates_sector_and_eye() {
        let level = Level::new(chain(&[0.0, 0.5])).unwrap();
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        let out = resolve_move(&level, &mut c, vec2(4.1, 2.0), &MoveConfig::default());
        assert_eq!(
            out,
            MoveOutcome::Crossed {
                from: SectorId(0),
                to: SectorId(1)
            }
        );
        assert_eq!(c.sector(), SectorId(1));
        assert_eq!(c.pos(), vec2(4.1, 2.0));
        assert!((c.eye_z() - 2.0).abs() < 1e-6);
        assert_eq!(level.locate(c.pos()), Some(c.sector()));
    }

    #[test]
    fn long_move_stops_at_neighbour_wall() {
        let level = Level::new(chain(&[0.0, 0.0])).unwrap();
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        let out = resolve_move(&level, &mut c, vec2(9.0, 2.0), &MoveConfig::default());
        assert_eq!(
            out,
            MoveOutcome::Crossed {
                from: SectorId(0),
                to: SectorId(1)
            }
        );
        assert!(c.pos().x < 8.0 && c.pos().x > 7.9, "{}", c.pos());
        assert_eq!(level.locate(c.pos()), Some(c.sector()));
    }

    #[test]
    fn long_move_crosses_several_portals() {
        let level = Level::new(chain(&[0.0, 0.5, 1.0])).unwrap();
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        let out = resolve_move(&level, &mut c, vec2(10.0, 2.0), &MoveConfig::default());
        assert_eq!(
            out,
            MoveOutcome::Crossed {
                from: SectorId(0),
                to: SectorId(2)
            }
        );
        assert_eq!(c.pos(), vec2(10.0, 2.0));
        assert_eq!(level.locate(c.pos()), Some(c.sector()));
        assert!((c.eye_z() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn slide_from_wall_line_stays_inside_either_winding() {
        // same room wound counter-clockwise
        let mut s = room(0, 0, 4, 4, 0.0, 3.0);
        s.walls = s
            .walls
            .iter()
            .rev()
            .map(|w| Wall::solid(w.end, w.start, 0))
            .collect();
        let level = Level::new(vec![s]).unwrap();

        let mut c = cam(&level, 0.0, 2.0, 1.5);
        let out = resolve_move(&level, &mut c, vec2(-1.0, 3.0), &MoveConfig::default());
        assert_eq!(out, MoveOutcome::Moved);
        assert!(c.pos().x > 0.0, "{}", c.pos());
        assert!((c.pos().y - 3.0).abs() < 1e-2);
        assert_eq!(level.locate(c.pos()), Some(SectorId(0)));
    }

    #[test]
    fn step_gate_rejects_at_equality() {
        let level = Level::new(chain(&[0.0, 0.75])).unwrap();
        let at_limit = MoveConfig {
            max_step: 0.75,
            ..MoveConfig::default()
        };
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        resolve_move(&level, &mut c, vec2(4.1, 2.0), &at_limit);
        assert_eq!(c.sector(), SectorId(0));
        assert!(c.pos().x < 4.0);

        let above = MoveConfig {
            max_step: 0.76,
            ..MoveConfig::default()
        };
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        resolve_move(&level, &mut c, vec2(4.1, 2.0), &above);
        assert_eq!(c.sector(), SectorId(1));
    }

    #[test]
    fn drops_are_not_gated() {
        let level = Level::new(chain(&[2.0, 0.0])).unwrap();
        let mut c = cam(&level, 3.9, 2.0, 1.5);
        resolve_move(&level, &mut c, vec2(4.1, 2.0), &MoveConfig::default());
        assert_eq!(c.sector(), SectorId(1));
        assert!((c.eye_z() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn clearance_gate() {
        let level = Level::new(chain(&[0.0, 0.0])).unwrap();
        let cfg = MoveConfig::default();

        // clearance is 3: an eye exactly 3 above the floor does not fit
        let mut tall = cam(&level, 3.9, 2.0, 3.0);
        resolve_move(&level, &mut tall, vec2(4.1, 2.0), &cfg);
        assert_eq!(tall.sector(), SectorId(0));

        let mut short = cam(&level, 3.9, 2.0, 2.9);
        resolve_move(&level, &mut short, vec2(4.1, 2.0), &cfg);
        assert_eq!(short.sector(), SectorId(1));
    }

    #[test]
    fn corner_crossing_refused() {
        let level = Level::new(chain(&[0.0, 0.0])).unwrap();
        let mut c = cam(&level, 3.9, 0.02, 1.5);
        let out = resolve_move(&level, &mut c, vec2(4.1, 0.02), &MoveConfig::default());
        assert_eq!(c.sector(), SectorId(0));
        assert!(c.pos().x < 4.0);
        assert_ne!(out, MoveOutcome::Crossed { from: SectorId(0), to: SectorId(1) });
    }

    #[test]
    fn check_crossing_reports_reason() {
        let level = Level::new(chain(&[0.0, 2.0])).unwrap();
        let c = cam(&level, 3.9, 2.0, 1.5);
        let current = level.sector(SectorId(0)).unwrap();
        let portal = &current.walls[2];
        let err = check_crossing(&level, &c, current, portal, 0.5, &MoveConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            CrossingRefused::Step {
                delta: 2.0,
                max_step: 1.0
            }
        );
    }
}
