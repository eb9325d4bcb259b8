use std::fmt;

use glam::{IVec2, Vec2, Vec3};
use thiserror::Error;

use crate::world::texture::TextureId;

/// Validated handle into [`Level::sectors`] (zero-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorId(pub u16);

impl SectorId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Largest arena a [`SectorId`] can index.
pub const MAX_SECTORS: usize = u16::MAX as usize + 1;

/// Everything that can be wrong with a sector graph.
#[derive(Error, Debug, PartialEq)]
pub enum LevelError {
    #[error("map contains no sectors")]
    Empty,

    #[error("sector handle {0} out of range")]
    BadSector(SectorId),

    #[error("wall {wall} of sector {sector} leads to missing sector {target}")]
    DanglingPortal {
        sector: SectorId,
        wall: usize,
        target: SectorId,
    },

    #[error("portal {from} -> {to} has no wall leading back")]
    OneWayPortal { from: SectorId, to: SectorId },

    #[error("portal references unknown sector id {0}")]
    UnknownSectorId(i32),

    #[error("sector id {0} declared twice")]
    DuplicateSectorId(i32),

    #[error("point {0} is not inside any sector")]
    OutsideMap(Vec2),

    #[error("{0} sectors exceed the {max} a handle can address", max = MAX_SECTORS)]
    TooManySectors(usize),
}

/*--------------------------- walls ----------------------------------*/

/// Directed boundary segment owned by exactly one sector.
///
/// Walls of a sector are wound clockwise, so [`Wall::normal`] faces into
/// the owning sector.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub start: IVec2,
    pub end: IVec2,
    pub portal: Option<SectorId>,
    pub texture_id: TextureId,
}

impl Wall {
    pub fn solid(start: IVec2, end: IVec2, texture_id: TextureId) -> Self {
        Self {
            start,
            end,
            portal: None,
            texture_id,
        }
    }

    pub fn portal(start: IVec2, end: IVec2, to: SectorId, texture_id: TextureId) -> Self {
        Self {
            start,
            end,
            portal: Some(to),
            texture_id,
        }
    }

    #[inline(always)]
    pub fn start_f(&self) -> Vec2 {
        self.start.as_vec2()
    }

    #[inline(always)]
    pub fn end_f(&self) -> Vec2 {
        self.end.as_vec2()
    }

    /// `end − start`.
    #[inline(always)]
    pub fn dir(&self) -> Vec2 {
        (self.end - self.start).as_vec2()
    }

    #[inline(always)]
    pub fn is_portal(&self) -> bool {
        self.portal.is_some()
    }

    /// Unit face normal, `(end − start)` rotated 90° clockwise.
    #[inline]
    pub fn normal(&self) -> Vec2 {
        crate::engine::math::wall_normal(self.dir())
    }
}

/*--------------------------- sectors --------------------------------*/

#[derive(Clone, Debug)]
pub struct Sector {
    /// Identifier as declared in the map file.
    pub id: i32,
    pub walls: Vec<Wall>,
    pub floor_z: f32,
    pub ceil_z: f32,
    pub floor_colour: Vec3,
    pub ceil_colour: Vec3,
}

impl Sector {
    /// Clear height between floor and ceiling.
    #[inline(always)]
    pub fn clearance(&self) -> f32 {
        self.ceil_z - self.floor_z
    }

    /// Inside test against every wall line.  Works for either winding as long
    /// as it is consistent; points on an edge count as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        if self.walls.is_empty() {
            return false;
        }
        let mut pos = false;
        let mut neg = false;
        for w in &self.walls {
            let side = w.dir().perp_dot(p - w.start_f());
            pos |= side > 0.0;
            neg |= side < 0.0;
            if pos && neg {
                return false;
            }
        }
        true
    }

    /// Mean of the wall start points.
    pub fn centroid(&self) -> Vec2 {
        if self.walls.is_empty() {
            return Vec2::ZERO;
        }
        let sum = self.walls.iter().fold(Vec2::ZERO, |acc, w| acc + w.start_f());
        sum / self.walls.len() as f32
    }
}

/*--------------------------- level ----------------------------------*/

/// Sector arena (immutable after load).
#[derive(Debug)]
pub struct Level {
    sectors: Vec<Sector>,
}

impl Level {
    /// Validate portal handles and build the arena.
    ///
    /// * every portal must point at an existing sector;
    /// * that sector must own at least one wall leading back.
    pub fn new(sectors: Vec<Sector>) -> Result<Self, LevelError> {
        if sectors.is_empty() {
            return Err(LevelError::Empty);
        }
        if sectors.len() > MAX_SECTORS {
            return Err(LevelError::TooManySectors(sectors.len()));
        }

        for (si, sector) in sectors.iter().enumerate() {
            let from = SectorId(si as u16);
            for (wi, wall) in sector.walls.iter().enumerate() {
                let Some(to) = wall.portal else { continue };
                let Some(target) = sectors.get(to.index()) else {
                    return Err(LevelError::DanglingPortal {
                        sector: from,
                        wall: wi,
                        target: to,
                    });
                };
                if !target.walls.iter().any(|w| w.portal == Some(from)) {
                    return Err(LevelError::OneWayPortal { from, to });
                }
            }

            if sector.walls.is_empty() {
                log::warn!("sector {} (id {}) has no walls", from, sector.id);
            }
            if sector.floor_z >= sector.ceil_z {
                log::warn!(
                    "sector {} (id {}): floor {} is not below ceiling {}",
                    from,
                    sector.id,
                    sector.floor_z,
                    sector.ceil_z
                );
            }
        }

        Ok(Self { sectors })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// Bounds-checked lookup.
    #[inline]
    pub fn sector(&self, id: SectorId) -> Result<&Sector, LevelError> {
        self.sectors
            .get(id.index())
            .ok_or(LevelError::BadSector(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = SectorId> + '_ {
        (0..self.sectors.len()).map(|i| SectorId(i as u16))
    }

    /// First sector whose polygon contains `p`.
    pub fn locate(&self, p: Vec2) -> Option<SectorId> {
        self.sectors
            .iter()
            .position(|s| s.contains(p))
            .map(|i| SectorId(i as u16))
    }

    pub fn centroid(&self, id: SectorId) -> Result<Vec2, LevelError> {
        Ok(self.sector(id)?.centroid())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures::{chain, room};
    use glam::{ivec2, vec2};

    #[test]
    fn room_contains_its_centre_only() {
        let s = room(0, 0, 4, 4, 0.0, 3.0);
        assert!(s.contains(vec2(2.0, 2.0)));
        assert!(!s.contains(vec2(5.0, 2.0)));
        assert!(!s.contains(vec2(2.0, -0.5)));
        assert_eq!(s.centroid(), vec2(2.0, 2.0));
    }

    #[test]
    fn normals_face_into_the_room() {
        let s = room(0, 0, 4, 4, 0.0, 3.0);
        let centre = s.centroid();
        for w in &s.walls {
            let mid = (w.start_f() + w.end_f()) * 0.5;
            assert!((centre - mid).dot(w.normal()) > 0.0);
        }
    }

    #[test]
    fn chain_validates_and_locates() {
        let level = Level::new(chain(&[0.0, 0.5, 0.0])).unwrap();
        assert_eq!(level.len(), 3);
        assert_eq!(level.locate(vec2(1.0, 1.0)), Some(SectorId(0)));
        assert_eq!(level.locate(vec2(5.0, 1.0)), Some(SectorId(1)));
        assert_eq!(level.locate(vec2(9.0, 1.0)), Some(SectorId(2)));
        assert_eq!(level.locate(vec2(-3.0, 1.0)), None);
    }

    #[test]
    fn dangling_portal_rejected() {
        let mut s = room(0, 0, 4, 4, 0.0, 3.0);
        s.walls[0].portal = Some(SectorId(7));
        let err = Level::new(vec![s]).unwrap_err();
        assert_eq!(
            err,
            LevelError::DanglingPortal {
                sector: SectorId(0),
                wall: 0,
                target: SectorId(7)
            }
        );
    }

    #[test]
    fn one_way_portal_rejected() {
        let mut sectors = chain(&[0.0, 0.0]);
        for w in &mut sectors[1].walls {
            w.portal = None;
        }
        let err = Level::new(sectors).unwrap_err();
        assert_eq!(
            err,
            LevelError::OneWayPortal {
                from: SectorId(0),
                to: SectorId(1)
            }
        );
    }

    #[test]
    fn bad_handle_guard() {
        let level = Level::new(vec![room(0, 0, 4, 4, 0.0, 3.0)]).unwrap();
        assert_eq!(
            level.sector(SectorId(3)).unwrap_err(),
            LevelError::BadSector(SectorId(3))
        );
        assert!(Level::new(Vec::new()).is_err());
    }

    #[test]
    fn oversize_arena_rejected() {
        let sectors = vec![room(0, 0, 4, 4, 0.0, 3.0); MAX_SECTORS + 1];
        assert_eq!(
            Level::new(sectors).unwrap_err(),
            LevelError::TooManySectors(MAX_SECTORS + 1)
        );
    }

    #[test]
    fn wall_dir_and_portal_flag() {
        let w = Wall::portal(ivec2(0, 0), ivec2(0, 4), SectorId(1), 0);
        assert_eq!(w.dir(), vec2(0.0, 4.0));
        assert!(w.is_portal());
        assert!(!Wall::solid(ivec2(0, 0), ivec2(1, 0), 0).is_portal());
    }
}
