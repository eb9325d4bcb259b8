//! Text map loader.
//!
//! ```text
//! <sector count>
//! # per sector
//! <id> <wall count> <floor z> <ceil z>
//! <floor r g b> <ceil r g b>
//! # per wall
//! <x0> <y0> <x1> <y1> <portal id, 0 = solid> <texture id>
//! ```
//!
//! Portal targets name the *declared* sector id; they are reconciled to
//! zero-based [`SectorId`] handles here.

use std::{collections::HashMap, path::Path};

use glam::{Vec3, ivec2};

use super::{LoadError, read_text, tokens::Tokens};
use crate::world::{Level, LevelError, Sector, SectorId, TextureId, Wall, geometry::MAX_SECTORS};

/// Wall as written in the file, portal not yet resolved.
struct RawWall {
    wall: Wall,
    portal: i32,
}

pub fn load_map(path: &Path) -> Result<Level, LoadError> {
    let text = read_text(path)?;
    parse_map(path, &text)
}

pub fn parse_map(path: &Path, text: &str) -> Result<Level, LoadError> {
    let mut t = Tokens::new(path, text);

    let count: usize = t.next("sector count")?;
    if count > MAX_SECTORS {
        return Err(LevelError::TooManySectors(count).into());
    }

    let mut sectors = Vec::with_capacity(count);
    let mut raw_walls = Vec::with_capacity(count);
    for _ in 0..count {
        let id: i32 = t.next("sector id")?;
        let n_walls: usize = t.next("wall count")?;
        let floor_z: f32 = t.next("floor height")?;
        let ceil_z: f32 = t.next("ceiling height")?;
        let floor_colour = colour(&mut t, "floor colour")?;
        let ceil_colour = colour(&mut t, "ceiling colour")?;

        let mut walls = Vec::with_capacity(n_walls);
        for _ in 0..n_walls {
            let start = ivec2(t.next("wall x0")?, t.next("wall y0")?);
            let end = ivec2(t.next("wall x1")?, t.next("wall y1")?);
            let portal: i32 = t.next("portal")?;
            let texture_id: TextureId = t.next("texture id")?;
            walls.push(RawWall {
                wall: Wall::solid(start, end, texture_id),
                portal,
            });
        }

        sectors.push(Sector {
            id,
            walls: Vec::new(),
            floor_z,
            ceil_z,
            floor_colour,
            ceil_colour,
        });
        raw_walls.push(walls);
    }

    if t.remaining() > 0 {
        log::warn!(
            "{}: {} trailing tokens after line {}",
            path.display(),
            t.remaining(),
            t.line()
        );
    }

    /*----- reconcile declared ids to handles ----------------------------*/
    let mut by_id = HashMap::with_capacity(sectors.len());
    for (i, s) in sectors.iter().enumerate() {
        if by_id.insert(s.id, SectorId(i as u16)).is_some() {
            return Err(LevelError::DuplicateSectorId(s.id).into());
        }
    }

    for (sector, walls) in sectors.iter_mut().zip(raw_walls) {
        sector.walls = walls
            .into_iter()
            .map(|raw| {
                let mut wall = raw.wall;
                if raw.portal != 0 {
                    let to = by_id
                        .get(&raw.portal)
                        .copied()
                        .ok_or(LevelError::UnknownSectorId(raw.portal))?;
                    wall.portal = Some(to);
                }
                Ok(wall)
            })
            .collect::<Result<_, LevelError>>()?;
    }

    Ok(Level::new(sectors)?)
}

fn colour(t: &mut Tokens<'_>, what: &str) -> Result<Vec3, LoadError> {
    Ok(Vec3::new(t.next(what)?, t.next(what)?, t.next(what)?))
}
