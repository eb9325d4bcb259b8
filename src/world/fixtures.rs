//! Hand-built maps shared by the unit tests.

use glam::{Vec3, ivec2};

use super::geometry::{Sector, SectorId, Wall};

/// Axis-aligned rectangle, walls wound clockwise:
/// west (going north), north, east (going south), south.
pub fn room(x0: i32, y0: i32, x1: i32, y1: i32, floor_z: f32, ceil_z: f32) -> Sector {
    Sector {
        id: 1,
        walls: vec![
            Wall::solid(ivec2(x0, y0), ivec2(x0, y1), 0),
            Wall::solid(ivec2(x0, y1), ivec2(x1, y1), 0),
            Wall::solid(ivec2(x1, y1), ivec2(x1, y0), 0),
            Wall::solid(ivec2(x1, y0), ivec2(x0, y0), 0),
        ],
        floor_z,
        ceil_z,
        floor_colour: Vec3::splat(0.5),
        ceil_colour: Vec3::splat(0.8),
    }
}

/// Row of 4×4 rooms along +x.  Room `i` spans `x ∈ [4i, 4i+4]`, has its
/// floor at `floors[i]` and a ceiling 3 units above it; neighbouring rooms
/// share their east/west wall as a portal.
pub fn chain(floors: &[f32]) -> Vec<Sector> {
    let n = floors.len();
    floors
        .iter()
        .enumerate()
        .map(|(i, &floor)| {
            let x0 = 4 * i as i32;
            let mut s = room(x0, 0, x0 + 4, 4, floor, floor + 3.0);
            s.id = i as i32 + 1;
            if i > 0 {
                s.walls[0].portal = Some(SectorId(i as u16 - 1));
            }
            if i + 1 < n {
                s.walls[2].portal = Some(SectorId(i as u16 + 1));
            }
            s
        })
        .collect()
}
