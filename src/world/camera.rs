use glam::Vec2;

use super::{Level, LevelError, SectorId};

/// Player view-point in world space.
///
/// * Only **yaw** is simulated; the view never tilts.
/// * `eye_z` is an *absolute* height, not relative to the sector floor.
/// * `sector` is kept consistent with `pos` by [`Camera::spawn`] and the
///   movement resolver in `sim::collision`; nothing else writes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub(crate) pos: Vec2,
    pub(crate) sector: SectorId,
    angle: f32, // radians, 0 = +x, counter-clockwise
    cos: f32,
    sin: f32,
    pub(crate) eye_z: f32,
}

impl Camera {
    /// Place the camera at `pos`, `eye_height` above the floor of whichever
    /// sector contains it.
    pub fn spawn(level: &Level, pos: Vec2, angle: f32, eye_height: f32) -> Result<Self, LevelError> {
        let sector = level.locate(pos).ok_or(LevelError::OutsideMap(pos))?;
        let floor = level.sector(sector)?.floor_z;
        let mut cam = Self {
            pos,
            sector,
            angle: 0.0,
            cos: 1.0,
            sin: 0.0,
            eye_z: floor + eye_height,
        };
        cam.set_angle(angle);
        Ok(cam)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn sector(&self) -> SectorId {
        self.sector
    }

    #[inline]
    pub fn eye_z(&self) -> f32 {
        self.eye_z
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector the camera looks along, `(cos θ, sin θ)`.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.cos, self.sin)
    }

    /// Unit vector to the camera's right, `(sin θ, −cos θ)`.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.sin, -self.cos)
    }

    /*──────────────────────── orientation ───────────────────────────*/

    /// Rotate around Z (positive = turn left).
    pub fn turn(&mut self, delta: f32) {
        self.set_angle(self.angle + delta);
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle.rem_euclid(std::f32::consts::TAU);
        (self.sin, self.cos) = self.angle.sin_cos();
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::fixtures::chain;
    use glam::vec2;
    use std::f32::consts::FRAC_PI_2;

    fn level() -> Level {
        Level::new(chain(&[0.0, 1.0])).unwrap()
    }

    #[test]
    fn spawn_finds_sector_and_eye_height() {
        let cam = Camera::spawn(&level(), vec2(6.0, 2.0), 0.0, 1.5).unwrap();
        assert_eq!(cam.sector(), SectorId(1));
        assert!((cam.eye_z() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn spawn_outside_map_fails() {
        let err = Camera::spawn(&level(), vec2(-1.0, 2.0), 0.0, 1.5).unwrap_err();
        assert_eq!(err, LevelError::OutsideMap(vec2(-1.0, 2.0)));
    }

    #[test]
    fn forward_and_right_are_orthonormal() {
        let mut cam = Camera::spawn(&level(), vec2(2.0, 2.0), 0.3, 1.0).unwrap();
        cam.turn(1.1);
        let f = cam.forward();
        let r = cam.right();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
        // right is forward rotated clockwise
        assert!(f.perp_dot(r) < 0.0);
    }

    #[test]
    fn turn_wraps_into_range() {
        let mut cam = Camera::spawn(&level(), vec2(2.0, 2.0), 0.0, 1.0).unwrap();
        cam.turn(-FRAC_PI_2);
        assert!((cam.angle() - 3.0 * FRAC_PI_2).abs() < 1e-5);
        assert!((cam.forward() - vec2(0.0, -1.0)).length() < 1e-5);
    }
}
