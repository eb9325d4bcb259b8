use bitflags::bitflags;
use glam::Vec2;

use crate::world::Camera;

bitflags! {
    /// Keys held down during one frame.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Controls: u8 {
        const TURN_LEFT    = 0x01;
        const TURN_RIGHT   = 0x02;
        const FORWARD      = 0x04;
        const BACK         = 0x08;
        const STRAFE_LEFT  = 0x10;
        const STRAFE_RIGHT = 0x20;
        const QUIT         = 0x40;
    }
}

impl Controls {
    /// +1 turning left, −1 turning right, 0 when both or neither are held.
    pub fn turn_axis(self) -> f32 {
        axis(
            self.contains(Controls::TURN_LEFT),
            self.contains(Controls::TURN_RIGHT),
        )
    }

    /// `(forward, right)` in `−1 ..= 1`, opposing keys cancel.
    pub fn move_axes(self) -> Vec2 {
        Vec2::new(
            axis(self.contains(Controls::FORWARD), self.contains(Controls::BACK)),
            axis(
                self.contains(Controls::STRAFE_RIGHT),
                self.contains(Controls::STRAFE_LEFT),
            ),
        )
    }

    /// World-space step of length `distance` for the held movement keys.
    /// Diagonals are normalised so strafing forward is no faster.
    pub fn displacement(self, camera: &Camera, distance: f32) -> Vec2 {
        let a = self.move_axes();
        let dir = camera.forward() * a.x + camera.right() * a.y;
        dir.normalize_or_zero() * distance
    }
}

#[inline]
fn axis(pos: bool, neg: bool) -> f32 {
    (pos as i8 - neg as i8) as f32
}
