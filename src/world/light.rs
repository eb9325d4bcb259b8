use glam::Vec2;

/// Point light on the map plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub pos: Vec2,
    /// Scalar strength in `[0, 1]`.
    pub intensity: f32,
}

impl Light {
    pub fn new(pos: Vec2, intensity: f32) -> Self {
        Self { pos, intensity }
    }
}
