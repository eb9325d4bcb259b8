mod camera;
pub mod geometry;
mod light;
pub mod texture;

#[cfg(test)]
pub(crate) mod fixtures;

pub use geometry::{Level, LevelError, Sector, SectorId, Wall};

pub use camera::Camera;
pub use light::Light;

pub use texture::{TEX_HEIGHT, TEX_WIDTH, Texture, TextureBank, TextureError, TextureId};

/// Everything the core reads but never writes while rendering a frame.
#[derive(Debug)]
pub struct Scene {
    pub level: Level,
    pub lights: Vec<Light>,
    pub textures: TextureBank,
}

impl Scene {
    pub fn new(level: Level, lights: Vec<Light>, textures: TextureBank) -> Self {
        Self {
            level,
            lights,
            textures,
        }
    }
}
