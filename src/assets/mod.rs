//! On-disk inputs: text map, text light list and PPM wall textures.
//!
//! Everything here runs once before the first frame; any error is fatal to
//! the caller.

mod lights;
mod map;
mod ppm;
mod tokens;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::world::{LevelError, Scene, TextureBank, TextureError};

pub use lights::{load_lights, parse_lights};
pub use map::{load_map, parse_map};
pub use ppm::{decode_ppm, load_ppm};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: invalid texture: {reason}", path.display())]
    BadTexture { path: PathBuf, reason: String },

    #[error("light {index} has intensity {value}, expected 0..=1")]
    BadIntensity { index: usize, value: f32 },

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Texture(#[from] TextureError),
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a map, an optional light list and textures (ids in argument order)
/// into a [`Scene`].
pub fn load_scene<P: AsRef<Path>>(
    map: &Path,
    lights: Option<&Path>,
    textures: &[P],
) -> Result<Scene, LoadError> {
    let level = load_map(map)?;
    let lights = lights.map(load_lights).transpose()?.unwrap_or_default();

    let mut bank = TextureBank::default();
    for path in textures {
        let path = path.as_ref();
        let tex = load_ppm(path)?;
        bank.insert(path.display().to_string(), tex)?;
    }

    let max_id = level
        .sectors()
        .iter()
        .flat_map(|s| &s.walls)
        .map(|w| w.texture_id as usize)
        .max();
    if let Some(id) = max_id
        && id >= bank.len()
    {
        log::warn!(
            "walls use texture id {id} but only {} textures loaded; checkerboard substituted",
            bank.len()
        );
    }

    log::info!(
        "{}: {} sectors, {} lights, {} textures",
        map.display(),
        level.len(),
        lights.len(),
        bank.len()
    );

    Ok(Scene::new(level, lights, bank))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ROOM: &str = "1\n1 4 0 3\n0.5 0.5 0.5 0.8 0.8 0.8\n\
                        0 0 0 4 0 0\n0 4 4 4 0 0\n4 4 4 0 0 0\n4 0 0 0 0 0\n";

    fn file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn scene_from_files() {
        let map = file(ROOM.as_bytes());
        let lights = file(b"1\n2 2 0.7\n");

        let mut ppm = b"P6\n64 64\n255\n".to_vec();
        ppm.resize(ppm.len() + 64 * 64 * 3, 128);
        let tex = file(&ppm);

        let scene = load_scene(map.path(), Some(lights.path()), &[tex.path()]).unwrap();
        assert_eq!(scene.level.len(), 1);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.textures.len(), 1);
        assert!(scene.textures.texture(0).is_ok());
    }

    #[test]
    fn lights_are_optional() {
        let map = file(ROOM.as_bytes());
        let scene = load_scene::<&Path>(map.path(), None, &[]).unwrap();
        assert!(scene.lights.is_empty());
        assert!(scene.textures.is_empty());
    }

    #[test]
    fn missing_map_is_io_error() {
        let err = load_scene::<&Path>(Path::new("/nonexistent/level.map"), None, &[]).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("level.map"));
    }
}
