//! Text light list: a count, then `x y intensity` per light.

use std::path::Path;

use glam::vec2;

use super::{LoadError, read_text, tokens::Tokens};
use crate::world::Light;

pub fn load_lights(path: &Path) -> Result<Vec<Light>, LoadError> {
    let text = read_text(path)?;
    parse_lights(path, &text)
}

pub fn parse_lights(path: &Path, text: &str) -> Result<Vec<Light>, LoadError> {
    let mut t = Tokens::new(path, text);
    let count: usize = t.next("light count")?;

    (0..count)
        .map(|index| {
            let pos = vec2(t.next("light x")?, t.next("light y")?);
            let value: f32 = t.next("intensity")?;
            if !(0.0..=1.0).contains(&value) {
                return Err(LoadError::BadIntensity { index, value });
            }
            Ok(Light::new(pos, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lights() {
        let lights = parse_lights(Path::new("l.txt"), "2\n1 2 0.5\n# lamp\n-3 4.5 1\n").unwrap();
        assert_eq!(lights.len(), 2);
        assert_eq!(lights[1].pos, vec2(-3.0, 4.5));
        assert_eq!(lights[1].intensity, 1.0);
    }

    #[test]
    fn empty_list_is_fine() {
        assert!(parse_lights(Path::new("l.txt"), "0\n").unwrap().is_empty());
    }

    #[test]
    fn intensity_out_of_range() {
        let err = parse_lights(Path::new("l.txt"), "2\n0 0 0.5\n1 1 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::BadIntensity { index: 1, value } if value == 1.5
        ));
    }
}
