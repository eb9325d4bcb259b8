//! Binary PPM (`P6`) wall textures.
//!
//! Only the exact engine texture size with an 8-bit channel range is
//! accepted.  The file stores the top row first; texels are flipped so
//! row 0 is the bottom of the image.

use std::path::Path;

use glam::Vec3;

use super::LoadError;
use crate::world::{TEX_HEIGHT, TEX_WIDTH, Texture};

pub fn load_ppm(path: &Path) -> Result<Texture, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_ppm(path, &bytes)
}

pub fn decode_ppm(path: &Path, bytes: &[u8]) -> Result<Texture, LoadError> {
    let bad = |reason: String| LoadError::BadTexture {
        path: path.to_path_buf(),
        reason,
    };

    if !bytes.starts_with(b"P6") {
        return Err(bad("missing P6 magic".into()));
    }

    let mut cur = Header { bytes, pos: 2 };
    let width = cur.number().ok_or_else(|| bad("bad width".into()))?;
    let height = cur.number().ok_or_else(|| bad("bad height".into()))?;
    let maxval = cur.number().ok_or_else(|| bad("bad max value".into()))?;

    if width != TEX_WIDTH || height != TEX_HEIGHT {
        return Err(bad(format!(
            "size {width}x{height}, expected {TEX_WIDTH}x{TEX_HEIGHT}"
        )));
    }
    if maxval != 255 {
        return Err(bad(format!("max value {maxval}, expected 255")));
    }

    // exactly one whitespace byte separates the header from the raster
    let start = cur.pos + 1;
    let len = TEX_WIDTH * TEX_HEIGHT * 3;
    let Some(raster) = bytes.get(start..start + len) else {
        return Err(bad(format!(
            "truncated pixel data: {} of {len} bytes",
            bytes.len().saturating_sub(start)
        )));
    };

    let mut texels = vec![Vec3::ZERO; TEX_WIDTH * TEX_HEIGHT];
    for (row, line) in raster.chunks_exact(TEX_WIDTH * 3).enumerate() {
        let y = TEX_HEIGHT - 1 - row;
        for (x, px) in line.chunks_exact(3).enumerate() {
            texels[y * TEX_WIDTH + x] = Vec3::new(px[0] as f32, px[1] as f32, px[2] as f32) / 255.0;
        }
    }

    let name = path
        .file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned());

    Ok(Texture {
        name,
        w: TEX_WIDTH,
        h: TEX_HEIGHT,
        texels,
    })
}

/// Cursor over the ASCII header.
struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Header<'_> {
    fn skip_blank(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            match b {
                b'#' => {
                    while self.bytes.get(self.pos).is_some_and(|&c| c != b'\n') {
                        self.pos += 1;
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Next decimal field; leaves `pos` on the byte after its last digit.
    fn number(&mut self) -> Option<usize> {
        self.skip_blank();
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()?
            .parse()
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Top file row red, everything else blue.
    fn image(header: &str) -> Vec<u8> {
        let mut v = header.as_bytes().to_vec();
        for row in 0..TEX_HEIGHT {
            for _ in 0..TEX_WIDTH {
                v.extend_from_slice(if row == 0 { &[255, 0, 0] } else { &[0, 0, 255] });
            }
        }
        v
    }

    #[test]
    fn rows_are_flipped() {
        let tex = decode_ppm(Path::new("brick.ppm"), &image("P6\n64 64\n255\n")).unwrap();
        assert_eq!(tex.name, "brick");
        assert_eq!(tex.texel(5, 63), Vec3::X);
        assert_eq!(tex.texel(5, 0), Vec3::Z);
    }

    #[test]
    fn header_comments_skipped() {
        let bytes = image("P6\n# made by hand\n64 # width\n64\n255\n");
        assert!(decode_ppm(Path::new("c.ppm"), &bytes).is_ok());
    }

    #[test]
    fn wrong_size_rejected() {
        let err = decode_ppm(Path::new("s.ppm"), &image("P6\n32 128\n255\n")).unwrap_err();
        assert!(matches!(err, LoadError::BadTexture { ref reason, .. } if reason.contains("32x128")));
    }

    #[test]
    fn wrong_maxval_and_magic_rejected() {
        assert!(decode_ppm(Path::new("m.ppm"), &image("P6\n64 64\n65535\n")).is_err());
        assert!(decode_ppm(Path::new("p.ppm"), &image("P3\n64 64\n255\n")).is_err());
    }

    #[test]
    fn truncated_raster_rejected() {
        let mut bytes = image("P6\n64 64\n255\n");
        bytes.truncate(bytes.len() - 1);
        let err = decode_ppm(Path::new("t.ppm"), &bytes).unwrap_err();
        assert!(matches!(err, LoadError::BadTexture { ref reason, .. } if reason.contains("truncated")));
    }

    #[test]
    fn reads_from_disk() {
        let tmp = tempfile::NamedTempFile::new().expect("tempfile");
        std::fs::write(tmp.path(), image("P6\n64 64\n255\n")).unwrap();
        let tex = load_ppm(tmp.path()).unwrap();
        assert_eq!(tex.texels.len(), TEX_WIDTH * TEX_HEIGHT);

        let missing = load_ppm(Path::new("/nonexistent/wall.ppm")).unwrap_err();
        assert!(matches!(missing, LoadError::Io { .. }));
    }
}
