// Format-agnostic repository of wall textures decoded by the asset loader.
// The renderer and the map interact through `TextureId` only.

use std::collections::HashMap;

use glam::Vec3;

/// Runtime handle for a texture in this bank; equals the map's `texture_id`.
pub type TextureId = u16;

/// Every texture the engine samples has exactly these dimensions.
pub const TEX_WIDTH: usize = 64;
pub const TEX_HEIGHT: usize = 64;

/// Linear RGB texels in row-major order.  Row 0 is the *bottom* row of the
/// source image so that `v` grows upward from the floor line.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub texels: Vec<Vec3>,
}

/// Checkerboard 8×8 (dark/light grey), shown for unknown ids.
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Vec3 = Vec3::splat(0.75);
        const DARK: Vec3 = Vec3::splat(0.25);
        let mut texels = vec![Vec3::ZERO; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                texels[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            w: 8,
            h: 8,
            texels,
        }
    }
}

impl Texture {
    /// Sample with wrap-around addressing in both axes.
    #[inline]
    pub fn texel(&self, x: i32, y: i32) -> Vec3 {
        let tx = x.rem_euclid(self.w as i32) as usize;
        let ty = y.rem_euclid(self.h as i32) as usize;
        self.texels[ty * self.w + tx]
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// Read-only (during rendering) store of wall textures.
///
/// * ids are assigned densely in insertion order, starting at 0;
/// * a `missing` texture answers every id that was never inserted.
#[derive(Debug)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
    missing: Texture,
}

impl Default for TextureBank {
    fn default() -> Self {
        Self::new(Texture::default())
    }
}

impl TextureBank {
    pub fn new(missing: Texture) -> Self {
        Self {
            by_name: HashMap::new(),
            data: Vec::new(),
            missing,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe query used by the rasterizer.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data.get(id as usize).unwrap_or(&self.missing)
    }

    /// Insert a texture under `name` and return its id.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
