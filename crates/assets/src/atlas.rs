use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Slack allowed between a sprite's normalized UVs and its pixel rectangle.
const UV_TOLERANCE: f32 = 1.0e-4;

/// Errors that can occur while loading or validating atlas metadata.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Wrap IO failures when reading metadata files.
    #[error("failed to read atlas metadata: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap JSON parsing issues.
    #[error("failed to parse atlas metadata: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation errors describing why metadata is inconsistent.
    #[error("invalid atlas metadata: {0}")]
    Invalid(String),
}

/// A named sub-rectangle of the atlas image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasSprite {
    /// Logical identifier (e.g., "water_still").
    pub name: String,
    /// X offset in pixels within the atlas (top-left origin).
    pub x: u32,
    /// Y offset in pixels within the atlas (top-left origin).
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Normalized left U coordinate.
    pub u0: f32,
    /// Normalized top V coordinate.
    pub v0: f32,
    /// Normalized right U coordinate.
    pub u1: f32,
    /// Normalized bottom V coordinate.
    pub v1: f32,
}

impl AtlasSprite {
    /// Build a sprite from its pixel rectangle, deriving normalized UVs from the atlas size.
    pub fn from_pixels(
        name: &str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    ) -> Self {
        let aw = atlas_width.max(1) as f32;
        let ah = atlas_height.max(1) as f32;
        Self {
            name: name.to_string(),
            x,
            y,
            width,
            height,
            u0: x as f32 / aw,
            v0: y as f32 / ah,
            u1: (u64::from(x) + u64::from(width)) as f32 / aw,
            v1: (u64::from(y) + u64::from(height)) as f32 / ah,
        }
    }
}

/// Metadata describing where every sprite lives inside the shared atlas image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteAtlas {
    /// Atlas width in pixels.
    pub atlas_width: u32,
    /// Atlas height in pixels.
    pub atlas_height: u32,
    /// Sprites packed into the atlas.
    pub sprites: Vec<AtlasSprite>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SpriteAtlas {
    /// Construct an atlas from already-built sprites and validate it.
    pub fn new(
        atlas_width: u32,
        atlas_height: u32,
        sprites: Vec<AtlasSprite>,
    ) -> Result<Self, AtlasError> {
        let mut atlas = Self {
            atlas_width,
            atlas_height,
            sprites,
            index: HashMap::new(),
        };
        atlas.validate()?;
        atlas.rebuild_index();
        Ok(atlas)
    }

    /// Parse metadata from a JSON string and validate contents.
    pub fn parse_str(input: &str) -> Result<Self, AtlasError> {
        let mut atlas: SpriteAtlas = serde_json::from_str(input)?;
        atlas.validate()?;
        atlas.rebuild_index();
        Ok(atlas)
    }

    /// Load metadata from a file on disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, AtlasError> {
        let data = fs::read_to_string(path)?;
        Self::parse_str(&data)
    }

    /// Validate the structure of the metadata and return `Ok(())` if consistent.
    pub fn validate(&self) -> Result<(), AtlasError> {
        if self.atlas_width == 0 || self.atlas_height == 0 {
            return Err(AtlasError::Invalid(
                "atlas dimensions must be greater than zero".into(),
            ));
        }
        let mut seen = HashSet::new();
        for sprite in &self.sprites {
            if sprite.width == 0 || sprite.height == 0 {
                return Err(AtlasError::Invalid(format!(
                    "sprite {} has empty dimensions {}x{}",
                    sprite.name, sprite.width, sprite.height
                )));
            }
            let fits_x = sprite
                .x
                .checked_add(sprite.width)
                .is_some_and(|right| right <= self.atlas_width);
            let fits_y = sprite
                .y
                .checked_add(sprite.height)
                .is_some_and(|bottom| bottom <= self.atlas_height);
            if !fits_x || !fits_y {
                return Err(AtlasError::Invalid(format!(
                    "sprite {} exceeds atlas bounds",
                    sprite.name
                )));
            }
            if sprite.u0 > sprite.u1 || sprite.v0 > sprite.v1 {
                return Err(AtlasError::Invalid(format!(
                    "sprite {} has inverted uv rectangle",
                    sprite.name
                )));
            }
            let expected = AtlasSprite::from_pixels(
                &sprite.name,
                sprite.x,
                sprite.y,
                sprite.width,
                sprite.height,
                self.atlas_width,
                self.atlas_height,
            );
            let drift = [
                (sprite.u0 - expected.u0).abs(),
                (sprite.v0 - expected.v0).abs(),
                (sprite.u1 - expected.u1).abs(),
                (sprite.v1 - expected.v1).abs(),
            ];
            if drift.iter().any(|d| *d > UV_TOLERANCE) {
                return Err(AtlasError::Invalid(format!(
                    "sprite {} uvs do not match its pixel rectangle",
                    sprite.name
                )));
            }
            if !seen.insert(sprite.name.as_str()) {
                return Err(AtlasError::Invalid(format!(
                    "duplicate atlas sprite '{}'",
                    sprite.name
                )));
            }
        }
        Ok(())
    }

    /// Lookup a sprite by name.
    pub fn sprite(&self, name: &str) -> Option<&AtlasSprite> {
        self.index.get(name).and_then(|&ix| self.sprites.get(ix))
    }

    /// Number of sprites in the atlas.
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    /// True when the atlas holds no sprites.
    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .sprites
            .iter()
            .enumerate()
            .map(|(ix, sprite)| (sprite.name.clone(), ix))
            .collect();
    }
}
