use fluidmesh_assets::AtlasSprite;

/// Texels spanned by one sprite along each axis in interpolation space.
pub const SPRITE_TEXELS: f64 = 16.0;

/// Read-only view of a sprite's sub-rectangle inside a shared atlas.
///
/// Texel coordinates run `0..=16` across the sprite regardless of its pixel size;
/// the mesher scales its normalized face coordinates into this range.
pub trait SpriteRegion {
    /// Left edge in atlas space.
    fn min_u(&self) -> f32;
    /// Right edge in atlas space.
    fn max_u(&self) -> f32;
    /// Top edge in atlas space.
    fn min_v(&self) -> f32;
    /// Bottom edge in atlas space.
    fn max_v(&self) -> f32;

    /// Map a sprite-local texel coordinate onto the atlas U axis.
    fn interpolated_u(&self, texel: f64) -> f32 {
        let span = f64::from(self.max_u() - self.min_u());
        (f64::from(self.min_u()) + span * texel / SPRITE_TEXELS) as f32
    }

    /// Map a sprite-local texel coordinate onto the atlas V axis.
    fn interpolated_v(&self, texel: f64) -> f32 {
        let span = f64::from(self.max_v() - self.min_v());
        (f64::from(self.min_v()) + span * texel / SPRITE_TEXELS) as f32
    }
}

/// Plain atlas rectangle, handy when sprites come from somewhere other than [`AtlasSprite`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRect {
    /// Left edge.
    pub u0: f32,
    /// Top edge.
    pub v0: f32,
    /// Right edge.
    pub u1: f32,
    /// Bottom edge.
    pub v1: f32,
}

impl SpriteRect {
    /// The whole atlas; interpolation becomes `texel / 16`.
    pub const FULL: SpriteRect = SpriteRect {
        u0: 0.0,
        v0: 0.0,
        u1: 1.0,
        v1: 1.0,
    };

    /// Construct from explicit edges.
    pub const fn new(u0: f32, v0: f32, u1: f32, v1: f32) -> Self {
        Self { u0, v0, u1, v1 }
    }
}

impl SpriteRegion for SpriteRect {
    fn min_u(&self) -> f32 {
        self.u0
    }

    fn max_u(&self) -> f32 {
        self.u1
    }

    fn min_v(&self) -> f32 {
        self.v0
    }

    fn max_v(&self) -> f32 {
        self.v1
    }
}

impl SpriteRegion for AtlasSprite {
    fn min_u(&self) -> f32 {
        self.u0
    }

    fn max_u(&self) -> f32 {
        self.u1
    }

    fn min_v(&self) -> f32 {
        self.v0
    }

    fn max_v(&self) -> f32 {
        self.v1
    }
}
