use crate::face::Face;

/// Quarter-turn rotation applied to a face's texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    /// No rotation.
    #[default]
    R0,
    /// 90 degrees.
    R90,
    /// 180 degrees.
    R180,
    /// 270 degrees.
    R270,
}

impl Rotation {
    /// Snap arbitrary degrees down to a multiple of 90, wrapping modulo 360.
    pub fn from_degrees(degrees: i32) -> Self {
        Self::from_quarter_turns(degrees.div_euclid(90))
    }

    fn from_quarter_turns(turns: i32) -> Self {
        match turns.rem_euclid(4) {
            1 => Rotation::R90,
            2 => Rotation::R180,
            3 => Rotation::R270,
            _ => Rotation::R0,
        }
    }

    /// Rotation in degrees (0, 90, 180 or 270).
    pub fn degrees(self) -> i32 {
        self.quarter_turns() as i32 * 90
    }

    /// Number of quarter turns.
    pub fn quarter_turns(self) -> usize {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 1,
            Rotation::R180 => 2,
            Rotation::R270 => 3,
        }
    }

    /// Compose two rotations, modulo 360.
    pub fn then(self, other: Rotation) -> Self {
        Self::from_quarter_turns((self.quarter_turns() + other.quarter_turns()) as i32)
    }

    /// 90 and 270 swap which spatial axis drives U and V.
    pub fn transposes(self) -> bool {
        self.quarter_turns() % 2 == 1
    }
}

/// Which of the fluid's two textures a face samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpriteKind {
    /// Static texture, sampled over the full sprite.
    #[default]
    Still,
    /// Animated flow texture, sampled over half the sprite and anchored at the bottom.
    Flowing,
}

impl SpriteKind {
    /// Multiplier from normalized face coordinates into sprite texels.
    pub fn texel_scale(self) -> f64 {
        match self {
            SpriteKind::Still => 16.0,
            SpriteKind::Flowing => 8.0,
        }
    }
}

/// How one face of a cuboid is textured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FaceStyle {
    /// Still or flowing sprite.
    pub kind: SpriteKind,
    /// Texture rotation.
    pub rotation: Rotation,
    /// Swap the V bounds after the rectangle is computed.
    pub flip_horizontal: bool,
    /// Swap the U bounds after the rectangle is computed.
    pub flip_vertical: bool,
}

impl FaceStyle {
    /// Unrotated still face.
    pub const STILL: FaceStyle = FaceStyle {
        kind: SpriteKind::Still,
        rotation: Rotation::R0,
        flip_horizontal: false,
        flip_vertical: false,
    };

    /// Unrotated flowing face.
    pub const FLOWING: FaceStyle = FaceStyle {
        kind: SpriteKind::Flowing,
        rotation: Rotation::R0,
        flip_horizontal: false,
        flip_vertical: false,
    };

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Add `rotation` on top of the current one.
    pub fn rotated(mut self, rotation: Rotation) -> Self {
        self.rotation = self.rotation.then(rotation);
        self
    }

    /// Set both flip flags.
    pub fn with_flips(mut self, horizontal: bool, vertical: bool) -> Self {
        self.flip_horizontal = horizontal;
        self.flip_vertical = vertical;
        self
    }
}

/// Per-face styles for a cuboid; `None` leaves the face out of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FluidFaces {
    styles: [Option<FaceStyle>; 6],
}

impl FluidFaces {
    /// No faces at all.
    pub const fn none() -> Self {
        Self { styles: [None; 6] }
    }

    /// Every face uses `style`.
    pub const fn uniform(style: FaceStyle) -> Self {
        Self {
            styles: [Some(style); 6],
        }
    }

    /// Still top and bottom, flowing sides: the usual look of a fluid volume.
    pub fn standard() -> Self {
        let mut faces = Self::uniform(FaceStyle::FLOWING);
        faces.set(Face::Down, Some(FaceStyle::STILL));
        faces.set(Face::Up, Some(FaceStyle::STILL));
        faces
    }

    /// Style for `face`, if it is present.
    pub fn style(&self, face: Face) -> Option<FaceStyle> {
        self.styles[face.index()]
    }

    /// Replace the style for `face`.
    pub fn set(&mut self, face: Face, style: Option<FaceStyle>) {
        self.styles[face.index()] = style;
    }

    /// Drop `face` (e.g. culled against a neighbour).
    pub fn without(mut self, face: Face) -> Self {
        self.set(face, None);
        self
    }

    /// Number of present faces.
    pub fn count(&self) -> usize {
        self.styles.iter().filter(|s| s.is_some()).count()
    }
}
