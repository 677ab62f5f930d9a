use std::fmt;

use blake3::Hasher;

/// Hash of the combined vertex/index buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHash(pub [u8; 32]);

impl fmt::Display for MeshHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", blake3::Hash::from(self.0).to_hex())
    }
}

/// Packed vertex layout produced by the mesher.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FluidVertex {
    /// Position after the mesher's transform.
    pub position: [f32; 3],
    /// Outward face normal (unit length).
    pub normal: [f32; 3],
    /// Texture coordinates in atlas space.
    pub uv: [f32; 2],
    /// Tint as `[r, g, b, a]`.
    pub color: [u8; 4],
    /// Light channels in packed order: `[sky, block]` (high half, then low half).
    pub light: [u16; 2],
}

/// Two 16-bit light channels packed as `sky << 16 | block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedLight(pub u32);

impl PackedLight {
    /// Maximum block and sky light at the usual 0..=240 lightmap scale.
    pub const FULL_BRIGHT: PackedLight = PackedLight::new(0xF0, 0xF0);

    /// Pack block and sky channels.
    pub const fn new(block: u16, sky: u16) -> Self {
        Self(((sky as u32) << 16) | block as u32)
    }

    /// Low half.
    pub const fn block(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// High half.
    pub const fn sky(self) -> u16 {
        (self.0 >> 16 & 0xFFFF) as u16
    }

    /// Vertex attribute order.
    pub const fn channels(self) -> [u16; 2] {
        [self.sky(), self.block()]
    }
}

/// Packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    /// Opaque white; leaves sprite colors untouched.
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);

    /// Unpack into vertex order `[r, g, b, a]`.
    pub const fn to_rgba(self) -> [u8; 4] {
        let c = self.0;
        [
            (c >> 16 & 0xFF) as u8,
            (c >> 8 & 0xFF) as u8,
            (c & 0xFF) as u8,
            (c >> 24 & 0xFF) as u8,
        ]
    }
}

impl Default for Argb {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Tint and light shared by every vertex of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Shading {
    /// Vertex color.
    pub color: Argb,
    /// Vertex light.
    pub light: PackedLight,
}

impl Shading {
    /// Bundle color and light.
    pub const fn new(color: Argb, light: PackedLight) -> Self {
        Self { color, light }
    }
}

/// Destination for emitted quads. The mesher never owns or allocates it.
pub trait VertexSink {
    /// Append one quad (four vertices, counter-clockwise from outside).
    fn push_quad(&mut self, quad: [FluidVertex; 4]);
}

impl VertexSink for Vec<FluidVertex> {
    #[inline]
    fn push_quad(&mut self, quad: [FluidVertex; 4]) {
        self.extend_from_slice(&quad);
    }
}

/// Output mesh buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffers {
    /// Vertex buffer used for draw submission.
    pub vertices: Vec<FluidVertex>,
    /// Index buffer (triangle list).
    pub indices: Vec<u32>,
    /// Stable hash of the vertex + index buffers for cache comparisons.
    pub hash: MeshHash,
}

impl MeshBuffers {
    /// Construct an empty mesh (useful for initialization).
    pub fn empty() -> Self {
        MeshBuilder::new().finish()
    }

    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when nothing was emitted.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Accumulates quads into indexed triangle lists.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<FluidVertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with room for `quads` quads.
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
        }
    }

    /// Quads pushed so far.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Seal the buffers and hash them.
    pub fn finish(self) -> MeshBuffers {
        let MeshBuilder { vertices, indices } = self;
        let mut hasher = Hasher::new();
        hasher.update(bytemuck::cast_slice(&vertices));
        hasher.update(bytemuck::cast_slice(&indices));
        MeshBuffers {
            vertices,
            indices,
            hash: MeshHash(*hasher.finalize().as_bytes()),
        }
    }
}

impl VertexSink for MeshBuilder {
    fn push_quad(&mut self, quad: [FluidVertex; 4]) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&quad);
        for idx in [0, 1, 2, 0, 2, 3] {
            self.indices.push(base + idx);
        }
    }
}
