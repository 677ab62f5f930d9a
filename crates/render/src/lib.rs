#![warn(missing_docs)]
//! Textured quad meshing for fluid cuboids.
//!
//! [`CuboidMesher`] turns an axis-aligned box into up to six quads whose UVs tile
//! the fluid's still and flowing sprites. Quads go to any [`VertexSink`]; a
//! [`MeshBuilder`] turns them into indexed, hashed [`MeshBuffers`] that
//! [`FluidMeshCache`] can hold per model and render layer.

mod cache;
mod cuboid;
mod face;
mod fluid;
mod mesh;
mod sprite;
mod style;

pub use cache::{FluidMeshCache, ModelKey, RenderLayer};
pub use cuboid::{
    face_uv_rect, face_uvs, face_windows, tile_extent, Cuboid, CuboidMesher, CuboidSprites,
    TexelWindow, UvRect, SCALED_UNITS,
};
pub use face::{Axis, Face};
pub use fluid::ResolvedFluid;
pub use mesh::{
    Argb, FluidVertex, MeshBuffers, MeshBuilder, MeshHash, PackedLight, Shading, VertexSink,
};
pub use sprite::{SpriteRect, SpriteRegion, SPRITE_TEXELS};
pub use style::{FaceStyle, FluidFaces, Rotation, SpriteKind};
