use fluidmesh_assets::{AtlasSprite, FluidDescriptor, FluidRegistry, SpriteAtlas};
use glam::Vec3;
use tracing::{debug, warn};

use crate::cuboid::{Cuboid, CuboidMesher, CuboidSprites};
use crate::mesh::{Argb, PackedLight, Shading, VertexSink};
use crate::style::FluidFaces;

/// A registered fluid with its sprites looked up in an atlas.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedFluid<'a> {
    /// Registry entry.
    pub descriptor: &'a FluidDescriptor,
    /// Still sprite, if the atlas has it.
    pub still: Option<&'a AtlasSprite>,
    /// Flowing sprite, if the atlas has it.
    pub flowing: Option<&'a AtlasSprite>,
}

impl<'a> ResolvedFluid<'a> {
    /// Look `name` up in the registry and its sprites in the atlas. `None` for unknown fluids.
    pub fn resolve(
        registry: &'a FluidRegistry,
        atlas: &'a SpriteAtlas,
        name: &str,
    ) -> Option<Self> {
        let descriptor = registry.by_name(name)?;
        let still = atlas.sprite(&descriptor.still);
        let flowing = atlas.sprite(&descriptor.flowing);
        if still.is_none() {
            warn!(fluid = name, sprite = %descriptor.still, "still sprite missing from atlas");
        }
        if flowing.is_none() {
            warn!(fluid = name, sprite = %descriptor.flowing, "flowing sprite missing from atlas");
        }
        Some(Self {
            descriptor,
            still,
            flowing,
        })
    }

    /// Sprites in the shape the mesher expects.
    pub fn sprites(&self) -> CuboidSprites<'a, AtlasSprite> {
        CuboidSprites::new(self.still, self.flowing)
    }

    /// Fluid tint combined with `light`.
    pub fn shading(&self, light: PackedLight) -> Shading {
        Shading::new(Argb(self.descriptor.color), light)
    }

    /// Gases render their textures upside down.
    pub fn gaseous(&self) -> bool {
        self.descriptor.gaseous
    }

    /// Mesh the fluid over `cuboid` at the mesher's origin.
    pub fn mesh_cuboid<K: VertexSink + ?Sized>(
        &self,
        mesher: &CuboidMesher,
        sink: &mut K,
        cuboid: Cuboid,
        faces: &FluidFaces,
        light: PackedLight,
    ) -> usize {
        let written = mesher.emit_cuboid(
            sink,
            cuboid,
            |face| faces.style(face),
            self.sprites(),
            self.shading(light),
            self.gaseous(),
        );
        debug!(fluid = %self.descriptor.name, vertices = written, "meshed fluid cuboid");
        written
    }

    /// Mesh the fluid box spanning `from..to` (in cell units).
    pub fn mesh_box<K: VertexSink + ?Sized>(
        &self,
        mesher: &CuboidMesher,
        sink: &mut K,
        from: Vec3,
        to: Vec3,
        faces: &FluidFaces,
        light: PackedLight,
    ) -> usize {
        let written = mesher.emit_box(
            sink,
            from,
            to,
            faces,
            self.sprites(),
            self.shading(light),
            self.gaseous(),
        );
        debug!(fluid = %self.descriptor.name, vertices = written, "meshed fluid box");
        written
    }

    /// [`mesh_box`](Self::mesh_box) with corners in 0..16 block-model units.
    pub fn mesh_scaled_box<K: VertexSink + ?Sized>(
        &self,
        mesher: &CuboidMesher,
        sink: &mut K,
        from: Vec3,
        to: Vec3,
        faces: &FluidFaces,
        light: PackedLight,
    ) -> usize {
        let written = mesher.emit_scaled_box(
            sink,
            from,
            to,
            faces,
            self.sprites(),
            self.shading(light),
            self.gaseous(),
        );
        debug!(fluid = %self.descriptor.name, vertices = written, "meshed scaled fluid box");
        written
    }
}

#[cfg(test)]
mod tests {
    use fluidmesh_assets::fluids_from_str;

    use super::*;
    use crate::face::Face;
    use crate::mesh::{FluidVertex, MeshBuilder};

    fn atlas() -> SpriteAtlas {
        SpriteAtlas::new(
            32,
            16,
            vec![
                AtlasSprite::from_pixels("water_still", 0, 0, 16, 16, 32, 16),
                AtlasSprite::from_pixels("water_flow", 16, 0, 16, 16, 32, 16),
            ],
        )
        .expect("valid atlas")
    }

    fn registry() -> FluidRegistry {
        fluids_from_str(
            r##"[
                {"name": "water", "color": "#CC3F76E4"},
                {"name": "steam", "still": "water_still", "flowing": "water_flow", "gaseous": true},
                {"name": "lava"}
            ]"##,
        )
        .expect("registry parses")
    }

    #[test]
    fn resolves_sprites_and_tint() {
        let registry = registry();
        let atlas = atlas();
        let water = ResolvedFluid::resolve(&registry, &atlas, "water").expect("water");
        assert!(water.still.is_some());
        assert!(water.flowing.is_some());
        assert!(!water.gaseous());
        let shading = water.shading(PackedLight::FULL_BRIGHT);
        assert_eq!(shading.color.to_rgba(), [0x3F, 0x76, 0xE4, 0xCC]);

        assert!(ResolvedFluid::resolve(&registry, &atlas, "honey").is_none());
    }

    #[test]
    fn missing_sprites_only_drop_their_faces() {
        let registry = registry();
        let atlas = atlas();
        let lava = ResolvedFluid::resolve(&registry, &atlas, "lava").expect("lava");
        assert!(lava.still.is_none());

        let mut out: Vec<FluidVertex> = Vec::new();
        let written = lava.mesh_cuboid(
            &CuboidMesher::new(),
            &mut out,
            Cuboid::UNIT,
            &FluidFaces::standard(),
            PackedLight::FULL_BRIGHT,
        );
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn box_meshes_into_indexed_buffers() {
        let registry = registry();
        let atlas = atlas();
        let water = ResolvedFluid::resolve(&registry, &atlas, "water").expect("water");
        let mut builder = MeshBuilder::new();
        let written = water.mesh_scaled_box(
            &CuboidMesher::new(),
            &mut builder,
            Vec3::ZERO,
            Vec3::new(16.0, 14.0, 16.0),
            &FluidFaces::standard().without(Face::Down),
            PackedLight::new(0x20, 0xF0),
        );
        assert_eq!(written, 20);
        let mesh = builder.finish();
        assert_eq!(mesh.vertices.len(), 20);
        assert_eq!(mesh.triangle_count(), 10);
        assert!(mesh.vertices.iter().all(|v| v.light == [0xF0, 0x20]));
    }

    #[test]
    fn gas_and_liquid_share_geometry() {
        let registry = registry();
        let atlas = atlas();
        let water = ResolvedFluid::resolve(&registry, &atlas, "water").expect("water");
        let steam = ResolvedFluid::resolve(&registry, &atlas, "steam").expect("steam");
        assert!(steam.gaseous());

        let mesher = CuboidMesher::new();
        let faces = FluidFaces::standard();
        let mut liquid: Vec<FluidVertex> = Vec::new();
        let mut gas: Vec<FluidVertex> = Vec::new();
        let light = PackedLight::FULL_BRIGHT;
        water.mesh_box(&mesher, &mut liquid, Vec3::ZERO, Vec3::ONE, &faces, light);
        steam.mesh_box(&mesher, &mut gas, Vec3::ZERO, Vec3::ONE, &faces, light);
        assert_eq!(liquid.len(), gas.len());
        for (l, g) in liquid.iter().zip(&gas) {
            assert_eq!(l.position, g.position);
        }
        assert_ne!(
            liquid.iter().map(|v| v.uv).collect::<Vec<_>>(),
            gas.iter().map(|v| v.uv).collect::<Vec<_>>()
        );
    }
}
