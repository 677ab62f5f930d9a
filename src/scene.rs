use anyhow::Result;
use fluidmesh_assets::{FluidRegistry, SpriteAtlas};
use fluidmesh_render::{
    CuboidMesher, FluidFaces, FluidMeshCache, FluidVertex, MeshBuffers, MeshBuilder, ModelKey,
    RenderLayer, ResolvedFluid,
};
use glam::Vec3;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{SceneConfig, VolumeConfig};

/// Per-volume mesh statistics.
#[derive(Debug, Serialize)]
pub struct VolumeReport {
    pub fluid: String,
    pub model: u64,
    pub quads: usize,
    pub triangles: usize,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<VertexRecord>>,
}

/// JSON view of a [`FluidVertex`].
#[derive(Debug, Serialize)]
pub struct VertexRecord {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [u8; 4],
    pub light: [u16; 2],
}

impl From<&FluidVertex> for VertexRecord {
    fn from(v: &FluidVertex) -> Self {
        Self {
            position: v.position,
            normal: v.normal,
            uv: v.uv,
            color: v.color,
            light: v.light,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SceneReport {
    pub volumes: Vec<VolumeReport>,
    /// Volumes naming fluids the registry does not know.
    pub skipped: Vec<String>,
    pub total_quads: usize,
    pub cached_meshes: usize,
}

/// Meshes every volume of a scene, sharing meshes between volumes with the same model.
pub struct SceneMesher<'a> {
    registry: &'a FluidRegistry,
    atlas: &'a SpriteAtlas,
    mesher: CuboidMesher,
    cache: FluidMeshCache,
}

impl<'a> SceneMesher<'a> {
    pub fn new(registry: &'a FluidRegistry, atlas: &'a SpriteAtlas) -> Self {
        Self {
            registry,
            atlas,
            mesher: CuboidMesher::new(),
            cache: FluidMeshCache::new(),
        }
    }

    pub fn run(&mut self, scene: &SceneConfig, dump_vertices: bool) -> Result<SceneReport> {
        let mut report = SceneReport {
            volumes: Vec::with_capacity(scene.volumes.len()),
            skipped: Vec::new(),
            total_quads: 0,
            cached_meshes: 0,
        };

        for (idx, volume) in scene.volumes.iter().enumerate() {
            let Some(fluid) = ResolvedFluid::resolve(self.registry, self.atlas, &volume.fluid)
            else {
                warn!(fluid = %volume.fluid, volume = idx, "unknown fluid; skipping volume");
                report.skipped.push(volume.fluid.clone());
                continue;
            };
            let model = volume.model.unwrap_or(idx as u64);
            let key = ModelKey::new(model, RenderLayer::for_fluid());
            let faces = volume.faces.to_fluid_faces()?;
            let mesher = self.mesher;
            let mesh = self
                .cache
                .get_or_build(key, || mesh_volume(&mesher, &fluid, volume, &faces));

            let quads = mesh.vertices.len() / 4;
            report.total_quads += quads;
            report.volumes.push(VolumeReport {
                fluid: volume.fluid.clone(),
                model,
                quads,
                triangles: mesh.triangle_count(),
                hash: mesh.hash.to_string(),
                vertices: dump_vertices
                    .then(|| mesh.vertices.iter().map(VertexRecord::from).collect()),
            });
        }

        report.cached_meshes = self.cache.len();
        info!(
            volumes = report.volumes.len(),
            skipped = report.skipped.len(),
            quads = report.total_quads,
            "meshed scene"
        );
        Ok(report)
    }
}

fn mesh_volume(
    mesher: &CuboidMesher,
    fluid: &ResolvedFluid<'_>,
    volume: &VolumeConfig,
    faces: &FluidFaces,
) -> MeshBuffers {
    let mut builder = MeshBuilder::with_capacity(faces.count());
    let from = Vec3::from_array(volume.from);
    let to = Vec3::from_array(volume.to);
    let light = volume.light.packed();
    if volume.scaled {
        fluid.mesh_scaled_box(mesher, &mut builder, from, to, faces, light);
    } else {
        fluid.mesh_box(mesher, &mut builder, from, to, faces, light);
    }
    builder.finish()
}
