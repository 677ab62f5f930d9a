use anyhow::{bail, Context, Result};
use fluidmesh_render::{Face, FaceStyle, FluidFaces, PackedLight, Rotation};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

const DEFAULT_ATLAS_PATH: &str = "config/atlas.json";
const DEFAULT_FLUIDS_PATH: &str = "config/fluids.json";

/// Scene file: where to find the atlas and registry, and which volumes to mesh.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Atlas metadata JSON, relative to the scene file.
    pub atlas: PathBuf,
    /// Fluid registry JSON, relative to the scene file.
    pub fluids: PathBuf,
    /// Report destination; stdout when unset.
    pub output: Option<PathBuf>,
    #[serde(rename = "volume")]
    pub volumes: Vec<VolumeConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            atlas: PathBuf::from(DEFAULT_ATLAS_PATH),
            fluids: PathBuf::from(DEFAULT_FLUIDS_PATH),
            output: None,
            volumes: Vec::new(),
        }
    }
}

impl SceneConfig {
    /// Parse a scene from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let scene: SceneConfig = toml::from_str(contents)?;
        for (idx, volume) in scene.volumes.iter().enumerate() {
            volume
                .faces
                .to_fluid_faces()
                .with_context(|| format!("volume {idx} ({})", volume.fluid))?;
        }
        Ok(scene)
    }

    /// Load a scene file and resolve its data paths against the file's directory.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        let mut scene = Self::parse(&contents)
            .with_context(|| format!("Failed to parse scene {}", path.display()))?;
        if let Some(base) = path.parent() {
            scene.atlas = base.join(&scene.atlas);
            scene.fluids = base.join(&scene.fluids);
            scene.output = scene.output.map(|out| base.join(out));
        }
        Ok(scene)
    }
}

/// One fluid box in the scene.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Registry name of the fluid.
    pub fluid: String,
    /// Cache identity; volumes sharing a model reuse one mesh. Defaults to the volume index.
    pub model: Option<u64>,
    /// Minimum corner.
    pub from: [f32; 3],
    /// Maximum corner.
    pub to: [f32; 3],
    /// Corners are in 0..16 block-model units rather than cells.
    pub scaled: bool,
    pub light: LightConfig,
    pub faces: FacesConfig,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            fluid: String::new(),
            model: None,
            from: [0.0; 3],
            to: [1.0; 3],
            scaled: false,
            light: LightConfig::default(),
            faces: FacesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct LightConfig {
    pub block: u16,
    pub sky: u16,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            block: PackedLight::FULL_BRIGHT.block(),
            sky: PackedLight::FULL_BRIGHT.sky(),
        }
    }
}

impl LightConfig {
    pub fn packed(&self) -> PackedLight {
        PackedLight::new(self.block, self.sky)
    }
}

/// Which faces to draw and how their textures are oriented.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FacesConfig {
    /// Faces hidden by neighbours (`down`, `up`, `north`, `south`, `east`, `west`).
    pub cull: Vec<String>,
    /// Texture rotation in degrees, applied to every face.
    pub rotation: i32,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

impl FacesConfig {
    /// Still caps and flowing sides with the configured orientation and culling.
    pub fn to_fluid_faces(&self) -> Result<FluidFaces> {
        if self.rotation % 90 != 0 {
            bail!("rotation {} is not a multiple of 90", self.rotation);
        }
        let rotation = Rotation::from_degrees(self.rotation);
        let mut faces = FluidFaces::none();
        for face in Face::ALL {
            let base = match face {
                Face::Down | Face::Up => FaceStyle::STILL,
                _ => FaceStyle::FLOWING,
            };
            let style = base
                .with_rotation(rotation)
                .with_flips(self.flip_horizontal, self.flip_vertical);
            faces.set(face, Some(style));
        }
        for name in &self.cull {
            let face = parse_face(name).with_context(|| format!("unknown face '{name}'"))?;
            faces.set(face, None);
        }
        Ok(faces)
    }
}

fn parse_face(name: &str) -> Option<Face> {
    match name.trim().to_ascii_lowercase().as_str() {
        "down" => Some(Face::Down),
        "up" => Some(Face::Up),
        "north" => Some(Face::North),
        "south" => Some(Face::South),
        "east" => Some(Face::East),
        "west" => Some(Face::West),
        _ => None,
    }
}
