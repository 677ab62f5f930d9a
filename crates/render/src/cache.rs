use std::collections::HashMap;

use tracing::debug;

use crate::MeshBuffers;

/// Draw pass a mesh belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderLayer {
    /// Opaque geometry.
    Solid,
    /// Alpha-tested geometry.
    Cutout,
    /// Blended geometry.
    Translucent,
}

impl RenderLayer {
    /// Layer fluids are drawn in.
    pub fn for_fluid() -> Self {
        RenderLayer::Translucent
    }
}

/// Cache key: caller-chosen model identity plus the layer it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelKey {
    /// Model identity.
    pub model: u64,
    /// Render layer.
    pub layer: RenderLayer,
}

impl ModelKey {
    /// Construct a key.
    pub fn new(model: u64, layer: RenderLayer) -> Self {
        Self { model, layer }
    }
}

/// Mesh cache keyed by model and layer. Entries live until explicitly invalidated.
#[derive(Debug, Default)]
pub struct FluidMeshCache {
    entries: HashMap<ModelKey, MeshBuffers>,
}

impl FluidMeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Retrieve the mesh if it's cached.
    pub fn get(&self, key: ModelKey) -> Option<&MeshBuffers> {
        self.entries.get(&key)
    }

    /// Store `mesh` under `key`, returning the mesh it replaced.
    pub fn insert(&mut self, key: ModelKey, mesh: MeshBuffers) -> Option<MeshBuffers> {
        debug!(
            model = key.model,
            layer = ?key.layer,
            vertices = mesh.vertices.len(),
            "cached fluid mesh"
        );
        self.entries.insert(key, mesh)
    }

    /// Return the cached mesh for `key`, building it with `build` on a miss.
    pub fn get_or_build<F>(&mut self, key: ModelKey, build: F) -> &MeshBuffers
    where
        F: FnOnce() -> MeshBuffers,
    {
        self.entries.entry(key).or_insert_with(|| {
            debug!(model = key.model, layer = ?key.layer, "fluid mesh cache miss");
            build()
        })
    }

    /// Drop the mesh for `key`.
    pub fn invalidate(&mut self, key: ModelKey) -> Option<MeshBuffers> {
        self.entries.remove(&key)
    }

    /// Drop every layer of `model`. Returns how many entries were removed.
    pub fn invalidate_model(&mut self, model: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.model != model);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(model, removed, "invalidated fluid model");
        }
        removed
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
