#![warn(missing_docs)]
//! Sprite atlas metadata and fluid registry loading.

mod atlas;
mod fluid;

pub use atlas::{AtlasError, AtlasSprite, SpriteAtlas};
pub use fluid::{
    fluids_from_file, fluids_from_str, parse_color, FluidDefinition, FluidDescriptor,
    FluidRegistry, DEFAULT_FLUID_COLOR,
};

use thiserror::Error;

/// Errors emitted while loading fluid registries.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading registries.
    #[error("failed to read fluid registry: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse fluid registry: {0}")]
    Parse(#[from] serde_json::Error),
    /// Validation errors for individual entries.
    #[error("invalid fluid registry: {0}")]
    Invalid(String),
}
