use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::AssetError;

/// Opaque white, used when a fluid definition carries no tint.
pub const DEFAULT_FLUID_COLOR: u32 = 0xFFFF_FFFF;

/// Fluid entry as authored in a registry JSON file.
#[derive(Debug, Clone, Deserialize)]
pub struct FluidDefinition {
    /// Human-readable identifier (e.g., "water").
    pub name: String,
    /// Atlas sprite for the still texture (defaults to `<name>_still`).
    #[serde(default)]
    pub still: Option<String>,
    /// Atlas sprite for the flowing texture (defaults to `<name>_flow`).
    #[serde(default)]
    pub flowing: Option<String>,
    /// Tint as `#AARRGGBB` or `#RRGGBB` (defaults to opaque white).
    #[serde(default)]
    pub color: Option<String>,
    /// Gases render their flow texture rotated by 180 degrees.
    #[serde(default)]
    pub gaseous: bool,
}

/// Resolved fluid metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluidDescriptor {
    /// Fluid identifier.
    pub name: String,
    /// Atlas sprite name for still faces.
    pub still: String,
    /// Atlas sprite name for flowing faces.
    pub flowing: String,
    /// Packed ARGB tint.
    pub color: u32,
    /// Whether the fluid is a gas.
    pub gaseous: bool,
}

impl FluidDescriptor {
    /// Construct a descriptor from the JSON definition.
    pub fn from_definition(def: FluidDefinition) -> Result<Self, AssetError> {
        let color = match def.color.as_deref() {
            Some(raw) => parse_color(raw).ok_or_else(|| {
                AssetError::Invalid(format!("fluid {} has malformed color '{raw}'", def.name))
            })?,
            None => DEFAULT_FLUID_COLOR,
        };
        let still = def.still.unwrap_or_else(|| format!("{}_still", def.name));
        let flowing = def.flowing.unwrap_or_else(|| format!("{}_flow", def.name));
        Ok(Self {
            name: def.name,
            still,
            flowing,
            color,
            gaseous: def.gaseous,
        })
    }
}

/// Registry storing fluid descriptors keyed by id.
#[derive(Debug, Default)]
pub struct FluidRegistry {
    descriptors: Vec<FluidDescriptor>,
    name_to_id: HashMap<String, u16>,
}

impl FluidRegistry {
    /// Construct a registry from the supplied descriptors.
    pub fn new(descriptors: Vec<FluidDescriptor>) -> Self {
        let mut name_to_id = HashMap::new();
        for (id, desc) in descriptors.iter().enumerate() {
            name_to_id.insert(desc.name.clone(), id as u16);
        }
        Self {
            descriptors,
            name_to_id,
        }
    }

    /// Look up a descriptor by numeric id.
    pub fn descriptor(&self, id: u16) -> Option<&FluidDescriptor> {
        self.descriptors.get(id as usize)
    }

    /// Resolve a fluid id by its name.
    pub fn id_by_name(&self, name: &str) -> Option<u16> {
        self.name_to_id.get(name).copied()
    }

    /// Look up a descriptor by name.
    pub fn by_name(&self, name: &str) -> Option<&FluidDescriptor> {
        self.id_by_name(name).and_then(|id| self.descriptor(id))
    }

    /// Number of registered fluids.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True when no fluids are registered.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Load a fluid registry from the provided JSON file path.
pub fn fluids_from_file(path: &Path) -> Result<FluidRegistry, AssetError> {
    let data = fs::read_to_string(path)?;
    fluids_from_str(&data)
}

/// Load a fluid registry from an in-memory JSON string.
pub fn fluids_from_str(input: &str) -> Result<FluidRegistry, AssetError> {
    let defs: Vec<FluidDefinition> = serde_json::from_str(input)?;
    let mut descriptors = Vec::with_capacity(defs.len());
    for def in defs {
        if descriptors
            .iter()
            .any(|d: &FluidDescriptor| d.name == def.name)
        {
            return Err(AssetError::Invalid(format!(
                "duplicate fluid '{}'",
                def.name
            )));
        }
        descriptors.push(FluidDescriptor::from_definition(def)?);
    }
    debug!(count = descriptors.len(), "loaded fluid registry");
    Ok(FluidRegistry::new(descriptors))
}

/// Parse `#AARRGGBB` / `#RRGGBB` (leading `#` optional); six digits imply full alpha.
pub fn parse_color(raw: &str) -> Option<u32> {
    let hex = raw.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        8 => u32::from_str_radix(hex, 16).ok(),
        6 => u32::from_str_radix(hex, 16).ok().map(|rgb| 0xFF00_0000 | rgb),
        _ => None,
    }
}
