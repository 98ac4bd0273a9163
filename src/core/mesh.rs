use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::shared::{FACE_INDICES, POSITION_COMPONENTS, RGBA_CHANNELS};

/// A named region of the merged mesh together with its representative color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
}

/// Lookup table from a per-vertex label to the region it belongs to.
/// Serializes as a JSON object keyed by the label, e.g. `{"0":{"name":"skull","R":255,"G":0,"B":0}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Annotation {
    regions: BTreeMap<u32, Region>,
}

impl Annotation {
    pub fn new() -> Self {
        Self { regions: BTreeMap::new() }
    }

    pub fn insert(&mut self, label: u32, region: Region) {
        self.regions.insert(label, region);
    }

    pub fn get(&self, label: u32) -> Option<&Region> {
        self.regions.get(&label)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Region)> {
        self.regions.iter().map(|(&label, region)| (label, region))
    }
}

#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Color buffer has {0} bytes but {1} vertices need {2}.")]
    ColorLength(usize, usize, usize),
    #[error("Index {0} is out of range for {1} vertices.")]
    IndexOutOfRange(u32, usize),
    #[error("Index buffer length {0} is not a multiple of 3.")]
    IndexShape(usize),
    #[error("Position buffer length {0} is not a multiple of 3.")]
    PositionShape(usize),
    #[error("Scalar buffer has {0} values but there are {1} vertices.")]
    ScalarLength(usize, usize),
    #[error("Scalars are present without colors.")]
    ScalarsWithoutColors,
}

/// The single mesh obtained by flattening every primitive of a scene.
/// It is immutable once built; the fields are only reachable through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedMesh {
    positions: Vec<f32>,
    indices: Vec<u32>,
    colors: Option<Vec<u8>>,
    scalars: Option<Vec<f32>>,
    annotation: Option<Annotation>,
}

impl MergedMesh {
    /// Builds a mesh from raw buffers, checking every invariant of the merged layout.
    pub fn from_parts(
        positions: Vec<f32>,
        indices: Vec<u32>,
        colors: Option<Vec<u8>>,
        scalars: Option<Vec<f32>>,
        annotation: Option<Annotation>,
    ) -> Result<Self, Err> {
        if positions.len() % POSITION_COMPONENTS != 0 {
            return Err(Err::PositionShape(positions.len()));
        }
        if indices.len() % FACE_INDICES != 0 {
            return Err(Err::IndexShape(indices.len()));
        }
        let num_vertices = positions.len() / POSITION_COMPONENTS;
        if let Some(&idx) = indices.iter().find(|&&idx| idx as usize >= num_vertices) {
            return Err(Err::IndexOutOfRange(idx, num_vertices));
        }
        if let Some(colors) = &colors {
            if colors.len() != num_vertices * RGBA_CHANNELS {
                return Err(Err::ColorLength(colors.len(), num_vertices, num_vertices * RGBA_CHANNELS));
            }
        }
        if let Some(scalars) = &scalars {
            if colors.is_none() {
                return Err(Err::ScalarsWithoutColors);
            }
            if scalars.len() != num_vertices {
                return Err(Err::ScalarLength(scalars.len(), num_vertices));
            }
        }
        Ok(Self { positions, indices, colors, scalars, annotation })
    }

    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn colors(&self) -> Option<&[u8]> {
        self.colors.as_deref()
    }

    pub fn scalars(&self) -> Option<&[f32]> {
        self.scalars.as_deref()
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    pub fn num_faces(&self) -> usize {
        self.indices.len() / FACE_INDICES
    }

    /// Returns the position of the `i`-th vertex.
    pub fn vertex(&self, i: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(i * POSITION_COMPONENTS..(i + 1) * POSITION_COMPONENTS)?;
        Some([p[0], p[1], p[2]])
    }

    /// Returns the RGBA color of the `i`-th vertex.
    pub fn color(&self, i: usize) -> Option<[u8; 4]> {
        let c = self.colors.as_ref()?.get(i * RGBA_CHANNELS..(i + 1) * RGBA_CHANNELS)?;
        Some([c[0], c[1], c[2], c[3]])
    }
}
