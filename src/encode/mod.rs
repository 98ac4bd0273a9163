pub(crate) mod header;

use thiserror::Error;

use crate::core::bit_coder::ByteWriter;
use crate::core::mesh::{Annotation, MergedMesh};
use crate::core::shared::{FACE_INDICES, POSITION_COMPONENTS, RGBA_CHANNELS};
use crate::shared::header::{Attr, Header, HEADER_SIZE};

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("Color buffer has {len} bytes; {num_vertices} vertices need exactly 4 bytes each.")]
    InvalidColorShape { len: usize, num_vertices: usize },
    #[error("Index buffer length {0} is not a multiple of 3.")]
    InvalidIndexShape(usize),
    #[error("Scalar buffer has {len} values, which is not a positive multiple of {num_vertices} vertices.")]
    InvalidScalarShape { len: usize, num_vertices: usize },
    #[error("Vertex buffer length {0} is not a multiple of 3.")]
    InvalidVertexShape(usize),
    #[error("Failed to serialize the lookup table: {0}")]
    Lookup(#[from] serde_json::Error),
    #[error("The {0} section has {1} entries, which does not fit in the header.")]
    SectionTooLarge(&'static str, usize),
    #[error("Internal error: wrote {written} bytes but expected {expected}.")]
    SizeMismatch { expected: usize, written: usize },
}

/// The lookup section stored between the header and the indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Already formatted text, written as is.
    Text(String),
    /// A value written as compact JSON.
    Json(serde_json::Value),
    /// A region table written as compact JSON, regions in label order.
    Annotation(Annotation),
}

impl Lookup {
    fn into_bytes(self) -> Result<Vec<u8>, Err> {
        match self {
            Lookup::Text(text) => Ok(text.into_bytes()),
            Lookup::Json(value) => Ok(serde_json::to_vec(&value)?),
            Lookup::Annotation(annotation) => Ok(serde_json::to_vec(&annotation)?),
        }
    }
}

impl From<&Annotation> for Lookup {
    fn from(annotation: &Annotation) -> Self {
        Lookup::Annotation(annotation.clone())
    }
}

/// The sections to be written into an MZ3 buffer. Optional sections are left as `None`.
#[derive(Debug, Clone, Default)]
pub struct Mz3<'a> {
    pub indices: &'a [u32],
    pub positions: &'a [f32],
    pub colors: Option<&'a [u8]>,
    pub scalars: Option<&'a [f32]>,
    pub lookup: Option<Lookup>,
}

impl<'a> Mz3<'a> {
    pub fn new(indices: &'a [u32], positions: &'a [f32]) -> Self {
        Self {
            indices,
            positions,
            ..Self::default()
        }
    }

    pub fn with_colors(mut self, colors: &'a [u8]) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_scalars(mut self, scalars: &'a [f32]) -> Self {
        self.scalars = Some(scalars);
        self
    }

    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len() / POSITION_COMPONENTS
    }

    /// Number of scalar values stored per vertex, 0 when there are no scalars.
    pub fn num_scalar_layers(&self) -> Result<usize, Err> {
        let Some(scalars) = self.scalars else {
            return Ok(0);
        };
        let num_vertices = self.num_vertices();
        if num_vertices == 0 || scalars.is_empty() || scalars.len() % num_vertices != 0 {
            return Err(Err::InvalidScalarShape { len: scalars.len(), num_vertices });
        }
        Ok(scalars.len() / num_vertices)
    }
}

impl<'a> From<&'a MergedMesh> for Mz3<'a> {
    fn from(mesh: &'a MergedMesh) -> Self {
        Mz3 {
            indices: mesh.indices(),
            positions: mesh.positions(),
            colors: mesh.colors(),
            scalars: mesh.scalars(),
            lookup: mesh.annotation().map(Lookup::from),
        }
    }
}

fn header_count(section: &'static str, n: usize) -> Result<u32, Err> {
    u32::try_from(n).map_err(|_| Err::SectionTooLarge(section, n))
}

/// Serializes the sections into an MZ3 byte buffer.
///
/// The buffer is allocated once with its exact final size; the sections are written in the
/// order lookup, indices, vertices, colors, scalars.
pub fn encode(mz3: Mz3<'_>) -> Result<Vec<u8>, Err> {
    if mz3.indices.len() % FACE_INDICES != 0 {
        return Err(Err::InvalidIndexShape(mz3.indices.len()));
    }
    if mz3.positions.len() % POSITION_COMPONENTS != 0 {
        return Err(Err::InvalidVertexShape(mz3.positions.len()));
    }
    let num_faces = mz3.indices.len() / FACE_INDICES;
    let num_vertices = mz3.num_vertices();
    let num_layers = mz3.num_scalar_layers()?;

    let colors = match mz3.colors {
        Some(colors) if colors.len() != num_vertices * RGBA_CHANNELS => {
            return Err(Err::InvalidColorShape { len: colors.len(), num_vertices });
        }
        Some(colors) if !colors.is_empty() => Some(colors),
        _ => None,
    };
    let scalars = mz3.scalars.filter(|_| num_layers > 0);
    let lookup = match mz3.lookup {
        Some(lookup) => lookup.into_bytes()?,
        None => Vec::new(),
    };

    let mut attr = Attr::empty();
    attr.set(Attr::FACES, num_faces > 0);
    attr.set(Attr::VERTICES, num_vertices > 0);
    attr.set(Attr::RGBA, colors.is_some());
    attr.set(Attr::SCALARS, scalars.is_some());
    attr.set(Attr::LOOKUP, !lookup.is_empty());

    let header = Header {
        attr,
        num_faces: header_count("index", num_faces)?,
        num_vertices: header_count("vertex", num_vertices)?,
        num_skip: header_count("lookup", lookup.len())?,
    };

    let index_size = num_faces * FACE_INDICES * 4;
    let vertex_size = num_vertices * POSITION_COMPONENTS * 4;
    let color_size = colors.map_or(0, |c| c.len());
    let scalar_size = num_layers * num_vertices * 4;
    let total_size = HEADER_SIZE + lookup.len() + index_size + vertex_size + color_size + scalar_size;

    let mut buffer = Vec::with_capacity(total_size);
    header::encode_header(&mut buffer, &header);
    buffer.write_bytes(&lookup);
    for &i in mz3.indices {
        buffer.write_u32(i);
    }
    for &v in mz3.positions {
        buffer.write_f32(v);
    }
    if let Some(colors) = colors {
        buffer.write_bytes(colors);
    }
    if let Some(scalars) = scalars {
        for &s in scalars {
            buffer.write_f32(s);
        }
    }

    if buffer.len() != total_size {
        return Err(Err::SizeMismatch { expected: total_size, written: buffer.len() });
    }

    tracing::debug!(
        "Encoded MZ3: {:?}, {} faces, {} vertices, {} lookup bytes, {} scalar layers, {} bytes",
        attr,
        num_faces,
        num_vertices,
        lookup.len(),
        num_layers,
        total_size
    );
    Ok(buffer)
}

/// Encodes a merged mesh with all of its sections.
pub fn encode_mesh(mesh: &MergedMesh) -> Result<Vec<u8>, Err> {
    encode(Mz3::from(mesh))
}
