pub(crate) mod header;

use thiserror::Error;

use crate::core::bit_coder::{ByteReader, ReaderErr};
use crate::core::mesh::Annotation;
use crate::shared::header::{Attr, Header};

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("The lookup section is not a region table: {0}")]
    AnnotationJson(#[from] serde_json::Error),
    #[error("Not an MZ3 file (magic {0:#06x}).")]
    BadMagic(u16),
    #[error("Gzip-compressed MZ3 files are not supported; decompress first.")]
    Compressed,
    #[error("The lookup section is not UTF-8: {0}")]
    InvalidLookup(#[from] std::string::FromUtf8Error),
    #[error("Truncated MZ3 data: {0}")]
    NotEnoughData(#[from] ReaderErr),
    #[error("{remaining} bytes of scalars do not divide into layers of {num_vertices} vertices.")]
    ScalarShape { remaining: usize, num_vertices: usize },
    #[error("{0} unexpected bytes after the last section.")]
    TrailingBytes(usize),
}

/// The content of an MZ3 buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Mz3Data {
    pub header: Header,
    pub lookup: Option<String>,
    pub indices: Vec<u32>,
    pub positions: Vec<f32>,
    pub colors: Option<Vec<u8>>,
    /// Scalar layers one after another, each holding one value per vertex.
    pub scalars: Option<Vec<f32>>,
}

impl Mz3Data {
    pub fn num_scalar_layers(&self) -> usize {
        match (&self.scalars, self.header.num_vertices) {
            (Some(scalars), n) if n > 0 => scalars.len() / n as usize,
            _ => 0,
        }
    }

    /// Returns the `layer`-th scalar layer.
    pub fn scalar_layer(&self, layer: usize) -> Option<&[f32]> {
        let n = self.header.num_vertices as usize;
        self.scalars.as_ref()?.get(layer * n..(layer + 1) * n)
    }

    /// Parses the lookup section as the region table written for annotated meshes.
    pub fn annotation(&self) -> Result<Option<Annotation>, Err> {
        match &self.lookup {
            Some(lookup) => Ok(Some(serde_json::from_str(lookup)?)),
            None => Ok(None),
        }
    }
}

fn read_u32s<R: ByteReader>(reader: &mut R, n: usize) -> Result<Vec<u32>, Err> {
    (0..n).map(|_| reader.read_u32().map_err(Err::from)).collect()
}

fn read_f32s<R: ByteReader>(reader: &mut R, n: usize) -> Result<Vec<f32>, Err> {
    (0..n).map(|_| reader.read_f32().map_err(Err::from)).collect()
}

/// Reads only the fixed header of an MZ3 buffer.
pub fn decode_header(data: &[u8]) -> Result<Header, Err> {
    header::decode_header(&mut data.iter())
}

/// Parses an uncompressed MZ3 buffer.
pub fn decode(data: &[u8]) -> Result<Mz3Data, Err> {
    let mut reader = data.iter();
    let header = header::decode_header(&mut reader)?;
    let num_faces = header.num_faces as usize;
    let num_vertices = header.num_vertices as usize;

    let lookup = match header.num_skip as usize {
        0 => None,
        n => Some(String::from_utf8(reader.read_bytes(n)?)?),
    };
    let indices = if header.attr.contains(Attr::FACES) {
        read_u32s(&mut reader, num_faces * 3)?
    } else {
        Vec::new()
    };
    let positions = if header.attr.contains(Attr::VERTICES) {
        read_f32s(&mut reader, num_vertices * 3)?
    } else {
        Vec::new()
    };
    let colors = if header.attr.contains(Attr::RGBA) {
        Some(reader.read_bytes(num_vertices * 4)?)
    } else {
        None
    };

    let remaining = reader.as_slice().len();
    let scalars = if header.attr.contains(Attr::SCALARS) {
        let layer_size = num_vertices * 4;
        if layer_size == 0 || remaining == 0 || remaining % layer_size != 0 {
            return Err(Err::ScalarShape { remaining, num_vertices });
        }
        Some(read_f32s(&mut reader, remaining / 4)?)
    } else if remaining > 0 {
        return Err(Err::TrailingBytes(remaining));
    } else {
        None
    };

    Ok(Mz3Data { header, lookup, indices, positions, colors, scalars })
}
