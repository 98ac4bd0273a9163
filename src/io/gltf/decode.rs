use gltf::mesh::util::ReadColors;
use gltf::mesh::Mode;
use gltf::Semantic;

use crate::core::scene::{PrimitiveSource, SceneSource};

#[remain::sorted]
#[derive(Debug, thiserror::Error)]
pub enum Err {
    #[error("Failed to load glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("Attribute {0} yielded {1} values but {2} were expected.")]
    LengthMismatch(&'static str, usize, usize),
    #[error("Attribute {0} cannot be read (no buffer view or compressed data).")]
    Unreadable(&'static str),
}

/// A glTF document together with its binary buffers.
///
/// Only self-contained inputs are supported: a GLB with its BIN chunk, or a glTF JSON whose
/// buffers are embedded as `data:` URIs.
pub struct GltfScene {
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
}

impl GltfScene {
    pub fn from_slice(data: &[u8]) -> Result<Self, Err> {
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(data)?;
        let buffers = gltf::import_buffers(&document, None, blob)?;
        tracing::debug!(
            "Loaded glTF with {} meshes and {} buffers",
            document.meshes().count(),
            buffers.len()
        );
        Ok(Self { document, buffers })
    }
}

impl SceneSource for GltfScene {
    type Primitive<'a> = GltfPrimitive<'a>;

    fn num_meshes(&self) -> usize {
        self.document.meshes().count()
    }

    fn primitives(&self) -> Vec<GltfPrimitive<'_>> {
        let buffers = self.buffers.as_slice();
        self.document
            .meshes()
            .flat_map(|mesh| {
                let name = mesh.name().unwrap_or("");
                mesh.primitives().map(move |primitive| GltfPrimitive { name, primitive, buffers })
            })
            .collect()
    }
}

/// Builds a `gltf::mesh::Reader` over the buffers of the document.
macro_rules! reader {
    ($prim:expr) => {{
        let buffers = $prim.buffers;
        $prim
            .primitive
            .reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()))
    }};
}

/// A glTF primitive with access to the buffers of its document.
pub struct GltfPrimitive<'a> {
    name: &'a str,
    primitive: gltf::Primitive<'a>,
    buffers: &'a [gltf::buffer::Data],
}

/// Copies `N`-component items into `out`, failing when the counts disagree.
fn fill_from<T: Copy, const N: usize>(
    attribute: &'static str,
    out: &mut [T],
    items: impl Iterator<Item = [T; N]>,
) -> Result<(), Err> {
    let expected = out.len();
    let mut chunks = out.chunks_exact_mut(N);
    let mut read = 0;
    for item in items {
        if let Some(dst) = chunks.next() {
            dst.copy_from_slice(&item);
        }
        read += N;
    }
    if read != expected {
        return Err(Err::LengthMismatch(attribute, read, expected));
    }
    Ok(())
}

fn unorm16(value: u16) -> f32 {
    value as f32 / u16::MAX as f32
}

impl PrimitiveSource for GltfPrimitive<'_> {
    type Error = Err;

    fn name(&self) -> &str {
        self.name
    }

    fn vertex_count(&self) -> Option<usize> {
        self.primitive.get(&Semantic::Positions).map(|a| a.count())
    }

    fn index_count(&self) -> Option<usize> {
        if self.primitive.mode() != Mode::Triangles {
            tracing::warn!(
                "Primitive of mesh {:?} uses {:?}; its indices are read as a triangle list.",
                self.name,
                self.primitive.mode()
            );
        }
        self.primitive.indices().map(|a| a.count())
    }

    fn color_value_count(&self) -> Option<usize> {
        self.primitive
            .get(&Semantic::Colors(0))
            .map(|a| a.count() * a.dimensions().multiplicity())
    }

    fn read_positions(&self, out: &mut [f32]) -> Result<(), Err> {
        let reader = reader!(self);
        let positions = reader.read_positions().ok_or(Err::Unreadable("POSITION"))?;
        fill_from("POSITION", out, positions)
    }

    fn read_indices(&self, out: &mut [u32]) -> Result<(), Err> {
        let reader = reader!(self);
        let indices = reader.read_indices().ok_or(Err::Unreadable("indices"))?;
        fill_from("indices", out, indices.into_u32().map(|i| [i]))
    }

    /// 8-bit and float colors are passed on as stored; 16-bit colors are normalized to [0,1].
    fn read_colors(&self, out: &mut [f32]) -> Result<(), Err> {
        let reader = reader!(self);
        let colors = reader.read_colors(0).ok_or(Err::Unreadable("COLOR_0"))?;
        match colors {
            ReadColors::RgbU8(iter) => fill_from("COLOR_0", out, iter.map(|c| c.map(f32::from))),
            ReadColors::RgbU16(iter) => fill_from("COLOR_0", out, iter.map(|c| c.map(unorm16))),
            ReadColors::RgbF32(iter) => fill_from("COLOR_0", out, iter),
            ReadColors::RgbaU8(iter) => fill_from("COLOR_0", out, iter.map(|c| c.map(f32::from))),
            ReadColors::RgbaU16(iter) => fill_from("COLOR_0", out, iter.map(|c| c.map(unorm16))),
            ReadColors::RgbaF32(iter) => fill_from("COLOR_0", out, iter),
        }
    }
}
