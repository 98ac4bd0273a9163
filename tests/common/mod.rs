//! GLB assembly for the integration tests.
//!
//! The JSON chunk is built with `serde_json::json!` and the BIN chunk by hand, so every test
//! scene is generated in memory.

#![allow(dead_code)]

use serde_json::{json, Value};

pub enum Colors {
    RgbF32(Vec<[f32; 3]>),
    RgbaF32(Vec<[f32; 4]>),
    RgbU8(Vec<[u8; 3]>),
    RgbaU8(Vec<[u8; 4]>),
}

pub enum Indices {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

pub struct Primitive {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Indices>,
    pub colors: Option<Colors>,
}

impl Primitive {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices: Some(Indices::U32(indices)),
            colors: None,
        }
    }

    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = Some(colors);
        self
    }
}

pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    pub fn named(name: &str, primitives: Vec<Primitive>) -> Self {
        Self { name: Some(name.to_string()), primitives }
    }

    pub fn unnamed(primitives: Vec<Primitive>) -> Self {
        Self { name: None, primitives }
    }
}

const FLOAT: u32 = 5126;
const UNSIGNED_BYTE: u32 = 5121;
const UNSIGNED_SHORT: u32 = 5123;
const UNSIGNED_INT: u32 = 5125;

#[derive(Default)]
struct Builder {
    bin: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl Builder {
    fn push_view(&mut self, bytes: &[u8]) -> usize {
        while self.bin.len() % 4 != 0 {
            self.bin.push(0);
        }
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
        }));
        self.bin.extend_from_slice(bytes);
        self.views.len() - 1
    }

    fn push_accessor(&mut self, bytes: &[u8], component_type: u32, ty: &str, count: usize) -> usize {
        let view = self.push_view(bytes);
        let mut accessor = json!({
            "bufferView": view,
            "componentType": component_type,
            "count": count,
            "type": ty,
        });
        if component_type == UNSIGNED_BYTE {
            accessor["normalized"] = json!(true);
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let bytes: Vec<u8> = positions.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
        let index = self.push_accessor(&bytes, FLOAT, "VEC3", positions.len());
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for p in positions {
            for k in 0..3 {
                min[k] = min[k].min(p[k]);
                max[k] = max[k].max(p[k]);
            }
        }
        if positions.is_empty() {
            min = [0.0; 3];
            max = [0.0; 3];
        }
        self.accessors[index]["min"] = json!(min);
        self.accessors[index]["max"] = json!(max);
        index
    }

    fn push_indices(&mut self, indices: &Indices) -> usize {
        match indices {
            Indices::U16(values) => {
                let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
                self.push_accessor(&bytes, UNSIGNED_SHORT, "SCALAR", values.len())
            }
            Indices::U32(values) => {
                let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
                self.push_accessor(&bytes, UNSIGNED_INT, "SCALAR", values.len())
            }
        }
    }

    fn push_colors(&mut self, colors: &Colors) -> usize {
        match colors {
            Colors::RgbF32(values) => {
                let bytes: Vec<u8> = values.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
                self.push_accessor(&bytes, FLOAT, "VEC3", values.len())
            }
            Colors::RgbaF32(values) => {
                let bytes: Vec<u8> = values.iter().flatten().flat_map(|v| v.to_le_bytes()).collect();
                self.push_accessor(&bytes, FLOAT, "VEC4", values.len())
            }
            Colors::RgbU8(values) => {
                // each element is padded to 4 bytes
                let bytes: Vec<u8> = values.iter().flat_map(|c| [c[0], c[1], c[2], 0]).collect();
                let index = self.push_accessor(&bytes, UNSIGNED_BYTE, "VEC3", values.len());
                let view = self.accessors[index]["bufferView"].as_u64().unwrap() as usize;
                self.views[view]["byteStride"] = json!(4);
                index
            }
            Colors::RgbaU8(values) => {
                let bytes: Vec<u8> = values.iter().flatten().copied().collect();
                self.push_accessor(&bytes, UNSIGNED_BYTE, "VEC4", values.len())
            }
        }
    }
}

/// Builds a GLB holding `meshes`, with every attribute in its own buffer view.
pub fn build_glb(meshes: &[Mesh]) -> Vec<u8> {
    let (root, bin) = build_document(meshes);
    assemble_glb(&serde_json::to_vec(&root).unwrap(), &bin)
}

/// Builds a glTF JSON document whose buffer is embedded as a base64 `data:` URI.
pub fn build_embedded_gltf(meshes: &[Mesh]) -> Vec<u8> {
    use base64::Engine;

    let (mut root, bin) = build_document(meshes);
    if !bin.is_empty() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&bin);
        root["buffers"][0]["uri"] = json!(format!("data:application/octet-stream;base64,{encoded}"));
    }
    serde_json::to_vec(&root).unwrap()
}

fn build_document(meshes: &[Mesh]) -> (Value, Vec<u8>) {
    let mut builder = Builder::default();
    let mut json_meshes = Vec::new();
    for mesh in meshes {
        let mut json_primitives = Vec::new();
        for primitive in &mesh.primitives {
            let mut attributes = serde_json::Map::new();
            attributes.insert("POSITION".to_string(), json!(builder.push_positions(&primitive.positions)));
            if let Some(colors) = &primitive.colors {
                attributes.insert("COLOR_0".to_string(), json!(builder.push_colors(colors)));
            }
            let mut json_primitive = json!({ "attributes": attributes });
            if let Some(indices) = &primitive.indices {
                json_primitive["indices"] = json!(builder.push_indices(indices));
            }
            json_primitives.push(json_primitive);
        }
        let mut json_mesh = json!({ "primitives": json_primitives });
        if let Some(name) = &mesh.name {
            json_mesh["name"] = json!(name);
        }
        json_meshes.push(json_mesh);
    }
    while builder.bin.len() % 4 != 0 {
        builder.bin.push(0);
    }

    let mut root = json!({ "asset": { "version": "2.0" } });
    if !json_meshes.is_empty() {
        root["meshes"] = json!(json_meshes);
    }
    if !builder.bin.is_empty() {
        root["buffers"] = json!([{ "byteLength": builder.bin.len() }]);
        root["bufferViews"] = json!(builder.views);
        root["accessors"] = json!(builder.accessors);
    }

    (root, builder.bin)
}

/// Wraps a JSON chunk and an optional BIN chunk into a GLB container.
pub fn assemble_glb(json_bytes: &[u8], bin: &[u8]) -> Vec<u8> {
    let json_padding = (4 - json_bytes.len() % 4) % 4;
    let json_chunk_length = json_bytes.len() + json_padding;
    let bin_padding = (4 - bin.len() % 4) % 4;
    let bin_chunk_length = bin.len() + bin_padding;

    let mut total_length = 12 + 8 + json_chunk_length;
    if !bin.is_empty() {
        total_length += 8 + bin_chunk_length;
    }

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat(0x20u8).take(json_padding));

    if !bin.is_empty() {
        glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
        glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
        glb.extend_from_slice(bin);
        glb.extend(std::iter::repeat(0u8).take(bin_padding));
    }
    glb
}

pub fn quad() -> Primitive {
    Primitive::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
        vec![0, 1, 2, 0, 2, 3],
    )
}

pub fn triangle(x: f32) -> Primitive {
    Primitive::new(vec![[x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], [x, 1.0, 0.0]], vec![0, 1, 2])
}
