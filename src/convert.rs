use thiserror::Error;

use crate::core::mesh::MergedMesh;
use crate::encode;
use crate::io::gltf::{decode as gltf_decode, GltfScene};
use crate::merge;

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error(transparent)]
    Encode(#[from] encode::Err),
    #[error(transparent)]
    Gltf(#[from] gltf_decode::Err),
    #[error(transparent)]
    Merge(#[from] merge::Err),
}

/// Parses a GLB (or self-contained glTF) buffer and merges all of its primitives.
pub fn glb_to_merged(data: &[u8], cfg: &merge::Config) -> Result<MergedMesh, Err> {
    let scene = GltfScene::from_slice(data)?;
    Ok(merge::merge(&scene, cfg)?)
}

/// Parses a GLB (or self-contained glTF) buffer and returns the MZ3 encoding of its merged mesh.
pub fn glb_to_mz3(data: &[u8], cfg: &merge::Config) -> Result<Vec<u8>, Err> {
    let mesh = glb_to_merged(data, cfg)?;
    Ok(encode::encode_mesh(&mesh)?)
}
