/// Reads glTF and GLB containers through the `gltf` crate.
pub mod gltf;
