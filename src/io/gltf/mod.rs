pub mod decode;

pub use decode::{GltfPrimitive, GltfScene};
