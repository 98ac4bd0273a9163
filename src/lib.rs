// lib.rs

/// Contains the interface between the scene sources and 3D geometry files
/// such as glb and gltf.
pub mod io;

/// Flattens every primitive of a scene into one `MergedMesh`.
pub mod merge;

/// Defines the MZ3 encoder.
pub mod encode;

/// Defines the MZ3 decoder.
pub mod decode;

/// Contains the native objects, the scene abstraction, and the byte coders.
pub mod core;

/// Contains the definitions shared by the encoder and the decoder.
pub mod shared;

/// End-to-end conversion from glTF bytes to a merged mesh or an MZ3 buffer.
pub mod convert;


/// Contains the most commonly used traits, types, and objects.
pub mod prelude {
    pub use crate::core::mesh::{Annotation, MergedMesh, Region};
    pub use crate::core::scene::{PrimitiveSource, Scene, SceneSource};
    pub use crate::core::shared::ConfigType;
    pub use crate::core::bit_coder::{ByteReader, ByteWriter};
    pub use crate::shared::header::{Attr, Header};
    pub use crate::merge::{self, merge, AnnotationMode};
    pub use crate::encode::{self, encode, Lookup, Mz3};
    pub use crate::decode::{self, decode};
    pub use crate::convert::{glb_to_merged, glb_to_mz3};
}
