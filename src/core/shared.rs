pub trait ConfigType {
    fn default() -> Self;
}

/// Number of components per vertex position.
pub const POSITION_COMPONENTS: usize = 3;

/// Number of indices per triangular face.
pub const FACE_INDICES: usize = 3;

/// Number of channels of an RGBA color.
pub const RGBA_CHANNELS: usize = 4;
