/// The first two bytes of every uncompressed MZ3 file, "MZ" read as a little-endian u16.
pub const MAGIC: u16 = 23117;

/// The first two bytes of a gzip stream read as a little-endian u16.
pub const GZIP_MAGIC: u16 = 0x8B1F;

/// Size of the fixed header in bytes.
pub const HEADER_SIZE: usize = 16;

bitflags::bitflags! {
    /// Which sections follow the header.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Attr: u16 {
        const FACES = 1;
        const VERTICES = 1 << 1;
        const RGBA = 1 << 2;
        const SCALARS = 1 << 3;
        const LOOKUP = 1 << 6;
    }
}

/// The fixed 16-byte MZ3 header, without the magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub attr: Attr,
    pub num_faces: u32,
    pub num_vertices: u32,
    /// Length of the lookup section immediately following the header.
    pub num_skip: u32,
}
