use crate::core::bit_coder::ByteReader;
use crate::shared::header::{Attr, Header, GZIP_MAGIC, MAGIC};

use super::Err;

pub fn decode_header<R>(reader: &mut R) -> Result<Header, Err>
where
    R: ByteReader,
{
    let magic = reader.read_u16()?;
    if magic == GZIP_MAGIC {
        return Err(Err::Compressed);
    }
    if magic != MAGIC {
        return Err(Err::BadMagic(magic));
    }

    let attr = Attr::from_bits_retain(reader.read_u16()?);
    let num_faces = reader.read_u32()?;
    let num_vertices = reader.read_u32()?;
    let num_skip = reader.read_u32()?;

    Ok(Header { attr, num_faces, num_vertices, num_skip })
}
