use crate::core::bit_coder::ByteWriter;
use crate::shared::header::{Header, MAGIC};

pub fn encode_header<W>(writer: &mut W, header: &Header)
where
    W: ByteWriter,
{
    // Write the magic "MZ"
    writer.write_u16(MAGIC);

    // Write which sections follow
    writer.write_u16(header.attr.bits());

    writer.write_u32(header.num_faces);
    writer.write_u32(header.num_vertices);

    // Length of the lookup section
    writer.write_u32(header.num_skip);
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::header::{Attr, HEADER_SIZE};

    #[test]
    fn header_layout() {
        let header = Header {
            attr: Attr::FACES | Attr::VERTICES | Attr::LOOKUP,
            num_faces: 2,
            num_vertices: 4,
            num_skip: 10,
        };
        let mut buffer = Vec::new();
        encode_header(&mut buffer, &header);
        assert_eq!(buffer.len(), HEADER_SIZE);
        assert_eq!(
            buffer,
            vec![0x4D, 0x5A, 67, 0, 2, 0, 0, 0, 4, 0, 0, 0, 10, 0, 0, 0]
        );
    }
}
