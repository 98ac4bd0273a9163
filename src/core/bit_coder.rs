//! Little-endian byte coders used by the MZ3 encoder and decoder.

use std::slice;

pub trait ByteWriter: Sized {
    fn write_u8(&mut self, value: u8);
    fn write_u16(&mut self, value: u16) {
        self.write_u8(value as u8);
        self.write_u8((value >> 8) as u8);
    }
    fn write_u32(&mut self, value: u32) {
        self.write_u16(value as u16);
        self.write_u16((value >> 16) as u16);
    }
    fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }
    fn write_bytes(&mut self, data: &[u8]) {
        for &b in data {
            self.write_u8(b);
        }
    }
}

impl ByteWriter for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_u16(&mut self, value: u16) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_f32(&mut self, value: f32) {
        self.extend_from_slice(&value.to_le_bytes());
    }

    fn write_bytes(&mut self, data: &[u8]) {
        self.extend_from_slice(data);
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReaderErr {
    #[error("Not enough data to read")]
    NotEnoughData,
}

pub trait ByteReader {
    fn read_u8(&mut self) -> Result<u8, ReaderErr>;
    fn read_u16(&mut self) -> Result<u16, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u16::from_le_bytes(out))
    }
    fn read_u32(&mut self) -> Result<u32, ReaderErr> {
        let out = [
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?,
            self.read_u8()?
        ];
        Ok(u32::from_le_bytes(out))
    }
    fn read_f32(&mut self) -> Result<f32, ReaderErr> {
        Ok(f32::from_bits(self.read_u32()?))
    }
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        (0..len).map(|_| self.read_u8()).collect()
    }
}

impl ByteReader for slice::Iter<'_, u8> {
    fn read_u8(&mut self) -> Result<u8, ReaderErr> {
        self.next().copied().ok_or(ReaderErr::NotEnoughData)
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>, ReaderErr> {
        let rest = self.as_slice();
        if rest.len() < len {
            return Err(ReaderErr::NotEnoughData);
        }
        let (head, tail) = rest.split_at(len);
        *self = tail.iter();
        Ok(head.to_vec())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_writer_is_little_endian() {
        let mut buffer = Vec::new();
        buffer.write_u16(23117);
        buffer.write_u32(0x0403_0201);
        buffer.write_f32(1.0);
        assert_eq!(buffer, vec![0x4D, 0x5A, 1, 2, 3, 4, 0, 0, 0x80, 0x3F]);
    }

    #[test]
    fn slice_reader() {
        let data = [0x4D, 0x5A, 9, 0, 0, 0, 0xAA, 0xBB, 0xCC];
        let mut reader = data.iter();
        assert_eq!(reader.read_u16().unwrap(), 23117);
        assert_eq!(reader.read_u32().unwrap(), 9);
        assert_eq!(reader.read_bytes(2).unwrap(), vec![0xAA, 0xBB]);
        assert_eq!(reader.read_bytes(2), Err(ReaderErr::NotEnoughData));
        assert_eq!(reader.read_u8().unwrap(), 0xCC);
        assert_eq!(reader.read_u8(), Err(ReaderErr::NotEnoughData));
    }
}
