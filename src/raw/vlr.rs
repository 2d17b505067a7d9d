//! Raw variable length records.

use crate::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// The number of bytes in a vlr before its data.
pub const HEADER_SIZE: usize = 54;

/// A raw VLR that maps directly onto the las specification.
#[derive(Clone, Debug, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Vlr {
    pub reserved: u16,
    pub user_id: [u8; 16],
    pub record_id: u16,
    pub record_length_after_header: u16,
    pub description: [u8; 32],
    pub data: Vec<u8>,
}

impl Vlr {
    /// Reads a raw VLR.
    ///
    /// A stream that ends before the declared data length is an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::raw::Vlr;
    ///
    /// let mut bytes = Vec::new();
    /// Vlr::default().write_to(&mut bytes).unwrap();
    /// let vlr = Vlr::read_from(Cursor::new(bytes)).unwrap();
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Vlr> {
        let reserved = read.read_u16::<LittleEndian>()?;
        let mut user_id = [0; 16];
        read.read_exact(&mut user_id)?;
        let record_id = read.read_u16::<LittleEndian>()?;
        let record_length_after_header = read.read_u16::<LittleEndian>()?;
        let mut description = [0; 32];
        read.read_exact(&mut description)?;
        let mut data = vec![0; usize::from(record_length_after_header)];
        read.read_exact(&mut data)?;
        Ok(Vlr {
            reserved,
            user_id,
            record_id,
            record_length_after_header,
            description,
            data,
        })
    }

    /// Writes a raw VLR.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::raw::Vlr;
    /// let mut cursor = Cursor::new(Vec::new());
    /// let vlr = Vlr::default();
    /// vlr.write_to(&mut cursor).unwrap();
    /// assert_eq!(54, cursor.into_inner().len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_u16::<LittleEndian>(self.reserved)?;
        write.write_all(&self.user_id)?;
        write.write_u16::<LittleEndian>(self.record_id)?;
        write.write_u16::<LittleEndian>(self.record_length_after_header)?;
        write.write_all(&self.description)?;
        write.write_all(&self.data)?;
        Ok(())
    }

    /// Returns the number of bytes this vlr occupies in a file.
    pub fn len(&self) -> usize {
        HEADER_SIZE + self.data.len()
    }

    /// Returns true if this vlr has no data.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn roundtrip() {
        let vlr = Vlr {
            reserved: 0xAABB,
            user_id: *b"LASF_Projection\0",
            record_id: 34735,
            record_length_after_header: 3,
            description: [b'x'; 32],
            data: vec![1, 2, 3],
        };
        let mut cursor = Cursor::new(Vec::new());
        vlr.write_to(&mut cursor).unwrap();
        assert_eq!(57, cursor.get_ref().len());
        cursor.set_position(0);
        assert_eq!(vlr, Vlr::read_from(cursor).unwrap());
    }

    #[test]
    fn short_data() {
        let vlr = Vlr {
            record_length_after_header: 4,
            data: vec![1, 2],
            ..Default::default()
        };
        let mut bytes = Vec::new();
        vlr.write_to(&mut bytes).unwrap();
        assert!(Vlr::read_from(Cursor::new(bytes)).is_err());
    }
}
