//! Raw file metadata.

use crate::{Result, Version, version::HEADER_SIZE};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// The high bit of the point data format id, set when point data is compressed.
pub(crate) const IS_COMPRESSED_MASK: u8 = 0x80;

/// A las header, field for field.
///
/// Member documentation is adapted from the las 1.2 specification.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    /// The file signature must contain the four characters “LASF”.
    pub file_signature: [u8; 4],

    /// This field should be set to a value between 1 and 65,535, inclusive.
    ///
    /// A value of zero is interpreted to mean that an ID has not been assigned. Las 1.0 calls
    /// these two bytes reserved.
    pub file_source_id: u16,

    /// A bit field used to indicate certain global properties about the file.
    ///
    /// Las 1.2 defines only the low bit (gps time type). Las 1.0 and 1.1 call this field reserved.
    pub global_encoding: u16,

    /// The project id, stored as the four fields of a GUID.
    ///
    /// The bytes are kept exactly as they appear in the file. The first three fields are
    /// little-endian, which is what [uuid::Uuid::from_bytes_le] expects.
    pub guid: [u8; 16],

    /// The version number consists of a major and minor field.
    pub version: Version,

    /// A nul-padded string describing the system or operation that created this file.
    pub system_identifier: [u8; 32],

    /// A nul-padded string describing the generating software.
    pub generating_software: [u8; 32],

    /// The Greenwich Mean Time day of the year on which the file was created.
    ///
    /// January 1 is day 1.
    pub file_creation_day_of_year: u16,

    /// The four digit year in which the file was created.
    pub file_creation_year: u16,

    /// The size, in bytes, of the public header block itself.
    ///
    /// Anything past the standard 227 bytes is kept in `padding`.
    pub header_size: u16,

    /// The number of bytes from the beginning of the file to the first point record.
    pub offset_to_point_data: u32,

    /// The number of variable length records.
    pub number_of_variable_length_records: u32,

    /// The point data format id, with the high bit flagging compressed data.
    pub point_data_format_id: u8,

    /// The size, in bytes, of the point data record.
    pub point_data_record_length: u16,

    /// The total number of point records within the file.
    pub number_of_point_records: u32,

    /// The number of point records for each of the first five returns.
    pub number_of_points_by_return: [u32; 5],

    /// Multiplied with the stored integer x to get the actual coordinate.
    pub x_scale_factor: f64,
    #[allow(missing_docs)]
    pub y_scale_factor: f64,
    #[allow(missing_docs)]
    pub z_scale_factor: f64,

    /// Added to the scaled x to get the actual coordinate.
    pub x_offset: f64,
    #[allow(missing_docs)]
    pub y_offset: f64,
    #[allow(missing_docs)]
    pub z_offset: f64,

    /// The actual extents of the point data, in the coordinate system of the data.
    pub max_x: f64,
    #[allow(missing_docs)]
    pub min_x: f64,
    #[allow(missing_docs)]
    pub max_y: f64,
    #[allow(missing_docs)]
    pub min_y: f64,
    #[allow(missing_docs)]
    pub max_z: f64,
    #[allow(missing_docs)]
    pub min_z: f64,

    /// Bytes past the standard header, when `header_size` is larger than 227.
    pub padding: Vec<u8>,
}

impl Header {
    /// Reads a raw header from a `Read`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::raw::Header;
    ///
    /// let mut bytes = Vec::new();
    /// Header::default().write_to(&mut bytes).unwrap();
    /// let header = Header::read_from(Cursor::new(bytes)).unwrap();
    /// assert_eq!(Header::default(), header);
    /// ```
    pub fn read_from<R: Read>(mut read: R) -> Result<Header> {
        let mut file_signature = [0; 4];
        read.read_exact(&mut file_signature)?;
        let file_source_id = read.read_u16::<LittleEndian>()?;
        let global_encoding = read.read_u16::<LittleEndian>()?;
        let mut guid = [0; 16];
        read.read_exact(&mut guid)?;
        let version_major = read.read_u8()?;
        let version_minor = read.read_u8()?;
        let mut system_identifier = [0; 32];
        read.read_exact(&mut system_identifier)?;
        let mut generating_software = [0; 32];
        read.read_exact(&mut generating_software)?;
        let file_creation_day_of_year = read.read_u16::<LittleEndian>()?;
        let file_creation_year = read.read_u16::<LittleEndian>()?;
        let header_size = read.read_u16::<LittleEndian>()?;
        let offset_to_point_data = read.read_u32::<LittleEndian>()?;
        let number_of_variable_length_records = read.read_u32::<LittleEndian>()?;
        let point_data_format_id = read.read_u8()?;
        let point_data_record_length = read.read_u16::<LittleEndian>()?;
        let number_of_point_records = read.read_u32::<LittleEndian>()?;
        let mut number_of_points_by_return = [0; 5];
        for n in &mut number_of_points_by_return {
            *n = read.read_u32::<LittleEndian>()?;
        }
        let x_scale_factor = read.read_f64::<LittleEndian>()?;
        let y_scale_factor = read.read_f64::<LittleEndian>()?;
        let z_scale_factor = read.read_f64::<LittleEndian>()?;
        let x_offset = read.read_f64::<LittleEndian>()?;
        let y_offset = read.read_f64::<LittleEndian>()?;
        let z_offset = read.read_f64::<LittleEndian>()?;
        let max_x = read.read_f64::<LittleEndian>()?;
        let min_x = read.read_f64::<LittleEndian>()?;
        let max_y = read.read_f64::<LittleEndian>()?;
        let min_y = read.read_f64::<LittleEndian>()?;
        let max_z = read.read_f64::<LittleEndian>()?;
        let min_z = read.read_f64::<LittleEndian>()?;
        let padding = if header_size > HEADER_SIZE {
            let mut bytes = vec![0; usize::from(header_size - HEADER_SIZE)];
            read.read_exact(&mut bytes)?;
            bytes
        } else {
            Vec::new()
        };
        Ok(Header {
            file_signature,
            file_source_id,
            global_encoding,
            guid,
            version: Version::new(version_major, version_minor),
            system_identifier,
            generating_software,
            file_creation_day_of_year,
            file_creation_year,
            header_size,
            offset_to_point_data,
            number_of_variable_length_records,
            point_data_format_id,
            point_data_record_length,
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor,
            y_scale_factor,
            z_scale_factor,
            x_offset,
            y_offset,
            z_offset,
            max_x,
            min_x,
            max_y,
            min_y,
            max_z,
            min_z,
            padding,
        })
    }

    /// Returns true if this raw header is for compressed las data.
    ///
    /// Though this isn't part of the las spec, the high bit of the point data format id is used to
    /// indicate compressed data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::Header;
    /// let mut header = Header::default();
    /// assert!(!header.is_compressed());
    /// header.point_data_format_id = 131;
    /// assert!(header.is_compressed());
    /// ```
    pub fn is_compressed(&self) -> bool {
        (self.point_data_format_id & IS_COMPRESSED_MASK) == IS_COMPRESSED_MASK
    }

    /// Writes a raw header to a `Write`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::raw::Header;
    /// let mut cursor = Cursor::new(Vec::new());
    /// let header = Header::default();
    /// header.write_to(&mut cursor).unwrap();
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        write.write_all(&self.file_signature)?;
        write.write_u16::<LittleEndian>(self.file_source_id)?;
        write.write_u16::<LittleEndian>(self.global_encoding)?;
        write.write_all(&self.guid)?;
        write.write_u8(self.version.major)?;
        write.write_u8(self.version.minor)?;
        write.write_all(&self.system_identifier)?;
        write.write_all(&self.generating_software)?;
        write.write_u16::<LittleEndian>(self.file_creation_day_of_year)?;
        write.write_u16::<LittleEndian>(self.file_creation_year)?;
        write.write_u16::<LittleEndian>(self.header_size)?;
        write.write_u32::<LittleEndian>(self.offset_to_point_data)?;
        write.write_u32::<LittleEndian>(self.number_of_variable_length_records)?;
        write.write_u8(self.point_data_format_id)?;
        write.write_u16::<LittleEndian>(self.point_data_record_length)?;
        write.write_u32::<LittleEndian>(self.number_of_point_records)?;
        for n in &self.number_of_points_by_return {
            write.write_u32::<LittleEndian>(*n)?;
        }
        write.write_f64::<LittleEndian>(self.x_scale_factor)?;
        write.write_f64::<LittleEndian>(self.y_scale_factor)?;
        write.write_f64::<LittleEndian>(self.z_scale_factor)?;
        write.write_f64::<LittleEndian>(self.x_offset)?;
        write.write_f64::<LittleEndian>(self.y_offset)?;
        write.write_f64::<LittleEndian>(self.z_offset)?;
        write.write_f64::<LittleEndian>(self.max_x)?;
        write.write_f64::<LittleEndian>(self.min_x)?;
        write.write_f64::<LittleEndian>(self.max_y)?;
        write.write_f64::<LittleEndian>(self.min_y)?;
        write.write_f64::<LittleEndian>(self.max_z)?;
        write.write_f64::<LittleEndian>(self.min_z)?;
        if !self.padding.is_empty() {
            write.write_all(&self.padding)?;
        }
        Ok(())
    }
}

impl Default for Header {
    fn default() -> Header {
        Header {
            file_signature: crate::raw::LASF,
            file_source_id: 0,
            global_encoding: 0,
            guid: [0; 16],
            version: Version::default(),
            system_identifier: [0; 32],
            generating_software: [0; 32],
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            header_size: HEADER_SIZE,
            offset_to_point_data: u32::from(HEADER_SIZE),
            number_of_variable_length_records: 0,
            point_data_format_id: 0,
            point_data_record_length: 20,
            number_of_point_records: 0,
            number_of_points_by_return: [0; 5],
            x_scale_factor: 0.01,
            y_scale_factor: 0.01,
            z_scale_factor: 0.01,
            x_offset: 0.,
            y_offset: 0.,
            z_offset: 0.,
            max_x: 0.,
            min_x: 0.,
            max_y: 0.,
            min_y: 0.,
            max_z: 0.,
            min_z: 0.,
            padding: Vec::new(),
        }
    }
}
