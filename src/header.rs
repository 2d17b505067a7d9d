//! A `Header` describes the configuration and properties of las data.
//!
//! # Reading
//!
//! A [Reader](crate::Reader) uses a header to configure how it reads points. You can get the
//! header of a reader via [Reader::header](crate::Reader::header):
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Reader, Writer};
//!
//! let writer = Writer::default();
//! let reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! let header = reader.header();
//! println!("The file has {} points.", header.number_of_points());
//! ```
//!
//! # Writing
//!
//! A [Writer](crate::Writer) takes a header and writes points that match it. Every field is
//! changed through a setter, and setters refuse values that a las file can't hold:
//!
//! ```
//! use lasindex::{Header, Version};
//! use lasindex::point::Format;
//!
//! let mut header = Header::default();
//! header.set_point_format(Format::new(1).unwrap());
//! assert!(header.set_version(Version::new(1, 0)).is_ok());
//! assert!(header.set_version(Version::new(1, 4)).is_err());
//! assert!(header.set_file_creation_day_of_year(367).is_err());
//! ```
//!
//! The point count, the returns histogram, and the bounds are owned by the writer, which resets
//! them when it starts and fills them in as points are written.

use crate::{
    Bounds, Error, Point, Result, Transform, Vector, Version, Vlr,
    point::Format,
    raw::{self, POINT_DATA_START_SIGNATURE},
    transform::DEFAULT_SCALE,
    utils::{AsLasStr, FromLasStr},
    version::HEADER_SIZE,
};
use chrono::{Datelike, NaiveDate, Utc};
use log::{Level, log};
use std::io::{Read, Write};
use uuid::Uuid;

/// The largest valid day of the year.
pub const MAX_DAY_OF_YEAR: u16 = 366;

/// The largest valid creation year.
pub const MAX_YEAR: u16 = 9999;

/// The number of returns counted by the header.
pub const NUMBER_OF_RETURNS_COUNTED: usize = 5;

const SYSTEM_IDENTIFIER: &str = "lasindex";
const STRING_FIELD_LEN: usize = 32;

/// Metadata describing the layout, source, and interpretation of the points.
#[derive(Clone, Debug, PartialEq)]
pub struct Header {
    bounds: Bounds,
    file_creation_day_of_year: u16,
    file_creation_year: u16,
    file_source_id: u16,
    generating_software: String,
    global_encoding: u16,
    guid: Uuid,
    number_of_points: u64,
    number_of_points_by_return: [u64; NUMBER_OF_RETURNS_COUNTED],
    padding: Vec<u8>,
    point_data_start_signature: bool,
    point_format: Format,
    system_identifier: String,
    transforms: Vector<Transform>,
    version: Version,
    vlr_padding: Vec<u8>,
    vlrs: Vec<Vlr>,
}

impl Header {
    /// Reads a header, its vlrs, and any padding before the points.
    ///
    /// After a successful read the stream is positioned at the first point record.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::Header;
    ///
    /// let mut bytes = Vec::new();
    /// Header::default().write_to(&mut bytes).unwrap();
    /// let header = Header::new(Cursor::new(bytes)).unwrap();
    /// ```
    pub fn new<R: Read>(mut read: R) -> Result<Header> {
        let raw_header = raw::Header::read_from(&mut read)?;
        let offset = raw_header.offset_to_point_data;
        let number_of_vlrs = raw_header.number_of_variable_length_records;
        let mut header = Header::from_raw(raw_header)?;
        let mut position = u64::from(header.header_size()?);
        for _ in 0..number_of_vlrs {
            let vlr = Vlr::new(raw::Vlr::read_from(&mut read)?)?;
            position += u64::try_from(vlr.len())?;
            header.vlrs.push(vlr);
        }
        if position > u64::from(offset) {
            return Err(Error::VlrsOverlapPointData {
                end: position,
                offset,
            });
        }
        let mut vlr_padding = vec![0; usize::try_from(u64::from(offset) - position)?];
        read.read_exact(&mut vlr_padding)?;
        if header.version.requires_point_data_start_signature() {
            if vlr_padding.starts_with(&POINT_DATA_START_SIGNATURE) {
                let _ = vlr_padding.drain(..POINT_DATA_START_SIGNATURE.len());
            } else {
                log!(
                    Level::Warn,
                    "las {} data without a point data start signature",
                    header.version
                );
                header.point_data_start_signature = false;
            }
        }
        header.vlr_padding = vlr_padding;
        log!(
            Level::Debug,
            "read las {} header: {} points, {}, {} vlrs",
            header.version,
            header.number_of_points,
            header.point_format,
            header.vlrs.len()
        );
        Ok(header)
    }

    /// Creates a header from a raw header, without any vlrs.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{raw, Header};
    /// let header = Header::from_raw(raw::Header::default()).unwrap();
    ///
    /// let raw_header = raw::Header { file_signature: *b"LASX", ..Default::default() };
    /// assert!(Header::from_raw(raw_header).is_err());
    /// ```
    pub fn from_raw(raw_header: raw::Header) -> Result<Header> {
        if raw_header.file_signature != raw::LASF {
            return Err(Error::InvalidFileSignature(raw_header.file_signature));
        }
        if !raw_header.version.is_supported() {
            return Err(Error::UnsupportedVersion(raw_header.version));
        }
        if raw_header.header_size < HEADER_SIZE {
            return Err(Error::HeaderSizeTooSmall(raw_header.header_size));
        }
        if raw_header.offset_to_point_data < u32::from(raw_header.header_size) {
            return Err(Error::OffsetToPointDataTooSmall {
                offset: raw_header.offset_to_point_data,
                header_size: raw_header.header_size,
            });
        }
        let point_format = Format::new(raw_header.point_data_format_id)?
            .with_len(raw_header.point_data_record_length)?;
        let mut header = Header {
            bounds: Bounds {
                min: Vector {
                    x: raw_header.min_x,
                    y: raw_header.min_y,
                    z: raw_header.min_z,
                },
                max: Vector {
                    x: raw_header.max_x,
                    y: raw_header.max_y,
                    z: raw_header.max_z,
                },
            },
            file_creation_day_of_year: 0,
            file_creation_year: 0,
            file_source_id: raw_header.file_source_id,
            generating_software: raw_header.generating_software.as_las_str()?.to_string(),
            global_encoding: raw_header.global_encoding,
            guid: Uuid::from_bytes_le(raw_header.guid),
            number_of_points: u64::from(raw_header.number_of_point_records),
            number_of_points_by_return: raw_header.number_of_points_by_return.map(u64::from),
            padding: raw_header.padding,
            point_data_start_signature: true,
            point_format,
            system_identifier: raw_header.system_identifier.as_las_str()?.to_string(),
            transforms: Vector::default(),
            version: raw_header.version,
            vlr_padding: Vec::new(),
            vlrs: Vec::new(),
        };
        header.set_file_creation_day_of_year(raw_header.file_creation_day_of_year)?;
        header.set_file_creation_year(raw_header.file_creation_year)?;
        header.set_transforms(Vector {
            x: Transform {
                scale: raw_header.x_scale_factor,
                offset: raw_header.x_offset,
            },
            y: Transform {
                scale: raw_header.y_scale_factor,
                offset: raw_header.y_offset,
            },
            z: Transform {
                scale: raw_header.z_scale_factor,
                offset: raw_header.z_offset,
            },
        });
        Ok(header)
    }

    /// Converts this header into a raw header.
    ///
    /// Empty bounds are written as zeros.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// let raw_header = Header::default().into_raw().unwrap();
    /// assert_eq!(227, raw_header.offset_to_point_data);
    /// ```
    pub fn into_raw(&self) -> Result<raw::Header> {
        let mut system_identifier = [0; STRING_FIELD_LEN];
        system_identifier.from_las_str(&self.system_identifier)?;
        let mut generating_software = [0; STRING_FIELD_LEN];
        generating_software.from_las_str(&self.generating_software)?;
        let number_of_point_records = u32::try_from(self.number_of_points)
            .map_err(|_| Error::TooManyPoints(self.number_of_points))?;
        let mut number_of_points_by_return = [0; NUMBER_OF_RETURNS_COUNTED];
        for (raw_count, &count) in number_of_points_by_return
            .iter_mut()
            .zip(&self.number_of_points_by_return)
        {
            *raw_count = u32::try_from(count).map_err(|_| Error::TooManyPoints(count))?;
        }
        let bounds = if self.bounds.is_empty() {
            Bounds::new(Vector::default(), Vector::default())
        } else {
            self.bounds
        };
        Ok(raw::Header {
            file_signature: raw::LASF,
            file_source_id: self.file_source_id,
            global_encoding: self.global_encoding,
            guid: self.guid.to_bytes_le(),
            version: self.version,
            system_identifier,
            generating_software,
            file_creation_day_of_year: self.file_creation_day_of_year,
            file_creation_year: self.file_creation_year,
            header_size: self.header_size()?,
            offset_to_point_data: self.offset_to_point_data()?,
            number_of_variable_length_records: u32::try_from(self.vlrs.len())?,
            point_data_format_id: self.point_format.to_writable_u8(),
            point_data_record_length: self.point_format.len(),
            number_of_point_records,
            number_of_points_by_return,
            x_scale_factor: self.transforms.x.scale,
            y_scale_factor: self.transforms.y.scale,
            z_scale_factor: self.transforms.z.scale,
            x_offset: self.transforms.x.offset,
            y_offset: self.transforms.y.offset,
            z_offset: self.transforms.z.offset,
            max_x: bounds.max.x,
            min_x: bounds.min.x,
            max_y: bounds.max.y,
            min_y: bounds.min.y,
            max_z: bounds.max.z,
            min_z: bounds.min.z,
            padding: self.padding.clone(),
        })
    }

    /// Writes this header, its vlrs, and the padding before the points.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Header, Vlr};
    /// let mut header = Header::default();
    /// header.add_vlr(Vlr::default());
    /// let mut bytes = Vec::new();
    /// header.write_to(&mut bytes).unwrap();
    /// assert_eq!(227 + 54, bytes.len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W) -> Result<()> {
        self.into_raw()?.write_to(&mut write)?;
        for vlr in &self.vlrs {
            vlr.clone().into_raw()?.write_to(&mut write)?;
        }
        write.write_all(&self.point_data_start_padding())?;
        Ok(())
    }

    /// Returns the size of the public header block, padding included.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// let mut header = Header::default();
    /// assert_eq!(227, header.header_size().unwrap());
    /// header.set_padding(vec![0; 3]);
    /// assert_eq!(230, header.header_size().unwrap());
    /// ```
    pub fn header_size(&self) -> Result<u16> {
        let padding = u16::try_from(self.padding.len())?;
        HEADER_SIZE
            .checked_add(padding)
            .ok_or(Error::HeaderSizeTooSmall(HEADER_SIZE))
    }

    /// Returns the offset from the start of the las data to the first point record.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Header, Version, Vlr};
    /// let mut header = Header::default();
    /// header.add_vlr(Vlr::default());
    /// assert_eq!(227 + 54, header.offset_to_point_data().unwrap());
    ///
    /// header.set_version(Version::new(1, 0)).unwrap();
    /// assert_eq!(227 + 54 + 2, header.offset_to_point_data().unwrap());
    /// ```
    pub fn offset_to_point_data(&self) -> Result<u32> {
        let vlrs_len: usize = self.vlrs.iter().map(Vlr::len).sum();
        let offset = usize::from(self.header_size()?)
            + vlrs_len
            + self.point_data_start_padding().len();
        u32::try_from(offset).map_err(Error::from)
    }

    /// Returns the bounds of the points.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Sets the bounds of the points.
    ///
    /// A writer recomputes these from the points it writes.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Returns the file source id.
    pub fn file_source_id(&self) -> u16 {
        self.file_source_id
    }

    /// Sets the file source id.
    pub fn set_file_source_id(&mut self, file_source_id: u16) {
        self.file_source_id = file_source_id;
    }

    /// Returns the global encoding bits.
    pub fn global_encoding(&self) -> u16 {
        self.global_encoding
    }

    /// Sets the global encoding bits.
    pub fn set_global_encoding(&mut self, global_encoding: u16) {
        self.global_encoding = global_encoding;
    }

    /// Returns the project id.
    pub fn guid(&self) -> Uuid {
        self.guid
    }

    /// Sets the project id.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// use uuid::Uuid;
    /// let mut header = Header::default();
    /// header.set_guid(Uuid::from_bytes([42; 16]));
    /// ```
    pub fn set_guid(&mut self, guid: Uuid) {
        self.guid = guid;
    }

    /// Returns the las version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Sets the las version.
    ///
    /// Only 1.0, 1.1, and 1.2 are accepted.
    pub fn set_version(&mut self, version: Version) -> Result<()> {
        if version.is_supported() {
            self.version = version;
            Ok(())
        } else {
            Err(Error::UnsupportedVersion(version))
        }
    }

    /// Returns the system identifier.
    pub fn system_identifier(&self) -> &str {
        &self.system_identifier
    }

    /// Sets the system identifier.
    ///
    /// Must be ascii, at most 32 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// let mut header = Header::default();
    /// header.set_system_identifier("MERGE").unwrap();
    /// assert!(header.set_system_identifier(&"x".repeat(33)).is_err());
    /// ```
    pub fn set_system_identifier(&mut self, system_identifier: &str) -> Result<()> {
        check_string_field(system_identifier)?;
        self.system_identifier = system_identifier.to_string();
        Ok(())
    }

    /// Returns the generating software.
    pub fn generating_software(&self) -> &str {
        &self.generating_software
    }

    /// Sets the generating software.
    ///
    /// Must be ascii, at most 32 bytes.
    pub fn set_generating_software(&mut self, generating_software: &str) -> Result<()> {
        check_string_field(generating_software)?;
        self.generating_software = generating_software.to_string();
        Ok(())
    }

    /// Returns the file creation day of year.
    pub fn file_creation_day_of_year(&self) -> u16 {
        self.file_creation_day_of_year
    }

    /// Sets the file creation day of year.
    ///
    /// Days past 366 are an error.
    pub fn set_file_creation_day_of_year(&mut self, day: u16) -> Result<()> {
        if day > MAX_DAY_OF_YEAR {
            Err(Error::InvalidDayOfYear(day))
        } else {
            self.file_creation_day_of_year = day;
            Ok(())
        }
    }

    /// Returns the file creation year.
    pub fn file_creation_year(&self) -> u16 {
        self.file_creation_year
    }

    /// Sets the file creation year.
    ///
    /// Years past 9999 are an error.
    pub fn set_file_creation_year(&mut self, year: u16) -> Result<()> {
        if year > MAX_YEAR {
            Err(Error::InvalidYear(i32::from(year)))
        } else {
            self.file_creation_year = year;
            Ok(())
        }
    }

    /// Returns the file creation date, if the day and year describe one.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use lasindex::Header;
    ///
    /// let mut header = Header::default();
    /// let date = NaiveDate::from_ymd_opt(2017, 10, 30).unwrap();
    /// header.set_date(date).unwrap();
    /// assert_eq!(303, header.file_creation_day_of_year());
    /// assert_eq!(Some(date), header.date());
    ///
    /// header.set_file_creation_day_of_year(0).unwrap();
    /// assert_eq!(None, header.date());
    /// ```
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_yo_opt(
            i32::from(self.file_creation_year),
            u32::from(self.file_creation_day_of_year),
        )
    }

    /// Sets the file creation day and year from a date.
    pub fn set_date(&mut self, date: NaiveDate) -> Result<()> {
        let year = u16::try_from(date.year()).map_err(|_| Error::InvalidYear(date.year()))?;
        let day = u16::try_from(date.ordinal())?;
        self.set_file_creation_year(year)?;
        self.set_file_creation_day_of_year(day)
    }

    /// Returns the point format.
    pub fn point_format(&self) -> &Format {
        &self.point_format
    }

    /// Sets the point format.
    ///
    /// The point data record length becomes the format's length. If the current record length
    /// carries extra bytes and is longer than that, the longer length is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// use lasindex::point::Format;
    ///
    /// let mut header = Header::default();
    /// header.set_point_format(Format::new(3).unwrap());
    /// assert_eq!(34, header.point_data_record_length());
    /// header.set_point_format(Format::new(0).unwrap());
    /// assert_eq!(20, header.point_data_record_length());
    ///
    /// header.set_point_data_record_length(30).unwrap();
    /// header.set_point_format(Format::new(1).unwrap());
    /// assert_eq!(30, header.point_data_record_length());
    /// ```
    pub fn set_point_format(&mut self, mut format: Format) {
        let len = if self.point_format.extra_bytes > 0 {
            self.point_format.len().max(format.len())
        } else {
            format.len()
        };
        format.extra_bytes = len - format.base_len();
        self.point_format = format;
    }

    /// Returns the point data record length.
    pub fn point_data_record_length(&self) -> u16 {
        self.point_format.len()
    }

    /// Sets the point data record length.
    ///
    /// Anything past the format's own fields becomes extra bytes. A length shorter than the format
    /// needs is an error.
    pub fn set_point_data_record_length(&mut self, len: u16) -> Result<()> {
        self.point_format = self.point_format.with_len(len)?;
        Ok(())
    }

    /// Returns the scale and offset for each axis.
    pub fn transforms(&self) -> &Vector<Transform> {
        &self.transforms
    }

    /// Sets the scale and offset for each axis.
    ///
    /// Zero scales become 0.01.
    pub fn set_transforms(&mut self, transforms: Vector<Transform>) {
        self.transforms = transforms;
        self.set_scale(
            transforms.x.scale,
            transforms.y.scale,
            transforms.z.scale,
        );
    }

    /// Sets the scale of each axis.
    ///
    /// Zero scales become 0.01.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// let mut header = Header::default();
    /// header.set_scale(0., 0.001, 0.);
    /// assert_eq!(0.01, header.transforms().x.scale);
    /// assert_eq!(0.001, header.transforms().y.scale);
    /// assert_eq!(0.01, header.transforms().z.scale);
    /// ```
    pub fn set_scale(&mut self, x: f64, y: f64, z: f64) {
        fn nonzero(scale: f64) -> f64 {
            if scale == 0. { DEFAULT_SCALE } else { scale }
        }
        self.transforms.x.scale = nonzero(x);
        self.transforms.y.scale = nonzero(y);
        self.transforms.z.scale = nonzero(z);
    }

    /// Sets the offset of each axis.
    pub fn set_offset(&mut self, x: f64, y: f64, z: f64) {
        self.transforms.x.offset = x;
        self.transforms.y.offset = y;
        self.transforms.z.offset = z;
    }

    /// Returns the number of points.
    pub fn number_of_points(&self) -> u64 {
        self.number_of_points
    }

    /// Returns the number of points with the given return number, one through five.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Header;
    /// let header = Header::default();
    /// assert_eq!(Some(0), header.number_of_points_by_return(1));
    /// assert_eq!(None, header.number_of_points_by_return(6));
    /// ```
    pub fn number_of_points_by_return(&self, n: u8) -> Option<u64> {
        usize::from(n)
            .checked_sub(1)
            .and_then(|i| self.number_of_points_by_return.get(i))
            .copied()
    }

    /// Returns the bytes past the end of the standard header.
    pub fn padding(&self) -> &[u8] {
        &self.padding
    }

    /// Sets the bytes past the end of the standard header, growing the header size to match.
    pub fn set_padding(&mut self, padding: Vec<u8>) {
        self.padding = padding;
    }

    /// Returns the bytes between the last vlr and the first point.
    ///
    /// The las 1.0 point data start signature is not included.
    pub fn vlr_padding(&self) -> &[u8] {
        &self.vlr_padding
    }

    /// Sets the bytes between the last vlr and the first point.
    pub fn set_vlr_padding(&mut self, vlr_padding: Vec<u8>) {
        self.vlr_padding = vlr_padding;
    }

    /// Returns the vlrs.
    pub fn vlrs(&self) -> &[Vlr] {
        &self.vlrs
    }

    /// Returns the vlr at the index.
    pub fn vlr(&self, index: usize) -> Option<&Vlr> {
        self.vlrs.get(index)
    }

    /// Returns the number of vlrs.
    pub fn number_of_vlrs(&self) -> usize {
        self.vlrs.len()
    }

    /// Appends a vlr.
    pub fn add_vlr(&mut self, vlr: Vlr) {
        self.vlrs.push(vlr);
    }

    /// Removes and returns the vlr at the index.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Header, Vlr};
    /// let mut header = Header::default();
    /// header.add_vlr(Vlr::default());
    /// assert!(header.delete_vlr(1).is_err());
    /// header.delete_vlr(0).unwrap();
    /// assert_eq!(0, header.number_of_vlrs());
    /// ```
    pub fn delete_vlr(&mut self, index: usize) -> Result<Vlr> {
        if index < self.vlrs.len() {
            Ok(self.vlrs.remove(index))
        } else {
            Err(Error::VlrIndexOutOfRange {
                index,
                len: self.vlrs.len(),
            })
        }
    }

    /// Removes the GeoTIFF key vlrs, leaving every other vlr in place.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Header, Vlr};
    /// let mut header = Header::default();
    /// header.add_vlr(Vlr { user_id: "LASF_Projection".to_string(), record_id: 34735, ..Default::default() });
    /// header.add_vlr(Vlr { user_id: "LASF_Projection".to_string(), record_id: 34737, ..Default::default() });
    /// header.add_vlr(Vlr::default());
    /// header.clear_geokey_vlrs();
    /// assert_eq!(1, header.number_of_vlrs());
    /// ```
    pub fn clear_geokey_vlrs(&mut self) {
        self.vlrs.retain(|vlr| !vlr.is_geokey());
    }

    pub(crate) fn clear(&mut self) {
        self.number_of_points = 0;
        self.number_of_points_by_return = [0; NUMBER_OF_RETURNS_COUNTED];
        self.bounds = Bounds::default();
    }

    pub(crate) fn add_point(&mut self, point: &Point) {
        self.number_of_points += 1;
        if let Some(count) = usize::from(point.return_number)
            .checked_sub(1)
            .and_then(|i| self.number_of_points_by_return.get_mut(i))
        {
            *count += 1;
        }
        self.bounds.grow(point);
    }

    fn point_data_start_padding(&self) -> Vec<u8> {
        if self.point_data_start_signature && self.version.requires_point_data_start_signature() {
            let mut padding = POINT_DATA_START_SIGNATURE.to_vec();
            padding.extend_from_slice(&self.vlr_padding);
            padding
        } else {
            self.vlr_padding.clone()
        }
    }
}

fn check_string_field(s: &str) -> Result<()> {
    [0; STRING_FIELD_LEN].from_las_str(s)
}

impl Default for Header {
    fn default() -> Header {
        let today = Utc::now().date_naive();
        Header {
            bounds: Bounds::default(),
            file_creation_day_of_year: u16::try_from(today.ordinal()).unwrap_or(0),
            file_creation_year: u16::try_from(today.year())
                .unwrap_or(0)
                .min(MAX_YEAR),
            file_source_id: 0,
            generating_software: format!("{} {}", SYSTEM_IDENTIFIER, env!("CARGO_PKG_VERSION")),
            global_encoding: 0,
            guid: Uuid::nil(),
            number_of_points: 0,
            number_of_points_by_return: [0; NUMBER_OF_RETURNS_COUNTED],
            padding: Vec::new(),
            point_data_start_signature: true,
            point_format: Format::default(),
            system_identifier: SYSTEM_IDENTIFIER.to_string(),
            transforms: Vector::default(),
            version: Version::default(),
            vlr_padding: Vec::new(),
            vlrs: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roundtrip(header: &Header) -> (Header, Vec<u8>) {
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        let mut cursor = Cursor::new(bytes);
        let read = Header::new(&mut cursor).unwrap();
        assert_eq!(cursor.get_ref().len() as u64, cursor.position());
        (read, cursor.into_inner())
    }

    fn projection_vlr(record_id: u16) -> Vlr {
        Vlr {
            user_id: crate::vlr::PROJECTION_USER_ID.to_string(),
            record_id,
            ..Default::default()
        }
    }

    #[test]
    fn defaults() {
        let header = Header::default();
        assert_eq!(Version::new(1, 2), header.version());
        assert_eq!(0, header.point_format().to_u8());
        assert_eq!(20, header.point_data_record_length());
        assert_eq!(227, header.header_size().unwrap());
        assert_eq!(227, header.offset_to_point_data().unwrap());
        assert_eq!(0.01, header.transforms().x.scale);
        assert!(header.date().is_some());
    }

    #[test]
    fn roundtrip_with_vlrs_and_padding() {
        let mut header = Header::default();
        header.set_file_source_id(42);
        header.set_guid(Uuid::from_bytes([7; 16]));
        header.set_point_format(Format::new(3).unwrap());
        header.set_system_identifier("roundtrip test").unwrap();
        header.set_padding(b"header padding".to_vec());
        header.set_vlr_padding(b"vlr padding".to_vec());
        header.add_vlr(Vlr {
            user_id: "test".to_string(),
            record_id: 1,
            description: "a test vlr".to_string(),
            data: vec![1, 2, 3],
            ..Default::default()
        });
        header.set_bounds(Bounds::new(Vector::splat(-1.), Vector::splat(1.)));
        let (read, bytes) = roundtrip(&header);
        assert_eq!(header, read);

        let mut rewritten = Vec::new();
        read.write_to(&mut rewritten).unwrap();
        assert_eq!(bytes, rewritten);
    }

    #[test]
    fn las_1_0_start_signature() {
        let mut header = Header::default();
        header.set_version(Version::new(1, 0)).unwrap();
        let (read, bytes) = roundtrip(&header);
        assert_eq!(229, bytes.len());
        assert_eq!(POINT_DATA_START_SIGNATURE, bytes[227..]);
        assert!(read.vlr_padding().is_empty());
        assert_eq!(229, read.offset_to_point_data().unwrap());
    }

    #[test]
    fn las_1_0_without_start_signature_is_rewritten_as_read() {
        let mut bytes = Vec::new();
        Header::default().write_to(&mut bytes).unwrap();
        bytes[25] = 0;
        let read = Header::new(Cursor::new(bytes.clone())).unwrap();
        assert_eq!(Version::new(1, 0), read.version());
        assert_eq!(227, read.offset_to_point_data().unwrap());
        let mut rewritten = Vec::new();
        read.write_to(&mut rewritten).unwrap();
        assert_eq!(bytes, rewritten);
    }

    #[test]
    fn zero_scales() {
        let mut header = Header::default();
        header.set_scale(0., 0., 0.);
        assert_eq!(0.01, header.transforms().x.scale);
        assert_eq!(0.01, header.transforms().y.scale);
        assert_eq!(0.01, header.transforms().z.scale);
    }

    #[test]
    fn invalid_signature() {
        let mut bytes = Vec::new();
        Header::default().write_to(&mut bytes).unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            Header::new(Cursor::new(bytes)),
            Err(Error::InvalidFileSignature(_))
        ));
    }

    #[test]
    fn offset_too_small() {
        let raw_header = raw::Header {
            offset_to_point_data: 226,
            ..Default::default()
        };
        assert!(matches!(
            Header::from_raw(raw_header),
            Err(Error::OffsetToPointDataTooSmall { .. })
        ));
    }

    #[test]
    fn invalid_point_format() {
        let raw_header = raw::Header {
            point_data_format_id: 4,
            ..Default::default()
        };
        assert!(matches!(
            Header::from_raw(raw_header),
            Err(Error::InvalidPointFormat(4))
        ));
    }

    #[test]
    fn record_length_too_small() {
        let raw_header = raw::Header {
            point_data_format_id: 1,
            point_data_record_length: 20,
            ..Default::default()
        };
        assert!(Header::from_raw(raw_header).is_err());
    }

    #[test]
    fn unsupported_version() {
        let raw_header = raw::Header {
            version: Version::new(1, 3),
            ..Default::default()
        };
        assert!(matches!(
            Header::from_raw(raw_header),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn zero_scale_on_read() {
        let raw_header = raw::Header {
            x_scale_factor: 0.,
            ..Default::default()
        };
        let header = Header::from_raw(raw_header).unwrap();
        assert_eq!(0.01, header.transforms().x.scale);
    }

    #[test]
    fn extra_bytes_from_record_length() {
        let raw_header = raw::Header {
            point_data_format_id: 1,
            point_data_record_length: 30,
            ..Default::default()
        };
        let header = Header::from_raw(raw_header).unwrap();
        assert_eq!(2, header.point_format().extra_bytes);
    }

    #[test]
    fn vlrs_overlap_point_data() {
        let mut header = Header::default();
        header.add_vlr(Vlr::default());
        let mut bytes = Vec::new();
        header.write_to(&mut bytes).unwrap();
        bytes[96..100].copy_from_slice(&240u32.to_le_bytes());
        assert!(matches!(
            Header::new(Cursor::new(bytes)),
            Err(Error::VlrsOverlapPointData { .. })
        ));
    }

    #[test]
    fn day_and_year() {
        let mut header = Header::default();
        assert!(header.set_file_creation_day_of_year(366).is_ok());
        assert!(header.set_file_creation_day_of_year(367).is_err());
        assert_eq!(366, header.file_creation_day_of_year());
        assert!(header.set_file_creation_year(9999).is_ok());
        assert!(header.set_file_creation_year(10000).is_err());
        assert_eq!(9999, header.file_creation_year());
    }

    #[test]
    fn vlr_accounting() {
        let mut header = Header::default();
        header.add_vlr(Vlr::default());
        header.add_vlr(projection_vlr(34735));
        assert_eq!(2, header.number_of_vlrs());
        assert!(header.delete_vlr(2).is_err());
        assert_eq!(2, header.number_of_vlrs());
        let deleted = header.delete_vlr(1).unwrap();
        assert!(deleted.is_geokey());
        assert_eq!(1, header.number_of_vlrs());
        assert_eq!(1, header.into_raw().unwrap().number_of_variable_length_records);
    }

    #[test]
    fn clear_geokey_vlrs_keeps_others() {
        let mut header = Header::default();
        header.add_vlr(projection_vlr(34735));
        header.add_vlr(projection_vlr(34736));
        header.add_vlr(projection_vlr(34737));
        header.add_vlr(projection_vlr(2112));
        header.add_vlr(Vlr::default());
        header.clear_geokey_vlrs();
        assert_eq!(2, header.number_of_vlrs());
        assert_eq!(2112, header.vlr(0).unwrap().record_id);
    }

    #[test]
    fn point_format_keeps_custom_length() {
        let mut header = Header::default();
        header.set_point_data_record_length(30).unwrap();
        header.set_point_format(Format::new(3).unwrap());
        assert_eq!(34, header.point_data_record_length());
        assert_eq!(0, header.point_format().extra_bytes);
        assert!(header.set_point_data_record_length(33).is_err());
    }

    #[test]
    fn add_point() {
        let mut header = Header::default();
        header.add_point(&Point {
            return_number: 2,
            x: 1.,
            ..Default::default()
        });
        header.add_point(&Point {
            return_number: 7,
            ..Default::default()
        });
        assert_eq!(2, header.number_of_points());
        assert_eq!(Some(1), header.number_of_points_by_return(2));
        assert_eq!(1., header.bounds().max.x);
        header.clear();
        assert_eq!(0, header.number_of_points());
        assert!(header.bounds().is_empty());
    }

    #[test]
    fn too_many_points() {
        let mut header = Header::default();
        header.number_of_points = u64::from(u32::MAX) + 1;
        assert!(header.into_raw().is_err());
    }
}
