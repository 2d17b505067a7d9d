use crate::{point::Format, Transform, Version};
use thiserror::Error;

/// Crate-specific error enum.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The writer is closed.
    #[error("the writer is closed")]
    ClosedWriter,

    /// The las data is compressed, and compressed point data cannot be decoded by this library.
    #[error("compressed point data is not supported")]
    CompressionNotSupported,

    /// The index store has been handed bytes that do not describe what they claim to.
    #[error("corrupt index data: {0}")]
    CorruptIndex(String),

    /// An index region or point had the wrong number of dimensions.
    #[error("the index has {expected} dimensions, but was given {found}")]
    DimensionMismatch {
        /// The dimension of the index.
        expected: u32,
        /// The dimension of the provided value.
        found: u32,
    },

    /// The stream ended in the middle of a record.
    #[error("the stream ended before the record was complete")]
    EndOfStream(#[source] std::io::Error),

    /// The header size, as computed, is too small.
    #[error("the header is too small: {0}")]
    HeaderSizeTooSmall(u16),

    /// The creation day of year is out of range.
    #[error("the day of year is out of range: {0}")]
    InvalidDayOfYear(u16),

    /// The file signature is not LASF.
    #[error("the file signature is not 'LASF': {0:?}")]
    InvalidFileSignature([u8; 4]),

    /// The classification is out of range.
    #[error("invalid classification: {0}")]
    InvalidClassification(u8),

    /// A GeoTIFF key points at data that isn't there.
    #[error("geotiff key {0} refers to missing data")]
    InvalidGeoKey(u16),

    /// The index options cannot describe a valid tree.
    #[error("invalid index options: {0}")]
    InvalidIndexOptions(String),

    /// The number of returns is too large.
    #[error("invalid number of returns: {0}")]
    InvalidNumberOfReturns(u8),

    /// A page id was asked of a store that does not hold it.
    #[error("invalid page: {0}")]
    InvalidPage(u64),

    /// The point data record length is too small for the format.
    #[error("the point data record length {len} is too small for format {format}")]
    InvalidPointDataRecordLength {
        /// The point format.
        format: Format,
        /// The length of the point data record.
        len: u16,
    },

    /// The point format is not supported.
    #[error("invalid point format: {0}")]
    InvalidPointFormat(u8),

    /// The return number is too large.
    #[error("invalid return number: {0}")]
    InvalidReturnNumber(u8),

    /// The scan angle rank is outside of -90 to 90.
    #[error("invalid scan angle rank: {0}")]
    InvalidScanAngleRank(i8),

    /// The creation year is out of range.
    #[error("the year is out of range: {0}")]
    InvalidYear(i32),

    /// The value can't be represented in the point data record.
    #[error("the transform {transform} cannot be inversely applied to {n}")]
    InverseTransform {
        /// The float being transformed.
        n: f64,
        /// The transform being applied.
        transform: Transform,
    },

    /// Wrapper around [std::io::Error].
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A point's gps time is negative.
    #[error("negative gps time: {0}")]
    NegativeGpsTime(f64),

    /// This string is not ASCII.
    #[error("this string is not ascii: {0}")]
    NotAscii(String),

    /// The offset to the point data was too small.
    #[error("offset to point data is too small: {offset} (header size is {header_size})")]
    OffsetToPointDataTooSmall {
        /// The offset to the point data.
        offset: u32,
        /// The size of the header.
        header_size: u16,
    },

    /// The attributes of the point format and point do not match.
    #[error("the attributes of the point format ({0}) do not match the point")]
    PointAttributesDoNotMatch(Format),

    /// The number of points in the header does not match the number of records in the stream.
    #[error("the header says there are {header} points, but the stream holds {actual}")]
    PointCountMismatch {
        /// The number of points in the header.
        header: u64,
        /// The number of complete records in the stream.
        actual: u64,
    },

    /// A point was requested at exactly the end of the point data.
    #[error("point {0} is one past the last point")]
    PointIndexAtEnd(u64),

    /// A point was requested past the end of the point data.
    #[error("point {index} is out of range, there are {count} points")]
    PointIndexOutOfRange {
        /// The requested index.
        index: u64,
        /// The number of points.
        count: u64,
    },

    /// A sequential read was attempted after the end of the points had already been reported.
    #[error("read past the end of the {0} points")]
    ReadPastEnd(u64),

    /// The reprojection collaborator failed.
    #[error("reprojection failed: {0}")]
    Reprojection(String),

    /// The string is too long for the target field.
    #[error("string is too long for a field of {len} bytes: {string}")]
    StringTooLong {
        /// The string.
        string: String,
        /// The number of bytes in the field.
        len: usize,
    },

    /// There are too many points for a u32 point count.
    #[error("too many points: {0}")]
    TooManyPoints(u64),

    /// Wrapper around [std::num::TryFromIntError].
    #[error(transparent)]
    TryFromIntError(#[from] std::num::TryFromIntError),

    /// The version is not one that this library can read or write.
    #[error("unsupported version: {0}")]
    UnsupportedVersion(Version),

    /// Wrapper around [std::str::Utf8Error].
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// The vlr data is too long.
    #[error("the vlr is too long: {0}")]
    VlrTooLong(usize),

    /// No vlr exists at the given index.
    #[error("vlr index {index} is out of range, there are {len} vlrs")]
    VlrIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of vlrs.
        len: usize,
    },

    /// The vlrs run past the offset to point data.
    #[error("the vlrs end at byte {end}, past the offset to point data {offset}")]
    VlrsOverlapPointData {
        /// The end of the last vlr.
        end: u64,
        /// The offset to point data.
        offset: u32,
    },
}

impl Error {
    /// Returns true if this error is a stream that ended in the middle of a record.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Error;
    /// use std::io::ErrorKind;
    ///
    /// let error = Error::EndOfStream(ErrorKind::UnexpectedEof.into());
    /// assert!(error.is_end_of_stream());
    /// assert!(!Error::ClosedWriter.is_end_of_stream());
    /// ```
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream(_))
    }

    pub(crate) fn from_record_read(err: std::io::Error) -> Error {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::EndOfStream(err)
        } else {
            Error::Io(err)
        }
    }
}
