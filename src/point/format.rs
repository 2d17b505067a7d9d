use crate::{Error, Result, raw::header::IS_COMPRESSED_MASK};
use std::fmt;

const TIME_FORMATS: &[u8] = &[1, 3];
const COLOR_FORMATS: &[u8] = &[2, 3];
const BASE_LEN: u16 = 20;
const GPS_TIME_LEN: u16 = 8;
const COLOR_LEN: u16 = 6;

/// Point formats are defined by the las spec.
///
/// Las 1.0 through 1.2 define four point formats, zero through three. Rather than type those out
/// as an enum, we describe a format by the attributes it stores. Any record bytes past the end of
/// those attributes are extra bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Format {
    /// Does this point format include gps time?
    pub has_gps_time: bool,
    /// Does this point format include red, green, and blue colors?
    pub has_color: bool,
    /// The number of extra bytes on each point.
    pub extra_bytes: u16,
    /// Is this point format compressed?
    pub is_compressed: bool,
}

impl Format {
    /// Creates a new point format from a u8.
    ///
    /// The high bit is the compression flag.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// let format = Format::new(0).unwrap();
    /// assert!(!format.has_gps_time);
    /// assert!(!format.has_color);
    ///
    /// let format = Format::new(3).unwrap();
    /// assert!(format.has_gps_time);
    /// assert!(format.has_color);
    ///
    /// assert!(Format::new(0x81).unwrap().is_compressed);
    /// assert!(Format::new(4).is_err());
    /// ```
    pub fn new(n: u8) -> Result<Format> {
        let is_compressed = n & IS_COMPRESSED_MASK == IS_COMPRESSED_MASK;
        let n = n & !IS_COMPRESSED_MASK;
        if n > 3 {
            Err(Error::InvalidPointFormat(n))
        } else {
            Ok(Format {
                has_gps_time: TIME_FORMATS.contains(&n),
                has_color: COLOR_FORMATS.contains(&n),
                extra_bytes: 0,
                is_compressed,
            })
        }
    }

    /// Returns this point format's minimum record length, without extra bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// let mut format = Format::new(1).unwrap();
    /// format.extra_bytes = 2;
    /// assert_eq!(28, format.base_len());
    /// ```
    pub fn base_len(&self) -> u16 {
        let mut len = BASE_LEN;
        if self.has_gps_time {
            len += GPS_TIME_LEN;
        }
        if self.has_color {
            len += COLOR_LEN;
        }
        len
    }

    /// Returns this point format's record length, extra bytes included.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// let mut format = Format::new(0).unwrap();
    /// assert_eq!(20, format.len());
    /// format.extra_bytes = 2;
    /// assert_eq!(22, format.len());
    /// ```
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> u16 {
        self.base_len() + self.extra_bytes
    }

    /// Converts this point format into a point data format id, without the compression bit.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// for i in 0..4 {
    ///     assert_eq!(i, Format::new(i).unwrap().to_u8());
    /// }
    /// ```
    pub fn to_u8(&self) -> u8 {
        match (self.has_gps_time, self.has_color) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        }
    }

    /// Converts this point format into the point data format id stored in a header.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// let mut format = Format::new(1).unwrap();
    /// format.is_compressed = true;
    /// assert_eq!(0x81, format.to_writable_u8());
    /// ```
    pub fn to_writable_u8(&self) -> u8 {
        if self.is_compressed {
            self.to_u8() | IS_COMPRESSED_MASK
        } else {
            self.to_u8()
        }
    }

    /// Returns a new format whose record length is `len`.
    ///
    /// Fails if `len` is shorter than the format's minimum.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Format;
    /// let format = Format::new(0).unwrap().with_len(24).unwrap();
    /// assert_eq!(4, format.extra_bytes);
    /// assert!(Format::new(3).unwrap().with_len(33).is_err());
    /// ```
    pub fn with_len(mut self, len: u16) -> Result<Format> {
        let base_len = self.base_len();
        if len < base_len {
            Err(Error::InvalidPointDataRecordLength { format: self, len })
        } else {
            self.extra_bytes = len - base_len;
            Ok(self)
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point format {}", self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! point_format {
        ($name:ident, $n:expr, $has_gps_time:expr, $has_color:expr, $len:expr) => {
            mod $name {
                use crate::point::Format;

                #[test]
                fn new() {
                    let format = Format::new($n).unwrap();
                    assert_eq!($has_gps_time, format.has_gps_time);
                    assert_eq!($has_color, format.has_color);
                    assert_eq!($len, format.len());
                }

                #[test]
                fn to_u8() {
                    assert_eq!($n, Format::new($n).unwrap().to_u8());
                }
            }
        };
    }

    point_format!(format_0, 0, false, false, 20);
    point_format!(format_1, 1, true, false, 28);
    point_format!(format_2, 2, false, true, 26);
    point_format!(format_3, 3, true, true, 34);

    #[test]
    fn unsupported() {
        for n in 4..0x80 {
            assert!(Format::new(n).is_err());
        }
    }

    #[test]
    fn display() {
        assert_eq!("point format 3", Format::new(3).unwrap().to_string());
    }
}
