//! Defines raw las points and the packed flags byte.

use crate::{
    Color, Error, Result,
    point::{Format, ScanDirection},
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

const RETURN_NUMBER_MASK: u8 = 0b0000_0111;
const NUMBER_OF_RETURNS_MASK: u8 = 0b0011_1000;
const NUMBER_OF_RETURNS_SHIFT: u8 = 3;
const SCAN_DIRECTION_MASK: u8 = 0b0100_0000;
const EDGE_OF_FLIGHT_LINE_MASK: u8 = 0b1000_0000;

/// A raw point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// The X, Y, and Z values are stored as long integers.
    ///
    /// The X, Y, and Z values are used in conjunction with the scale values and the offset values
    /// to determine the coordinate for each point as described in the public header block.
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub z: i32,

    /// The intensity value is the integer representation of the pulse return magnitude.
    pub intensity: u16,

    /// Return number, number of returns, scan direction, and edge of flight line packed into one
    /// byte.
    pub flags: Flags,

    /// The class in the low five bits, and the synthetic, key-point, and withheld flags in the
    /// high three.
    pub classification: u8,

    /// The scan angle rounded to the nearest integer degree, -90 to +90.
    pub scan_angle_rank: i8,

    /// This field may be used at the user’s discretion.
    pub user_data: u8,

    /// This value indicates the file from which this point originated.
    pub point_source_id: u16,

    /// The time tag value at which the point was acquired, for formats 1 and 3.
    pub gps_time: Option<f64>,

    /// The red, green, and blue image channels, for formats 2 and 3.
    pub color: Option<Color>,

    /// Any bytes past the end of the format's fields.
    pub extra_bytes: Vec<u8>,
}

/// The return number, number of returns, scan direction, and edge of flight line bit fields.
///
/// | Bits | Field |
/// | ---- | ----- |
/// | 0:2 | Return number |
/// | 3:5 | Number of returns |
/// | 6 | Scan direction |
/// | 7 | Edge of flight line |
///
/// Setters mask their input to the field width.
///
/// ```
/// use lasindex::raw::point::Flags;
/// let mut flags = Flags::default();
/// flags.set_return_number(9);
/// assert_eq!(1, flags.return_number());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    /// Returns the return number.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::point::Flags;
    /// assert_eq!(3, Flags::from(0b0000_1011).return_number());
    /// ```
    pub fn return_number(&self) -> u8 {
        self.0 & RETURN_NUMBER_MASK
    }

    /// Sets the return number, keeping only the low three bits.
    pub fn set_return_number(&mut self, return_number: u8) {
        self.0 = (self.0 & !RETURN_NUMBER_MASK) | (return_number & RETURN_NUMBER_MASK);
    }

    /// Returns the number of returns.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::point::Flags;
    /// assert_eq!(1, Flags::from(0b0000_1011).number_of_returns());
    /// ```
    pub fn number_of_returns(&self) -> u8 {
        (self.0 & NUMBER_OF_RETURNS_MASK) >> NUMBER_OF_RETURNS_SHIFT
    }

    /// Sets the number of returns, keeping only the low three bits.
    pub fn set_number_of_returns(&mut self, number_of_returns: u8) {
        self.0 = (self.0 & !NUMBER_OF_RETURNS_MASK)
            | ((number_of_returns << NUMBER_OF_RETURNS_SHIFT) & NUMBER_OF_RETURNS_MASK);
    }

    /// Returns the scan direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::point::Flags;
    /// use lasindex::point::ScanDirection;
    /// assert_eq!(ScanDirection::LeftToRight, Flags::from(0b0100_0000).scan_direction());
    /// ```
    pub fn scan_direction(&self) -> ScanDirection {
        if self.0 & SCAN_DIRECTION_MASK == SCAN_DIRECTION_MASK {
            ScanDirection::LeftToRight
        } else {
            ScanDirection::RightToLeft
        }
    }

    /// Sets the scan direction.
    pub fn set_scan_direction(&mut self, scan_direction: ScanDirection) {
        match scan_direction {
            ScanDirection::LeftToRight => self.0 |= SCAN_DIRECTION_MASK,
            ScanDirection::RightToLeft => self.0 &= !SCAN_DIRECTION_MASK,
        }
    }

    /// Is this point the edge of a flight line?
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::point::Flags;
    /// assert!(Flags::from(0b1000_0000).is_edge_of_flight_line());
    /// ```
    pub fn is_edge_of_flight_line(&self) -> bool {
        self.0 & EDGE_OF_FLIGHT_LINE_MASK == EDGE_OF_FLIGHT_LINE_MASK
    }

    /// Sets the edge of flight line bit.
    pub fn set_edge_of_flight_line(&mut self, is_edge_of_flight_line: bool) {
        if is_edge_of_flight_line {
            self.0 |= EDGE_OF_FLIGHT_LINE_MASK;
        } else {
            self.0 &= !EDGE_OF_FLIGHT_LINE_MASK;
        }
    }
}

impl From<u8> for Flags {
    fn from(n: u8) -> Flags {
        Flags(n)
    }
}

impl From<Flags> for u8 {
    fn from(flags: Flags) -> u8 {
        flags.0
    }
}

impl Point {
    /// Reads a raw point.
    ///
    /// Exactly `format.len()` bytes are consumed. A stream that ends partway through the record
    /// is [Error::EndOfStream].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::raw::Point;
    /// use lasindex::point::Format;
    ///
    /// let format = Format::new(1).unwrap();
    /// let cursor = Cursor::new(vec![0; 28]);
    /// let point = Point::read_from(cursor, &format).unwrap();
    /// assert_eq!(Some(0.), point.gps_time);
    ///
    /// let cursor = Cursor::new(vec![0; 27]);
    /// assert!(Point::read_from(cursor, &format).unwrap_err().is_end_of_stream());
    /// ```
    pub fn read_from<R: Read>(mut read: R, format: &Format) -> Result<Point> {
        let mut record = vec![0; usize::from(format.len())];
        read.read_exact(&mut record)
            .map_err(Error::from_record_read)?;
        let mut record = record.as_slice();
        let x = record.read_i32::<LittleEndian>()?;
        let y = record.read_i32::<LittleEndian>()?;
        let z = record.read_i32::<LittleEndian>()?;
        let intensity = record.read_u16::<LittleEndian>()?;
        let flags = Flags(record.read_u8()?);
        let classification = record.read_u8()?;
        let scan_angle_rank = record.read_i8()?;
        let user_data = record.read_u8()?;
        let point_source_id = record.read_u16::<LittleEndian>()?;
        let gps_time = if format.has_gps_time {
            Some(record.read_f64::<LittleEndian>()?)
        } else {
            None
        };
        let color = if format.has_color {
            let red = record.read_u16::<LittleEndian>()?;
            let green = record.read_u16::<LittleEndian>()?;
            let blue = record.read_u16::<LittleEndian>()?;
            Some(Color { red, green, blue })
        } else {
            None
        };
        Ok(Point {
            x,
            y,
            z,
            intensity,
            flags,
            classification,
            scan_angle_rank,
            user_data,
            point_source_id,
            gps_time,
            color,
            extra_bytes: record.to_vec(),
        })
    }

    /// Writes a raw point.
    ///
    /// Fields the format doesn't have are skipped, missing fields the format does have are written
    /// as zeros, and the extra bytes are padded or truncated to the format's count.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::raw::Point;
    /// use lasindex::point::Format;
    ///
    /// let mut bytes = Vec::new();
    /// Point::default().write_to(&mut bytes, &Format::new(3).unwrap()).unwrap();
    /// assert_eq!(34, bytes.len());
    /// ```
    pub fn write_to<W: Write>(&self, mut write: W, format: &Format) -> Result<()> {
        write.write_i32::<LittleEndian>(self.x)?;
        write.write_i32::<LittleEndian>(self.y)?;
        write.write_i32::<LittleEndian>(self.z)?;
        write.write_u16::<LittleEndian>(self.intensity)?;
        write.write_u8(self.flags.0)?;
        write.write_u8(self.classification)?;
        write.write_i8(self.scan_angle_rank)?;
        write.write_u8(self.user_data)?;
        write.write_u16::<LittleEndian>(self.point_source_id)?;
        if format.has_gps_time {
            write.write_f64::<LittleEndian>(self.gps_time.unwrap_or(0.))?;
        }
        if format.has_color {
            let color = self.color.unwrap_or_default();
            write.write_u16::<LittleEndian>(color.red)?;
            write.write_u16::<LittleEndian>(color.green)?;
            write.write_u16::<LittleEndian>(color.blue)?;
        }
        let mut extra_bytes = self.extra_bytes.clone();
        extra_bytes.resize(usize::from(format.extra_bytes), 0);
        write.write_all(&extra_bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::io::Cursor;

    macro_rules! roundtrip {
        ($name:ident, $format:expr) => {
            mod $name {
                #[test]
                fn roundtrip() {
                    use super::*;

                    let mut format = Format::new($format).unwrap();
                    format.extra_bytes = 1;
                    let mut point = Point {
                        x: -1,
                        y: 2,
                        z: i32::MAX,
                        intensity: 42,
                        flags: Flags::from(0b1101_0010),
                        classification: 0b1010_0010,
                        scan_angle_rank: -90,
                        user_data: 7,
                        point_source_id: 65535,
                        extra_bytes: vec![42],
                        ..Default::default()
                    };
                    if format.has_gps_time {
                        point.gps_time = Some(1234.5);
                    }
                    if format.has_color {
                        point.color = Some(Color::new(1, 2, 3));
                    }
                    let mut cursor = Cursor::new(Vec::new());
                    point.write_to(&mut cursor, &format).unwrap();
                    assert_eq!(usize::from(format.len()), cursor.get_ref().len());
                    cursor.set_position(0);
                    assert_eq!(point, Point::read_from(cursor, &format).unwrap());
                }
            }
        };
    }

    roundtrip!(format_0, 0);
    roundtrip!(format_1, 1);
    roundtrip!(format_2, 2);
    roundtrip!(format_3, 3);

    fn random_point(rng: &mut StdRng, format: &Format) -> Point {
        Point {
            x: rng.r#gen(),
            y: rng.r#gen(),
            z: rng.r#gen(),
            intensity: rng.r#gen(),
            flags: Flags::from(rng.r#gen::<u8>()),
            classification: rng.r#gen(),
            scan_angle_rank: rng.gen_range(-90..=90),
            user_data: rng.r#gen(),
            point_source_id: rng.r#gen(),
            gps_time: format.has_gps_time.then(|| rng.gen_range(0.0..1e9)),
            color: format.has_color.then(|| Color::new(rng.r#gen(), rng.r#gen(), rng.r#gen())),
            extra_bytes: (0..format.extra_bytes).map(|_| rng.r#gen()).collect(),
        }
    }

    #[test]
    fn random_records_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        for n in 0..4 {
            for _ in 0..300 {
                let mut format = Format::new(n).unwrap();
                format.extra_bytes = rng.gen_range(0..4);
                let point = random_point(&mut rng, &format);
                let mut bytes = Vec::new();
                point.write_to(&mut bytes, &format).unwrap();
                assert_eq!(usize::from(format.len()), bytes.len());
                assert_eq!(point, Point::read_from(Cursor::new(bytes), &format).unwrap());
            }
        }
    }

    #[test]
    fn return_number() {
        let mut flags = Flags::default();
        for n in 0..8 {
            flags.set_return_number(n);
            assert_eq!(n, flags.return_number());
        }
        flags.set_return_number(8);
        assert_eq!(0, flags.return_number());
    }

    #[test]
    fn number_of_returns() {
        let mut flags = Flags::default();
        flags.set_number_of_returns(5);
        assert_eq!(0b0010_1000, u8::from(flags));
        assert_eq!(5, flags.number_of_returns());
        flags.set_number_of_returns(0b1111);
        assert_eq!(7, flags.number_of_returns());
        assert_eq!(0, flags.return_number());
    }

    #[test]
    fn fields_are_independent() {
        let mut flags = Flags::default();
        flags.set_return_number(2);
        flags.set_number_of_returns(3);
        flags.set_scan_direction(ScanDirection::LeftToRight);
        flags.set_edge_of_flight_line(true);
        assert_eq!(0b1101_1010, u8::from(flags));
        flags.set_scan_direction(ScanDirection::RightToLeft);
        flags.set_edge_of_flight_line(false);
        assert_eq!(2, flags.return_number());
        assert_eq!(3, flags.number_of_returns());
        assert_eq!(0b0001_1010, u8::from(flags));
    }

    #[test]
    fn missing_optional_fields_are_zeros() {
        let format = Format::new(3).unwrap();
        let mut bytes = Vec::new();
        Point::default().write_to(&mut bytes, &format).unwrap();
        let point = Point::read_from(Cursor::new(bytes), &format).unwrap();
        assert_eq!(Some(0.), point.gps_time);
        assert_eq!(Some(Color::default()), point.color);
    }

    #[test]
    fn truncated_record() {
        let format = Format::new(0).unwrap();
        let error = Point::read_from(Cursor::new(vec![0; 19]), &format).unwrap_err();
        assert!(error.is_end_of_stream());
    }
}
