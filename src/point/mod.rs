//! Three-dimensional points with additional attributes.

mod classification;
mod format;
mod scan_direction;

pub use self::classification::{CLASS_COUNT, CLASS_NAMES, Classification};
pub use self::format::Format;
pub use self::scan_direction::ScanDirection;

use crate::{Color, Error, Result, Transform, Vector, raw};

/// The largest value the three-bit return fields can hold.
pub const MAX_RETURN_NUMBER: u8 = 7;

/// The valid range of the scan angle rank, in degrees.
pub const SCAN_ANGLE_RANK_RANGE: std::ops::RangeInclusive<i8> = -90..=90;

/// A point is the basic unit of information in las data.
///
/// Coordinates are real-world values, with the header's scale and offset already applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Point {
    /// The x value of the point.
    pub x: f64,
    /// The y value of the point.
    pub y: f64,
    /// The z value of the point.
    pub z: f64,

    /// The integer representation of the pulse return magnitude.
    pub intensity: u16,

    /// The pulse return number for a given output pulse.
    ///
    /// Only values zero through seven fit in a point record.
    pub return_number: u8,

    /// The total number of returns for a given pulse.
    ///
    /// Only values zero through seven fit in a point record.
    pub number_of_returns: u8,

    /// The direction at which the scanner mirror was traveling at the time of the output pulse.
    pub scan_direction: ScanDirection,

    /// True if the point is at the end of a scan.
    pub is_edge_of_flight_line: bool,

    /// The ASPRS class and the synthetic, key-point, and withheld flags.
    pub classification: Classification,

    /// The angle, rounded to the nearest integer degree, at which the laser point was output.
    pub scan_angle_rank: i8,

    /// Free for the user's use.
    pub user_data: u8,

    /// The file from which this point originated.
    pub point_source_id: u16,

    /// The time at which the point was acquired.
    pub gps_time: Option<f64>,

    /// This point's color.
    pub color: Option<Color>,

    /// This point's extra bytes.
    pub extra_bytes: Vec<u8>,
}

impl Point {
    /// Creates a point from a raw point.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Point, raw};
    /// let raw_point = raw::Point {
    ///     x: 1,
    ///     y: 2,
    ///     z: 3,
    ///     ..Default::default()
    /// };
    /// let point = Point::new(raw_point, &Default::default());
    /// assert_eq!(0.03, point.z);
    /// ```
    pub fn new(raw_point: raw::Point, transforms: &Vector<Transform>) -> Point {
        Point {
            x: transforms.x.direct(raw_point.x),
            y: transforms.y.direct(raw_point.y),
            z: transforms.z.direct(raw_point.z),
            intensity: raw_point.intensity,
            return_number: raw_point.flags.return_number(),
            number_of_returns: raw_point.flags.number_of_returns(),
            scan_direction: raw_point.flags.scan_direction(),
            is_edge_of_flight_line: raw_point.flags.is_edge_of_flight_line(),
            classification: Classification::from(raw_point.classification),
            scan_angle_rank: raw_point.scan_angle_rank,
            user_data: raw_point.user_data,
            point_source_id: raw_point.point_source_id,
            gps_time: raw_point.gps_time,
            color: raw_point.color,
            extra_bytes: raw_point.extra_bytes,
        }
    }

    /// Creates a raw point from this point.
    ///
    /// Return fields wider than three bits are masked. Fails if a coordinate can't be represented
    /// with the transform.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Point, Transform, Vector};
    ///
    /// let point = Point { x: 0.03, return_number: 9, ..Default::default() };
    /// let raw_point = point.into_raw(&Default::default()).unwrap();
    /// assert_eq!(3, raw_point.x);
    /// assert_eq!(1, raw_point.flags.return_number());
    ///
    /// let point = Point { x: 1e12, ..Default::default() };
    /// assert!(point.into_raw(&Default::default()).is_err());
    /// ```
    pub fn into_raw(self, transforms: &Vector<Transform>) -> Result<raw::Point> {
        let mut flags = raw::point::Flags::default();
        flags.set_return_number(self.return_number);
        flags.set_number_of_returns(self.number_of_returns);
        flags.set_scan_direction(self.scan_direction);
        flags.set_edge_of_flight_line(self.is_edge_of_flight_line);
        Ok(raw::Point {
            x: transforms.x.inverse(self.x)?,
            y: transforms.y.inverse(self.y)?,
            z: transforms.z.inverse(self.z)?,
            intensity: self.intensity,
            flags,
            classification: u8::from(self.classification),
            scan_angle_rank: self.scan_angle_rank,
            user_data: self.user_data,
            point_source_id: self.point_source_id,
            gps_time: self.gps_time,
            color: self.color,
            extra_bytes: self.extra_bytes,
        })
    }

    /// Returns true if this point carries exactly the attributes of the format.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::point::Format;
    /// let mut point = Point::default();
    /// let format = Format::new(1).unwrap();
    /// assert!(!point.matches(&format));
    /// point.gps_time = Some(42.);
    /// assert!(point.matches(&format));
    /// ```
    pub fn matches(&self, format: &Format) -> bool {
        self.gps_time.is_some() == format.has_gps_time
            && self.color.is_some() == format.has_color
            && self.extra_bytes.len() == usize::from(format.extra_bytes)
    }

    /// Checks that every attribute is within its valid range.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// assert!(Point::default().validate().is_ok());
    /// let point = Point { scan_angle_rank: 91, ..Default::default() };
    /// assert!(point.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.return_number > MAX_RETURN_NUMBER {
            return Err(Error::InvalidReturnNumber(self.return_number));
        }
        if self.number_of_returns > MAX_RETURN_NUMBER {
            return Err(Error::InvalidNumberOfReturns(self.number_of_returns));
        }
        if !SCAN_ANGLE_RANK_RANGE.contains(&self.scan_angle_rank) {
            return Err(Error::InvalidScanAngleRank(self.scan_angle_rank));
        }
        if let Some(gps_time) = self.gps_time {
            if gps_time < 0. {
                return Err(Error::NegativeGpsTime(gps_time));
            }
        }
        Ok(())
    }

    /// Returns the scaled integer coordinates as they would be stored.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// let point = Point { x: 1., y: 2., z: 3., ..Default::default() };
    /// let raw = point.raw_coordinates(&Default::default()).unwrap();
    /// assert_eq!(100, raw.x);
    /// ```
    pub fn raw_coordinates(&self, transforms: &Vector<Transform>) -> Result<Vector<i32>> {
        Ok(Vector {
            x: transforms.x.inverse(self.x)?,
            y: transforms.y.inverse(self.y)?,
            z: transforms.z.inverse(self.z)?,
        })
    }

    /// Sets the coordinates from scaled integers.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Point, Vector};
    /// let mut point = Point::default();
    /// point.set_raw_coordinates(&Default::default(), Vector { x: 100, y: 200, z: 300 });
    /// assert_eq!(3., point.z);
    /// ```
    pub fn set_raw_coordinates(&mut self, transforms: &Vector<Transform>, raw: Vector<i32>) {
        self.x = transforms.x.direct(raw.x);
        self.y = transforms.y.direct(raw.y);
        self.z = transforms.z.direct(raw.z);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transforms() -> Vector<Transform> {
        Vector::splat(Transform {
            scale: 0.01,
            offset: 100.,
        })
    }

    #[test]
    fn raw_roundtrip() {
        let raw_point = raw::Point {
            x: -5,
            y: 10,
            z: 20,
            intensity: 3,
            flags: raw::point::Flags::from(0b1101_0010),
            classification: 0b1100_0101,
            scan_angle_rank: -12,
            user_data: 4,
            point_source_id: 5,
            gps_time: Some(6.),
            color: Some(Color::new(7, 8, 9)),
            extra_bytes: vec![10],
        };
        let point = Point::new(raw_point.clone(), &transforms());
        assert_eq!(2, point.return_number);
        assert_eq!(2, point.number_of_returns);
        assert_eq!(ScanDirection::LeftToRight, point.scan_direction);
        assert!(point.is_edge_of_flight_line);
        assert_eq!(5, point.classification.class());
        assert!(point.classification.is_key_point());
        assert!(point.classification.is_withheld());
        assert_eq!(raw_point, point.into_raw(&transforms()).unwrap());
    }

    #[test]
    fn validate() {
        let ok = Point {
            return_number: 7,
            number_of_returns: 7,
            scan_angle_rank: -90,
            gps_time: Some(0.),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
        assert!(
            Point {
                return_number: 8,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            Point {
                number_of_returns: 8,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            Point {
                scan_angle_rank: -91,
                ..Default::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            Point {
                gps_time: Some(-1.),
                ..Default::default()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn matches_extra_bytes() {
        let mut format = Format::new(0).unwrap();
        format.extra_bytes = 2;
        let mut point = Point::default();
        assert!(!point.matches(&format));
        point.extra_bytes = vec![1, 2];
        assert!(point.matches(&format));
    }

    #[test]
    fn color_does_not_match() {
        let point = Point {
            color: Some(Color::default()),
            ..Default::default()
        };
        assert!(!point.matches(&Format::new(0).unwrap()));
        assert!(point.matches(&Format::new(2).unwrap()));
    }
}
