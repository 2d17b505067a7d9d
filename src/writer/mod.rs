//! Write las points.
//!
//! A `Writer` uses a `Header` for its configuration:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Header, Version, Writer};
//! let mut header = Header::default();
//! header.set_version(Version::new(1, 1)).unwrap();
//! let writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
//! ```
//!
//! The set of optional fields on the point format and the points must match exactly:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Color, Header, Point, Writer};
//! use lasindex::point::Format;
//!
//! let mut header = Header::default();
//! header.set_point_format(Format::new(1).unwrap());
//! let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
//!
//! let mut point = Point::default(); // default points don't have any optional attributes
//! assert!(writer.write_point(point.clone()).is_err());
//!
//! point.gps_time = Some(42.); // point format 1 requires gps time
//! writer.write_point(point.clone()).unwrap();
//!
//! point.color = Some(Color::new(1, 2, 3));
//! assert!(writer.write_point(point).is_err()); // the point's color would be lost
//! ```

mod las;

use crate::{Error, Header, Point, Result};
use log::{Level, log};
use std::{
    fs::File,
    io::{BufWriter, Cursor, Seek, SeekFrom},
    path::Path,
};

trait WritePoint<W: std::io::Write>: Send {
    fn write_point(&mut self, point: Point) -> Result<()>;
    fn write_points(&mut self, points: &[Point]) -> Result<()> {
        for point in points.iter().cloned() {
            self.write_point(point)?;
        }
        Ok(())
    }
    fn into_inner(self: Box<Self>) -> W;
    fn get_mut(&mut self) -> &mut W;
    fn header(&self) -> &Header;
    fn done(&mut self) -> Result<()>;
}

struct ClosedPointWriter;

impl<W: std::io::Write> WritePoint<W> for ClosedPointWriter {
    fn write_point(&mut self, _point: Point) -> Result<()> {
        unreachable!()
    }
    fn into_inner(self: Box<Self>) -> W {
        unreachable!()
    }
    fn get_mut(&mut self) -> &mut W {
        unreachable!()
    }
    fn header(&self) -> &Header {
        unreachable!()
    }
    fn done(&mut self) -> Result<()> {
        unreachable!()
    }
}

/// Writes las data.
///
/// The header needs to be re-written when the writer closes, with the final point count, returns,
/// and bounds. For convenience, this is done via the `Drop` implementation of the writer. If the
/// re-write fails during the drop, the error is logged and lost. Use `close` explicitly to see it.
///
/// ```
/// use lasindex::Writer;
/// {
///     let mut writer = Writer::default();
///     writer.close().unwrap();
/// } // <- `close` is not called again
/// ```
#[allow(missing_debug_implementations)]
pub struct Writer<W: 'static + std::io::Write + Seek + Send + Sync> {
    closed: bool,
    start: u64,
    point_writer: Box<dyn WritePoint<W> + Send>,
}

impl<W: 'static + std::io::Write + Seek + Send + Sync> Writer<W> {
    /// Creates a new writer.
    ///
    /// The header that is passed in will have its point count, returns histogram, and bounds
    /// zeroed. The header and its vlrs are written immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::Writer;
    /// let writer = Writer::new(Cursor::new(Vec::new()), Default::default());
    /// ```
    pub fn new(mut write: W, mut header: Header) -> Result<Writer<W>> {
        if header.point_format().is_compressed {
            return Err(Error::CompressionNotSupported);
        }
        let start = write.stream_position()?;
        header.clear();
        header.write_to(&mut write)?;
        Ok(Writer {
            closed: false,
            start,
            point_writer: Box::new(las::PointWriter::new(write, header)),
        })
    }

    /// Close this writer.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Writer;
    /// let mut writer = Writer::default();
    /// writer.close().unwrap();
    /// assert!(writer.close().is_err());
    /// ```
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedWriter);
        }
        self.point_writer.done()?;
        let end = self.point_writer.get_mut().stream_position()?;
        let _ = self
            .point_writer
            .get_mut()
            .seek(SeekFrom::Start(self.start))?;
        self.header()
            .into_raw()
            .and_then(|raw_header| raw_header.write_to(self.point_writer.get_mut()))?;
        let _ = self.point_writer.get_mut().seek(SeekFrom::Start(end))?;
        self.point_writer.done()?;
        self.closed = true;
        Ok(())
    }

    /// Returns a reference to this writer's header.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Writer;
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// assert_eq!(1, writer.header().number_of_points());
    /// ```
    pub fn header(&self) -> &Header {
        self.point_writer.header()
    }

    /// Writes a point.
    ///
    /// The point must carry exactly the attributes of the header's point format.
    pub fn write_point(&mut self, point: Point) -> Result<()> {
        self.check(&point)?;
        self.point_writer.write_point(point)
    }

    /// Writes all the points.
    ///
    /// Every point is checked before any is written.
    pub fn write_points(&mut self, points: &[Point]) -> Result<()> {
        for point in points {
            self.check(point)?;
        }
        let total = self.header().number_of_points() + u64::try_from(points.len())?;
        if total > u64::from(u32::MAX) {
            return Err(Error::TooManyPoints(total));
        }
        self.point_writer.write_points(points)
    }

    /// Closes this writer and returns its inner `Write`, seeked to the beginning of the las data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Writer;
    /// let writer = Writer::default();
    /// let cursor = writer.into_inner().unwrap();
    /// assert_eq!(0, cursor.position());
    /// ```
    pub fn into_inner(mut self) -> Result<W> {
        if !self.closed {
            self.close()?;
        }
        // Writer implements Drop, so the stream is swapped out rather than moved.
        let point_writer = std::mem::replace(&mut self.point_writer, Box::new(ClosedPointWriter));
        let mut inner = point_writer.into_inner();
        let _ = inner.seek(SeekFrom::Start(self.start))?;
        Ok(inner)
    }

    fn check(&self, point: &Point) -> Result<()> {
        if self.closed {
            return Err(Error::ClosedWriter);
        }
        if !point.matches(self.header().point_format()) {
            return Err(Error::PointAttributesDoNotMatch(
                *self.header().point_format(),
            ));
        }
        let number_of_points = self.header().number_of_points();
        if number_of_points >= u64::from(u32::MAX) {
            return Err(Error::TooManyPoints(number_of_points + 1));
        }
        Ok(())
    }
}

impl Writer<BufWriter<File>> {
    /// Creates a new writer for a path.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Writer;
    /// let writer = Writer::from_path("/dev/null", Default::default());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P, header: Header) -> Result<Writer<BufWriter<File>>> {
        File::create(path)
            .map_err(Error::from)
            .and_then(|file| Writer::new(BufWriter::new(file), header))
    }
}

impl Default for Writer<Cursor<Vec<u8>>> {
    fn default() -> Writer<Cursor<Vec<u8>>> {
        Writer::new(Cursor::new(Vec::new()), Header::default()).unwrap()
    }
}

impl<W: 'static + Seek + std::io::Write + Send + Sync> Drop for Writer<W> {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(err) = self.close() {
                log!(Level::Warn, "failed to close the writer: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Reader, Version, point::Format};
    use std::io::Cursor;

    fn writer(format: Format, version: Version) -> Writer<Cursor<Vec<u8>>> {
        let mut header = Header::default();
        header.set_point_format(format);
        header.set_version(version).unwrap();
        Writer::new(Cursor::new(Vec::new()), header).unwrap()
    }

    #[test]
    fn already_closed() {
        let mut writer = Writer::default();
        writer.close().unwrap();
        assert!(writer.close().is_err());
        assert!(writer.write_point(Default::default()).is_err());
    }

    #[test]
    fn missing_extra_bytes() {
        let format = Format {
            extra_bytes: 1,
            ..Default::default()
        };
        let mut writer = writer(format, Version::new(1, 2));
        assert!(writer.write_point(Default::default()).is_err());
    }

    #[test]
    fn missing_gps_time() {
        let format = Format::new(1).unwrap();
        let mut writer = writer(format, Version::new(1, 2));
        assert!(writer.write_point(Default::default()).is_err());
    }

    #[test]
    fn missing_color() {
        let format = Format::new(2).unwrap();
        let mut writer = writer(format, Version::new(1, 0));
        assert!(writer.write_point(Default::default()).is_err());
    }

    #[test]
    fn compressed() {
        let format = Format {
            is_compressed: true,
            ..Default::default()
        };
        let mut header = Header::default();
        header.set_point_format(format);
        assert!(matches!(
            Writer::new(Cursor::new(Vec::new()), header),
            Err(Error::CompressionNotSupported)
        ));
    }

    #[test]
    fn write_points_checks_first() {
        let mut writer = writer(Format::new(1).unwrap(), Version::new(1, 2));
        let good = Point {
            gps_time: Some(1.),
            ..Default::default()
        };
        assert!(writer.write_points(&[good.clone(), Point::default()]).is_err());
        assert_eq!(0, writer.header().number_of_points());
        writer.write_points(&[good.clone(), good]).unwrap();
        assert_eq!(2, writer.header().number_of_points());
    }

    #[test]
    fn header_is_rewritten() {
        let mut writer = Writer::default();
        writer
            .write_point(Point {
                x: 1.,
                y: 2.,
                z: 3.,
                return_number: 1,
                ..Default::default()
            })
            .unwrap();
        let reader = Reader::new(writer.into_inner().unwrap()).unwrap();
        let header = reader.header();
        assert_eq!(1, header.number_of_points());
        assert_eq!(Some(1), header.number_of_points_by_return(1));
        assert_eq!(2., header.bounds().max.y);
    }

    #[test]
    fn coordinate_out_of_range_is_not_counted() {
        let mut writer = Writer::default();
        assert!(
            writer
                .write_point(Point {
                    x: 1e12,
                    ..Default::default()
                })
                .is_err()
        );
        assert_eq!(0, writer.header().number_of_points());
    }

    #[test]
    fn write_not_at_start() {
        use byteorder::WriteBytesExt;

        let mut cursor = Cursor::new(Vec::new());
        cursor.write_u8(42).unwrap();
        let mut writer = Writer::new(cursor, Default::default()).unwrap();
        let point = Point::default();
        writer.write_point(point.clone()).unwrap();
        let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
        assert_eq!(point, reader.read_point().unwrap().unwrap());
    }
}
