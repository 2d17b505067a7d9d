//! Read las points.
//!
//! If you're reading any significant number of points, you'll want to make sure you're using a
//! `BufRead` instead of just a `Read`. `Reader::from_path` does this for you.
//!
//! A reader walks through three states. Right after the header is read it is in
//! [ReaderState::HeaderRead]. The first read seeks to the start of the point data and moves it to
//! [ReaderState::Streaming]. Reading past the last point reports the end once, with `Ok(None)`,
//! and moves it to [ReaderState::Exhausted]; reading again is an error until the reader is reset or
//! seeked:
//!
//! ```
//! use lasindex::{Reader, ReaderState, Writer};
//!
//! let mut writer = Writer::default();
//! writer.write_point(Default::default()).unwrap();
//! let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! assert_eq!(ReaderState::HeaderRead, reader.state());
//!
//! let point = reader.read_point().unwrap().unwrap();
//! assert_eq!(ReaderState::Streaming, reader.state());
//! assert!(reader.read_point().unwrap().is_none());
//! assert_eq!(ReaderState::Exhausted, reader.state());
//! assert!(reader.read_point().is_err());
//!
//! reader.reset().unwrap();
//! assert_eq!(point, reader.read_point().unwrap().unwrap());
//! ```
//!
//! `Reader::points` returns an iterator over `Result<Point>`:
//!
//! ```
//! use lasindex::{Reader, Writer};
//!
//! let mut writer = Writer::default();
//! writer.write_point(Default::default()).unwrap();
//! let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! let points = reader.points().collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(1, points.len());
//! ```
//!
//! # Compression
//!
//! Compressed point data is recognized by the high bit of the point format id, and refused:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Error, Header, Reader};
//!
//! let mut bytes = Vec::new();
//! Header::default().write_to(&mut bytes).unwrap();
//! bytes[104] |= 0x80;
//! assert!(matches!(Reader::new(Cursor::new(bytes)), Err(Error::CompressionNotSupported)));
//! ```

mod las;

use crate::{
    Error, Header, Point, Result,
    filter::Filter,
    srs::{Reproject, SpatialReference},
};
use std::{
    fs::File,
    io::{BufReader, Seek},
    path::Path,
};

trait ReadPoints {
    fn read_point(&mut self) -> Result<Option<Point>>;
    fn read_point_at(&mut self, index: u64) -> Result<Point>;
    fn seek(&mut self, index: u64) -> Result<()>;
    fn record_count(&mut self) -> Result<u64>;
    fn position(&self) -> u64;
    fn header(&self) -> &Header;
}

/// Where a reader is in its walk through the points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    /// The header has been read, and no point has been read yet.
    HeaderRead,
    /// Points are being read sequentially.
    Streaming,
    /// The end of the points has been reported.
    Exhausted,
}

/// An iterator over of the points in a `Reader`.
///
/// This struct is generally created by calling `points()` on `Reader`.
#[allow(missing_debug_implementations)]
pub struct PointIterator<'a> {
    reader: &'a mut Reader,
}

impl Iterator for PointIterator<'_> {
    type Item = Result<Point>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.state == ReaderState::Exhausted {
            None
        } else {
            self.reader.read_point().transpose()
        }
    }
}

/// Reads las data.
#[allow(missing_debug_implementations)]
pub struct Reader {
    point_reader: Box<dyn ReadPoints>,
    state: ReaderState,
    filters: Vec<Box<dyn Filter>>,
    input_srs: SpatialReference,
    output: Option<(SpatialReference, Box<dyn Reproject>)>,
}

impl Reader {
    /// Creates a new reader.
    ///
    /// This does *not* wrap the `Read` in a `BufRead`, so if you're concerned
    /// about performance you should do that wrapping yourself (or use
    /// `from_path`).
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Reader, Writer};
    /// let cursor = Writer::default().into_inner().unwrap();
    /// let reader = Reader::new(cursor).unwrap();
    /// ```
    pub fn new<R: std::io::Read + Seek + Send + Sync + 'static>(mut read: R) -> Result<Reader> {
        let header = Header::new(&mut read)?;
        if header.point_format().is_compressed {
            return Err(Error::CompressionNotSupported);
        }
        Ok(Reader {
            input_srs: header.srs(),
            point_reader: Box::new(las::PointReader::new(read, header)?),
            state: ReaderState::HeaderRead,
            filters: Vec::new(),
            output: None,
        })
    }

    /// Creates a new reader from a path.
    ///
    /// The underlying `File` is wrapped in a `BufReader` for performance reasons.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Reader;
    /// assert!(Reader::from_path("not/a/file.las").is_err());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Reader> {
        File::open(path)
            .map_err(Error::from)
            .and_then(|file| Reader::new(BufReader::new(file)))
    }

    /// Returns a reference to this reader's header.
    pub fn header(&self) -> &Header {
        self.point_reader.header()
    }

    /// Returns this reader's state.
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// Returns the index of the next point a sequential read will look at.
    pub fn position(&self) -> u64 {
        self.point_reader.position()
    }

    /// Reads the next point that passes every filter.
    ///
    /// Returns `Ok(None)` the first time the end of the points is reached, and
    /// [Error::ReadPastEnd] after that.
    pub fn read_point(&mut self) -> Result<Option<Point>> {
        if self.state == ReaderState::Exhausted {
            return Err(Error::ReadPastEnd(self.header().number_of_points()));
        }
        loop {
            match self.next_record()? {
                Some(point) => {
                    if self.keep(&point) {
                        return Ok(Some(point));
                    }
                }
                None => {
                    self.state = ReaderState::Exhausted;
                    return Ok(None);
                }
            }
        }
    }

    /// Reads the point at the index, without moving the sequential cursor.
    ///
    /// Filters are not applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Error, Point, Reader, Writer};
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Point::default()).unwrap();
    /// writer.write_point(Point { x: 1., ..Default::default() }).unwrap();
    /// let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    ///
    /// assert_eq!(1., reader.read_point_at(1).unwrap().x);
    /// assert_eq!(0., reader.read_point().unwrap().unwrap().x);
    /// assert!(matches!(reader.read_point_at(2), Err(Error::PointIndexAtEnd(2))));
    /// assert!(matches!(reader.read_point_at(3), Err(Error::PointIndexOutOfRange { .. })));
    /// ```
    pub fn read_point_at(&mut self, index: u64) -> Result<Point> {
        let count = self.header().number_of_points();
        if index == count {
            return Err(Error::PointIndexAtEnd(index));
        } else if index > count {
            return Err(Error::PointIndexOutOfRange { index, count });
        }
        let mut point = self.point_reader.read_point_at(index)?;
        self.reproject(&mut point)?;
        Ok(point)
    }

    /// Reads up to `n` points into a vector.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Reader, Writer};
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    /// assert_eq!(1, reader.read_points(10).unwrap().len());
    /// ```
    pub fn read_points(&mut self, n: u64) -> Result<Vec<Point>> {
        let remaining = self.header().number_of_points().saturating_sub(self.position());
        let mut points = Vec::with_capacity(n.min(remaining).try_into()?);
        let _ = self.read_points_into(n, &mut points)?;
        Ok(points)
    }

    /// Reads up to `n` points into a provided vector, returning the number of points read.
    pub fn read_points_into(&mut self, n: u64, points: &mut Vec<Point>) -> Result<u64> {
        let mut count = 0;
        while count < n && self.state != ReaderState::Exhausted {
            match self.read_point()? {
                Some(point) => {
                    points.push(point);
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    /// Reads all remaining points into a vector, returning the number of points read.
    pub fn read_all_points_into(&mut self, points: &mut Vec<Point>) -> Result<u64> {
        self.read_points_into(u64::MAX, points)
    }

    /// Seeks to the given point number, zero-indexed.
    ///
    /// Seeking to the point count is allowed, and the next read reports the end of the points.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Reader, Writer};
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    /// reader.seek(1).unwrap();
    /// assert!(reader.read_point().unwrap().is_none());
    /// assert!(reader.seek(2).is_err());
    /// ```
    pub fn seek(&mut self, index: u64) -> Result<()> {
        let count = self.header().number_of_points();
        if index > count {
            return Err(Error::PointIndexOutOfRange { index, count });
        }
        self.point_reader.seek(index)?;
        self.state = ReaderState::Streaming;
        Ok(())
    }

    /// Moves back to the first point.
    pub fn reset(&mut self) -> Result<()> {
        self.point_reader.seek(0)?;
        self.state = ReaderState::HeaderRead;
        Ok(())
    }

    /// Returns an iterator over this reader's remaining points.
    pub fn points(&mut self) -> PointIterator<'_> {
        PointIterator { reader: self }
    }

    /// Checks that the stream holds as many complete point records as the header says.
    ///
    /// The next sequential read picks up where it left off.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io::Cursor;
    /// use lasindex::{Error, Reader, Writer};
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// let mut bytes = writer.into_inner().unwrap().into_inner();
    /// let mut reader = Reader::new(Cursor::new(bytes.clone())).unwrap();
    /// reader.verify_point_count().unwrap();
    ///
    /// bytes.truncate(bytes.len() - 1);
    /// let mut reader = Reader::new(Cursor::new(bytes)).unwrap();
    /// assert!(matches!(reader.verify_point_count(), Err(Error::PointCountMismatch { header: 1, actual: 0 })));
    /// ```
    pub fn verify_point_count(&mut self) -> Result<()> {
        let header = self.header().number_of_points();
        let actual = self.point_reader.record_count()?;
        if header == actual {
            Ok(())
        } else {
            Err(Error::PointCountMismatch { header, actual })
        }
    }

    /// Adds a filter for sequential reads.
    ///
    /// A point is returned only if every filter keeps it.
    pub fn add_filter<F: Filter + 'static>(&mut self, filter: F) {
        self.filters.push(Box::new(filter));
    }

    /// Replaces all filters.
    pub fn set_filters(&mut self, filters: Vec<Box<dyn Filter>>) {
        self.filters = filters;
    }

    /// Returns the spatial reference system the points are read in.
    ///
    /// Defaults to the header's.
    pub fn input_srs(&self) -> &SpatialReference {
        &self.input_srs
    }

    /// Overrides the spatial reference system the points are read in.
    pub fn set_input_srs(&mut self, srs: SpatialReference) {
        self.input_srs = srs;
    }

    /// Returns the spatial reference system points are reprojected into, if one is set.
    pub fn output_srs(&self) -> Option<&SpatialReference> {
        self.output.as_ref().map(|(srs, _)| srs)
    }

    /// Reprojects every point read into `srs`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Point, Reader, Result, Writer};
    /// use lasindex::srs::SpatialReference;
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    /// reader.set_output_srs(
    ///     SpatialReference::default().with_wkt("EPSG:4326"),
    ///     |_: &SpatialReference, _: &SpatialReference, point: &mut Point| -> Result<()> {
    ///         point.z = 42.;
    ///         Ok(())
    ///     },
    /// );
    /// assert_eq!(42., reader.read_point().unwrap().unwrap().z);
    /// ```
    pub fn set_output_srs<P: Reproject + 'static>(&mut self, srs: SpatialReference, reproject: P) {
        self.output = Some((srs, Box::new(reproject)));
    }

    /// Stops reprojecting points.
    pub fn clear_output_srs(&mut self) {
        self.output = None;
    }

    pub(crate) fn next_record(&mut self) -> Result<Option<Point>> {
        match self.point_reader.read_point()? {
            Some(mut point) => {
                self.state = ReaderState::Streaming;
                self.reproject(&mut point)?;
                Ok(Some(point))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn keep(&mut self, point: &Point) -> bool {
        self.filters.iter_mut().all(|filter| filter.keep(point))
    }

    fn reproject(&mut self, point: &mut Point) -> Result<()> {
        if let Some((output_srs, reproject)) = self.output.as_mut() {
            reproject.reproject(&self.input_srs, output_srs, point)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Writer, filter::ThinFilter};

    fn reader(n: usize) -> Reader {
        let mut writer = Writer::default();
        for i in 0..n {
            writer
                .write_point(Point {
                    x: i as f64,
                    ..Default::default()
                })
                .unwrap();
        }
        Reader::new(writer.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn seek() {
        let mut reader = reader(2);
        reader.seek(1).unwrap();
        assert_eq!(1., reader.read_point().unwrap().unwrap().x);
        assert!(reader.read_point().unwrap().is_none());
    }

    #[test]
    fn seek_after_exhausted() {
        let mut reader = reader(2);
        assert_eq!(2, reader.points().count());
        assert_eq!(ReaderState::Exhausted, reader.state());
        reader.seek(0).unwrap();
        assert_eq!(0., reader.read_point().unwrap().unwrap().x);
    }

    #[test]
    fn read_past_end() {
        let mut reader = reader(0);
        assert!(reader.read_point().unwrap().is_none());
        assert!(matches!(reader.read_point(), Err(Error::ReadPastEnd(0))));
    }

    #[test]
    fn read_point_at_keeps_cursor() {
        let mut reader = reader(3);
        assert_eq!(0., reader.read_point().unwrap().unwrap().x);
        assert_eq!(2., reader.read_point_at(2).unwrap().x);
        assert_eq!(1, reader.position());
        assert_eq!(1., reader.read_point().unwrap().unwrap().x);
    }

    #[test]
    fn read_points_stops_at_end() {
        let mut reader = reader(3);
        assert_eq!(2, reader.read_points(2).unwrap().len());
        assert_eq!(1, reader.read_points(2).unwrap().len());
        assert!(reader.read_points(2).unwrap().is_empty());
    }

    #[test]
    fn filters_apply_to_sequential_reads() {
        let mut reader = reader(5);
        reader.add_filter(ThinFilter::new(2));
        let xs = reader
            .points()
            .map(|point| point.unwrap().x)
            .collect::<Vec<_>>();
        assert_eq!(vec![0., 2., 4.], xs);
        assert_eq!(1., reader.read_point_at(1).unwrap().x);
    }

    #[test]
    fn set_filters_replaces() {
        let mut reader = reader(3);
        reader.add_filter(|_: &Point| false);
        reader.set_filters(Vec::new());
        assert_eq!(3, reader.points().count());
    }

    #[test]
    fn reprojection_sees_both_references() {
        let mut reader = reader(1);
        reader.set_input_srs(SpatialReference::default().with_wkt("from"));
        reader.set_output_srs(
            SpatialReference::default().with_wkt("to"),
            |from: &SpatialReference, to: &SpatialReference, point: &mut Point| -> Result<()> {
                assert_eq!(Some("from"), from.wkt());
                assert_eq!(Some("to"), to.wkt());
                point.y = 7.;
                Ok(())
            },
        );
        assert_eq!(7., reader.read_point_at(0).unwrap().y);
        reader.clear_output_srs();
        assert_eq!(0., reader.read_point().unwrap().unwrap().y);
    }

    #[test]
    fn reprojection_errors_propagate() {
        let mut reader = reader(1);
        reader.set_output_srs(
            SpatialReference::default(),
            |_: &SpatialReference, _: &SpatialReference, _: &mut Point| -> Result<()> {
                Err(Error::Reprojection("no grid".to_string()))
            },
        );
        assert!(matches!(reader.read_point(), Err(Error::Reprojection(_))));
    }
}
