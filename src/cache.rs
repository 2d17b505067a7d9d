//! A sliding window of decoded points over a reader.
//!
//! Point access is mostly near-sequential, e.g. the spans of positions returned by a spatial
//! query. A [CachedReader] keeps a window of decoded points, and refills the whole window starting
//! at the requested position whenever a read misses:
//!
//! ```
//! use lasindex::{CachedReader, Point, Reader, Writer};
//!
//! let mut writer = Writer::default();
//! for i in 0..10 {
//!     writer.write_point(Point { x: i as f64, ..Default::default() }).unwrap();
//! }
//! let reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! let mut cached = CachedReader::new(reader, 4);
//!
//! assert_eq!(2., cached.read_point_at(2).unwrap().x); // miss, caches 2 through 5
//! assert_eq!(5., cached.read_point_at(5).unwrap().x); // hit
//! assert_eq!(6., cached.read_point_at(6).unwrap().x); // miss, caches 6 through 9
//! assert_eq!((1, 2), (cached.hits(), cached.misses()));
//! ```

use crate::{Error, Header, Point, Reader, Result};
use log::{Level, log};

/// A reader that serves points from a window of decoded points.
///
/// Random reads ignore the reader's filters, as [Reader::read_point_at] does. Sequential reads
/// apply them.
#[allow(missing_debug_implementations)]
pub struct CachedReader {
    reader: Reader,
    capacity: usize,
    window: Vec<Option<Point>>,
    window_start: u64,
    cursor: u64,
    exhausted: bool,
    hits: u64,
    misses: u64,
}

impl CachedReader {
    /// Wraps a reader with a window of `capacity` points.
    ///
    /// A capacity of zero, or one larger than the number of points, caches the whole file.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{CachedReader, Reader, Writer};
    /// let reader = Reader::new(Writer::default().into_inner().unwrap()).unwrap();
    /// let cached = CachedReader::new(reader, 0);
    /// assert_eq!(0, cached.capacity());
    /// ```
    pub fn new(reader: Reader, capacity: usize) -> CachedReader {
        let number_of_points = reader.header().number_of_points();
        let capacity = match usize::try_from(number_of_points) {
            Ok(n) if capacity == 0 || capacity > n => n,
            _ => capacity,
        };
        CachedReader {
            reader,
            capacity,
            window: Vec::new(),
            window_start: 0,
            cursor: 0,
            exhausted: false,
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the header of the underlying reader.
    pub fn header(&self) -> &Header {
        self.reader.header()
    }

    /// Returns the number of points the window holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of reads served from the window.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the number of reads that refilled the window.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Reads the next point that passes the reader's filters.
    ///
    /// Like [Reader::read_point], the end of the points is reported once with `Ok(None)`, and
    /// reading again is [Error::ReadPastEnd].
    pub fn read_point(&mut self) -> Result<Option<Point>> {
        let count = self.header().number_of_points();
        if self.exhausted {
            return Err(Error::ReadPastEnd(count));
        }
        while self.cursor < count {
            let point = self.cached(self.cursor)?;
            self.cursor += 1;
            if self.reader.keep(&point) {
                return Ok(Some(point));
            }
        }
        self.exhausted = true;
        Ok(None)
    }

    /// Reads the point at the index, and moves the sequential cursor just past it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{CachedReader, Error, Reader, Writer};
    ///
    /// let mut writer = Writer::default();
    /// writer.write_point(Default::default()).unwrap();
    /// let reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    /// let mut cached = CachedReader::new(reader, 0);
    /// cached.read_point_at(0).unwrap();
    /// assert!(matches!(cached.read_point_at(1), Err(Error::PointIndexAtEnd(1))));
    /// assert!(cached.read_point().unwrap().is_none());
    /// ```
    pub fn read_point_at(&mut self, index: u64) -> Result<Point> {
        let count = self.header().number_of_points();
        if index == count {
            return Err(Error::PointIndexAtEnd(index));
        } else if index > count {
            return Err(Error::PointIndexOutOfRange { index, count });
        }
        let point = self.cached(index)?;
        self.cursor = index + 1;
        self.exhausted = false;
        Ok(point)
    }

    /// Moves the sequential cursor back to the first point.
    ///
    /// The window is kept.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.exhausted = false;
    }

    /// Returns the underlying reader.
    pub fn into_inner(self) -> Reader {
        self.reader
    }

    fn slot(&self, index: u64) -> Option<usize> {
        index
            .checked_sub(self.window_start)
            .and_then(|offset| usize::try_from(offset).ok())
            .filter(|&slot| slot < self.window.len())
    }

    fn cached(&mut self, index: u64) -> Result<Point> {
        if let Some(point) = self.slot(index).and_then(|slot| self.window[slot].clone()) {
            self.hits += 1;
            return Ok(point);
        }
        self.misses += 1;
        self.fill(index)?;
        self.slot(index)
            .and_then(|slot| self.window[slot].clone())
            .ok_or_else(|| {
                Error::EndOfStream(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("point {} could not be read into the cache", index),
                ))
            })
    }

    fn fill(&mut self, start: u64) -> Result<()> {
        let count = self.header().number_of_points();
        let len = usize::try_from(count - start).map_or(self.capacity, |n| n.min(self.capacity));
        self.window.clear();
        self.window.resize(len, None);
        self.window_start = start;
        self.reader.seek(start)?;
        for slot in 0..len {
            match self.reader.next_record() {
                Ok(Some(point)) => self.window[slot] = Some(point),
                Ok(None) => break,
                Err(err) if err.is_end_of_stream() => {
                    log!(
                        Level::Warn,
                        "cache refill at point {} stopped after {} of {} points: {}",
                        start,
                        slot,
                        len,
                        err
                    );
                    break;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Writer;
    use std::io::Cursor;

    fn bytes(n: usize) -> Vec<u8> {
        let mut writer = Writer::default();
        for i in 0..n {
            writer
                .write_point(Point {
                    x: i as f64,
                    intensity: i as u16,
                    ..Default::default()
                })
                .unwrap();
        }
        writer.into_inner().unwrap().into_inner()
    }

    fn cached(n: usize, capacity: usize) -> CachedReader {
        CachedReader::new(Reader::new(Cursor::new(bytes(n))).unwrap(), capacity)
    }

    #[test]
    fn capacity() {
        assert_eq!(10, cached(10, 0).capacity());
        assert_eq!(10, cached(10, 11).capacity());
        assert_eq!(3, cached(10, 3).capacity());
    }

    #[test]
    fn sequential() {
        let mut cached = cached(10, 3);
        for i in 0..10 {
            assert_eq!(i as f64, cached.read_point().unwrap().unwrap().x);
        }
        assert!(cached.read_point().unwrap().is_none());
        assert!(matches!(cached.read_point(), Err(Error::ReadPastEnd(10))));
        assert_eq!(4, cached.misses());
        assert_eq!(6, cached.hits());
    }

    #[test]
    fn miss_at_window_end() {
        let mut cached = cached(10, 4);
        let _ = cached.read_point_at(0).unwrap();
        assert_eq!(4., cached.read_point_at(4).unwrap().x);
        assert_eq!(2, cached.misses());
        assert_eq!(5., cached.read_point_at(5).unwrap().x);
        assert_eq!(1, cached.hits());
    }

    #[test]
    fn miss_before_window_start() {
        let mut cached = cached(10, 4);
        let _ = cached.read_point_at(5).unwrap();
        assert_eq!(4., cached.read_point_at(4).unwrap().x);
        assert_eq!(5., cached.read_point_at(5).unwrap().x);
        assert_eq!(2, cached.misses());
        assert_eq!(1, cached.hits());
    }

    #[test]
    fn last_window_is_short() {
        let mut cached = cached(10, 4);
        assert_eq!(8., cached.read_point_at(8).unwrap().x);
        assert_eq!(9., cached.read_point_at(9).unwrap().x);
        assert!(cached.read_point().unwrap().is_none());
        assert_eq!(1, cached.misses());
    }

    #[test]
    fn out_of_range() {
        let mut cached = cached(3, 2);
        assert!(matches!(cached.read_point_at(3), Err(Error::PointIndexAtEnd(3))));
        assert!(matches!(
            cached.read_point_at(4),
            Err(Error::PointIndexOutOfRange { index: 4, count: 3 })
        ));
    }

    #[test]
    fn truncated_stream() {
        let mut bytes = bytes(4);
        bytes.truncate(bytes.len() - 30);
        let reader = Reader::new(Cursor::new(bytes)).unwrap();
        let mut cached = CachedReader::new(reader, 0);
        assert_eq!(1., cached.read_point_at(1).unwrap().x);
        assert!(cached.read_point_at(2).unwrap_err().is_end_of_stream());
        assert_eq!(0., cached.read_point_at(0).unwrap().x);
    }

    #[test]
    fn sequential_reads_apply_filters() {
        let mut reader = Reader::new(Cursor::new(bytes(6))).unwrap();
        reader.add_filter(|point: &Point| point.intensity % 2 == 1);
        let mut cached = CachedReader::new(reader, 2);
        let mut xs = Vec::new();
        while let Some(point) = cached.read_point().unwrap() {
            xs.push(point.x);
        }
        assert_eq!(vec![1., 3., 5.], xs);
        assert_eq!(0., cached.read_point_at(0).unwrap().x);
    }
}
