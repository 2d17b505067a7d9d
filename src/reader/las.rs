use super::ReadPoints;
use crate::{Header, Point, Result, raw};
use std::io::{Read, Seek, SeekFrom};

pub(crate) struct PointReader<R: Read + Seek> {
    read: R,
    header: Header,
    index: u64,
    start: u64,
    positioned: bool,
}

impl<R: Read + Seek> PointReader<R> {
    pub(crate) fn new(mut read: R, header: Header) -> Result<PointReader<R>> {
        Ok(PointReader {
            start: read.stream_position()?,
            read,
            header,
            index: 0,
            positioned: false,
        })
    }

    fn record_offset(&self, index: u64) -> u64 {
        self.start + index * u64::from(self.header.point_format().len())
    }

    fn read_record(&mut self) -> Result<Point> {
        raw::Point::read_from(&mut self.read, self.header.point_format())
            .map(|raw_point| Point::new(raw_point, self.header.transforms()))
    }
}

impl<R: Read + Seek> ReadPoints for PointReader<R> {
    fn read_point(&mut self) -> Result<Option<Point>> {
        if self.index >= self.header.number_of_points() {
            return Ok(None);
        }
        if !self.positioned {
            let _ = self
                .read
                .seek(SeekFrom::Start(self.record_offset(self.index)))?;
            self.positioned = true;
        }
        match self.read_record() {
            Ok(point) => {
                self.index += 1;
                Ok(Some(point))
            }
            Err(err) => {
                self.positioned = false;
                Err(err)
            }
        }
    }

    fn read_point_at(&mut self, index: u64) -> Result<Point> {
        self.positioned = false;
        let _ = self.read.seek(SeekFrom::Start(self.record_offset(index)))?;
        self.read_record()
    }

    fn seek(&mut self, index: u64) -> Result<()> {
        self.index = index;
        let _ = self.read.seek(SeekFrom::Start(self.record_offset(index)))?;
        self.positioned = true;
        Ok(())
    }

    fn record_count(&mut self) -> Result<u64> {
        self.positioned = false;
        let end = self.read.seek(SeekFrom::End(0))?;
        Ok(end.saturating_sub(self.start) / u64::from(self.header.point_format().len()))
    }

    fn position(&self) -> u64 {
        self.index
    }

    fn header(&self) -> &Header {
        &self.header
    }
}
