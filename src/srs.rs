//! Spatial reference systems.
//!
//! Las 1.0 through 1.2 store the spatial reference of the points as GeoTIFF keys, spread over
//! three projection vlrs: the key directory, and optional double and ascii parameter records. This
//! library does not interpret coordinate systems, it carries those records from a header to a
//! [SpatialReference] and back:
//!
//! ```
//! use lasindex::{Header, Vlr};
//! use lasindex::srs::SpatialReference;
//!
//! let mut source = Header::default();
//! source.add_vlr(Vlr {
//!     user_id: "LASF_Projection".to_string(),
//!     record_id: 34735,
//!     data: vec![1, 0, 1, 0, 0, 0, 0, 0],
//!     ..Default::default()
//! });
//! let srs = source.srs();
//!
//! let mut destination = Header::default();
//! destination.set_srs(&srs);
//! assert_eq!(1, destination.number_of_vlrs());
//! ```
//!
//! Reprojection math lives outside this library. Implement [Reproject] and hand it to
//! [Reader::set_output_srs](crate::Reader::set_output_srs).

use crate::{Error, Header, Point, Result, Vlr, vlr};
use byteorder::{LittleEndian, ReadBytesExt};
use log::{Level, log};
use std::io::{Cursor, Seek, SeekFrom};

const EPSG_RANGE: std::ops::RangeInclusive<u16> = 1024..=(i16::MAX as u16);
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;
const VERTICAL_CS_TYPE_KEY: u16 = 4096;

/// A spatial reference system, held as the GeoTIFF key vlrs that describe it.
///
/// An optional well known text string can ride along for a [Reproject] implementation. It is never
/// written to las data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpatialReference {
    vlrs: Vec<Vlr>,
    wkt: Option<String>,
}

/// Horizontal and optional vertical EPSG codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Epsg {
    /// The horizontal coordinate system.
    pub horizontal: u16,

    /// The vertical coordinate system, if there is one.
    pub vertical: Option<u16>,
}

/// The decoded GeoTIFF key directory.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoKeys {
    /// The key entries, in directory order.
    pub entries: Vec<GeoKeyEntry>,
}

/// A single GeoTIFF key.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoKeyEntry {
    /// The key id.
    pub id: u16,

    /// The value of the key.
    pub value: GeoKeyValue,
}

/// The value of a GeoTIFF key, which lives in the directory or in one of the parameter records.
#[derive(Clone, Debug, PartialEq)]
pub enum GeoKeyValue {
    /// A short stored directly in the directory.
    Short(u16),
    /// Values from the double parameters record.
    Doubles(Vec<f64>),
    /// A string from the ascii parameters record.
    Ascii(String),
}

/// Transforms points from one spatial reference system to another.
///
/// Closures with the same signature implement this trait:
///
/// ```
/// use lasindex::srs::{Reproject, SpatialReference};
/// use lasindex::{Point, Result};
///
/// let mut shift = |_: &SpatialReference, _: &SpatialReference, point: &mut Point| -> Result<()> {
///     point.x += 100.;
///     Ok(())
/// };
/// let mut point = Point::default();
/// let srs = SpatialReference::default();
/// shift.reproject(&srs, &srs, &mut point).unwrap();
/// assert_eq!(100., point.x);
/// ```
pub trait Reproject: Send {
    /// Moves the point from the `from` reference system into the `to` reference system.
    fn reproject(
        &mut self,
        from: &SpatialReference,
        to: &SpatialReference,
        point: &mut Point,
    ) -> Result<()>;
}

impl<F> Reproject for F
where
    F: FnMut(&SpatialReference, &SpatialReference, &mut Point) -> Result<()> + Send,
{
    fn reproject(
        &mut self,
        from: &SpatialReference,
        to: &SpatialReference,
        point: &mut Point,
    ) -> Result<()> {
        self(from, to, point)
    }
}

impl SpatialReference {
    /// Creates a spatial reference from the GeoTIFF key vlrs among `vlrs`.
    ///
    /// Any other vlrs are ignored.
    pub fn from_vlrs<'a, I: IntoIterator<Item = &'a Vlr>>(vlrs: I) -> SpatialReference {
        SpatialReference {
            vlrs: vlrs
                .into_iter()
                .filter(|vlr| vlr.is_geokey())
                .cloned()
                .collect(),
            wkt: None,
        }
    }

    /// Attaches a well known text description.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::srs::SpatialReference;
    /// let srs = SpatialReference::default().with_wkt("GEOGCS[\"WGS 84\"]");
    /// assert_eq!(Some("GEOGCS[\"WGS 84\"]"), srs.wkt());
    /// ```
    pub fn with_wkt<S: Into<String>>(mut self, wkt: S) -> SpatialReference {
        self.wkt = Some(wkt.into());
        self
    }

    /// Returns the well known text description, if one was attached.
    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// Returns the GeoTIFF key vlrs.
    pub fn vlrs(&self) -> &[Vlr] {
        &self.vlrs
    }

    /// Returns true if there are no GeoTIFF keys and no well known text.
    pub fn is_empty(&self) -> bool {
        self.vlrs.is_empty() && self.wkt.is_none()
    }

    /// Decodes the GeoTIFF key directory, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vlr;
    /// use lasindex::srs::{GeoKeyValue, SpatialReference};
    ///
    /// let mut data = Vec::new();
    /// for n in [1u16, 1, 0, 1, 3072, 0, 1, 32611] {
    ///     data.extend_from_slice(&n.to_le_bytes());
    /// }
    /// let vlr = Vlr { user_id: "LASF_Projection".to_string(), record_id: 34735, data, ..Default::default() };
    /// let srs = SpatialReference::from_vlrs(&[vlr]);
    /// let geokeys = srs.geokeys().unwrap().unwrap();
    /// assert_eq!(GeoKeyValue::Short(32611), geokeys.entries[0].value);
    /// ```
    pub fn geokeys(&self) -> Result<Option<GeoKeys>> {
        let data = |record_id| {
            self.vlrs
                .iter()
                .find(|vlr| vlr.record_id == record_id)
                .map(|vlr| vlr.data.as_slice())
        };
        match data(vlr::GEO_KEY_DIRECTORY_RECORD_ID) {
            Some(directory) => GeoKeys::read_from(
                directory,
                data(vlr::GEO_DOUBLE_PARAMS_RECORD_ID),
                data(vlr::GEO_ASCII_PARAMS_RECORD_ID),
            )
            .map(Some),
            None => {
                if !self.vlrs.is_empty() {
                    log!(
                        Level::Warn,
                        "GeoTIFF parameter records found without a key directory"
                    );
                }
                Ok(None)
            }
        }
    }

    /// Returns the EPSG codes named by the GeoTIFF keys.
    ///
    /// Returns `None` if there are no keys, or if they don't name a horizontal system in the EPSG
    /// range.
    pub fn epsg(&self) -> Result<Option<Epsg>> {
        let Some(geokeys) = self.geokeys()? else {
            return Ok(None);
        };
        let mut horizontal = None;
        let mut vertical = None;
        for entry in geokeys.entries {
            if let GeoKeyValue::Short(code) = entry.value {
                match entry.id {
                    GEOGRAPHIC_TYPE_KEY | PROJECTED_CS_TYPE_KEY => horizontal = Some(code),
                    VERTICAL_CS_TYPE_KEY => vertical = Some(code),
                    _ => {}
                }
            }
        }
        Ok(horizontal
            .filter(|code| EPSG_RANGE.contains(code))
            .map(|horizontal| Epsg {
                horizontal,
                vertical: vertical.filter(|code| EPSG_RANGE.contains(code)),
            }))
    }
}

impl GeoKeys {
    fn read_from(directory: &[u8], doubles: Option<&[u8]>, ascii: Option<&[u8]>) -> Result<GeoKeys> {
        let mut directory = Cursor::new(directory);
        let _ = directory.read_u16::<LittleEndian>()?; // key directory version
        let _ = directory.read_u16::<LittleEndian>()?; // key revision
        let _ = directory.read_u16::<LittleEndian>()?; // minor revision
        let number_of_keys = directory.read_u16::<LittleEndian>()?;
        let remaining = directory.get_ref().len() as u64 - directory.position();
        if remaining < u64::from(number_of_keys) * 8 {
            log!(
                Level::Warn,
                "GeoTIFF key directory declares {} keys, but only has room for {}",
                number_of_keys,
                remaining / 8
            );
        }
        let mut entries = Vec::with_capacity(usize::from(number_of_keys));
        for _ in 0..number_of_keys {
            let id = directory.read_u16::<LittleEndian>()?;
            let location = directory.read_u16::<LittleEndian>()?;
            let count = directory.read_u16::<LittleEndian>()?;
            let offset = directory.read_u16::<LittleEndian>()?;
            let value = match location {
                0 => GeoKeyValue::Short(offset),
                vlr::GEO_DOUBLE_PARAMS_RECORD_ID => {
                    let mut cursor = Cursor::new(doubles.ok_or(Error::InvalidGeoKey(id))?);
                    let _ = cursor.seek(SeekFrom::Start(u64::from(offset) * 8))?;
                    let mut values = Vec::with_capacity(usize::from(count));
                    for _ in 0..count {
                        values.push(cursor.read_f64::<LittleEndian>()?);
                    }
                    GeoKeyValue::Doubles(values)
                }
                vlr::GEO_ASCII_PARAMS_RECORD_ID => {
                    let ascii = ascii.ok_or(Error::InvalidGeoKey(id))?;
                    let start = usize::from(offset);
                    let end = start + usize::from(count);
                    let bytes = ascii.get(start..end).ok_or(Error::InvalidGeoKey(id))?;
                    GeoKeyValue::Ascii(
                        String::from_utf8_lossy(bytes)
                            .trim_end_matches(['|', '\0'])
                            .to_string(),
                    )
                }
                _ => return Err(Error::InvalidGeoKey(id)),
            };
            entries.push(GeoKeyEntry { id, value });
        }
        Ok(GeoKeys { entries })
    }
}

impl Header {
    /// Returns the spatial reference system described by this header's GeoTIFF key vlrs.
    pub fn srs(&self) -> SpatialReference {
        SpatialReference::from_vlrs(self.vlrs())
    }

    /// Replaces this header's GeoTIFF key vlrs with those of the spatial reference.
    ///
    /// Other vlrs, including other projection records, are kept.
    pub fn set_srs(&mut self, srs: &SpatialReference) {
        self.clear_geokey_vlrs();
        for vlr in srs.vlrs() {
            self.add_vlr(vlr.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shorts(values: &[u16]) -> Vec<u8> {
        values.iter().flat_map(|n| n.to_le_bytes()).collect()
    }

    fn projection_vlr(record_id: u16, data: Vec<u8>) -> Vlr {
        Vlr {
            user_id: vlr::PROJECTION_USER_ID.to_string(),
            record_id,
            data,
            ..Default::default()
        }
    }

    fn utm_with_citation() -> Vec<Vlr> {
        vec![
            projection_vlr(
                vlr::GEO_KEY_DIRECTORY_RECORD_ID,
                shorts(&[
                    1, 1, 0, 4, //
                    1024, 0, 1, 1, //
                    3072, 0, 1, 26910, //
                    1026, 34737, 6, 0, //
                    2057, 34736, 1, 0, //
                ]),
            ),
            projection_vlr(
                vlr::GEO_DOUBLE_PARAMS_RECORD_ID,
                6378137f64.to_le_bytes().to_vec(),
            ),
            projection_vlr(vlr::GEO_ASCII_PARAMS_RECORD_ID, b"NAD83|".to_vec()),
        ]
    }

    #[test]
    fn decode_all_locations() {
        let srs = SpatialReference::from_vlrs(&utm_with_citation());
        let geokeys = srs.geokeys().unwrap().unwrap();
        assert_eq!(4, geokeys.entries.len());
        assert_eq!(GeoKeyValue::Short(26910), geokeys.entries[1].value);
        assert_eq!(GeoKeyValue::Ascii("NAD83".to_string()), geokeys.entries[2].value);
        assert_eq!(GeoKeyValue::Doubles(vec![6378137.]), geokeys.entries[3].value);
        assert_eq!(
            Some(Epsg {
                horizontal: 26910,
                vertical: None
            }),
            srs.epsg().unwrap()
        );
    }

    #[test]
    fn missing_parameter_record() {
        let vlrs = utm_with_citation();
        let srs = SpatialReference::from_vlrs(&vlrs[..1]);
        assert!(matches!(srs.geokeys(), Err(Error::InvalidGeoKey(1026))));
    }

    #[test]
    fn no_geokeys() {
        let srs = SpatialReference::from_vlrs(&[Vlr::default()]);
        assert!(srs.is_empty());
        assert_eq!(None, srs.geokeys().unwrap());
        assert_eq!(None, srs.epsg().unwrap());
    }

    #[test]
    fn set_srs_replaces_geokeys() {
        let mut header = Header::default();
        header.add_vlr(projection_vlr(vlr::GEO_KEY_DIRECTORY_RECORD_ID, shorts(&[1, 1, 0, 0])));
        header.add_vlr(Vlr::default());
        let srs = SpatialReference::from_vlrs(&utm_with_citation());
        header.set_srs(&srs);
        assert_eq!(4, header.number_of_vlrs());
        assert_eq!(srs, header.srs());
    }
}
