//! Variable length records.
//!
//! A vlr holds arbitrary data, tagged with a user id and a record id. The header owns an ordered
//! sequence of them:
//!
//! ```
//! use lasindex::{Header, Vlr};
//! let mut header = Header::default();
//! header.add_vlr(Vlr { user_id: "my app".to_string(), record_id: 1, ..Default::default() });
//! assert_eq!(1, header.number_of_vlrs());
//! ```

use crate::{Error, Result, raw, utils::AsLasStr, utils::FromLasStr};

/// The user id of the projection records.
pub const PROJECTION_USER_ID: &str = "LASF_Projection";

/// The record id of the GeoTIFF key directory.
pub const GEO_KEY_DIRECTORY_RECORD_ID: u16 = 34735;

/// The record id of the GeoTIFF double parameters.
pub const GEO_DOUBLE_PARAMS_RECORD_ID: u16 = 34736;

/// The record id of the GeoTIFF ascii parameters.
pub const GEO_ASCII_PARAMS_RECORD_ID: u16 = 34737;

/// A variable length record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Vlr {
    /// Two bytes the specification reserves, kept as read.
    pub reserved: u16,

    /// The user that created this record.
    ///
    /// Must be ascii, at most 16 bytes.
    pub user_id: String,

    /// The record id, whose meaning depends on the user id.
    pub record_id: u16,

    /// A textual description of this record.
    ///
    /// Must be ascii, at most 32 bytes.
    pub description: String,

    /// The data in this record.
    pub data: Vec<u8>,
}

impl Vlr {
    /// Creates a vlr from a raw vlr.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{raw, Vlr};
    /// let raw_vlr = raw::Vlr::default();
    /// let vlr = Vlr::new(raw_vlr).unwrap();
    /// ```
    pub fn new(raw_vlr: raw::Vlr) -> Result<Vlr> {
        Ok(Vlr {
            reserved: raw_vlr.reserved,
            user_id: raw_vlr.user_id.as_las_str()?.to_string(),
            record_id: raw_vlr.record_id,
            description: raw_vlr.description.as_las_str()?.to_string(),
            data: raw_vlr.data,
        })
    }

    /// Converts this vlr to a raw vlr.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vlr;
    /// let raw_vlr = Vlr::default().into_raw().unwrap();
    ///
    /// let vlr = Vlr { data: vec![0; u16::MAX as usize + 1], ..Default::default() };
    /// assert!(vlr.into_raw().is_err());
    /// ```
    pub fn into_raw(self) -> Result<raw::Vlr> {
        let mut user_id = [0; 16];
        user_id.from_las_str(&self.user_id)?;
        let mut description = [0; 32];
        description.from_las_str(&self.description)?;
        let record_length_after_header =
            u16::try_from(self.data.len()).map_err(|_| Error::VlrTooLong(self.data.len()))?;
        Ok(raw::Vlr {
            reserved: self.reserved,
            user_id,
            record_id: self.record_id,
            record_length_after_header,
            description,
            data: self.data,
        })
    }

    /// Returns the total length of this vlr in a file, header and data.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vlr;
    /// let vlr = Vlr { data: vec![0], ..Default::default() };
    /// assert_eq!(55, vlr.len());
    /// ```
    pub fn len(&self) -> usize {
        raw::vlr::HEADER_SIZE + self.data.len()
    }

    /// Returns true if the data of this vlr is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vlr;
    /// assert!(Vlr::default().is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns true if this vlr describes the spatial reference system of the points.
    pub fn is_projection(&self) -> bool {
        self.user_id == PROJECTION_USER_ID
    }

    /// Returns true if this vlr is one of the three GeoTIFF key records.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vlr;
    /// let mut vlr = Vlr { user_id: "LASF_Projection".to_string(), record_id: 34735, ..Default::default() };
    /// assert!(vlr.is_geokey());
    /// vlr.record_id = 2112;
    /// assert!(!vlr.is_geokey());
    /// ```
    pub fn is_geokey(&self) -> bool {
        self.is_projection()
            && (GEO_KEY_DIRECTORY_RECORD_ID..=GEO_ASCII_PARAMS_RECORD_ID).contains(&self.record_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        let vlr = Vlr {
            reserved: 0xAABB,
            user_id: "LASF_Projection".to_string(),
            record_id: GEO_DOUBLE_PARAMS_RECORD_ID,
            description: "doubles".to_string(),
            data: vec![1, 2, 3],
        };
        let raw_vlr = vlr.clone().into_raw().unwrap();
        assert_eq!(3, raw_vlr.record_length_after_header);
        assert_eq!(vlr, Vlr::new(raw_vlr).unwrap());
    }

    #[test]
    fn user_id_too_long() {
        let vlr = Vlr {
            user_id: "seventeen bytes!!".to_string(),
            ..Default::default()
        };
        assert!(vlr.into_raw().is_err());
    }

    #[test]
    fn description_too_long() {
        let vlr = Vlr {
            description: "x".repeat(33),
            ..Default::default()
        };
        assert!(vlr.into_raw().is_err());
    }
}
