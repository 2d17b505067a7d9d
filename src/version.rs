use std::fmt;

/// The size of the public header block for every version this library reads and writes.
pub const HEADER_SIZE: u16 = 227;

/// LAS version.
///
/// Versions 1.0 through 1.2 are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// The major version.
    ///
    /// Always 1.
    pub major: u8,

    /// The minor version.
    pub minor: u8,
}

impl Version {
    /// Creates a new version.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Version;
    /// let version = Version::new(1, 2);
    /// ```
    pub fn new(major: u8, minor: u8) -> Version {
        Version { major, minor }
    }

    /// Returns true if this version can be read and written.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Version;
    /// assert!(Version::new(1, 0).is_supported());
    /// assert!(Version::new(1, 2).is_supported());
    /// assert!(!Version::new(1, 3).is_supported());
    /// assert!(!Version::new(2, 0).is_supported());
    /// ```
    pub fn is_supported(&self) -> bool {
        self.major == 1 && self.minor <= 2
    }

    /// Returns the size of the public header block for this version.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Version;
    /// assert_eq!(227, Version::new(1, 2).header_size());
    /// ```
    pub fn header_size(&self) -> u16 {
        HEADER_SIZE
    }

    /// Does this version require the two byte point data start signature after the vlrs?
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Version;
    /// assert!(Version::new(1, 0).requires_point_data_start_signature());
    /// assert!(!Version::new(1, 1).requires_point_data_start_signature());
    /// ```
    pub fn requires_point_data_start_signature(&self) -> bool {
        self.major == 1 && self.minor == 0
    }

    /// Does this version have a file source id in the header?
    ///
    /// Version 1.0 uses those two bytes as a reserved field.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Version;
    /// assert!(!Version::new(1, 0).has_file_source_id());
    /// assert!(Version::new(1, 1).has_file_source_id());
    /// ```
    pub fn has_file_source_id(&self) -> bool {
        !(self.major == 1 && self.minor == 0)
    }
}

impl Default for Version {
    fn default() -> Version {
        Version::new(1, 2)
    }
}

impl From<(u8, u8)> for Version {
    fn from((major, minor): (u8, u8)) -> Version {
        Version::new(major, minor)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
