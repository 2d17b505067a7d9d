use crate::{Error, Result};
use std::fmt;

const CLASS_MASK: u8 = 0b0001_1111;
const SYNTHETIC_MASK: u8 = 0b0010_0000;
const KEY_POINT_MASK: u8 = 0b0100_0000;
const WITHHELD_MASK: u8 = 0b1000_0000;

/// The number of classes a classification byte can hold.
pub const CLASS_COUNT: usize = 32;

const RESERVED: &str = "Reserved for ASPRS Definition";

/// ASPRS standard lidar point class names, indexed by class.
pub const CLASS_NAMES: [&str; CLASS_COUNT] = [
    "Created, never classified",
    "Unclassified",
    "Ground",
    "Low Vegetation",
    "Medium Vegetation",
    "High Vegetation",
    "Building",
    "Low Point (noise)",
    "Model Key-point (mass point)",
    "Water",
    RESERVED,
    RESERVED,
    "Overlap Points",
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
    RESERVED,
];

/// The classification byte of a point.
///
/// | Bits | Field |
/// | ---- | ----- |
/// | 0:4 | Class, one of the 32 ASPRS classes |
/// | 5 | Synthetic |
/// | 6 | Key-point |
/// | 7 | Withheld |
///
/// ```
/// use lasindex::point::Classification;
/// let mut classification = Classification::new(2).unwrap();
/// classification.set_withheld(true);
/// assert_eq!("Ground", classification.name());
/// assert_eq!(0b1000_0010, u8::from(classification));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Classification(u8);

impl Classification {
    /// Ground.
    pub const GROUND: u8 = 2;

    /// Creates a classification with no flags set.
    ///
    /// Classes at or above 32 are an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Classification;
    /// assert_eq!(31, Classification::new(31).unwrap().class());
    /// assert!(Classification::new(32).is_err());
    /// ```
    pub fn new(class: u8) -> Result<Classification> {
        let mut classification = Classification::default();
        classification.set_class(class)?;
        Ok(classification)
    }

    /// Returns the class.
    pub fn class(&self) -> u8 {
        self.0 & CLASS_MASK
    }

    /// Sets the class, leaving the flags alone.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::point::Classification;
    /// let mut classification = Classification::from(0b0010_0000);
    /// classification.set_class(9).unwrap();
    /// assert!(classification.is_synthetic());
    /// assert_eq!(9, classification.class());
    /// assert!(classification.set_class(32).is_err());
    /// ```
    pub fn set_class(&mut self, class: u8) -> Result<()> {
        if usize::from(class) >= CLASS_COUNT {
            return Err(Error::InvalidClassification(class));
        }
        self.0 = (self.0 & !CLASS_MASK) | class;
        Ok(())
    }

    /// Returns the ASPRS name of the class.
    pub fn name(&self) -> &'static str {
        CLASS_NAMES[usize::from(self.class())]
    }

    /// Was this point created by a technique other than lidar collection?
    pub fn is_synthetic(&self) -> bool {
        self.0 & SYNTHETIC_MASK == SYNTHETIC_MASK
    }

    /// Sets the synthetic flag.
    pub fn set_synthetic(&mut self, value: bool) {
        self.set_flag(SYNTHETIC_MASK, value)
    }

    /// Is this point a model key-point, which thinning should keep?
    pub fn is_key_point(&self) -> bool {
        self.0 & KEY_POINT_MASK == KEY_POINT_MASK
    }

    /// Sets the key-point flag.
    pub fn set_key_point(&mut self, value: bool) {
        self.set_flag(KEY_POINT_MASK, value)
    }

    /// Should this point be left out of processing?
    pub fn is_withheld(&self) -> bool {
        self.0 & WITHHELD_MASK == WITHHELD_MASK
    }

    /// Sets the withheld flag.
    pub fn set_withheld(&mut self, value: bool) {
        self.set_flag(WITHHELD_MASK, value)
    }

    fn set_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.0 |= mask;
        } else {
            self.0 &= !mask;
        }
    }
}

impl From<u8> for Classification {
    fn from(n: u8) -> Classification {
        Classification(n)
    }
}

impl From<Classification> for u8 {
    fn from(classification: Classification) -> u8 {
        classification.0
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
