//! Raw structures that map directly onto structures as defined in the las format specifications.
//!
//! In general, these structures are "dumb", meaning that they do the least amount of validity
//! checking. For example:
//!
//! ```
//! let raw_header = lasindex::raw::Header {
//!     version: lasindex::Version::new(9, 9),
//!     ..Default::default()
//! };
//! let mut bytes = Vec::new();
//! raw_header.write_to(&mut bytes).unwrap(); // nobody checks the version
//! assert_eq!(227, bytes.len());
//! ```
//!
//! In general, users should prefer to use the non-raw versions, e.g. `lasindex::Header` over
//! `lasindex::raw::Header`, in order to ensure that they are following the rules.

pub mod header;
pub mod point;
pub mod vlr;

pub use self::header::Header;
pub use self::point::Point;
pub use self::vlr::Vlr;

/// The file magic number used for all las files.
pub const LASF: [u8; 4] = *b"LASF";

/// The point data start signature required by las 1.0.
pub const POINT_DATA_START_SIGNATURE: [u8; 2] = [0xDD, 0xCC];
