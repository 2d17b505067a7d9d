//! Read, write, and spatially index [ASPRS LAS](https://www.asprs.org/committee-general/laser-las-file-format-exchange-activities.html)
//! point cloud data, versions 1.0 through 1.2.
//!
//! # Reading
//!
//! Create a `Reader` from a `Path`, or from anything that implements `Read` and `Seek`:
//!
//! ```
//! use lasindex::{Reader, Writer};
//! let cursor = Writer::default().into_inner().unwrap();
//! let reader = Reader::new(cursor).unwrap();
//! ```
//!
//! ## Prefer `BufRead`
//!
//! Your performance will be better if your `Read` is actually a `BufRead`. `Reader::from_path`
//! takes care of this for you, but `Reader::new` doesn't.
//!
//! ## Read points
//!
//! Read points one-by-one with `Reader::read_point`, which returns `None` once, at the end of the
//! points:
//!
//! ```
//! use lasindex::{Point, Reader, Writer};
//! let mut writer = Writer::default();
//! writer.write_point(Point { x: 1., y: 2., z: 3., ..Default::default() }).unwrap();
//! let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! let point = reader.read_point().unwrap().unwrap();
//! assert_eq!(2., point.y);
//! assert!(reader.read_point().unwrap().is_none());
//! ```
//!
//! Or iterate over all points with `Reader::points`:
//!
//! ```
//! use lasindex::{Reader, Writer};
//! let mut reader = Reader::new(Writer::default().into_inner().unwrap()).unwrap();
//! for wrapped_point in reader.points() {
//!     let point = wrapped_point.unwrap();
//!     println!("Point coordinates: ({}, {}, {})", point.x, point.y, point.z);
//!     if let Some(color) = point.color {
//!         println!("Point color: red={}, green={}, blue={}",
//!             color.red,
//!             color.green,
//!             color.blue,
//!         );
//!     }
//! }
//! ```
//!
//! Points near each other in the file can be served from a [CachedReader], and readers can skip
//! points with the predicates in [filter].
//!
//! # Writing
//!
//! Create a `Writer` from a `Write` and a `Header`:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Writer, Header};
//! let write = Cursor::new(Vec::new());
//! let header = Header::default();
//! let writer = Writer::new(write, header).unwrap();
//! ```
//!
//! You can also write out to a path (automatically buffered with `BufWriter`):
//!
//! ```
//! use lasindex::Writer;
//! let writer = Writer::from_path("/dev/null", Default::default());
//! ```
//!
//! Configure the header to customize the las data:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Header, Version, Writer};
//! use lasindex::point::Format;
//!
//! let mut header = Header::default();
//! header.set_version(Version::new(1, 2)).unwrap();
//! header.set_point_format(Format::new(2).unwrap());
//! let writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
//! ```
//!
//! Compressed point data can't be read or written:
//!
//! ```
//! use std::io::Cursor;
//! use lasindex::{Error, Header, Writer};
//! use lasindex::point::Format;
//!
//! let mut header = Header::default();
//! let mut format = Format::new(1).unwrap();
//! format.is_compressed = true;
//! header.set_point_format(format);
//! assert!(matches!(
//!     Writer::new(Cursor::new(Vec::new()), header),
//!     Err(Error::CompressionNotSupported)
//! ));
//! ```
//!
//! ## Prefer `BufWrite`
//!
//! Just like the `Reader`, your performance will improve greatly if you use a `BufWrite` instead
//! of just a `Write`.
//!
//! ## Write points
//!
//! Write points one at a time:
//!
//! ```
//! use lasindex::{Writer, Point};
//! let mut writer = Writer::default();
//! let point = Point { x: 1., y: 2., z: 3., ..Default::default() };
//! writer.write_point(point).unwrap();
//! ```
//!
//! # Indexing
//!
//! The [index] module builds R-trees over points, in memory or on disk, and answers region and
//! nearest-neighbor queries with point positions.

#![deny(unsafe_code, unstable_features)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    unused_import_braces
)]

pub mod filter;
pub mod header;
pub mod index;
pub mod point;
pub mod raw;
pub mod reader;
pub mod srs;
pub mod vlr;
pub mod writer;

mod bounds;
mod cache;
mod color;
mod error;
mod transform;
mod utils;
mod vector;
mod version;

pub use bounds::Bounds;
pub use cache::CachedReader;
pub use color::Color;
pub use error::Error;
pub use header::Header;
pub use point::Point;
pub use reader::{PointIterator, Reader, ReaderState};
pub use transform::Transform;
pub use vector::Vector;
pub use version::Version;
pub use vlr::Vlr;
pub use writer::Writer;

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, Error>;
