//! Spatial indexing of las points.
//!
//! An [RTree] maps regions to ids. When it indexes a las file, the ids are point positions, and
//! the leaves of the tree describe blocks of nearby points:
//!
//! ```
//! use lasindex::{Point, Reader, Writer};
//! use lasindex::index::{MemoryStore, PointStream, Region, RTree};
//!
//! let mut writer = Writer::default();
//! for i in 0..100 {
//!     writer.write_point(Point { x: i as f64, y: i as f64, ..Default::default() }).unwrap();
//! }
//! let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! let stream = PointStream::new(&mut reader, 2);
//! let mut tree = RTree::bulk_load(MemoryStore::default(), Default::default(), stream).unwrap();
//!
//! let mut ids = tree.intersects(&Region::new_2d([10., 10.], [12., 12.])).unwrap();
//! ids.sort();
//! assert_eq!(vec![10, 11, 12], ids);
//! ```
//!
//! Trees live in a [ByteStore]. A [MemoryStore] goes away with the tree, a [DiskStore] persists,
//! and a [BufferedStore] caches the pages of either:
//!
//! ```
//! use lasindex::index::{BufferedStore, DiskStore, Region, RTree};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let name = dir.path().join("points");
//! {
//!     let store = BufferedStore::new(DiskStore::create(&name, 0).unwrap());
//!     let mut tree = RTree::create(store, Default::default()).unwrap();
//!     tree.insert(Region::point(&[1., 2.]).unwrap(), 42).unwrap();
//!     tree.flush().unwrap();
//! }
//! let mut tree = RTree::open(DiskStore::open(&name).unwrap(), 0).unwrap();
//! assert_eq!(vec![(42, 0.)], tree.nearest(&[1., 2.], 1).unwrap());
//! ```

mod buffer;
mod bulk;
mod disk;
mod node;
mod region;
mod rtree;
mod storage;

pub use buffer::{BufferedStore, DEFAULT_BUFFER_CAPACITY};
pub use bulk::{FileStream, IndexEntry, PointStream, RewindableStream};
pub use disk::{DEFAULT_PAGE_SIZE, DiskStore};
pub use region::{MAX_DIMENSION, Region};
pub use rtree::{LeafBlock, QueryResult, RTree, RTreeOptions};
pub use storage::{ByteStore, MemoryStore, NEW_PAGE, PageId};
