//! Building trees from streams of entries.

use super::{
    ByteStore, NEW_PAGE, RTree, RTreeOptions, Region,
    node::{Entry, Node},
};
use crate::{Reader, ReaderState, Result};
use log::{Level, log};
use std::path::{Path, PathBuf};

/// A region and its id, on its way into a tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexEntry {
    /// The region.
    pub region: Region,

    /// The id.
    pub id: u64,
}

/// A source of entries that can start over from its beginning.
///
/// [RTree::insert_stream] needs this capability. A plain iterator, like a [PointStream], can only
/// be consumed once, which is all [RTree::bulk_load] needs.
pub trait RewindableStream: Iterator<Item = Result<IndexEntry>> {
    /// Moves back to the first entry.
    fn rewind(&mut self) -> Result<()>;
}

/// A single pass over the points of a [Reader], each point's id being its position in the file.
///
/// Points rejected by the reader's filters are skipped, and keep their positions.
///
/// # Examples
///
/// ```
/// use lasindex::{Point, Reader, Writer};
/// use lasindex::index::PointStream;
///
/// let mut writer = Writer::default();
/// writer.write_point(Point { x: 1., y: 2., ..Default::default() }).unwrap();
/// let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
/// let entries: Vec<_> = PointStream::new(&mut reader, 2)
///     .collect::<lasindex::Result<_>>()
///     .unwrap();
/// assert_eq!(0, entries[0].id);
/// assert_eq!(&[1., 2.], entries[0].region.min());
/// ```
#[allow(missing_debug_implementations)]
pub struct PointStream<'a> {
    reader: &'a mut Reader,
    dimension: u32,
}

/// A stream over the points of a las file that rewinds by reopening the file.
#[allow(missing_debug_implementations)]
pub struct FileStream {
    path: PathBuf,
    reader: Reader,
    dimension: u32,
}

impl IndexEntry {
    /// Creates a new entry.
    pub fn new(region: Region, id: u64) -> IndexEntry {
        IndexEntry { region, id }
    }
}

impl<'a> PointStream<'a> {
    /// Creates a stream over a reader's remaining points.
    pub fn new(reader: &'a mut Reader, dimension: u32) -> PointStream<'a> {
        PointStream { reader, dimension }
    }
}

impl Iterator for PointStream<'_> {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Result<IndexEntry>> {
        next_entry(self.reader, self.dimension)
    }
}

impl FileStream {
    /// Opens a stream over the file at the path.
    pub fn open<P: AsRef<Path>>(path: P, dimension: u32) -> Result<FileStream> {
        let path = path.as_ref().to_path_buf();
        let reader = Reader::from_path(&path)?;
        Ok(FileStream {
            path,
            reader,
            dimension,
        })
    }

    /// Returns the reader that is being streamed.
    pub fn reader(&self) -> &Reader {
        &self.reader
    }
}

impl Iterator for FileStream {
    type Item = Result<IndexEntry>;

    fn next(&mut self) -> Option<Result<IndexEntry>> {
        next_entry(&mut self.reader, self.dimension)
    }
}

impl RewindableStream for FileStream {
    fn rewind(&mut self) -> Result<()> {
        self.reader = Reader::from_path(&self.path)?;
        Ok(())
    }
}

fn next_entry(reader: &mut Reader, dimension: u32) -> Option<Result<IndexEntry>> {
    if reader.state() == ReaderState::Exhausted {
        return None;
    }
    match reader.read_point() {
        Ok(Some(point)) => Some(
            Region::from_point(&point, dimension)
                .map(|region| IndexEntry::new(region, reader.position() - 1)),
        ),
        Ok(None) => None,
        Err(err) => Some(Err(err)),
    }
}

impl<S: ByteStore> RTree<S> {
    /// Builds a tree from entries with sort-tile-recursive packing.
    ///
    /// The entries are read once. Each node is filled to its capacity times the fill factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::{IndexEntry, MemoryStore, Region, RTree};
    ///
    /// let entries = (0..1000).map(|i| {
    ///     Region::point(&[(i % 100) as f64, (i / 100) as f64]).map(|region| IndexEntry::new(region, i))
    /// });
    /// let mut tree = RTree::bulk_load(MemoryStore::default(), Default::default(), entries).unwrap();
    /// assert_eq!(1000, tree.len());
    /// assert_eq!(10, tree.intersects(&Region::new_2d([0., 0.], [0., 9.])).unwrap().len());
    /// ```
    pub fn bulk_load<I>(store: S, options: RTreeOptions, entries: I) -> Result<RTree<S>>
    where
        I: IntoIterator<Item = Result<IndexEntry>>,
    {
        let mut tree = RTree::allocate(store, options)?;
        let mut level_entries = Vec::new();
        for entry in entries {
            let entry = entry?;
            entry.region.check_dimension(options.dimension)?;
            level_entries.push(Entry {
                region: entry.region,
                id: entry.id,
            });
        }
        let len = u64::try_from(level_entries.len())?;
        let mut level = 0;
        loop {
            let per_node = ((options.capacity(level) as f64 * options.fill_factor).floor()
                as usize)
                .max(2);
            let mut parents = Vec::new();
            for group in tiles(level_entries, per_node, options.dimension) {
                let node = Node {
                    level,
                    entries: group,
                };
                let id = tree.write_node(NEW_PAGE, &node)?;
                parents.push(Entry {
                    region: node.bounds(options.dimension),
                    id,
                });
            }
            level += 1;
            if parents.len() <= 1 {
                let root = match parents.pop() {
                    Some(entry) => entry.id,
                    None => tree.write_node(NEW_PAGE, &Node::leaf())?,
                };
                tree.set_root(root, level, len)?;
                break;
            }
            level_entries = parents;
        }
        log!(
            Level::Debug,
            "bulk loaded {} entries into a tree of height {}",
            len,
            tree.height()
        );
        Ok(tree)
    }

    /// Inserts every entry of a stream, after rewinding it, and returns how many were inserted.
    pub fn insert_stream<T: RewindableStream>(&mut self, stream: &mut T) -> Result<u64> {
        stream.rewind()?;
        let mut count = 0;
        for entry in stream {
            let entry = entry?;
            self.insert(entry.region, entry.id)?;
            count += 1;
        }
        Ok(count)
    }
}

/// Sorts entries into groups of at most `per_node`, slicing by one axis at a time.
fn tiles(entries: Vec<Entry>, per_node: usize, dimension: u32) -> Vec<Vec<Entry>> {
    let mut groups = Vec::new();
    tile(entries, 0, per_node, dimension as usize, &mut groups);
    groups
}

fn tile(
    mut entries: Vec<Entry>,
    axis: usize,
    per_node: usize,
    dimension: usize,
    groups: &mut Vec<Vec<Entry>>,
) {
    if entries.is_empty() {
        return;
    }
    entries.sort_by(|a, b| a.region.center(axis).total_cmp(&b.region.center(axis)));
    if axis + 1 == dimension {
        while !entries.is_empty() {
            let rest = entries.split_off(entries.len().min(per_node));
            groups.push(std::mem::replace(&mut entries, rest));
        }
        return;
    }
    let pages = entries.len().div_ceil(per_node);
    let slices = (pages as f64).powf(1. / (dimension - axis) as f64).ceil() as usize;
    let slab_len = per_node * pages.div_ceil(slices.max(1));
    while !entries.is_empty() {
        let rest = entries.split_off(entries.len().min(slab_len));
        let slab = std::mem::replace(&mut entries, rest);
        tile(slab, axis + 1, per_node, dimension, groups);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Point, Writer, index::MemoryStore};
    use std::io::Cursor;

    fn points(n: u64) -> Vec<Result<IndexEntry>> {
        (0..n)
            .map(|i| {
                Region::point(&[(i % 17) as f64, (i / 17) as f64, (i % 5) as f64])
                    .map(|region| IndexEntry::new(region, i))
            })
            .collect()
    }

    #[test]
    fn tiles_are_bounded() {
        let entries: Vec<Entry> = points(1000)
            .into_iter()
            .map(|entry| {
                let entry = entry.unwrap();
                Entry {
                    region: entry.region,
                    id: entry.id,
                }
            })
            .collect();
        let groups = tiles(entries, 7, 3);
        assert!(groups.iter().all(|group| !group.is_empty() && group.len() <= 7));
        assert_eq!(1000, groups.iter().map(Vec::len).sum::<usize>());
    }

    #[test]
    fn bulk_load_3d() {
        let options = RTreeOptions {
            dimension: 3,
            ..Default::default()
        };
        let mut tree = RTree::bulk_load(MemoryStore::default(), options, points(500)).unwrap();
        assert_eq!(500, tree.len());
        assert_eq!(0, tree.header_id());
        let mut all = tree
            .intersects(&Region::new_3d([0., 0., 0.], [17., 30., 5.]))
            .unwrap();
        all.sort_unstable();
        assert_eq!((0..500).collect::<Vec<_>>(), all);
        for block in tree.blocks().unwrap() {
            assert!(block.ids.len() <= 7);
        }
    }

    #[test]
    fn bulk_load_empty() {
        let mut tree =
            RTree::bulk_load(MemoryStore::default(), Default::default(), Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(1, tree.height());
        tree.insert(Region::point(&[0., 0.]).unwrap(), 0).unwrap();
        assert_eq!(1, tree.len());
    }

    #[test]
    fn bulk_load_then_insert_and_delete() {
        let options = RTreeOptions {
            dimension: 3,
            index_capacity: 4,
            leaf_capacity: 4,
            fill_factor: 1.,
        };
        let mut tree = RTree::bulk_load(MemoryStore::default(), options, points(100)).unwrap();
        let region = Region::point(&[0.5, 0.5, 0.5]).unwrap();
        tree.insert(region, 1000).unwrap();
        assert!(tree.delete(&region, 1000).unwrap());
        let first = Region::point(&[0., 0., 0.]).unwrap();
        assert!(tree.delete(&first, 0).unwrap());
        assert_eq!(99, tree.len());
    }

    #[test]
    fn bulk_load_stops_at_the_first_error() {
        let mut entries = points(10);
        entries.insert(5, Err(Error::NegativeGpsTime(-1.)));
        assert!(RTree::bulk_load(MemoryStore::default(), Default::default(), entries).is_err());
    }

    #[test]
    fn bulk_load_dimension_mismatch() {
        assert!(matches!(
            RTree::bulk_load(MemoryStore::default(), Default::default(), points(3)),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn point_stream_skips_filtered_points() {
        let mut writer = Writer::default();
        for i in 0..6 {
            writer
                .write_point(Point {
                    x: i as f64,
                    intensity: i,
                    ..Default::default()
                })
                .unwrap();
        }
        let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
        reader.add_filter(|point: &Point| point.intensity >= 3);
        let mut stream = PointStream::new(&mut reader, 2);
        let ids: Vec<u64> = stream.by_ref().map(|entry| entry.unwrap().id).collect();
        assert_eq!(vec![3, 4, 5], ids);
        assert!(stream.next().is_none());
    }

    #[test]
    fn point_stream_into_bulk_load() {
        let mut writer = Writer::new(Cursor::new(Vec::new()), Default::default()).unwrap();
        for i in 0..50 {
            writer
                .write_point(Point {
                    x: i as f64,
                    y: -(i as f64),
                    ..Default::default()
                })
                .unwrap();
        }
        let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
        let stream = PointStream::new(&mut reader, 2);
        let mut tree = RTree::bulk_load(MemoryStore::default(), Default::default(), stream).unwrap();
        let ids = tree
            .intersects(&Region::new_2d([9.5, -20.5], [20.5, 0.]))
            .unwrap();
        assert_eq!(11, ids.len());
    }
}
