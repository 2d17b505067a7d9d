use super::{
    ByteStore, NEW_PAGE, PageId, Region,
    node::{Entry, Node, TreeHeader},
    region,
};
use crate::{Error, Point, Result};
use log::{Level, log};
use std::{cmp::Ordering, collections::VecDeque};

/// The share of a node's capacity that each half of a split must hold.
const SPLIT_MIN_FILL: f64 = 0.4;

/// Configuration for an [RTree].
///
/// # Examples
///
/// ```
/// use lasindex::index::RTreeOptions;
/// let options = RTreeOptions { dimension: 3, ..Default::default() };
/// assert!(options.validate().is_ok());
/// assert!(RTreeOptions { leaf_capacity: 2, ..Default::default() }.validate().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RTreeOptions {
    /// The number of dimensions of the indexed regions, two or three.
    pub dimension: u32,

    /// The most entries an index node holds.
    pub index_capacity: u32,

    /// The most entries a leaf holds.
    pub leaf_capacity: u32,

    /// How full bulk loading packs each node, in `(0, 1]`.
    pub fill_factor: f64,
}

/// The result of a region query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    /// Every matching id.
    pub ids: Vec<u64>,

    /// The leaves that held matches, with the matching ids of each.
    pub blocks: Vec<LeafBlock>,
}

/// A leaf of the tree and some or all of its ids.
///
/// Ids are point positions when the tree indexes a las file, so a block describes a run of
/// nearby points that can be read together.
#[derive(Clone, Debug, PartialEq)]
pub struct LeafBlock {
    /// The page holding the leaf.
    pub node_id: PageId,

    /// The bounds of everything in the leaf.
    pub bounds: Region,

    /// The ids.
    pub ids: Vec<u64>,
}

/// An R*-tree of regions and ids, stored in a [ByteStore].
///
/// The tree owns its store. Use [RTree::into_store] to get it back.
///
/// # Examples
///
/// ```
/// use lasindex::index::{MemoryStore, Region, RTree};
///
/// let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
/// tree.insert(Region::point(&[1., 1.]).unwrap(), 1).unwrap();
/// tree.insert(Region::point(&[5., 5.]).unwrap(), 2).unwrap();
/// let ids = tree.intersects(&Region::new_2d([0., 0.], [2., 2.])).unwrap();
/// assert_eq!(vec![1], ids);
/// ```
#[derive(Debug)]
pub struct RTree<S: ByteStore> {
    store: S,
    options: RTreeOptions,
    header_id: PageId,
    root: PageId,
    height: u32,
    len: u64,
}

enum Removal {
    NotFound,
    Removed { bounds: Region, underfull: bool },
}

impl Default for RTreeOptions {
    fn default() -> RTreeOptions {
        RTreeOptions {
            dimension: 2,
            index_capacity: 10,
            leaf_capacity: 10,
            fill_factor: 0.7,
        }
    }
}

impl RTreeOptions {
    /// Returns an error if these options can't make a tree.
    pub fn validate(&self) -> Result<()> {
        region::check_dimension(usize::try_from(self.dimension)?)?;
        if self.index_capacity < 3 || self.leaf_capacity < 3 {
            return Err(Error::InvalidIndexOptions(format!(
                "node capacities must be at least three, not {} and {}",
                self.index_capacity, self.leaf_capacity
            )));
        }
        if !(self.fill_factor > 0. && self.fill_factor <= 1.) {
            return Err(Error::InvalidIndexOptions(format!(
                "fill factor must be in (0, 1], not {}",
                self.fill_factor
            )));
        }
        Ok(())
    }

    pub(crate) fn capacity(&self, level: u32) -> usize {
        if level == 0 {
            self.leaf_capacity as usize
        } else {
            self.index_capacity as usize
        }
    }

    fn min_entries(&self, level: u32) -> usize {
        ((self.capacity(level) as f64 * SPLIT_MIN_FILL).floor() as usize).max(1)
    }
}

impl<S: ByteStore> RTree<S> {
    /// Creates an empty tree in a store.
    ///
    /// The tree's header page is allocated first, so it is page zero of a fresh store.
    pub fn create(store: S, options: RTreeOptions) -> Result<RTree<S>> {
        let mut tree = RTree::allocate(store, options)?;
        tree.root = tree.store.store(NEW_PAGE, &Node::leaf().encode()?)?;
        tree.write_header()?;
        Ok(tree)
    }

    /// Opens a tree that was written to a store, from the id of its header page.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::{MemoryStore, Region, RTree};
    ///
    /// let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
    /// tree.insert(Region::point(&[1., 1.]).unwrap(), 1).unwrap();
    /// let header_id = tree.header_id();
    /// let store = tree.into_store();
    ///
    /// let tree = RTree::open(store, header_id).unwrap();
    /// assert_eq!(1, tree.len());
    /// ```
    pub fn open(mut store: S, header_id: PageId) -> Result<RTree<S>> {
        let header = TreeHeader::decode(&store.load(header_id)?)?;
        let options = RTreeOptions {
            dimension: header.dimension,
            index_capacity: header.index_capacity,
            leaf_capacity: header.leaf_capacity,
            fill_factor: header.fill_factor,
        };
        options
            .validate()
            .map_err(|err| Error::CorruptIndex(err.to_string()))?;
        if header.height == 0 {
            return Err(Error::CorruptIndex("tree height of zero".to_string()));
        }
        log!(
            Level::Debug,
            "opened tree at page {} with {} entries and height {}",
            header_id,
            header.len,
            header.height
        );
        Ok(RTree {
            store,
            options,
            header_id,
            root: header.root,
            height: header.height,
            len: header.len,
        })
    }

    pub(super) fn allocate(store: S, options: RTreeOptions) -> Result<RTree<S>> {
        options.validate()?;
        let mut tree = RTree {
            store,
            options,
            header_id: NEW_PAGE,
            root: NEW_PAGE,
            height: 1,
            len: 0,
        };
        let header = tree.tree_header().encode()?;
        tree.header_id = tree.store.store(NEW_PAGE, &header)?;
        Ok(tree)
    }

    pub(super) fn set_root(&mut self, root: PageId, height: u32, len: u64) -> Result<()> {
        self.root = root;
        self.height = height;
        self.len = len;
        self.write_header()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of levels, one for a tree that is a single leaf.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns this tree's options.
    pub fn options(&self) -> &RTreeOptions {
        &self.options
    }

    /// Returns the id of the page that [RTree::open] needs.
    pub fn header_id(&self) -> PageId {
        self.header_id
    }

    /// Returns the bounds of everything in the tree.
    pub fn bounds(&mut self) -> Result<Region> {
        let root = self.root;
        Ok(self.read_node(root)?.bounds(self.options.dimension))
    }

    /// Inserts a region with an id.
    ///
    /// Ids don't need to be unique.
    pub fn insert(&mut self, region: Region, id: u64) -> Result<()> {
        region.check_dimension(self.options.dimension)?;
        self.insert_entry(Entry { region, id }, 0)?;
        self.len += 1;
        self.write_header()
    }

    /// Inserts a las point, using its position in the tree's dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::index::{MemoryStore, RTree};
    ///
    /// let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
    /// tree.insert_point(&Point { x: 1., y: 2., ..Default::default() }, 0).unwrap();
    /// assert_eq!(vec![(0, 0.)], tree.nearest(&[1., 2.], 1).unwrap());
    /// ```
    pub fn insert_point(&mut self, point: &Point, id: u64) -> Result<()> {
        let region = Region::from_point(point, self.options.dimension)?;
        self.insert(region, id)
    }

    /// Deletes an entry that was inserted with exactly this region and id.
    ///
    /// Returns false if there was no such entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::{MemoryStore, Region, RTree};
    ///
    /// let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
    /// let region = Region::point(&[1., 1.]).unwrap();
    /// tree.insert(region, 7).unwrap();
    /// assert!(!tree.delete(&region, 8).unwrap());
    /// assert!(tree.delete(&region, 7).unwrap());
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, region: &Region, id: u64) -> Result<bool> {
        region.check_dimension(self.options.dimension)?;
        let mut orphans = Vec::new();
        let root = self.root;
        if let Removal::NotFound = self.remove(root, region, id, true, &mut orphans)? {
            return Ok(false);
        }
        self.len -= 1;
        let root_node = self.read_node(root)?;
        if !root_node.is_leaf() && root_node.entries.is_empty() {
            self.write_node(root, &Node::leaf())?;
            self.height = 1;
        }
        for orphan in orphans {
            self.insert_entry(orphan, 0)?;
        }
        while self.height > 1 {
            let root_node = self.read_node(self.root)?;
            if root_node.entries.len() != 1 {
                break;
            }
            self.store.delete(self.root)?;
            self.root = root_node.entries[0].id;
            self.height -= 1;
        }
        self.write_header()?;
        Ok(true)
    }

    /// Returns the ids of every entry that intersects the region.
    pub fn intersects(&mut self, region: &Region) -> Result<Vec<u64>> {
        region.check_dimension(self.options.dimension)?;
        let mut ids = Vec::new();
        let root = self.root;
        self.search(root, region, &mut ids)?;
        Ok(ids)
    }

    /// Returns the ids of every entry that intersects the region, grouped by leaf.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::{MemoryStore, Region, RTree};
    ///
    /// let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
    /// for i in 0..100 {
    ///     tree.insert(Region::point(&[i as f64, 0.]).unwrap(), i).unwrap();
    /// }
    /// let result = tree.query(&Region::new_2d([9.5, -1.], [20.5, 1.])).unwrap();
    /// assert_eq!(11, result.ids.len());
    /// let in_blocks: usize = result.blocks.iter().map(|block| block.ids.len()).sum();
    /// assert_eq!(11, in_blocks);
    /// ```
    pub fn query(&mut self, region: &Region) -> Result<QueryResult> {
        region.check_dimension(self.options.dimension)?;
        let mut result = QueryResult::default();
        let mut queue = VecDeque::from([self.root]);
        while let Some(node_id) = queue.pop_front() {
            let node = self.read_node(node_id)?;
            let matches = node
                .entries
                .iter()
                .filter(|entry| entry.region.intersects(region));
            if node.is_leaf() {
                let ids: Vec<u64> = matches.map(|entry| entry.id).collect();
                if !ids.is_empty() {
                    result.ids.extend(&ids);
                    result.blocks.push(LeafBlock {
                        node_id,
                        bounds: node.bounds(self.options.dimension),
                        ids,
                    });
                }
            } else {
                queue.extend(matches.map(|entry| entry.id));
            }
        }
        Ok(result)
    }

    /// Returns every non-empty leaf of the tree.
    pub fn blocks(&mut self) -> Result<Vec<LeafBlock>> {
        let mut blocks = Vec::new();
        let mut queue = VecDeque::from([self.root]);
        while let Some(node_id) = queue.pop_front() {
            let node = self.read_node(node_id)?;
            if !node.is_leaf() {
                queue.extend(node.entries.iter().map(|entry| entry.id));
            } else if !node.entries.is_empty() {
                blocks.push(LeafBlock {
                    node_id,
                    bounds: node.bounds(self.options.dimension),
                    ids: node.entries.iter().map(|entry| entry.id).collect(),
                });
            }
        }
        Ok(blocks)
    }

    /// Returns the `k` entries nearest to the coordinates, with their distances, nearest first.
    ///
    /// Distance to an entry is the distance to the closest point of its region.
    pub fn nearest(&mut self, coordinates: &[f64], k: usize) -> Result<Vec<(u64, f64)>> {
        if coordinates.len() != self.options.dimension as usize {
            return Err(Error::DimensionMismatch {
                expected: self.options.dimension,
                found: u32::try_from(coordinates.len())?,
            });
        }
        let mut results = Vec::new();
        if k == 0 {
            return Ok(results);
        }
        let mut max_distance = f64::INFINITY;
        let root = self.root;
        self.find_nearest(root, coordinates, k, &mut results, &mut max_distance)?;
        sort_by_distance(&mut results);
        results.truncate(k);
        Ok(results)
    }

    /// Writes the tree's header and flushes the store.
    pub fn flush(&mut self) -> Result<()> {
        self.write_header()?;
        self.store.flush()
    }

    /// Returns the store.
    ///
    /// The store is not flushed.
    pub fn into_store(self) -> S {
        self.store
    }

    pub(super) fn read_node(&mut self, id: PageId) -> Result<Node> {
        Node::decode(&self.store.load(id)?, self.options.dimension)
    }

    pub(super) fn write_node(&mut self, id: PageId, node: &Node) -> Result<PageId> {
        self.store.store(id, &node.encode()?)
    }

    fn tree_header(&self) -> TreeHeader {
        TreeHeader {
            dimension: self.options.dimension,
            index_capacity: self.options.index_capacity,
            leaf_capacity: self.options.leaf_capacity,
            fill_factor: self.options.fill_factor,
            root: self.root,
            height: self.height,
            len: self.len,
        }
    }

    fn write_header(&mut self) -> Result<()> {
        let header = self.tree_header().encode()?;
        let _ = self.store.store(self.header_id, &header)?;
        Ok(())
    }

    fn insert_entry(&mut self, entry: Entry, level: u32) -> Result<()> {
        let root = self.root;
        let (bounds, sibling) = self.insert_at(root, entry, level)?;
        if let Some(sibling) = sibling {
            let new_root = Node {
                level: self.height,
                entries: vec![
                    Entry {
                        region: bounds,
                        id: root,
                    },
                    sibling,
                ],
            };
            self.root = self.write_node(NEW_PAGE, &new_root)?;
            self.height += 1;
        }
        Ok(())
    }

    fn insert_at(&mut self, node_id: PageId, entry: Entry, level: u32) -> Result<(Region, Option<Entry>)> {
        let mut node = self.read_node(node_id)?;
        if node.level == level {
            node.entries.push(entry);
        } else {
            let i = choose_subtree(&node, &entry.region);
            let (bounds, sibling) = self.insert_at(node.entries[i].id, entry, level)?;
            node.entries[i].region = bounds;
            node.entries.extend(sibling);
        }
        let dimension = self.options.dimension;
        if node.entries.len() > self.options.capacity(node.level) {
            let (left, right) = split(
                std::mem::take(&mut node.entries),
                self.options.min_entries(node.level),
                dimension,
            );
            node.entries = left;
            let sibling = Node {
                level: node.level,
                entries: right,
            };
            let _ = self.write_node(node_id, &node)?;
            let sibling_id = self.write_node(NEW_PAGE, &sibling)?;
            Ok((
                node.bounds(dimension),
                Some(Entry {
                    region: sibling.bounds(dimension),
                    id: sibling_id,
                }),
            ))
        } else {
            let _ = self.write_node(node_id, &node)?;
            Ok((node.bounds(dimension), None))
        }
    }

    fn remove(
        &mut self,
        node_id: PageId,
        region: &Region,
        id: u64,
        is_root: bool,
        orphans: &mut Vec<Entry>,
    ) -> Result<Removal> {
        let mut node = self.read_node(node_id)?;
        if node.is_leaf() {
            match node
                .entries
                .iter()
                .position(|entry| entry.id == id && entry.region == *region)
            {
                Some(i) => {
                    let _ = node.entries.remove(i);
                }
                None => return Ok(Removal::NotFound),
            }
        } else {
            let mut found = false;
            for i in 0..node.entries.len() {
                if !node.entries[i].region.contains(region) {
                    continue;
                }
                let child = node.entries[i].id;
                match self.remove(child, region, id, false, orphans)? {
                    Removal::NotFound => continue,
                    Removal::Removed { underfull: true, .. } => {
                        self.collect(child, orphans)?;
                        let _ = node.entries.remove(i);
                    }
                    Removal::Removed { bounds, .. } => node.entries[i].region = bounds,
                }
                found = true;
                break;
            }
            if !found {
                return Ok(Removal::NotFound);
            }
        }
        let _ = self.write_node(node_id, &node)?;
        Ok(Removal::Removed {
            bounds: node.bounds(self.options.dimension),
            underfull: !is_root && node.entries.len() < self.options.min_entries(node.level),
        })
    }

    /// Deletes a subtree, keeping its data entries.
    fn collect(&mut self, node_id: PageId, orphans: &mut Vec<Entry>) -> Result<()> {
        let node = self.read_node(node_id)?;
        if node.is_leaf() {
            orphans.extend(node.entries);
        } else {
            for entry in node.entries {
                self.collect(entry.id, orphans)?;
            }
        }
        self.store.delete(node_id)
    }

    fn search(&mut self, node_id: PageId, region: &Region, ids: &mut Vec<u64>) -> Result<()> {
        let node = self.read_node(node_id)?;
        for entry in node.entries {
            if !entry.region.intersects(region) {
                continue;
            }
            if node.level == 0 {
                ids.push(entry.id);
            } else {
                self.search(entry.id, region, ids)?;
            }
        }
        Ok(())
    }

    fn find_nearest(
        &mut self,
        node_id: PageId,
        coordinates: &[f64],
        k: usize,
        results: &mut Vec<(u64, f64)>,
        max_distance: &mut f64,
    ) -> Result<()> {
        let node = self.read_node(node_id)?;
        let mut candidates: Vec<(u64, f64)> = node
            .entries
            .iter()
            .map(|entry| (entry.id, entry.region.min_distance(coordinates)))
            .collect();
        if node.is_leaf() {
            for (id, distance) in candidates {
                if distance <= *max_distance {
                    results.push((id, distance));
                    if results.len() > k {
                        sort_by_distance(results);
                        results.truncate(k);
                        if let Some(&(_, distance)) = results.last() {
                            *max_distance = distance;
                        }
                    }
                }
            }
        } else {
            sort_by_distance(&mut candidates);
            for (child, distance) in candidates {
                if distance > *max_distance {
                    break;
                }
                self.find_nearest(child, coordinates, k, results, max_distance)?;
            }
        }
        Ok(())
    }
}

fn sort_by_distance(results: &mut [(u64, f64)]) {
    results.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
}

/// Picks the child to descend into: least overlap enlargement above leaves, least area
/// enlargement elsewhere, ties going to the smaller child.
fn choose_subtree(node: &Node, region: &Region) -> usize {
    let cost = |i: usize| {
        let child = &node.entries[i].region;
        let enlarged = child.combine(region);
        let area_enlargement = enlarged.area() - child.area();
        let overlap_enlargement = if node.level == 1 {
            node.entries
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, other)| enlarged.overlap(&other.region) - child.overlap(&other.region))
                .sum::<f64>()
        } else {
            0.
        };
        (overlap_enlargement, area_enlargement, child.area())
    };
    (0..node.entries.len())
        .map(|i| (i, cost(i)))
        .min_by(|(_, a), (_, b)| {
            a.0.total_cmp(&b.0)
                .then(a.1.total_cmp(&b.1))
                .then(a.2.total_cmp(&b.2))
        })
        .map_or(0, |(i, _)| i)
}

/// Splits an overfull node's entries in two.
///
/// The split axis is the one whose candidate distributions have the least total margin. Along it,
/// the distribution with the least overlap wins, then the one with the least area.
fn split(mut entries: Vec<Entry>, min_entries: usize, dimension: u32) -> (Vec<Entry>, Vec<Entry>) {
    let n = entries.len();
    let distributions = min_entries..=(n - min_entries);
    let by_min = |axis: usize| {
        move |a: &Entry, b: &Entry| {
            a.region.min()[axis]
                .total_cmp(&b.region.min()[axis])
                .then(a.region.max()[axis].total_cmp(&b.region.max()[axis]))
        }
    };
    let by_max = |axis: usize| {
        move |a: &Entry, b: &Entry| {
            a.region.max()[axis]
                .total_cmp(&b.region.max()[axis])
                .then(a.region.min()[axis].total_cmp(&b.region.min()[axis]))
        }
    };

    let mut best_axis = 0;
    let mut best_margin = f64::INFINITY;
    for axis in 0..dimension as usize {
        let mut margin = 0.;
        for lower in [true, false] {
            if lower {
                entries.sort_by(by_min(axis));
            } else {
                entries.sort_by(by_max(axis));
            }
            for k in distributions.clone() {
                margin += bounds(&entries[..k], dimension).margin()
                    + bounds(&entries[k..], dimension).margin();
            }
        }
        if margin < best_margin {
            best_margin = margin;
            best_axis = axis;
        }
    }

    let mut best: Option<(bool, usize, f64, f64)> = None;
    for lower in [true, false] {
        if lower {
            entries.sort_by(by_min(best_axis));
        } else {
            entries.sort_by(by_max(best_axis));
        }
        for k in distributions.clone() {
            let left = bounds(&entries[..k], dimension);
            let right = bounds(&entries[k..], dimension);
            let overlap = left.overlap(&right);
            let area = left.area() + right.area();
            let better = match best {
                None => true,
                Some((_, _, best_overlap, best_area)) => {
                    match overlap.total_cmp(&best_overlap) {
                        Ordering::Less => true,
                        Ordering::Equal => area < best_area,
                        Ordering::Greater => false,
                    }
                }
            };
            if better {
                best = Some((lower, k, overlap, area));
            }
        }
    }

    let (lower, k) = best.map_or((true, n / 2), |(lower, k, _, _)| (lower, k));
    if lower {
        entries.sort_by(by_min(best_axis));
    } else {
        entries.sort_by(by_max(best_axis));
    }
    let right = entries.split_off(k);
    (entries, right)
}

pub(super) fn bounds(entries: &[Entry], dimension: u32) -> Region {
    entries
        .iter()
        .fold(Region::empty(dimension), |bounds, entry| {
            bounds.combine(&entry.region)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::MemoryStore;

    fn options(capacity: u32) -> RTreeOptions {
        RTreeOptions {
            index_capacity: capacity,
            leaf_capacity: capacity,
            ..Default::default()
        }
    }

    fn grid(tree: &mut RTree<MemoryStore>, n: u64) {
        for i in 0..n {
            let region = Region::point(&[(i % 10) as f64, (i / 10) as f64]).unwrap();
            tree.insert(region, i).unwrap();
        }
    }

    fn sorted(mut ids: Vec<u64>) -> Vec<u64> {
        ids.sort_unstable();
        ids
    }

    #[test]
    fn invalid_options() {
        assert!(RTree::create(MemoryStore::default(), RTreeOptions { dimension: 4, ..Default::default() }).is_err());
        assert!(RTree::create(MemoryStore::default(), RTreeOptions { fill_factor: 0., ..Default::default() }).is_err());
        assert!(RTree::create(MemoryStore::default(), RTreeOptions { fill_factor: 1.5, ..Default::default() }).is_err());
        assert!(RTree::create(MemoryStore::default(), RTreeOptions { index_capacity: 2, ..Default::default() }).is_err());
    }

    #[test]
    fn header_is_page_zero() {
        let tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
        assert_eq!(0, tree.header_id());
        assert_eq!(1, tree.height());
        assert!(tree.is_empty());
    }

    #[test]
    fn splits_grow_the_tree() {
        let mut tree = RTree::create(MemoryStore::default(), options(4)).unwrap();
        grid(&mut tree, 100);
        assert_eq!(100, tree.len());
        assert!(tree.height() > 2);
        for block in tree.blocks().unwrap() {
            assert!(block.ids.len() <= 4);
        }
        let all: Vec<u64> = tree.blocks().unwrap().into_iter().flat_map(|b| b.ids).collect();
        assert_eq!((0..100).collect::<Vec<_>>(), sorted(all));
    }

    #[test]
    fn intersects_and_query_agree() {
        let mut tree = RTree::create(MemoryStore::default(), options(4)).unwrap();
        grid(&mut tree, 100);
        let region = Region::new_2d([2., 3.], [4., 5.]);
        let ids = sorted(tree.intersects(&region).unwrap());
        assert_eq!(vec![32, 33, 34, 42, 43, 44, 52, 53, 54], ids);
        let result = tree.query(&region).unwrap();
        assert_eq!(ids, sorted(result.ids.clone()));
        for block in &result.blocks {
            for id in &block.ids {
                assert!(result.ids.contains(id));
            }
            assert!(block.bounds.intersects(&region));
        }
    }

    #[test]
    fn dimension_mismatch() {
        let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
        let region = Region::point(&[1., 2., 3.]).unwrap();
        assert!(matches!(
            tree.insert(region, 1),
            Err(Error::DimensionMismatch { expected: 2, found: 3 })
        ));
        assert!(tree.intersects(&region).is_err());
        assert!(tree.nearest(&[1., 2., 3.], 1).is_err());
    }

    #[test]
    fn nearest() {
        let mut tree = RTree::create(MemoryStore::default(), options(4)).unwrap();
        grid(&mut tree, 100);
        let nearest = tree.nearest(&[0., 0.], 3).unwrap();
        assert_eq!((0, 0.), nearest[0]);
        assert_eq!(1., nearest[1].1);
        assert_eq!(1., nearest[2].1);
        assert_eq!(vec![1, 10], sorted(nearest[1..].iter().map(|&(id, _)| id).collect()));
        assert!(tree.nearest(&[0., 0.], 0).unwrap().is_empty());
        assert_eq!(100, tree.nearest(&[0., 0.], 1000).unwrap().len());
    }

    #[test]
    fn delete_everything() {
        let mut tree = RTree::create(MemoryStore::default(), options(4)).unwrap();
        grid(&mut tree, 60);
        for i in (0..60).rev() {
            let region = Region::point(&[(i % 10) as f64, (i / 10) as f64]).unwrap();
            assert!(tree.delete(&region, i).unwrap());
            assert!(!tree.delete(&region, i).unwrap());
            let remaining = sorted(tree.intersects(&Region::new_2d([-1., -1.], [10., 10.])).unwrap());
            assert_eq!((0..i).collect::<Vec<_>>(), remaining);
        }
        assert!(tree.is_empty());
        assert_eq!(1, tree.height());
        let store = tree.into_store();
        assert_eq!(2, store.len());
    }

    #[test]
    fn split_respects_minimum_fill() {
        let entries: Vec<Entry> = (0..11)
            .map(|i| Entry {
                region: Region::point(&[i as f64, (i * i) as f64]).unwrap(),
                id: i,
            })
            .collect();
        let (left, right) = split(entries, 4, 2);
        assert!(left.len() >= 4);
        assert!(right.len() >= 4);
        assert_eq!(11, left.len() + right.len());
        assert_eq!(0., bounds(&left, 2).overlap(&bounds(&right, 2)));
    }

    #[test]
    fn open_reloads() {
        let mut tree = RTree::create(MemoryStore::default(), options(5)).unwrap();
        grid(&mut tree, 50);
        let height = tree.height();
        let store = tree.into_store();
        let mut tree = RTree::open(store, 0).unwrap();
        assert_eq!(50, tree.len());
        assert_eq!(height, tree.height());
        assert_eq!(options(5), *tree.options());
        assert_eq!(Region::new_2d([0., 0.], [9., 4.]), tree.bounds().unwrap());
    }

    #[test]
    fn open_non_header() {
        let mut tree = RTree::create(MemoryStore::default(), Default::default()).unwrap();
        tree.insert(Region::point(&[0., 0.]).unwrap(), 0).unwrap();
        let store = tree.into_store();
        assert!(matches!(RTree::open(store, 1), Err(Error::CorruptIndex(_))));
    }
}
