//! Tree pages and their byte layout.

use super::{PageId, Region};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

const TREE_MAGIC: [u8; 4] = *b"LSRT";

/// An entry in a node: a data id in a leaf, or a child page in an index node.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Entry {
    pub(crate) region: Region,
    pub(crate) id: u64,
}

/// A tree page. Leaves are level zero.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Node {
    pub(crate) level: u32,
    pub(crate) entries: Vec<Entry>,
}

/// The bookkeeping page that lets a tree be reopened.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TreeHeader {
    pub(crate) dimension: u32,
    pub(crate) index_capacity: u32,
    pub(crate) leaf_capacity: u32,
    pub(crate) fill_factor: f64,
    pub(crate) root: PageId,
    pub(crate) height: u32,
    pub(crate) len: u64,
}

impl Node {
    pub(crate) fn leaf() -> Node {
        Node {
            level: 0,
            entries: Vec::new(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    pub(crate) fn bounds(&self, dimension: u32) -> Region {
        self.entries
            .iter()
            .fold(Region::empty(dimension), |bounds, entry| {
                bounds.combine(&entry.region)
            })
    }

    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.write_u32::<LittleEndian>(self.level)?;
        bytes.write_u32::<LittleEndian>(u32::try_from(self.entries.len())?)?;
        for entry in &self.entries {
            for &value in entry.region.min().iter().chain(entry.region.max()) {
                bytes.write_f64::<LittleEndian>(value)?;
            }
            bytes.write_u64::<LittleEndian>(entry.id)?;
        }
        Ok(bytes)
    }

    pub(crate) fn decode(bytes: &[u8], dimension: u32) -> Result<Node> {
        let mut read = Cursor::new(bytes);
        let level = read.read_u32::<LittleEndian>().map_err(corrupt)?;
        let count = read.read_u32::<LittleEndian>().map_err(corrupt)?;
        let entry_len = 16 * u64::from(dimension) + 8;
        let remaining = bytes.len() as u64 - read.position();
        if remaining < u64::from(count) * entry_len {
            return Err(Error::CorruptIndex(format!(
                "node claims {} entries but holds {} bytes",
                count, remaining
            )));
        }
        let axes = usize::try_from(dimension)?;
        let mut entries = Vec::with_capacity(usize::try_from(count)?);
        for _ in 0..count {
            let mut min = [0.; 3];
            let mut max = [0.; 3];
            for value in min.iter_mut().take(axes) {
                *value = read.read_f64::<LittleEndian>().map_err(corrupt)?;
            }
            for value in max.iter_mut().take(axes) {
                *value = read.read_f64::<LittleEndian>().map_err(corrupt)?;
            }
            let region = if axes == 2 {
                Region::new_2d([min[0], min[1]], [max[0], max[1]])
            } else {
                Region::new_3d(min, max)
            };
            let id = read.read_u64::<LittleEndian>().map_err(corrupt)?;
            entries.push(Entry { region, id });
        }
        Ok(Node { level, entries })
    }
}

impl TreeHeader {
    pub(crate) fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = TREE_MAGIC.to_vec();
        bytes.write_u32::<LittleEndian>(self.dimension)?;
        bytes.write_u32::<LittleEndian>(self.index_capacity)?;
        bytes.write_u32::<LittleEndian>(self.leaf_capacity)?;
        bytes.write_f64::<LittleEndian>(self.fill_factor)?;
        bytes.write_u64::<LittleEndian>(self.root)?;
        bytes.write_u32::<LittleEndian>(self.height)?;
        bytes.write_u64::<LittleEndian>(self.len)?;
        Ok(bytes)
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<TreeHeader> {
        let mut read = Cursor::new(bytes);
        let mut magic = [0; 4];
        read.read_exact(&mut magic).map_err(corrupt)?;
        if magic != TREE_MAGIC {
            return Err(Error::CorruptIndex(format!(
                "not a tree header page: {:?}",
                magic
            )));
        }
        Ok(TreeHeader {
            dimension: read.read_u32::<LittleEndian>().map_err(corrupt)?,
            index_capacity: read.read_u32::<LittleEndian>().map_err(corrupt)?,
            leaf_capacity: read.read_u32::<LittleEndian>().map_err(corrupt)?,
            fill_factor: read.read_f64::<LittleEndian>().map_err(corrupt)?,
            root: read.read_u64::<LittleEndian>().map_err(corrupt)?,
            height: read.read_u32::<LittleEndian>().map_err(corrupt)?,
            len: read.read_u64::<LittleEndian>().map_err(corrupt)?,
        })
    }
}

fn corrupt(err: std::io::Error) -> Error {
    Error::CorruptIndex(err.to_string())
}
