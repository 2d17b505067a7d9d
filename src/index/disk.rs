use super::{ByteStore, NEW_PAGE, PageId};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{Level, log};
use std::{
    collections::{BTreeMap, BTreeSet},
    ffi::OsString,
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
};

/// The default size of a physical page, in bytes.
pub const DEFAULT_PAGE_SIZE: u32 = 4096;

#[derive(Clone, Debug, PartialEq)]
struct PageEntry {
    len: u64,
    pages: Vec<u64>,
}

/// A byte store kept in two files next to each other.
///
/// `<name>.dat` holds fixed-size physical pages. `<name>.idx` holds the page size and the page
/// table, which maps each stored id to its length and physical pages. A stored value larger than
/// a page spans several. The id of a value is its first physical page.
///
/// The page table is written on [flush](ByteStore::flush), and on drop.
///
/// # Examples
///
/// ```
/// use lasindex::index::{ByteStore, DiskStore, NEW_PAGE};
///
/// let dir = tempfile::tempdir().unwrap();
/// let name = dir.path().join("tree");
/// let id = {
///     let mut store = DiskStore::create(&name, 64).unwrap();
///     store.store(NEW_PAGE, &[42; 100]).unwrap()
/// };
/// assert!(DiskStore::exists(&name));
/// let mut store = DiskStore::open(&name).unwrap();
/// assert_eq!(vec![42; 100], store.load(id).unwrap());
/// ```
#[derive(Debug)]
pub struct DiskStore {
    data: File,
    idx_path: PathBuf,
    page_size: u32,
    table: BTreeMap<PageId, PageEntry>,
    free: BTreeSet<u64>,
    next_page: u64,
    dirty: bool,
}

impl DiskStore {
    /// Creates a new store, truncating any files already at the name.
    ///
    /// A page size of zero uses [DEFAULT_PAGE_SIZE].
    pub fn create<P: AsRef<Path>>(name: P, page_size: u32) -> Result<DiskStore> {
        let (data_path, idx_path) = paths(name.as_ref());
        let data = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(data_path)?;
        let mut store = DiskStore {
            data,
            idx_path,
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
            table: BTreeMap::new(),
            free: BTreeSet::new(),
            next_page: 0,
            dirty: true,
        };
        store.flush()?;
        Ok(store)
    }

    /// Opens an existing store.
    pub fn open<P: AsRef<Path>>(name: P) -> Result<DiskStore> {
        let (data_path, idx_path) = paths(name.as_ref());
        let data = OpenOptions::new().read(true).write(true).open(data_path)?;
        let mut read = BufReader::new(File::open(&idx_path)?);
        let page_size = read.read_u32::<LittleEndian>()?;
        if page_size == 0 {
            return Err(Error::CorruptIndex("page size of zero".to_string()));
        }
        let next_page = read.read_u64::<LittleEndian>()?;
        let mut free = BTreeSet::new();
        for _ in 0..read.read_u64::<LittleEndian>()? {
            let _ = free.insert(read.read_u64::<LittleEndian>()?);
        }
        let mut table = BTreeMap::new();
        for _ in 0..read.read_u64::<LittleEndian>()? {
            let id = read.read_u64::<LittleEndian>()?;
            let len = read.read_u64::<LittleEndian>()?;
            let mut pages = Vec::new();
            for _ in 0..read.read_u32::<LittleEndian>()? {
                pages.push(read.read_u64::<LittleEndian>()?);
            }
            if pages.first() != Some(&id) {
                return Err(Error::CorruptIndex(format!(
                    "page table entry {} does not start at its own page",
                    id
                )));
            }
            let _ = table.insert(id, PageEntry { len, pages });
        }
        log!(
            Level::Debug,
            "opened disk store {} with {} stored values",
            idx_path.display(),
            table.len()
        );
        Ok(DiskStore {
            data,
            idx_path,
            page_size,
            table,
            free,
            next_page,
            dirty: false,
        })
    }

    /// Returns true if both files of a store exist at the name.
    pub fn exists<P: AsRef<Path>>(name: P) -> bool {
        let (data_path, idx_path) = paths(name.as_ref());
        data_path.is_file() && idx_path.is_file()
    }

    /// Returns the size of a physical page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn allocate(&mut self) -> u64 {
        self.free.pop_first().unwrap_or_else(|| {
            self.next_page += 1;
            self.next_page - 1
        })
    }

    fn pages_for(&self, len: usize) -> usize {
        let page_size = self.page_size as usize;
        len.div_ceil(page_size).max(1)
    }

    fn write_pages(&mut self, pages: &[u64], bytes: &[u8]) -> Result<()> {
        let page_size = self.page_size as usize;
        for (i, &page) in pages.iter().enumerate() {
            let start = (i * page_size).min(bytes.len());
            let end = ((i + 1) * page_size).min(bytes.len());
            let mut padded = bytes[start..end].to_vec();
            padded.resize(page_size, 0);
            let _ = self
                .data
                .seek(SeekFrom::Start(page * u64::from(self.page_size)))?;
            self.data.write_all(&padded)?;
        }
        Ok(())
    }

    fn write_table(&mut self) -> Result<()> {
        let mut write = BufWriter::new(File::create(&self.idx_path)?);
        write.write_u32::<LittleEndian>(self.page_size)?;
        write.write_u64::<LittleEndian>(self.next_page)?;
        write.write_u64::<LittleEndian>(u64::try_from(self.free.len())?)?;
        for &page in &self.free {
            write.write_u64::<LittleEndian>(page)?;
        }
        write.write_u64::<LittleEndian>(u64::try_from(self.table.len())?)?;
        for (&id, entry) in &self.table {
            write.write_u64::<LittleEndian>(id)?;
            write.write_u64::<LittleEndian>(entry.len)?;
            write.write_u32::<LittleEndian>(u32::try_from(entry.pages.len())?)?;
            for &page in &entry.pages {
                write.write_u64::<LittleEndian>(page)?;
            }
        }
        write.flush()?;
        write.get_ref().sync_all()?;
        Ok(())
    }
}

impl ByteStore for DiskStore {
    fn load(&mut self, id: PageId) -> Result<Vec<u8>> {
        let entry = self.table.get(&id).ok_or(Error::InvalidPage(id))?;
        let len = usize::try_from(entry.len)?;
        let mut bytes = vec![0; entry.pages.len() * self.page_size as usize];
        for (chunk, &page) in bytes
            .chunks_mut(self.page_size as usize)
            .zip(&entry.pages)
        {
            let _ = self
                .data
                .seek(SeekFrom::Start(page * u64::from(self.page_size)))?;
            self.data.read_exact(chunk).map_err(Error::from_record_read)?;
        }
        bytes.truncate(len);
        Ok(bytes)
    }

    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId> {
        let needed = self.pages_for(bytes.len());
        let mut pages = if id == NEW_PAGE {
            Vec::new()
        } else {
            self.table
                .get(&id)
                .ok_or(Error::InvalidPage(id))?
                .pages
                .clone()
        };
        let mut allocated = Vec::new();
        while pages.len() < needed {
            let page = self.allocate();
            allocated.push(page);
            pages.push(page);
        }
        if let Err(err) = self.write_pages(&pages[..needed], bytes) {
            self.free.extend(allocated);
            return Err(err);
        }
        self.free.extend(pages.drain(needed..));
        let id = pages[0];
        let _ = self.table.insert(
            id,
            PageEntry {
                len: u64::try_from(bytes.len())?,
                pages,
            },
        );
        self.dirty = true;
        Ok(id)
    }

    fn delete(&mut self, id: PageId) -> Result<()> {
        let entry = self.table.remove(&id).ok_or(Error::InvalidPage(id))?;
        self.free.extend(entry.pages);
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.data.sync_data()?;
        if self.dirty {
            self.write_table()?;
            self.dirty = false;
        }
        Ok(())
    }
}

impl Drop for DiskStore {
    fn drop(&mut self) {
        if self.dirty {
            if let Err(err) = self.flush() {
                log!(
                    Level::Warn,
                    "failed to flush disk store {}: {}",
                    self.idx_path.display(),
                    err
                );
            }
        }
    }
}

fn paths(name: &Path) -> (PathBuf, PathBuf) {
    let with_extension = |extension: &str| {
        let mut path = OsString::from(name.as_os_str());
        path.push(extension);
        PathBuf::from(path)
    };
    (with_extension(".dat"), with_extension(".idx"))
}
