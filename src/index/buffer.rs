use super::{ByteStore, NEW_PAGE, PageId};
use crate::Result;
use log::{Level, log};
use std::collections::{HashMap, VecDeque};

/// The number of pages a [BufferedStore] holds by default.
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;

#[derive(Debug)]
struct CachedPage {
    bytes: Vec<u8>,
    dirty: bool,
}

/// A bounded, least-recently-used page cache over another store.
///
/// Writes to a cached page stay in the cache until the page is evicted or the store is flushed,
/// unless the store is write-through. Dirty pages are flushed on drop.
///
/// # Examples
///
/// ```
/// use lasindex::index::{BufferedStore, ByteStore, MemoryStore, NEW_PAGE};
///
/// let mut store = BufferedStore::new(MemoryStore::default());
/// let id = store.store(NEW_PAGE, &[1]).unwrap();
/// store.store(id, &[2]).unwrap(); // cached, not yet written
/// assert_eq!(vec![1], store.inner_mut().load(id).unwrap());
/// store.flush().unwrap();
/// assert_eq!(vec![2], store.inner_mut().load(id).unwrap());
/// ```
#[derive(Debug)]
pub struct BufferedStore<S: ByteStore> {
    inner: S,
    capacity: usize,
    write_through: bool,
    pages: HashMap<PageId, CachedPage>,
    lru_order: VecDeque<PageId>,
    hits: u64,
    misses: u64,
}

impl<S: ByteStore> BufferedStore<S> {
    /// Buffers a store with the default capacity, in write-back mode.
    pub fn new(inner: S) -> BufferedStore<S> {
        BufferedStore::with_capacity(inner, DEFAULT_BUFFER_CAPACITY, false)
    }

    /// Buffers a store with room for `capacity` pages.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(inner: S, capacity: usize, write_through: bool) -> BufferedStore<S> {
        BufferedStore {
            inner,
            capacity: capacity.max(1),
            write_through,
            pages: HashMap::new(),
            lru_order: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the number of pages the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if writes go straight to the inner store.
    pub fn is_write_through(&self) -> bool {
        self.write_through
    }

    /// Returns the number of loads served from the buffer.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the number of loads that went to the inner store.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Returns the inner store.
    ///
    /// Pages that are dirty in the buffer have not reached it yet.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the inner store mutably.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    fn touch(&mut self, id: PageId) {
        self.lru_order.retain(|&page| page != id);
        self.lru_order.push_back(id);
    }

    fn insert(&mut self, id: PageId, bytes: Vec<u8>, dirty: bool) -> Result<()> {
        if !self.pages.contains_key(&id) {
            while self.pages.len() >= self.capacity {
                if !self.evict_oldest()? {
                    break;
                }
            }
        }
        let _ = self.pages.insert(id, CachedPage { bytes, dirty });
        self.touch(id);
        Ok(())
    }

    fn evict_oldest(&mut self) -> Result<bool> {
        while let Some(id) = self.lru_order.pop_front() {
            if let Some(page) = self.pages.remove(&id) {
                if page.dirty {
                    let _ = self.inner.store(id, &page.bytes)?;
                }
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl<S: ByteStore> ByteStore for BufferedStore<S> {
    fn load(&mut self, id: PageId) -> Result<Vec<u8>> {
        if let Some(page) = self.pages.get(&id) {
            let bytes = page.bytes.clone();
            self.hits += 1;
            self.touch(id);
            return Ok(bytes);
        }
        self.misses += 1;
        let bytes = self.inner.load(id)?;
        self.insert(id, bytes.clone(), false)?;
        Ok(bytes)
    }

    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId> {
        if id == NEW_PAGE || self.write_through || !self.pages.contains_key(&id) {
            let id = self.inner.store(id, bytes)?;
            self.insert(id, bytes.to_vec(), false)?;
            Ok(id)
        } else {
            self.insert(id, bytes.to_vec(), true)?;
            Ok(id)
        }
    }

    fn delete(&mut self, id: PageId) -> Result<()> {
        if self.pages.remove(&id).is_some() {
            self.lru_order.retain(|&page| page != id);
        }
        self.inner.delete(id)
    }

    fn flush(&mut self) -> Result<()> {
        let mut dirty: Vec<PageId> = self
            .pages
            .iter()
            .filter(|(_, page)| page.dirty)
            .map(|(&id, _)| id)
            .collect();
        dirty.sort_unstable();
        for id in dirty {
            if let Some(page) = self.pages.get_mut(&id) {
                let _ = self.inner.store(id, &page.bytes)?;
                page.dirty = false;
            }
        }
        self.inner.flush()
    }
}

impl<S: ByteStore> Drop for BufferedStore<S> {
    fn drop(&mut self) {
        if self.pages.values().any(|page| page.dirty) {
            if let Err(err) = self.flush() {
                log!(Level::Warn, "failed to flush buffered pages: {}", err);
            }
        }
    }
}
