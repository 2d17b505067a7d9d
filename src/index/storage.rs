use crate::{Error, Result};

/// The id of a page in a [ByteStore].
pub type PageId = u64;

/// Passed to [ByteStore::store] to allocate a new page.
pub const NEW_PAGE: PageId = u64::MAX;

/// A page-addressed byte store, the storage behind an [RTree](super::RTree).
///
/// # Examples
///
/// ```
/// use lasindex::Error;
/// use lasindex::index::{ByteStore, MemoryStore, NEW_PAGE};
///
/// let mut store = MemoryStore::default();
/// let id = store.store(NEW_PAGE, b"hello").unwrap();
/// assert_eq!(b"hello".to_vec(), store.load(id).unwrap());
/// store.delete(id).unwrap();
/// assert!(matches!(store.load(id), Err(Error::InvalidPage(_))));
/// ```
pub trait ByteStore {
    /// Loads the bytes of a page.
    fn load(&mut self, id: PageId) -> Result<Vec<u8>>;

    /// Stores bytes into a page and returns its id.
    ///
    /// Storing to [NEW_PAGE] allocates a page, reusing deleted ids first. Storing to any other id
    /// overwrites that page, which must exist.
    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId>;

    /// Deletes a page, making its id available for reuse.
    fn delete(&mut self, id: PageId) -> Result<()>;

    /// Makes every stored page durable.
    fn flush(&mut self) -> Result<()>;
}

impl<S: ByteStore + ?Sized> ByteStore for Box<S> {
    fn load(&mut self, id: PageId) -> Result<Vec<u8>> {
        (**self).load(id)
    }
    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId> {
        (**self).store(id, bytes)
    }
    fn delete(&mut self, id: PageId) -> Result<()> {
        (**self).delete(id)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

impl<S: ByteStore + ?Sized> ByteStore for &mut S {
    fn load(&mut self, id: PageId) -> Result<Vec<u8>> {
        (**self).load(id)
    }
    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId> {
        (**self).store(id, bytes)
    }
    fn delete(&mut self, id: PageId) -> Result<()> {
        (**self).delete(id)
    }
    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// A byte store that lives in memory and goes away with the tree.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pages: Vec<Option<Vec<u8>>>,
    free: Vec<PageId>,
}

impl MemoryStore {
    /// Returns the number of live pages.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::{ByteStore, MemoryStore, NEW_PAGE};
    /// let mut store = MemoryStore::default();
    /// assert_eq!(0, store.len());
    /// store.store(NEW_PAGE, &[1, 2, 3]).unwrap();
    /// assert_eq!(1, store.len());
    /// ```
    pub fn len(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Returns true if there are no live pages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn page_mut(&mut self, id: PageId) -> Result<&mut Option<Vec<u8>>> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.pages.get_mut(i))
            .filter(|page| page.is_some())
            .ok_or(Error::InvalidPage(id))
    }
}

impl ByteStore for MemoryStore {
    fn load(&mut self, id: PageId) -> Result<Vec<u8>> {
        self.page_mut(id)?.clone().ok_or(Error::InvalidPage(id))
    }

    fn store(&mut self, id: PageId, bytes: &[u8]) -> Result<PageId> {
        if id != NEW_PAGE {
            *self.page_mut(id)? = Some(bytes.to_vec());
            return Ok(id);
        }
        if let Some(id) = self.free.pop() {
            self.pages[usize::try_from(id)?] = Some(bytes.to_vec());
            Ok(id)
        } else {
            self.pages.push(Some(bytes.to_vec()));
            Ok(u64::try_from(self.pages.len() - 1)?)
        }
    }

    fn delete(&mut self, id: PageId) -> Result<()> {
        *self.page_mut(id)? = None;
        self.free.push(id);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
