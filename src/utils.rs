use crate::{Error, Result};
use std::str;

pub(crate) trait AsLasStr {
    /// Interprets the bytes as a nul-terminated string.
    ///
    /// Anything after the first nul is ignored.
    fn as_las_str(&self) -> Result<&str>;
}

pub(crate) trait FromLasStr {
    /// Fills the bytes with the ascii string, padding with nuls.
    fn from_las_str(&mut self, s: &str) -> Result<()>;
}

impl AsLasStr for [u8] {
    fn as_las_str(&self) -> Result<&str> {
        let end = self.iter().position(|&n| n == 0).unwrap_or(self.len());
        str::from_utf8(&self[..end]).map_err(Error::from)
    }
}

impl FromLasStr for [u8] {
    fn from_las_str(&mut self, s: &str) -> Result<()> {
        if !s.is_ascii() {
            return Err(Error::NotAscii(s.to_string()));
        }
        if s.len() > self.len() {
            return Err(Error::StringTooLong {
                string: s.to_string(),
                len: self.len(),
            });
        }
        self.fill(0);
        self[..s.len()].copy_from_slice(s.as_bytes());
        Ok(())
    }
}
