//! Index persistence.
//!
//! Each compressed suffix array serializes to one self-describing binary
//! blob: a fixed header (magic, version, sizes), the alphabet strategy,
//! the BWT and the suffix array, all little-endian. Occurrence samples are
//! cheap to recompute and are rebuilt on load. A bidirectional index
//! stores its two blobs side by side at `<path>.fwd` and `<path>.rev`.

use crate::index::alphabet::AlphabetMap;
use crate::index::bi::BiFmIndex;
use crate::index::csa::CompressedSuffixArray;
use crate::index::fm::{FmIndex, TextView};
use anyhow::{bail, Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Magic number for index blobs ("GXI1" in little-endian)
pub const GXI_MAGIC: u32 = 0x31495847;

/// Current version of the blob format
pub const GXI_VERSION: u32 = 1;

/// Alphabet strategy tags in the blob header
const TAG_IDENTITY: u8 = 0;
const TAG_REDUCED: u8 = 1;

impl<'t> FmIndex<'t> {
    /// Serialize the index blob to `path`.
    pub fn store(&self, path: &Path) -> Result<()> {
        write_csa(self.csa(), path)
    }

    /// Load an index blob from `path` over the same text it was built
    /// from. The text length is validated against the stored size.
    pub fn load(path: &Path, text: &'t [u8]) -> Result<Self> {
        let csa = read_csa(path)?;
        if csa.size() != text.len() as u64 + 1 {
            bail!(
                "index at {} was built over a text of length {}, got {}",
                path.display(),
                csa.size() - 1,
                text.len()
            );
        }
        Ok(FmIndex::from_csa(TextView::Forward(text), csa))
    }
}

impl<'t> BiFmIndex<'t> {
    /// Serialize both sides to `<path>.fwd` and `<path>.rev`.
    pub fn store(&self, path: &Path) -> Result<()> {
        write_csa(self.fwd.csa(), &side_path(path, "fwd"))?;
        write_csa(self.rev.csa(), &side_path(path, "rev"))
    }

    /// Load both sides from `<path>.fwd` / `<path>.rev` over the text the
    /// index was built from.
    pub fn load(path: &Path, text: &'t [u8]) -> Result<Self> {
        let fwd = read_csa(&side_path(path, "fwd"))?;
        let rev = read_csa(&side_path(path, "rev"))?;
        if fwd.size() != text.len() as u64 + 1 || rev.size() != fwd.size() {
            bail!(
                "index at {} does not match a text of length {}",
                path.display(),
                text.len()
            );
        }
        Ok(BiFmIndex::from_parts(
            FmIndex::from_csa(TextView::Forward(text), fwd),
            FmIndex::from_csa(TextView::Reversed(text), rev),
        ))
    }
}

fn side_path(path: &Path, side: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(side);
    PathBuf::from(name)
}

fn write_csa(csa: &CompressedSuffixArray, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    w.write_all(&GXI_MAGIC.to_le_bytes())?;
    w.write_all(&GXI_VERSION.to_le_bytes())?;
    w.write_all(&csa.size().to_le_bytes())?;

    match csa.alphabet() {
        AlphabetMap::Identity { sigma, c } => {
            w.write_all(&[TAG_IDENTITY])?;
            w.write_all(&sigma.to_le_bytes())?;
            for &v in c {
                w.write_all(&v.to_le_bytes())?;
            }
        }
        AlphabetMap::Reduced {
            sigma,
            char_to_comp,
            comp_to_char,
            c,
        } => {
            w.write_all(&[TAG_REDUCED])?;
            w.write_all(&sigma.to_le_bytes())?;
            w.write_all(&(char_to_comp.len() as u32).to_le_bytes())?;
            for &v in char_to_comp {
                w.write_all(&v.to_le_bytes())?;
            }
            for &v in comp_to_char {
                w.write_all(&v.to_le_bytes())?;
            }
            for &v in c {
                w.write_all(&v.to_le_bytes())?;
            }
        }
    }

    w.write_all(csa.bwt_bytes())?;
    for &v in csa.sa_slice() {
        w.write_all(&v.to_le_bytes())?;
    }

    w.flush()
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn read_csa(path: &Path) -> Result<CompressedSuffixArray> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file)? };
    let mut r = BlobReader::new(&mmap, path);

    let magic = r.u32()?;
    if magic != GXI_MAGIC {
        bail!("Invalid index blob {}: bad magic number", path.display());
    }
    let version = r.u32()?;
    if version != GXI_VERSION {
        bail!("Unsupported index blob version: {}", version);
    }

    let n = r.u64()?;

    let tag = r.u8()?;
    let sigma = r.u16()?;
    if sigma < 1 || sigma > 256 {
        bail!("Invalid index blob {}: sigma out of range", path.display());
    }
    let alphabet = match tag {
        TAG_IDENTITY => AlphabetMap::Identity {
            sigma,
            c: r.u64_vec(sigma as usize + 1)?,
        },
        TAG_REDUCED => {
            let chars = r.u32()? as usize;
            AlphabetMap::Reduced {
                sigma,
                char_to_comp: r.u16_vec(chars)?,
                comp_to_char: r.u16_vec(sigma as usize)?,
                c: r.u64_vec(sigma as usize + 1)?,
            }
        }
        _ => bail!("Invalid index blob {}: unknown alphabet tag", path.display()),
    };

    if alphabet.c(sigma) != n {
        bail!(
            "Invalid index blob {}: cumulative counts disagree with size",
            path.display()
        );
    }

    let bwt = r.bytes(n as usize)?.to_vec();
    let sa = r.u64_vec(n as usize)?;
    r.finish()?;

    if bwt.iter().any(|&comp| comp as u16 >= sigma) {
        bail!(
            "Invalid index blob {}: BWT symbol out of range",
            path.display()
        );
    }
    for &pos in &sa {
        if pos >= n {
            bail!(
                "Invalid index blob {}: suffix position out of range",
                path.display()
            );
        }
    }

    Ok(CompressedSuffixArray::from_parts(n, alphabet, bwt, sa))
}

/// Cursor over a memory-mapped blob with bounds checking.
struct BlobReader<'m, 'p> {
    data: &'m [u8],
    offset: usize,
    path: &'p Path,
}

impl<'m, 'p> BlobReader<'m, 'p> {
    fn new(data: &'m [u8], path: &'p Path) -> Self {
        BlobReader {
            data,
            offset: 0,
            path,
        }
    }

    fn bytes(&mut self, len: usize) -> Result<&'m [u8]> {
        if self.offset + len > self.data.len() {
            bail!("Invalid index blob {}: truncated", self.path.display());
        }
        let out = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.bytes(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.bytes(2)?.try_into().unwrap()))
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.bytes(4)?.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.bytes(8)?.try_into().unwrap()))
    }

    fn u16_vec(&mut self, len: usize) -> Result<Vec<u16>> {
        let raw = self.bytes(len * 2)?;
        Ok(raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes(c.try_into().unwrap()))
            .collect())
    }

    fn u64_vec(&mut self, len: usize) -> Result<Vec<u64>> {
        let raw = self.bytes(len * 8)?;
        Ok(raw
            .chunks_exact(8)
            .map(|c| u64::from_le_bytes(c.try_into().unwrap()))
            .collect())
    }

    fn finish(&self) -> Result<()> {
        if self.offset != self.data.len() {
            bail!(
                "Invalid index blob {}: trailing bytes",
                self.path.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fm_index_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx");

        let text = vec![0u8, 1, 2, 3, 0, 1, 2, 3];
        let index = FmIndex::new(&text);
        index.store(&path).unwrap();

        let loaded = FmIndex::load(&path, &text).unwrap();
        assert_eq!(loaded.csa(), index.csa());
    }

    #[test]
    fn test_bi_index_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx");

        let text = vec![2u8, 0, 0, 3, 3, 0, 0, 3, 2, 0, 0, 1];
        let index = BiFmIndex::new(&text);
        index.store(&path).unwrap();

        assert!(dir.path().join("idx.fwd").exists());
        assert!(dir.path().join("idx.rev").exists());

        let loaded = BiFmIndex::load(&path, &text).unwrap();
        assert_eq!(loaded.fwd.csa(), index.fwd.csa());
        assert_eq!(loaded.rev.csa(), index.rev.csa());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let text = vec![0u8, 1];
        assert!(BiFmIndex::load(&dir.path().join("nope"), &text).is_err());
    }

    #[test]
    fn test_load_wrong_text_length_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("idx");

        let text = vec![0u8, 1, 2, 3];
        BiFmIndex::new(&text).store(&path).unwrap();

        let other = vec![0u8, 1, 2];
        assert!(BiFmIndex::load(&path, &other).is_err());
    }

    #[test]
    fn test_load_corrupt_magic_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"not an index").unwrap();

        let text = vec![0u8, 1];
        assert!(FmIndex::load(&path, &text).is_err());
    }
}
