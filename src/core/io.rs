//! Input reading abstraction
//!
//! Opens query and annotation tables with transparent compression handling:
//! gzip and bzip2 are detected by extension or magic bytes, large plain
//! files are memory-mapped, everything else goes through a buffered reader.

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

/// Default buffer size for BufReader (128KB)
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Threshold for using memory mapping (100MB)
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Compression format of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    /// Plain text (uncompressed)
    Plain,
    /// Gzip compressed (.gz)
    Gzip,
    /// Bzip2 compressed (.bz2)
    Bzip2,
}

/// Detect compression format from file extension and/or magic bytes
///
/// - .gz extension or gzip magic bytes (1f 8b)
/// - .bz2 extension or bzip2 magic bytes (42 5a 68)
/// - Plain text otherwise
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if extension == "gz" {
        return Ok(CompressionFormat::Gzip);
    }
    if extension == "bz2" {
        return Ok(CompressionFormat::Bzip2);
    }

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    if bytes_read >= 2 && magic[0] == 0x1f && magic[1] == 0x8b {
        return Ok(CompressionFormat::Gzip);
    }
    if bytes_read >= 3 && magic[0] == 0x42 && magic[1] == 0x5a && magic[2] == 0x68 {
        return Ok(CompressionFormat::Bzip2);
    }

    Ok(CompressionFormat::Plain)
}

/// A reader that selects the decoding and buffering strategy per file
pub enum SmartReader {
    /// Buffered reader for plain files
    Buffered(BufReader<File>),
    /// Memory-mapped reader for large plain files
    Mapped(MappedReader),
    /// Gzip-decoding reader
    Gzip(BufReader<GzDecoder<File>>),
    /// Bzip2-decoding reader
    Bzip2(BufReader<BzDecoder<File>>),
}

impl SmartReader {
    /// Open a file, detecting compression and picking the I/O strategy
    pub fn open(path: &Path) -> io::Result<Self> {
        match detect_compression(path)? {
            CompressionFormat::Gzip => {
                let decoder = GzDecoder::new(File::open(path)?);
                Ok(SmartReader::Gzip(BufReader::with_capacity(
                    DEFAULT_BUFFER_SIZE,
                    decoder,
                )))
            }
            CompressionFormat::Bzip2 => {
                let decoder = BzDecoder::new(File::open(path)?);
                Ok(SmartReader::Bzip2(BufReader::with_capacity(
                    DEFAULT_BUFFER_SIZE,
                    decoder,
                )))
            }
            CompressionFormat::Plain => {
                let file = File::open(path)?;
                if file.metadata()?.len() >= MMAP_THRESHOLD {
                    Ok(SmartReader::Mapped(MappedReader::new(&file)?))
                } else {
                    Ok(SmartReader::Buffered(BufReader::with_capacity(
                        DEFAULT_BUFFER_SIZE,
                        file,
                    )))
                }
            }
        }
    }
}

impl Read for SmartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            SmartReader::Buffered(r) => r.read(buf),
            SmartReader::Mapped(r) => r.read(buf),
            SmartReader::Gzip(r) => r.read(buf),
            SmartReader::Bzip2(r) => r.read(buf),
        }
    }
}

impl BufRead for SmartReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            SmartReader::Buffered(r) => r.fill_buf(),
            SmartReader::Mapped(r) => r.fill_buf(),
            SmartReader::Gzip(r) => r.fill_buf(),
            SmartReader::Bzip2(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            SmartReader::Buffered(r) => r.consume(amt),
            SmartReader::Mapped(r) => r.consume(amt),
            SmartReader::Gzip(r) => r.consume(amt),
            SmartReader::Bzip2(r) => r.consume(amt),
        }
    }
}

/// Memory-mapped file reader
pub struct MappedReader {
    mmap: Mmap,
    position: usize,
}

impl MappedReader {
    /// Create a new memory-mapped reader
    pub fn new(file: &File) -> io::Result<Self> {
        // SAFETY: We assume the file won't be modified while mapped
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap, position: 0 })
    }

    /// Get the entire file content as a byte slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Get file size
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

impl Read for MappedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.mmap[self.position..];
        let to_read = std::cmp::min(buf.len(), remaining.len());
        buf[..to_read].copy_from_slice(&remaining[..to_read]);
        self.position += to_read;
        Ok(to_read)
    }
}

impl BufRead for MappedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(&self.mmap[self.position..])
    }

    fn consume(&mut self, amt: usize) {
        self.position = std::cmp::min(self.position + amt, self.mmap.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bed.gz");
        std::fs::write(&path, b"not really gzip").unwrap();
        assert_eq!(detect_compression(&path).unwrap(), CompressionFormat::Gzip);

        let path = dir.path().join("table.bed.bz2");
        std::fs::write(&path, b"not really bzip2").unwrap();
        assert_eq!(detect_compression(&path).unwrap(), CompressionFormat::Bzip2);
    }

    #[test]
    fn test_detect_by_magic_bytes() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("gzipped");
        let mut encoder =
            flate2::write::GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::default());
        encoder.write_all(b"chr1\t1\t2\n").unwrap();
        encoder.finish().unwrap();
        assert_eq!(detect_compression(&path).unwrap(), CompressionFormat::Gzip);

        let path = dir.path().join("plain");
        std::fs::write(&path, b"chr1\t1\t2\n").unwrap();
        assert_eq!(detect_compression(&path).unwrap(), CompressionFormat::Plain);
    }

    #[test]
    fn test_smart_reader_roundtrip_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bed.gz");
        let mut encoder =
            flate2::write::GzEncoder::new(File::create(&path).unwrap(), flate2::Compression::default());
        encoder.write_all(b"chr1\t100\t200\nchr2\t5\t10\n").unwrap();
        encoder.finish().unwrap();

        let reader = SmartReader::open(&path).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t100\t200", "chr2\t5\t10"]);
    }

    #[test]
    fn test_smart_reader_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.bed");
        std::fs::write(&path, b"chr1\t100\t200\n").unwrap();

        let reader = SmartReader::open(&path).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["chr1\t100\t200"]);
    }
}
