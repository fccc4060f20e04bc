//! GBA BIOS compatible compression filters.
//!
//! Every method shares the BIOS container: a little-endian `u32` header
//! `(uncompressed_len << 8) | type`, followed by the method's payload, padded
//! with zeros to a multiple of four bytes.
pub mod huffman;
pub mod lz77;
pub mod rle;

use serde::Serialize;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::error::ExportError;

const MAX_UNCOMPRESSED_LEN: usize = 0x00ff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompressionMethod {
    #[serde(rename = "LZ77")]
    Lz77,
    #[serde(rename = "RLE")]
    Rle,
    Huffman4,
    Huffman8,
}

impl CompressionMethod {
    pub const ALL: [CompressionMethod; 4] = [
        CompressionMethod::Lz77,
        CompressionMethod::Rle,
        CompressionMethod::Huffman4,
        CompressionMethod::Huffman8,
    ];

    /// Name used by the `Compression` layer property.
    pub fn name(self) -> &'static str {
        match self {
            CompressionMethod::Lz77 => "LZ77",
            CompressionMethod::Rle => "RLE",
            CompressionMethod::Huffman4 => "Huffman4",
            CompressionMethod::Huffman8 => "Huffman8",
        }
    }

    /// Compress a complete buffer into the BIOS container.
    pub fn compress(self, input: &[u8]) -> io::Result<Vec<u8>> {
        match self {
            CompressionMethod::Lz77 => lz77::compress(input),
            CompressionMethod::Rle => rle::compress(input),
            CompressionMethod::Huffman4 => huffman::compress(input, 4),
            CompressionMethod::Huffman8 => huffman::compress(input, 8),
        }
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionMethod {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ExportError::InvalidCompressionMethod(s.to_string()))
    }
}

/// Compressing writer.
///
/// The BIOS header carries the uncompressed size, so writes are buffered and
/// the compressed stream reaches the inner writer on [`Compressor::finish`].
/// If the compressor is dropped without being finished it still tries to
/// finish, ignoring errors.
pub struct Compressor<W: Write> {
    inner: Option<W>,
    method: CompressionMethod,
    buf: Vec<u8>,
    finished: bool,
}

impl<W: Write> Compressor<W> {
    pub fn new(inner: W, method: CompressionMethod) -> Self {
        Self {
            inner: Some(inner),
            method,
            buf: Vec::new(),
            finished: false,
        }
    }

    /// Compress everything written so far, write it out and return the
    /// inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.try_finish()?;
        self.inner
            .take()
            .ok_or_else(|| io::Error::other("compressor has no inner writer"))
    }

    fn try_finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        let packed = self.method.compress(&self.buf)?;
        tracing::trace!(
            method = %self.method,
            raw = self.buf.len(),
            packed = packed.len(),
            "compressed stream"
        );
        if let Some(w) = self.inner.as_mut() {
            w.write_all(&packed)?;
            w.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Write for Compressor<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(io::Error::other("write after finish"));
        }
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<W: Write> Drop for Compressor<W> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.try_finish();
        }
    }
}

pub(crate) fn header(kind: u8, len: usize) -> io::Result<Vec<u8>> {
    if len > MAX_UNCOMPRESSED_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{len} bytes is too large for a BIOS compression header"),
        ));
    }
    let word = ((len as u32) << 8) | kind as u32;
    Ok(word.to_le_bytes().to_vec())
}

pub(crate) fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_knows_exactly_four_methods() {
        for m in CompressionMethod::ALL {
            assert_eq!(m.name().parse::<CompressionMethod>().unwrap(), m);
        }
        for bad in ["Zstd", "lz77", "Huffman1", ""] {
            assert!(matches!(
                bad.parse::<CompressionMethod>(),
                Err(ExportError::InvalidCompressionMethod(name)) if name == bad
            ));
        }
    }

    #[test]
    fn header_packs_length_and_type() {
        assert_eq!(header(0x10, 0x123456).unwrap(), vec![0x10, 0x56, 0x34, 0x12]);
        assert!(header(0x10, 0x0100_0000).is_err());
    }

    #[test]
    fn finish_writes_once() {
        let mut c = Compressor::new(Vec::new(), CompressionMethod::Rle);
        c.write_all(&[7; 10]).unwrap();
        let out = c.finish().unwrap();
        assert_eq!(out, rle::compress(&[7; 10]).unwrap());
    }

    #[test]
    fn drop_still_finishes() {
        let mut out = Vec::new();
        {
            let mut c = Compressor::new(&mut out, CompressionMethod::Lz77);
            c.write_all(b"abcabcabc").unwrap();
        }
        assert_eq!(out, lz77::compress(b"abcabcabc").unwrap());
    }
}
