//! Hardware targets.
//!
//! A [`Console`] knows how many tiles one layer may index, how a single
//! resolved tile becomes a screenblock entry, and in which byte order
//! entries are stored. New targets add a type implementing the trait; the
//! export pipeline in [`crate::writer::layer`] never changes.
pub mod gba;

use clap::ValueEnum;
use std::io::{self, Write};

use crate::error::ExportError;
use crate::model::{Layer, Map, ResolvedTile};

pub use gba::Gba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

/// One fixed-width screenblock entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEntry {
    U8(u8),
    U16(u16),
}

impl TileEntry {
    pub fn bits(self) -> u32 {
        match self {
            TileEntry::U8(_) => 8,
            TileEntry::U16(_) => 16,
        }
    }

    pub fn write_to<W: Write>(self, w: &mut W, order: ByteOrder) -> io::Result<()> {
        match (self, order) {
            (TileEntry::U8(v), _) => w.write_all(&[v]),
            (TileEntry::U16(v), ByteOrder::Little) => w.write_all(&v.to_le_bytes()),
            (TileEntry::U16(v), ByteOrder::Big) => w.write_all(&v.to_be_bytes()),
        }
    }
}

pub trait Console {
    /// Name accepted by `--console`.
    fn name(&self) -> &'static str;

    /// Largest tileset a layer may draw from.
    fn max_tiles(&self, map: &Map, layer: &Layer) -> usize;

    /// Width of the entries [`Console::tile_entry`] produces for `layer`.
    fn entry_bits(&self, map: &Map, layer: &Layer) -> u32;

    /// Machine-specific screenblock entry for one cell of `layer`.
    fn tile_entry(
        &self,
        map: &Map,
        layer: &Layer,
        tile: &ResolvedTile,
    ) -> Result<TileEntry, ExportError>;

    fn byte_order(&self) -> ByteOrder;
}

/// Targets selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConsoleName {
    /// Game Boy Advance text and affine backgrounds.
    Gba,
}

impl ConsoleName {
    pub fn console(self) -> Box<dyn Console> {
        match self {
            ConsoleName::Gba => Box::new(Gba),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_honour_byte_order() {
        let mut le = Vec::new();
        TileEntry::U16(0x0c01).write_to(&mut le, ByteOrder::Little).unwrap();
        assert_eq!(le, vec![0x01, 0x0c]);

        let mut be = Vec::new();
        TileEntry::U16(0x0c01).write_to(&mut be, ByteOrder::Big).unwrap();
        TileEntry::U8(9).write_to(&mut be, ByteOrder::Big).unwrap();
        assert_eq!(be, vec![0x0c, 0x01, 9]);
    }

    #[test]
    fn console_names_map_to_targets() {
        assert_eq!(ConsoleName::Gba.console().name(), "gba");
    }
}
