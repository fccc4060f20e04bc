//! Game Boy Advance screenblock entries.
//!
//! Regular (text) backgrounds use 16-bit entries: tile index in bits 0-9,
//! horizontal flip in bit 10, vertical flip in bit 11. Affine backgrounds
//! (`Affine = true`) use one byte per cell and cannot flip tiles.

use super::{ByteOrder, Console, TileEntry};
use crate::error::ExportError;
use crate::model::{Layer, Map, ResolvedTile};

pub const H_FLIP: u16 = 1 << 10;
pub const V_FLIP: u16 = 1 << 11;

// One index is kept free for the nil tile.
const MAX_TILES_TEXT: usize = 511;
const MAX_TILES_AFFINE: usize = 255;

#[derive(Debug, Clone, Copy, Default)]
pub struct Gba;

impl Gba {
    fn nil_tile(&self, map: &Map, layer: &Layer) -> Result<TileEntry, ExportError> {
        let value = match layer.options.nil_tile {
            Some(v) => v,
            None => {
                let tileset = map
                    .layer_tileset(layer)
                    .ok_or(if layer.empty {
                        ExportError::EmptyLayer
                    } else {
                        ExportError::MultipleTilesets
                    })?;
                u16::try_from(tileset.tile_count).unwrap_or(u16::MAX)
            }
        };

        if !layer.options.affine {
            return Ok(TileEntry::U16(value));
        }
        u8::try_from(value)
            .map(TileEntry::U8)
            .map_err(|_| ExportError::NilTileOutOfRange { value, bits: 8 })
    }
}

impl Console for Gba {
    fn name(&self) -> &'static str {
        "gba"
    }

    fn max_tiles(&self, _map: &Map, layer: &Layer) -> usize {
        if layer.options.affine {
            MAX_TILES_AFFINE
        } else {
            MAX_TILES_TEXT
        }
    }

    fn entry_bits(&self, _map: &Map, layer: &Layer) -> u32 {
        if layer.options.affine { 8 } else { 16 }
    }

    fn tile_entry(
        &self,
        map: &Map,
        layer: &Layer,
        tile: &ResolvedTile,
    ) -> Result<TileEntry, ExportError> {
        let (local_id, flip) = match tile {
            ResolvedTile::Nil => return self.nil_tile(map, layer),
            ResolvedTile::Tile { local_id, flip, .. } => (*local_id, *flip),
        };

        let max = self.max_tiles(map, layer);
        if local_id as usize >= max {
            return Err(ExportError::TooManyTiles {
                count: local_id as usize + 1,
                max,
            });
        }

        if layer.options.affine {
            return Ok(TileEntry::U8(local_id as u8));
        }

        // Diagonal flips have no screenblock bit and are dropped.
        let mut entry = local_id as u16;
        if flip.horizontal {
            entry |= H_FLIP;
        }
        if flip.vertical {
            entry |= V_FLIP;
        }
        Ok(TileEntry::U16(entry))
    }

    fn byte_order(&self) -> ByteOrder {
        ByteOrder::Little
    }
}
