//! Per-layer export: constraint checks, bitmap / indexed serialization and
//! the optional compression filter.

use serde::Serialize;
use std::io::Write;

use crate::compress::{CompressionMethod, Compressor};
use crate::console::Console;
use crate::error::ExportError;
use crate::model::{Layer, Map, ResolvedTile, Tileset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerMode {
    Bitmap,
    Indexed,
}

/// What was written for one layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerReport {
    pub name: String,
    pub mode: LayerMode,
    /// Width of one entry; absent for bitmap layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_bits: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<CompressionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<u8>,
    pub tileset: String,
}

/// Check every constraint for `layer` before anything is written, then
/// serialize it into `w`.
pub fn export_layer<W: Write>(
    console: &dyn Console,
    map: &Map,
    layer: &Layer,
    w: W,
) -> Result<LayerReport, ExportError> {
    let tileset = check_layer(console, map, layer)?;

    let compression = layer
        .properties
        .get_opt("Compression")?
        .map(str::parse::<CompressionMethod>)
        .transpose()?;

    match compression {
        Some(method) => {
            // Dropping the compressor on an error path still finishes it.
            let mut sink = Compressor::new(w, method);
            write_cells(console, map, layer, &mut sink)?;
            sink.finish()?;
        }
        None => {
            let mut sink = w;
            write_cells(console, map, layer, &mut sink)?;
            sink.flush()?;
        }
    }

    let (mode, entry_bits) = if layer.options.bitmap {
        (LayerMode::Bitmap, None)
    } else {
        (LayerMode::Indexed, Some(console.entry_bits(map, layer)))
    };

    Ok(LayerReport {
        name: layer.name.clone(),
        mode,
        entry_bits,
        compression,
        bg: layer.options.bg,
        tileset: tileset.name.clone(),
    })
}

fn check_layer<'m>(
    console: &dyn Console,
    map: &'m Map,
    layer: &Layer,
) -> Result<&'m Tileset, ExportError> {
    let tileset = match map.layer_tileset(layer) {
        Some(ts) => ts,
        None if layer.empty => return Err(ExportError::EmptyLayer),
        None => return Err(ExportError::MultipleTilesets),
    };

    let count = tileset.tile_count as usize;
    let max = console.max_tiles(map, layer);
    if count > max {
        return Err(ExportError::TooManyTiles { count, max });
    }

    // Ids past the tileset's end would alias the nil tile.
    if let Some(local_id) = layer
        .tiles
        .iter()
        .filter_map(|t| match t {
            ResolvedTile::Tile { local_id, .. } => Some(*local_id),
            ResolvedTile::Nil => None,
        })
        .find(|&id| id >= tileset.tile_count)
    {
        return Err(ExportError::TileOutOfRange {
            local_id,
            tile_count: tileset.tile_count,
        });
    }
    Ok(tileset)
}

fn write_cells<W: Write>(
    console: &dyn Console,
    map: &Map,
    layer: &Layer,
    w: &mut W,
) -> Result<(), ExportError> {
    if layer.options.bitmap {
        w.write_all(&pack_bitmap(layer))?;
        return Ok(());
    }

    let order = console.byte_order();
    for tile in &layer.tiles {
        console.tile_entry(map, layer, tile)?.write_to(w, order)?;
    }
    Ok(())
}

/// One presence bit per cell; cell `8 * i + j` lands in bit `j` of byte `i`.
pub fn pack_bitmap(layer: &Layer) -> Vec<u8> {
    let mut out = vec![0u8; layer.tiles.len().div_ceil(8)];
    for (i, tile) in layer.tiles.iter().enumerate() {
        if !tile.is_nil() {
            out[i / 8] |= 1 << (i % 8);
        }
    }
    out
}
