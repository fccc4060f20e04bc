pub mod properties;
pub mod tile;

use serde::Serialize;
use std::str::FromStr;

use crate::error::DecodeError;

pub use properties::{Properties, Property};
pub use tile::{Flip, ResolvedTile, TilesetIndex};

/// One tileset and the GID range `[first_gid, first_gid + tile_count)` it owns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tileset {
    pub first_gid: u32,
    pub tile_count: u32,
    pub name: String,
    /// Path of the external tileset file, if it was not embedded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Ids already enumerated by the markup, one element per cell.
    Inline,
    Csv,
    Base64,
}

impl FromStr for Encoding {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Encoding::Inline),
            "csv" => Ok(Encoding::Csv),
            "base64" => Ok(Encoding::Base64),
            other => Err(DecodeError::UnknownEncoding(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Zlib,
}

impl FromStr for Compression {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Compression::None),
            "gzip" => Ok(Compression::Gzip),
            "zlib" => Ok(Compression::Zlib),
            other => Err(DecodeError::UnknownCompression(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Elements(Vec<u32>),
    Text(String),
}

/// A tile layer's `data` exactly as the markup declared it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerData {
    pub encoding: Encoding,
    pub compression: Compression,
    pub payload: Payload,
}

/// Tile layer before the decode pass.
#[derive(Debug, Clone)]
pub struct RawLayer {
    pub name: String,
    pub data: LayerData,
    pub properties: Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Object {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u32>,
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polyline: Option<Vec<Point>>,
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<Object>,
    #[serde(skip_serializing_if = "Properties::is_empty")]
    pub properties: Properties,
}

/// Entire map as it comes out of the JSON loader.
#[derive(Debug, Clone)]
pub struct RawMap {
    pub width: usize,
    pub height: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: Properties,
    /// Sorted ascending by `first_gid`.
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<RawLayer>,
    pub object_groups: Vec<ObjectGroup>,
}

/// Export settings read from a layer's properties during the decode pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerOptions {
    /// `Bitmap = true`: one presence bit per cell.
    pub bitmap: bool,
    /// `Affine = true`: narrow entries without flip bits.
    pub affine: bool,
    /// `NilTile = N`: index written for nil cells.
    pub nil_tile: Option<u16>,
    /// `BG = 0..3`: hardware background the layer is meant for.
    pub bg: Option<u8>,
}

/// Tile layer after the decode pass. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub properties: Properties,
    /// Row-major, `width * height` cells.
    pub tiles: Vec<ResolvedTile>,
    /// Set only if every non-nil tile comes from the same tileset.
    pub tileset: Option<TilesetIndex>,
    /// Every cell is nil.
    pub empty: bool,
    pub options: LayerOptions,
}

impl Layer {
    pub fn tile_at(&self, x: usize, y: usize) -> Option<&ResolvedTile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x)
    }
}

/// Fully decoded map handed to the exporters.
#[derive(Debug, Clone)]
pub struct Map {
    pub width: usize,
    pub height: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub properties: Properties,
    pub tilesets: Vec<Tileset>,
    pub layers: Vec<Layer>,
    pub object_groups: Vec<ObjectGroup>,
}

impl Map {
    /// The single tileset a layer draws from, if inference found one.
    pub fn layer_tileset(&self, layer: &Layer) -> Option<&Tileset> {
        layer.tileset.and_then(|i| self.tilesets.get(i))
    }
}
