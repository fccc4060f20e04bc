//! Error types shared by the loader, the decode pass and the exporters.

use std::io;
use thiserror::Error;

/// Format errors raised while turning layer payloads into tiles.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid encoding scheme `{0}`")]
    UnknownEncoding(String),
    #[error("invalid compression method `{0}`")]
    UnknownCompression(String),
    #[error("invalid decoded data length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("malformed integer `{0}` in csv data")]
    MalformedInteger(String),
    #[error("map of {width}x{height} cells is too large")]
    MapTooLarge { width: usize, height: usize },
    #[error("invalid GID {0:#010x}")]
    InvalidGid(u32),
    #[error("malformed point `{0}`")]
    MalformedPoint(String),
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Lookup failures for free-form `name = value` properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("property `{0}` does not exist")]
    Unavailable(String),
    #[error("property `{0}` is not unique")]
    NotUnique(String),
}

/// Constraint violations found while exporting one layer.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("a layer must use tiles from only one tileset")]
    MultipleTilesets,
    #[error("layer is empty; tileset cannot be determined")]
    EmptyLayer,
    #[error("too many tiles in the tileset: {count} > {max}")]
    TooManyTiles { count: usize, max: usize },
    #[error("tile {local_id} is past the end of a {tile_count}-tile tileset")]
    TileOutOfRange { local_id: u32, tile_count: u32 },
    #[error("invalid compression method `{0}`")]
    InvalidCompressionMethod(String),
    #[error("nil tile {value} does not fit a {bits}-bit entry")]
    NilTileOutOfRange { value: u16, bits: u32 },
    #[error(transparent)]
    Property(#[from] PropertyError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures of the JSON map loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("the file extension must be .tmj or .json")]
    WrongFileExtension,
    #[error("unsupported map: {0}")]
    UnsupportedMap(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
