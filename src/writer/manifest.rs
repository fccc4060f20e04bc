//! `<base>.map.json`: how the exported files fit together.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::WrittenLayer;
use crate::model::{Map, ObjectGroup, Tileset};

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub console: &'a str,
    pub width: usize,
    pub height: usize,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tilesets: &'a [Tileset],
    pub layers: &'a [WrittenLayer],
    #[serde(skip_serializing_if = "no_objects")]
    pub object_groups: &'a [ObjectGroup],
}

impl<'a> Manifest<'a> {
    pub fn new(console: &'a str, map: &'a Map, layers: &'a [WrittenLayer]) -> Self {
        Self {
            console,
            width: map.width,
            height: map.height,
            tile_width: map.tile_width,
            tile_height: map.tile_height,
            tilesets: &map.tilesets,
            layers,
            object_groups: &map.object_groups,
        }
    }
}

fn no_objects(groups: &&[ObjectGroup]) -> bool {
    groups.is_empty()
}

pub fn manifest_path(out_dir: &Path, base: &str) -> PathBuf {
    out_dir.join(format!("{base}.map.json"))
}

pub fn emit(manifest: &Manifest<'_>, out_dir: &Path, base: &str) -> io::Result<PathBuf> {
    let path = manifest_path(out_dir, base);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json)?;
    Ok(path)
}
