//! Tiled JSON loader (`.tmj` maps, `.tsj` external tilesets).
//!
//! We keep the layer payloads in raw, declared form; decoding them is the
//! processor's job.
pub mod points;

use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::error::{DecodeError, LoadError};
use crate::model::{
    Compression, Encoding, LayerData, Object, ObjectGroup, Payload, Point, Properties, RawLayer,
    RawMap, Tileset,
};

pub const MAP_EXTENSIONS: &[&str] = &["tmj", "json"];

// ─────────────────────────────────────────────────────
// JSON shapes. Only the fields the exporters need are kept.
// ─────────────────────────────────────────────────────
#[derive(Debug, Deserialize)]
struct JsonMap {
    width: usize,
    height: usize,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    properties: Vec<JsonProperty>,
    #[serde(default)]
    tilesets: Vec<JsonTileset>,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Debug, Deserialize)]
struct JsonProperty {
    name: String,
    #[serde(default)]
    value: Value,
}

#[derive(Debug, Deserialize)]
struct JsonTileset {
    firstgid: u32,
    source: Option<String>,
    name: Option<String>,
    tilecount: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct JsonTilesetFile {
    #[serde(default)]
    name: String,
    tilecount: u32,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum JsonLayer {
    #[serde(rename = "tilelayer")]
    Tiles(JsonTileLayer),
    #[serde(rename = "objectgroup")]
    Objects(JsonObjectGroup),
    #[serde(rename = "group")]
    Group(JsonGroup),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct JsonTileLayer {
    name: String,
    data: Option<JsonData>,
    encoding: Option<String>,
    compression: Option<String>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonData {
    Elements(Vec<u32>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct JsonObjectGroup {
    name: String,
    #[serde(default)]
    objects: Vec<JsonObject>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

#[derive(Debug, Deserialize)]
struct JsonGroup {
    name: String,
    #[serde(default)]
    layers: Vec<JsonLayer>,
}

#[derive(Debug, Deserialize)]
struct JsonObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    kind: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    gid: Option<u32>,
    #[serde(default = "visible_default")]
    visible: bool,
    polygon: Option<JsonPoints>,
    polyline: Option<JsonPoints>,
    #[serde(default)]
    properties: Vec<JsonProperty>,
}

fn visible_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonPoints {
    List(Vec<Point2>),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct Point2 {
    x: f32,
    y: f32,
}

// ─────────────────────────────────────────────────────

/// Read and parse a map file. External tilesets are resolved relative to
/// the map's directory.
pub fn load(path: &Path) -> Result<RawMap, LoadError> {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MAP_EXTENSIONS.contains(&e));
    if !ext_ok {
        return Err(LoadError::WrongFileExtension);
    }

    let json = fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "map file loaded");

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    load_from_json(&json, base_dir)
}

/// Parse a map from its JSON text.
pub fn load_from_json(json: &str, base_dir: &Path) -> Result<RawMap, LoadError> {
    let root: JsonMap = serde_json::from_str(json)?;

    if root.infinite {
        return Err(LoadError::UnsupportedMap("infinite maps are not supported".into()));
    }

    let mut tilesets = root
        .tilesets
        .into_iter()
        .map(|ts| load_tileset(ts, base_dir))
        .collect::<Result<Vec<_>, _>>()?;
    tilesets.sort_by_key(|ts| ts.first_gid);

    let mut layers = Vec::new();
    let mut object_groups = Vec::new();
    collect_layers(root.layers, &mut layers, &mut object_groups)?;

    tracing::debug!(
        tilesets = tilesets.len(),
        layers = layers.len(),
        object_groups = object_groups.len(),
        "map parsed"
    );

    Ok(RawMap {
        width: root.width,
        height: root.height,
        tile_width: root.tilewidth,
        tile_height: root.tileheight,
        properties: properties(root.properties),
        tilesets,
        layers,
        object_groups,
    })
}

fn load_tileset(ts: JsonTileset, base_dir: &Path) -> Result<Tileset, LoadError> {
    if let Some(tile_count) = ts.tilecount {
        return Ok(Tileset {
            first_gid: ts.firstgid,
            tile_count,
            name: ts.name.unwrap_or_default(),
            source: ts.source,
        });
    }

    let source = ts.source.ok_or_else(|| {
        LoadError::UnsupportedMap(format!(
            "tileset at firstgid {} has neither `tilecount` nor `source`",
            ts.firstgid
        ))
    })?;
    let path = base_dir.join(&source);
    let file: JsonTilesetFile = serde_json::from_str(&fs::read_to_string(&path)?)?;
    tracing::debug!(path = %path.display(), tiles = file.tilecount, "external tileset loaded");

    Ok(Tileset {
        first_gid: ts.firstgid,
        tile_count: file.tilecount,
        name: ts.name.unwrap_or(file.name),
        source: Some(source),
    })
}

/// Flattens group layers, keeping document order.
fn collect_layers(
    json_layers: Vec<JsonLayer>,
    layers: &mut Vec<RawLayer>,
    object_groups: &mut Vec<ObjectGroup>,
) -> Result<(), LoadError> {
    for layer in json_layers {
        match layer {
            JsonLayer::Tiles(tl) => layers.push(tile_layer(tl)?),
            JsonLayer::Objects(og) => object_groups.push(object_group(og)?),
            JsonLayer::Group(g) => {
                tracing::trace!(group = %g.name, "descending into group layer");
                collect_layers(g.layers, layers, object_groups)?;
            }
            JsonLayer::Other => tracing::debug!("skipping unsupported layer type"),
        }
    }
    Ok(())
}

fn tile_layer(tl: JsonTileLayer) -> Result<RawLayer, LoadError> {
    let data = match tl.data {
        Some(JsonData::Elements(ids)) => LayerData {
            encoding: Encoding::Inline,
            compression: Compression::None,
            payload: Payload::Elements(ids),
        },
        Some(JsonData::Text(text)) => {
            let encoding: Encoding = tl.encoding.as_deref().unwrap_or("csv").parse()?;
            let compression: Compression = match encoding {
                Encoding::Base64 => tl.compression.as_deref().unwrap_or("").parse()?,
                _ => Compression::None,
            };
            LayerData {
                encoding,
                compression,
                payload: Payload::Text(text),
            }
        }
        None => {
            return Err(LoadError::UnsupportedMap(format!(
                "layer `{}` has no `data` (chunked layers are not supported)",
                tl.name
            )));
        }
    };

    Ok(RawLayer {
        name: tl.name,
        data,
        properties: properties(tl.properties),
    })
}

fn object_group(og: JsonObjectGroup) -> Result<ObjectGroup, LoadError> {
    let objects = og
        .objects
        .into_iter()
        .map(object)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ObjectGroup {
        name: og.name,
        objects,
        properties: properties(og.properties),
    })
}

fn object(o: JsonObject) -> Result<Object, DecodeError> {
    Ok(Object {
        id: o.id,
        name: o.name,
        // Tiled 1.9 renamed `type` to `class`.
        kind: if o.kind.is_empty() { o.class } else { o.kind },
        x: o.x,
        y: o.y,
        width: o.width,
        height: o.height,
        gid: o.gid,
        visible: o.visible,
        polygon: o.polygon.map(object_points).transpose()?,
        polyline: o.polyline.map(object_points).transpose()?,
        properties: properties(o.properties),
    })
}

fn object_points(p: JsonPoints) -> Result<Vec<Point>, DecodeError> {
    match p {
        JsonPoints::List(list) => Ok(list.into_iter().map(|p| Point { x: p.x, y: p.y }).collect()),
        JsonPoints::Text(s) => points::decode_points(&s),
    }
}

fn properties(props: Vec<JsonProperty>) -> Properties {
    props
        .into_iter()
        .map(|p| {
            let value = match p.value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (p.name, value)
        })
        .collect()
}
