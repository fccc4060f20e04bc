//! The decode pass: payload → GIDs → resolved tiles → tileset inference.
//!
//! Everything a later stage needs about a layer is computed here exactly
//! once and stored on the [`Layer`]; nothing downstream mutates it.
pub mod gid;
pub mod inference;
pub mod payload;

use crate::error::{DecodeError, PropertyError};
use crate::model::{Layer, LayerOptions, Map, Properties, RawLayer, RawMap, Tileset};

/// Runs every decoding step and returns a read-only map for the exporters.
pub fn run(raw: RawMap) -> Result<Map, DecodeError> {
    // Base64 payloads need four bytes per cell, so that product must fit too.
    let cells = raw
        .width
        .checked_mul(raw.height)
        .filter(|c| c.checked_mul(4).is_some())
        .ok_or(DecodeError::MapTooLarge {
            width: raw.width,
            height: raw.height,
        })?;

    let layers = raw
        .layers
        .into_iter()
        .map(|l| decode_layer(l, &raw.tilesets, raw.width, raw.height, cells))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Map {
        width: raw.width,
        height: raw.height,
        tile_width: raw.tile_width,
        tile_height: raw.tile_height,
        properties: raw.properties,
        tilesets: raw.tilesets,
        layers,
        object_groups: raw.object_groups,
    })
}

fn decode_layer(
    raw: RawLayer,
    tilesets: &[Tileset],
    width: usize,
    height: usize,
    cells: usize,
) -> Result<Layer, DecodeError> {
    let gids = payload::decode_payload(&raw.data, cells)?;
    let tiles = gid::resolve_all(&gids, tilesets)?;
    let inferred = inference::infer_tileset(&tiles);
    let options = layer_options(&raw.name, &raw.properties);

    tracing::debug!(
        layer = %raw.name,
        encoding = ?raw.data.encoding,
        tileset = ?inferred.tileset,
        empty = inferred.empty,
        "decoded layer"
    );

    Ok(Layer {
        name: raw.name,
        width,
        height,
        properties: raw.properties,
        tiles,
        tileset: inferred.tileset,
        empty: inferred.empty,
        options,
    })
}

/// Reads the export-related layer properties, falling back to defaults when
/// a value is missing, duplicated or unparsable.
pub fn layer_options(layer: &str, props: &Properties) -> LayerOptions {
    LayerOptions {
        bitmap: flag(layer, props, "Bitmap"),
        affine: flag(layer, props, "Affine"),
        nil_tile: number(layer, props, "NilTile"),
        bg: number::<u8>(layer, props, "BG").filter(|bg| {
            let ok = *bg <= 3;
            if !ok {
                tracing::warn!(%layer, bg, "BG must be 0..3, ignoring");
            }
            ok
        }),
    }
}

fn flag(layer: &str, props: &Properties, name: &str) -> bool {
    match props.get(name) {
        Ok(v) => v == "true",
        Err(PropertyError::Unavailable(_)) => false,
        Err(e) => {
            tracing::warn!(%layer, "{e}, using default");
            false
        }
    }
}

fn number<T: std::str::FromStr>(layer: &str, props: &Properties, name: &str) -> Option<T> {
    match props.get(name) {
        Ok(v) => {
            let parsed = v.trim().parse::<T>().ok();
            if parsed.is_none() {
                tracing::warn!(%layer, property = name, value = v, "not a valid number, using default");
            }
            parsed
        }
        Err(PropertyError::Unavailable(_)) => None,
        Err(e) => {
            tracing::warn!(%layer, "{e}, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Compression, Encoding, LayerData, Payload, ResolvedTile};

    fn raw_map(csv: &[&str]) -> RawMap {
        RawMap {
            width: 2,
            height: 2,
            tile_width: 8,
            tile_height: 8,
            properties: Properties::new(),
            tilesets: vec![
                Tileset {
                    first_gid: 1,
                    tile_count: 4,
                    name: "a".into(),
                    source: None,
                },
                Tileset {
                    first_gid: 5,
                    tile_count: 4,
                    name: "b".into(),
                    source: None,
                },
            ],
            layers: csv
                .iter()
                .enumerate()
                .map(|(i, data)| RawLayer {
                    name: format!("L{i}"),
                    data: LayerData {
                        encoding: Encoding::Csv,
                        compression: Compression::None,
                        payload: Payload::Text(data.to_string()),
                    },
                    properties: Properties::new(),
                })
                .collect(),
            object_groups: vec![],
        }
    }

    #[test]
    fn csv_layer_resolves_to_local_ids() {
        let map = run(raw_map(&["1,2,3,4"])).unwrap();
        let layer = &map.layers[0];

        let ids: Vec<u32> = layer
            .tiles
            .iter()
            .map(|t| match t {
                ResolvedTile::Tile { local_id, .. } => *local_id,
                ResolvedTile::Nil => panic!("unexpected nil"),
            })
            .collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(layer.tileset, Some(0));
        assert!(!layer.empty);
        assert_eq!(map.layer_tileset(layer).unwrap().name, "a");
    }

    #[test]
    fn all_zero_layer_is_empty() {
        let map = run(raw_map(&["0,0,0,0"])).unwrap();
        let layer = &map.layers[0];
        assert!(layer.tiles.iter().all(ResolvedTile::is_nil));
        assert!(layer.empty);
        assert_eq!(layer.tileset, None);
    }

    #[test]
    fn mixed_layer_has_no_tileset() {
        let map = run(raw_map(&["1,0,5,0"])).unwrap();
        assert_eq!(map.layers[0].tileset, None);
        assert!(!map.layers[0].empty);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let mut raw = raw_map(&["1,2,3,4"]);
        raw.width = usize::MAX / 2;
        raw.height = 3;
        assert!(matches!(
            run(raw),
            Err(DecodeError::MapTooLarge { height: 3, .. })
        ));

        let mut raw = raw_map(&["1,2,3,4"]);
        raw.width = usize::MAX / 4 + 1;
        raw.height = 1;
        assert!(matches!(run(raw), Err(DecodeError::MapTooLarge { .. })));
    }

    #[test]
    fn one_bad_layer_fails_the_whole_map() {
        assert!(matches!(
            run(raw_map(&["1,2,3,4", "1,2,3"])),
            Err(DecodeError::InvalidLength { .. })
        ));
    }

    #[test]
    fn options_fall_back_to_defaults() {
        let props: Properties = [
            ("Bitmap", "true"),
            ("Affine", "true"),
            ("Affine", "false"),
            ("NilTile", "abc"),
            ("BG", "2"),
        ]
        .into_iter()
        .collect();
        let opts = layer_options("x", &props);
        assert!(opts.bitmap);
        assert!(!opts.affine, "duplicate Affine falls back to false");
        assert_eq!(opts.nil_tile, None);
        assert_eq!(opts.bg, Some(2));

        let props: Properties = [("NilTile", "300"), ("BG", "7")].into_iter().collect();
        let opts = layer_options("x", &props);
        assert_eq!(opts.nil_tile, Some(300));
        assert_eq!(opts.bg, None);
    }
}
