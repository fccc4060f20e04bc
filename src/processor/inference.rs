//! Figures out which single tileset a layer draws from, if any.

use crate::model::{ResolvedTile, TilesetIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inference {
    pub tileset: Option<TilesetIndex>,
    pub empty: bool,
}

/// Classify a decoded layer as single-tileset, mixed or empty.
pub fn infer_tileset(tiles: &[ResolvedTile]) -> Inference {
    let mut found: Option<TilesetIndex> = None;

    for ts in tiles.iter().filter_map(ResolvedTile::tileset) {
        match found {
            None => found = Some(ts),
            Some(first) if first != ts => {
                return Inference {
                    tileset: None,
                    empty: false,
                };
            }
            Some(_) => {}
        }
    }

    Inference {
        tileset: found,
        empty: found.is_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Flip;

    fn tile(tileset: TilesetIndex) -> ResolvedTile {
        ResolvedTile::Tile {
            tileset,
            local_id: 0,
            flip: Flip::default(),
        }
    }

    #[test]
    fn all_nil_is_empty() {
        let inf = infer_tileset(&[ResolvedTile::Nil; 4]);
        assert_eq!(
            inf,
            Inference {
                tileset: None,
                empty: true
            }
        );
    }

    #[test]
    fn single_tileset_is_found() {
        let inf = infer_tileset(&[ResolvedTile::Nil, tile(2), tile(2), ResolvedTile::Nil]);
        assert_eq!(
            inf,
            Inference {
                tileset: Some(2),
                empty: false
            }
        );
    }

    #[test]
    fn two_tilesets_are_mixed() {
        let inf = infer_tileset(&[tile(0), ResolvedTile::Nil, tile(1), tile(0)]);
        assert_eq!(
            inf,
            Inference {
                tileset: None,
                empty: false
            }
        );
    }
}
