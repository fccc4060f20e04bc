//! GID → (tileset, local id, flips) resolution.

use crate::error::DecodeError;
use crate::model::tile::GID_FLIP_MASK;
use crate::model::{Flip, ResolvedTile, Tileset};

/// Resolve one raw GID against tilesets sorted ascending by `first_gid`.
///
/// The last tileset whose range starts at or below the bare id owns it.
pub fn resolve_gid(gid: u32, tilesets: &[Tileset]) -> Result<ResolvedTile, DecodeError> {
    let bare = gid & !GID_FLIP_MASK;
    if bare == 0 {
        return Ok(ResolvedTile::Nil);
    }

    let (index, tileset) = tilesets
        .iter()
        .enumerate()
        .rev()
        .find(|(_, ts)| ts.first_gid <= bare)
        .ok_or(DecodeError::InvalidGid(gid))?;

    Ok(ResolvedTile::Tile {
        tileset: index,
        local_id: bare - tileset.first_gid,
        flip: Flip::from_gid(gid),
    })
}

pub fn resolve_all(gids: &[u32], tilesets: &[Tileset]) -> Result<Vec<ResolvedTile>, DecodeError> {
    gids.iter().map(|&gid| resolve_gid(gid, tilesets)).collect()
}
