//! Global tile ids and the resolved form every grid cell is stored as.

pub const GID_HORIZONTAL_FLIP: u32 = 0x8000_0000;
pub const GID_VERTICAL_FLIP: u32 = 0x4000_0000;
pub const GID_DIAGONAL_FLIP: u32 = 0x2000_0000;
pub const GID_FLIP_MASK: u32 = GID_HORIZONTAL_FLIP | GID_VERTICAL_FLIP | GID_DIAGONAL_FLIP;

/// Position of a tileset inside `Map::tilesets`.
pub type TilesetIndex = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Flip {
    /// Reads the three flip bits off a raw GID.
    pub fn from_gid(gid: u32) -> Self {
        Self {
            horizontal: gid & GID_HORIZONTAL_FLIP != 0,
            vertical: gid & GID_VERTICAL_FLIP != 0,
            diagonal: gid & GID_DIAGONAL_FLIP != 0,
        }
    }
}

/// One grid cell after GID resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTile {
    Nil,
    Tile {
        tileset: TilesetIndex,
        local_id: u32,
        flip: Flip,
    },
}

impl ResolvedTile {
    pub fn is_nil(&self) -> bool {
        matches!(self, ResolvedTile::Nil)
    }

    pub fn tileset(&self) -> Option<TilesetIndex> {
        match self {
            ResolvedTile::Nil => None,
            ResolvedTile::Tile { tileset, .. } => Some(*tileset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_bits_are_read_independently() {
        let f = Flip::from_gid(GID_HORIZONTAL_FLIP | GID_DIAGONAL_FLIP | 7);
        assert!(f.horizontal);
        assert!(!f.vertical);
        assert!(f.diagonal);
        assert_eq!(Flip::from_gid(42), Flip::default());
    }
}
