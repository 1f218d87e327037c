//! Built-in arena layouts.

use crate::grid::TileGrid;

/// The stock 26x26 arena: iron border, brick blocks, two bush strips and a
/// brick-shielded hazard core between the two player spawns.
pub const DEFAULT_ARENA: &str = "\
22222222222222222222222222
20000000000000000000000002
20000000000000000000000002
20011001100000000110011002
20011001100000000110011002
20011001101100110110011002
20011001101100110110011002
20011001101100110110011002
20011001100000000110011002
20000000000000000000000002
20000333333300333333300002
22200000000022000000000222
22200000000022000000000222
20000333333300333333300002
20011001100000000110011002
20011001100000000110011002
20011001101100110110011002
20011001101100110110011002
20011001101100110110011002
20011001100000000110011002
20000000000000000000000002
20000000000000000000000002
20000000000000000000000002
20000000000111100000000002
20000000A00155100B00000002
22222222222222222222222222
";

/// Parse the stock arena.
pub fn default_arena() -> TileGrid {
    TileGrid::parse(DEFAULT_ARENA).unwrap_or_else(|_| TileGrid::from_codes(&[]))
}
