//! Terrain classification for hexes and hex sides
//!
//! Only the movement class is modelled here; what a class costs is decided
//! per unit by its move profile.

use serde::{Deserialize, Serialize};

/// Terrain class of a battle hex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HexType {
    #[default]
    Clear,
    Rough,
    Difficult,
    Impassable,
}

impl HexType {
    pub fn all() -> [HexType; 4] {
        [
            HexType::Clear,
            HexType::Rough,
            HexType::Difficult,
            HexType::Impassable,
        ]
    }
}

/// Terrain class of the edge between two hexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HexSideType {
    #[default]
    Normal,
    Easy,      // Road or bridge
    Difficult, // Stream, hedge
    Climb,     // Slope
    Wall,
}

impl HexSideType {
    pub fn all() -> [HexSideType; 5] {
        [
            HexSideType::Normal,
            HexSideType::Easy,
            HexSideType::Difficult,
            HexSideType::Climb,
            HexSideType::Wall,
        ]
    }
}
