//! Battle map: grid bounds plus per-hex and per-side terrain
//!
//! Terrain may change at any time (scenario events, weather), so nothing
//! downstream caches what it reads here.

use ahash::AHashMap;

use crate::battle::hex::{Angle, HexId, HexSideId};
use crate::battle::terrain::{HexSideType, HexType};

/// The full battle map
#[derive(Debug, Clone)]
pub struct BattleMap {
    pub width: u32,
    pub height: u32,
    hex_types: AHashMap<HexId, HexType>,
    side_types: AHashMap<HexSideId, HexSideType>,
}

impl BattleMap {
    /// Create a new battle map of clear terrain with normal sides
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            hex_types: AHashMap::new(),
            side_types: AHashMap::new(),
        }
    }

    /// Check if coordinate is within map bounds
    pub fn in_bounds(&self, hex: HexId) -> bool {
        hex.col >= 0 && hex.row >= 0 && hex.col < self.width as i32 && hex.row < self.height as i32
    }

    /// Adjacent hex at a side angle, `None` past the map edge
    pub fn neighbor(&self, hex: HexId, angle: Angle) -> Option<HexId> {
        let next = hex.adjacent(angle);
        self.in_bounds(next).then_some(next)
    }

    /// All on-map neighbors with the side angle leading to them
    pub fn neighbors(&self, hex: HexId) -> impl Iterator<Item = (Angle, HexId)> + '_ {
        Angle::sides()
            .into_iter()
            .filter_map(move |angle| self.neighbor(hex, angle).map(|n| (angle, n)))
    }

    /// Side shared by two adjacent hexes
    pub fn side_between(&self, a: HexId, b: HexId) -> HexSideId {
        HexSideId::new(a, b)
    }

    /// Terrain of a hex. Off-map coordinates read as impassable.
    pub fn hex_type(&self, hex: HexId) -> HexType {
        if !self.in_bounds(hex) {
            return HexType::Impassable;
        }
        self.hex_types.get(&hex).copied().unwrap_or_default()
    }

    pub fn hex_side_type(&self, side: HexSideId) -> HexSideType {
        self.side_types.get(&side).copied().unwrap_or_default()
    }

    /// Set terrain at a coordinate
    pub fn set_hex_type(&mut self, hex: HexId, hex_type: HexType) {
        if !self.in_bounds(hex) {
            return;
        }
        if hex_type == HexType::Clear {
            self.hex_types.remove(&hex);
        } else {
            self.hex_types.insert(hex, hex_type);
        }
    }

    pub fn set_hex_side_type(&mut self, side: HexSideId, side_type: HexSideType) {
        if side_type == HexSideType::Normal {
            self.side_types.remove(&side);
        } else {
            self.side_types.insert(side, side_type);
        }
    }

    /// Every coordinate on the map, column by column
    pub fn hexes(&self) -> impl Iterator<Item = HexId> + '_ {
        (0..self.width as i32)
            .flat_map(move |col| (0..self.height as i32).map(move |row| HexId::new(col, row)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battle_map_creation() {
        let map = BattleMap::new(10, 12);
        assert_eq!(map.hexes().count(), 120);
        assert_eq!(map.hex_type(HexId::new(3, 3)), HexType::Clear);
    }

    #[test]
    fn test_neighbor_at_edge() {
        let map = BattleMap::new(10, 10);
        assert_eq!(map.neighbor(HexId::new(0, 0), Angle::NORTH), None);
        assert_eq!(
            map.neighbor(HexId::new(0, 0), Angle::SOUTH),
            Some(HexId::new(0, 1))
        );
        assert_eq!(map.neighbors(HexId::new(0, 0)).count(), 2);
        assert_eq!(map.neighbors(HexId::new(5, 5)).count(), 6);
    }

    #[test]
    fn test_off_map_is_impassable() {
        let map = BattleMap::new(10, 10);
        assert_eq!(map.hex_type(HexId::new(-1, 4)), HexType::Impassable);
    }

    #[test]
    fn test_terrain_is_mutable() {
        let mut map = BattleMap::new(10, 10);
        let hex = HexId::new(2, 2);
        map.set_hex_type(hex, HexType::Rough);
        assert_eq!(map.hex_type(hex), HexType::Rough);
        map.set_hex_type(hex, HexType::Clear);
        assert_eq!(map.hex_type(hex), HexType::Clear);
    }

    #[test]
    fn test_side_type_both_directions() {
        let mut map = BattleMap::new(10, 10);
        let a = HexId::new(2, 2);
        let b = HexId::new(2, 3);
        map.set_hex_side_type(map.side_between(a, b), HexSideType::Wall);
        assert_eq!(map.hex_side_type(map.side_between(b, a)), HexSideType::Wall);
        assert_eq!(
            map.hex_side_type(map.side_between(a, HexId::new(2, 1))),
            HexSideType::Normal
        );
    }
}
