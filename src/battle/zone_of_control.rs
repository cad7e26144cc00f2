//! Zones of control: the hexes a unit threatens ahead of it and exposes
//! behind it
//!
//! Zones are recomputed from the current facing and placement on every call.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::{Angle, HexId};
use crate::battle::units::{BattleUnit, Battlefield, Placement};

/// One hex of a zone with the side angle leading to it from the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneHex {
    pub angle: Angle,
    pub hex: HexId,
}

/// Side angles of a single hex's zone in direction `facing`.
///
/// Facing a side covers that side and its two neighbours. Facing a vertex
/// covers the two sides meeting at the vertex. Either way the zone never
/// shares a side with the zone of the opposite facing.
pub fn zone_angles(facing: Angle) -> Vec<Angle> {
    if facing.is_side() {
        vec![facing.rotate(-60), facing, facing.rotate(60)]
    } else {
        vec![facing.rotate(-30), facing.rotate(30)]
    }
}

/// Zone of a unit placed at `placement` looking towards `facing`
fn zone_of(map: &BattleMap, placement: &Placement, facing: Angle) -> Vec<ZoneHex> {
    let mut zone: Vec<ZoneHex> = Vec::new();
    match placement {
        Placement::Hex(hex) => {
            for angle in zone_angles(facing) {
                if let Some(next) = map.neighbor(*hex, angle) {
                    zone.push(ZoneHex { angle, hex: next });
                }
            }
        }
        Placement::Side(side) => {
            // Formations only project across their long edge
            let (a, b) = side.hexes();
            for hex in [a, b] {
                for angle in [facing.rotate(-30), facing.rotate(30)] {
                    let Some(next) = map.neighbor(hex, angle) else {
                        continue;
                    };
                    if placement.contains(&next) || zone.iter().any(|z| z.hex == next) {
                        continue;
                    }
                    zone.push(ZoneHex { angle, hex: next });
                }
            }
        }
    }
    zone
}

/// Hexes directly ahead of a unit
pub fn forward_zone(map: &BattleMap, unit: &BattleUnit) -> Vec<ZoneHex> {
    zone_of(map, &unit.placement, unit.facing)
}

/// Hexes directly behind a unit
pub fn backward_zone(map: &BattleMap, unit: &BattleUnit) -> Vec<ZoneHex> {
    zone_of(map, &unit.placement, unit.facing.opposite())
}

/// Forward zone of a unit as if it stood at `placement` facing `facing`
pub fn forward_zone_at(map: &BattleMap, placement: &Placement, facing: Angle) -> Vec<ZoneHex> {
    zone_of(map, placement, facing)
}

pub fn forward_zone_hexes(map: &BattleMap, unit: &BattleUnit) -> BTreeSet<HexId> {
    forward_zone(map, unit).into_iter().map(|z| z.hex).collect()
}

pub fn is_in_forward_zone(map: &BattleMap, unit: &BattleUnit, hex: HexId) -> bool {
    forward_zone(map, unit).iter().any(|z| z.hex == hex)
}

/// Does `foe` threaten `target`? Routed units threaten nothing.
pub fn threatens(map: &BattleMap, foe: &BattleUnit, target: &BattleUnit) -> bool {
    if foe.is_routed() {
        return false;
    }
    let zone = forward_zone(map, foe);
    target
        .hexes()
        .iter()
        .any(|hex| zone.iter().any(|z| z.hex == *hex))
}

/// Foes whose forward zone covers part of `unit`
pub fn threatening_foes<'a>(field: &'a Battlefield, unit: &'a BattleUnit) -> Vec<&'a BattleUnit> {
    field
        .foes_of(unit)
        .filter(|foe| threatens(&field.map, foe, unit))
        .collect()
}

pub fn is_engaged(field: &Battlefield, unit: &BattleUnit) -> bool {
    !threatening_foes(field, unit).is_empty()
}

/// Only troops and characters of a wing with a retreat zone may rout.
/// Formations have to break first.
pub fn is_allowed_to_rout(field: &Battlefield, unit: &BattleUnit) -> bool {
    !unit.is_formation() && field.retreat_zone(unit).is_some()
}

/// A foe stands behind the unit and threatens it
pub fn is_allowed_to_confront(field: &Battlefield, unit: &BattleUnit) -> bool {
    let behind = backward_zone(&field.map, unit);
    field.foes_of(unit).any(|foe| {
        foe.hexes()
            .iter()
            .any(|hex| behind.iter().any(|z| z.hex == *hex))
            && threatens(&field.map, foe, unit)
    })
}

/// Union of the footprints of `units`
pub fn occupied_hexes(units: &[&BattleUnit]) -> BTreeSet<HexId> {
    units.iter().flat_map(|u| u.hexes()).collect()
}

/// Union of footprints and forward zones. Routed units only add their
/// footprint.
pub fn controlled_hexes(map: &BattleMap, units: &[&BattleUnit]) -> BTreeSet<HexId> {
    let mut hexes = occupied_hexes(units);
    for unit in units.iter().filter(|u| !u.is_routed()) {
        hexes.extend(forward_zone(map, unit).into_iter().map(|z| z.hex));
    }
    hexes
}

/// Every hex held by a foe of `unit`
pub fn foes_hex_locations(field: &Battlefield, unit: &BattleUnit) -> BTreeSet<HexId> {
    field
        .foes_of(unit)
        .flat_map(|foe| foe.hexes())
        .filter(|hex| field.map.in_bounds(*hex))
        .collect()
}

/// Is `hex` inside the forward zone of any non-routed foe of `unit`?
pub fn is_in_foe_zone(field: &Battlefield, unit: &BattleUnit, hex: HexId) -> bool {
    field
        .foes_of(unit)
        .filter(|foe| !foe.is_routed())
        .any(|foe| is_in_forward_zone(&field.map, foe, hex))
}
