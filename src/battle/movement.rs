//! Legal move, rotation and formation turn enumeration
//!
//! Every function here is a pure query over a [`Battlefield`]. Results map a
//! direction (or resulting facing) to the legal option; an absent key means
//! the option is illegal.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::battle::hex::{Angle, HexId, HexSideId};
use crate::battle::move_profile::CostOutcome;
use crate::battle::units::{BattleUnit, Battlefield, Placement};
use crate::battle::zone_of_control::{is_in_forward_zone, threatening_foes, zone_angles};

/// Which movement pool an option draws on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementClass {
    Normal,
    Extended,
    /// The one cheapest action allowed at the start of an activation
    Minimal,
}

/// A legal move or formation turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllowedMove {
    pub placement: Placement,
    pub facing: Angle,
    pub cost: CostOutcome,
    pub class: MovementClass,
}

/// Where a rotation pivots: the unit's own hex for side angles, the two hexes
/// flanking the vertex for vertex angles, the whole side for formations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RotationTarget {
    Hex(HexId),
    Vertex(HexId, HexId),
    Side(HexSideId),
}

/// A legal rotation to a new facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AllowedRotation {
    pub facing: Angle,
    pub target: RotationTarget,
    pub cost: CostOutcome,
    pub class: MovementClass,
}

pub type MoveMap = BTreeMap<Angle, AllowedMove>;
pub type RotationMap = BTreeMap<Angle, AllowedRotation>;

/// Decide which pool pays for `cost`, or `None` if the unit cannot afford it.
///
/// `first` is true while the unit has spent nothing in this activation;
/// only then may an unaffordable or MINIMAL_MOVE action be taken as a
/// minimal move. A pool with nothing left pays for nothing, free actions
/// included.
pub fn classify(unit: &BattleUnit, cost: CostOutcome, first: bool) -> Option<MovementClass> {
    let value = match cost {
        CostOutcome::Impassable => return None,
        CostOutcome::MinimalMove => return first.then_some(MovementClass::Minimal),
        CostOutcome::Add(value) | CostOutcome::Set(value) => value,
    };

    if unit.movement_points > 0.0 && value <= unit.movement_points {
        Some(MovementClass::Normal)
    } else if unit.total_points() > 0.0 && value <= unit.total_points() {
        Some(MovementClass::Extended)
    } else if first {
        Some(MovementClass::Minimal)
    } else {
        None
    }
}

/// Cost for `unit` of stepping from `from` into the adjacent hex `to`
pub fn step_cost(field: &Battlefield, unit: &BattleUnit, from: HexId, to: HexId) -> CostOutcome {
    let map = &field.map;
    if !map.in_bounds(to) {
        return CostOutcome::Impassable;
    }
    let side = map.side_between(from, to);
    unit.profile
        .step_cost(map.hex_type(to), map.hex_side_type(side))
}

fn single_hex(unit: &BattleUnit) -> HexId {
    match unit.placement {
        Placement::Hex(hex) => hex,
        Placement::Side(_) => panic!("unit {} is a formation", unit.id),
    }
}

fn formation_side(unit: &BattleUnit) -> HexSideId {
    match unit.placement {
        Placement::Side(side) => side,
        Placement::Hex(_) => panic!("unit {} is not a formation", unit.id),
    }
}

/// Legal forward moves. Formations are dispatched to
/// [`formation_allowed_moves`].
pub fn allowed_moves(field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
    if unit.is_formation() {
        return formation_allowed_moves(field, unit, first);
    }
    single_hex_moves(field, unit, unit.facing, first)
}

/// Legal moves backwards, keeping the current facing. Formations are
/// dispatched to [`formation_allowed_moves_back`].
pub fn allowed_moves_back(field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
    if unit.is_formation() {
        return formation_allowed_moves_back(field, unit, first);
    }
    single_hex_moves(field, unit, unit.facing.opposite(), first)
}

fn single_hex_moves(
    field: &Battlefield,
    unit: &BattleUnit,
    heading: Angle,
    first: bool,
) -> MoveMap {
    let origin = single_hex(unit);
    let threats = threatening_foes(field, unit);
    let mut moves = MoveMap::new();

    for angle in zone_angles(heading) {
        let Some(dest) = field.map.neighbor(origin, angle) else {
            continue;
        };
        if field.has_foe_at(unit, dest) {
            trace!(unit = %unit.id, %dest, "move blocked by foe");
            continue;
        }
        if field.has_other_unit_at(unit, dest) {
            trace!(unit = %unit.id, %dest, "move blocked by friend");
            continue;
        }
        // An engaged unit may not slide along the front of a foe holding it
        if threats
            .iter()
            .any(|foe| is_in_forward_zone(&field.map, foe, dest))
        {
            trace!(unit = %unit.id, %dest, "move stays in contact with an engaging foe");
            continue;
        }

        let cost = step_cost(field, unit, origin, dest);
        if let Some(class) = classify(unit, cost, first) {
            moves.insert(
                angle,
                AllowedMove {
                    placement: Placement::Hex(dest),
                    facing: unit.facing,
                    cost,
                    class,
                },
            );
        }
    }

    debug!(unit = %unit.id, legal = moves.len(), "enumerated moves");
    moves
}

/// Legal changes of facing.
///
/// A troop or character may face any of the other 11 angles. A formation
/// may only face about.
pub fn allowed_rotations(field: &Battlefield, unit: &BattleUnit, first: bool) -> RotationMap {
    let mut rotations = RotationMap::new();

    if unit.is_formation() {
        let facing = unit.facing.opposite();
        let cost = unit.profile.rotation_cost(6);
        if let Some(class) = classify(unit, cost, first) {
            rotations.insert(
                facing,
                AllowedRotation {
                    facing,
                    target: RotationTarget::Side(formation_side(unit)),
                    cost,
                    class,
                },
            );
        }
        return rotations;
    }

    let hex = single_hex(unit);
    for facing in Angle::all() {
        if facing == unit.facing {
            continue;
        }
        let cost = unit.profile.rotation_cost(unit.facing.turn_steps(facing));
        let Some(class) = classify(unit, cost, first) else {
            continue;
        };
        let target = if facing.is_side() {
            RotationTarget::Hex(hex)
        } else {
            let (a, b) = hex.vertex_hexes(facing);
            RotationTarget::Vertex(a, b)
        };
        rotations.insert(
            facing,
            AllowedRotation {
                facing,
                target,
                cost,
                class,
            },
        );
    }

    debug!(unit = %unit.id, legal = rotations.len(), "enumerated rotations");
    rotations
}

/// Destination hex may be entered by a formation hex: on map, no other unit
fn formation_hex_free(field: &Battlefield, unit: &BattleUnit, hex: HexId) -> bool {
    field.map.in_bounds(hex) && !field.has_other_unit_at(unit, hex)
}

/// Shift the formation by one hex towards `angle`, both hexes at once
fn formation_shift(field: &Battlefield, unit: &BattleUnit, angle: Angle, first: bool) -> Option<AllowedMove> {
    let side = formation_side(unit);
    let (a, b) = side.hexes();
    let (a2, b2) = (a.adjacent(angle), b.adjacent(angle));

    if !formation_hex_free(field, unit, a2) || !formation_hex_free(field, unit, b2) {
        trace!(unit = %unit.id, %angle, "formation move blocked");
        return None;
    }

    let cost = CostOutcome::worst(
        step_cost(field, unit, a, a2),
        step_cost(field, unit, b, b2),
    );
    let class = classify(unit, cost, first)?;
    Some(AllowedMove {
        placement: Placement::Side(HexSideId::new(a2, b2)),
        facing: unit.facing,
        cost,
        class,
    })
}

fn formation_shifts(field: &Battlefield, unit: &BattleUnit, heading: Angle, first: bool) -> MoveMap {
    let mut moves = MoveMap::new();
    for angle in [heading.rotate(-30), heading.rotate(30)] {
        if let Some(allowed) = formation_shift(field, unit, angle, first) {
            moves.insert(angle, allowed);
        }
    }
    debug!(unit = %unit.id, legal = moves.len(), "enumerated formation moves");
    moves
}

/// Forward moves of a formation: one hex across either side flanking its
/// facing, keyed by the side angle crossed
pub fn formation_allowed_moves(field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
    formation_shifts(field, unit, unit.facing, first)
}

/// Backward moves of a formation, keeping its facing
pub fn formation_allowed_moves_back(field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
    formation_shifts(field, unit, unit.facing.opposite(), first)
}

/// Wheel the formation around one of its hexes by 60 degrees.
///
/// `forward` swings the free end towards the facing, otherwise away from it.
/// The facing stays on the same side of the new long axis.
fn formation_wheel(
    field: &Battlefield,
    unit: &BattleUnit,
    pivot: HexId,
    forward: bool,
    first: bool,
) -> Option<AllowedMove> {
    let side = formation_side(unit);
    let free = side.other(&pivot);
    let axis = pivot.direction_to(&free)?;

    // +1 when the free end lies counter-clockwise of the facing
    let sign = if axis == unit.facing.rotate(90) { -1 } else { 1 };
    let swing = if forward { sign * 60 } else { -sign * 60 };

    let target = pivot.adjacent(axis.rotate(swing));
    if !formation_hex_free(field, unit, target) {
        trace!(unit = %unit.id, %target, "formation turn blocked");
        return None;
    }

    let cost = step_cost(field, unit, free, target);
    let class = classify(unit, cost, first)?;
    Some(AllowedMove {
        placement: Placement::Side(HexSideId::new(pivot, target)),
        facing: unit.facing.rotate(swing),
        cost,
        class,
    })
}

fn formation_wheels(field: &Battlefield, unit: &BattleUnit, forward: bool, first: bool) -> MoveMap {
    let (a, b) = formation_side(unit).hexes();
    let mut turns = MoveMap::new();
    for pivot in [a, b] {
        if let Some(turn) = formation_wheel(field, unit, pivot, forward, first) {
            turns.insert(turn.facing, turn);
        }
    }
    debug!(unit = %unit.id, legal = turns.len(), forward, "enumerated formation turns");
    turns
}

/// Forward wheels of a formation, keyed by the resulting facing
pub fn formation_allowed_turns(field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
    formation_wheels(field, unit, true, first)
}

/// Backward wheels of a formation, keyed by the resulting facing
pub fn formation_allowed_moves_back_turns(
    field: &Battlefield,
    unit: &BattleUnit,
    first: bool,
) -> MoveMap {
    formation_wheels(field, unit, false, first)
}
