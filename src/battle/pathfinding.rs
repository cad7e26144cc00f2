//! Path costs and multi-step destination searches
//!
//! `edge_cost` prices a single step for any shortest-path search. Flood
//! searches here are bounded Dijkstra runs over it; `find_path` is A*.
//!
//! Formations are searched by their anchor hex (the first hex of their side).
//! The partner hex follows at the same axis, so a formation translates
//! without turning while it travels.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};
use tracing::{debug, trace, warn};

use crate::battle::hex::{HexId, HexSideId};
use crate::battle::move_profile::CostOutcome;
use crate::battle::movement::step_cost;
use crate::battle::units::{BattleUnit, Battlefield, Placement};
use crate::battle::zone_of_control::{
    backward_zone, foes_hex_locations, forward_zone_at, is_allowed_to_rout, is_in_foe_zone,
    is_in_forward_zone, threatening_foes,
};
use crate::core::config::ArbiterConfig;

/// Node in the open set, ordered for a min-heap on `priority`
#[derive(Debug, Clone)]
struct PathNode {
    hex: HexId,
    cost: f32,
    priority: OrderedFloat<f32>,
    steps: usize,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.hex == other.hex && self.priority == other.priority
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.hex.cmp(&self.hex))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a move-away search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveAway {
    /// Smallest budget that gets clear of every threatening foe, 0 when an
    /// adjacent hex already is
    pub max_remaining_points: f32,
    pub hex_locations: BTreeSet<HexId>,
}

/// Hex a unit is searched from
pub fn anchor_of(unit: &BattleUnit) -> HexId {
    match unit.placement {
        Placement::Hex(hex) => hex,
        Placement::Side(side) => side.hexes().0,
    }
}

/// Hexes the unit would cover with its anchor on `anchor`
fn footprint(unit: &BattleUnit, anchor: HexId) -> Vec<HexId> {
    match unit.placement {
        Placement::Hex(_) => vec![anchor],
        Placement::Side(side) => vec![anchor, anchor.adjacent(side.axis())],
    }
}

/// Placement of the unit with its anchor on `anchor`
pub fn placement_at(unit: &BattleUnit, anchor: HexId) -> Placement {
    match unit.placement {
        Placement::Hex(_) => Placement::Hex(anchor),
        Placement::Side(side) => Placement::Side(HexSideId::from_angle(anchor, side.axis())),
    }
}

/// The unit may end its move with its anchor on `anchor`
fn destination_free(field: &Battlefield, unit: &BattleUnit, anchor: HexId) -> bool {
    footprint(unit, anchor)
        .into_iter()
        .all(|hex| field.map.in_bounds(hex) && !field.has_other_unit_at(unit, hex))
}

fn edge_cost_inner(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
    from: HexId,
    to: HexId,
    previous: Option<HexId>,
    respect_zoc: bool,
) -> Option<f32> {
    if !from.is_adjacent(&to) {
        return None;
    }

    let origin = footprint(unit, from);
    let dest = footprint(unit, to);
    if dest
        .iter()
        .any(|hex| !field.map.in_bounds(*hex) || field.has_foe_at(unit, *hex))
    {
        trace!(unit = %unit.id, %to, "step blocked by foe or map edge");
        return None;
    }

    // Entering contact ends the move
    if respect_zoc
        && previous.is_some()
        && origin.iter().any(|hex| is_in_foe_zone(field, unit, *hex))
    {
        trace!(unit = %unit.id, %from, "path stops in contact");
        return None;
    }

    let outcome = origin
        .iter()
        .zip(dest.iter())
        .map(|(a, b)| step_cost(field, unit, *a, *b))
        .reduce(CostOutcome::worst)
        .unwrap_or(CostOutcome::Impassable);

    match outcome {
        CostOutcome::Impassable => None,
        CostOutcome::MinimalMove => Some(config.minimal_move_cost),
        CostOutcome::Add(value) | CostOutcome::Set(value) => Some(value),
    }
}

/// Cost for `unit` of stepping its anchor from `from` to the adjacent `to`.
///
/// `previous` is the hex the unit stepped into `from` from, `None` at the
/// start of a path. A unit that has moved into a foe's forward zone may not
/// step on. Returns `None` for impassable steps, foe-held destinations and
/// non-adjacent hexes. MINIMAL_MOVE steps cost `config.minimal_move_cost`.
pub fn edge_cost(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
    from: HexId,
    to: HexId,
    previous: Option<HexId>,
) -> Option<f32> {
    edge_cost_inner(field, config, unit, from, to, previous, true)
}

/// Dijkstra from the unit's anchor, bounded by `budget` and `max_steps`.
/// Includes the start at cost 0.
fn flood(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
    budget: f32,
    max_steps: usize,
    respect_zoc: bool,
) -> AHashMap<HexId, f32> {
    let start = anchor_of(unit);

    let mut best: AHashMap<HexId, f32> = AHashMap::new();
    let mut came_from: AHashMap<HexId, HexId> = AHashMap::new();
    let mut open = BinaryHeap::new();
    let mut capped = false;

    best.insert(start, 0.0);
    open.push(PathNode {
        hex: start,
        cost: 0.0,
        priority: OrderedFloat(0.0),
        steps: 0,
    });

    while let Some(current) = open.pop() {
        if current.cost > best.get(&current.hex).copied().unwrap_or(f32::INFINITY) {
            continue;
        }
        if current.steps >= max_steps {
            capped = true;
            continue;
        }

        let previous = came_from.get(&current.hex).copied();
        for (_, next) in field.map.neighbors(current.hex) {
            let Some(step) =
                edge_cost_inner(field, config, unit, current.hex, next, previous, respect_zoc)
            else {
                continue;
            };

            let cost = current.cost + step;
            if cost > budget {
                continue;
            }
            if cost < best.get(&next).copied().unwrap_or(f32::INFINITY) {
                best.insert(next, cost);
                came_from.insert(next, current.hex);
                open.push(PathNode {
                    hex: next,
                    cost,
                    priority: OrderedFloat(cost),
                    steps: current.steps + 1,
                });
            }
        }
    }

    if capped {
        warn!(unit = %unit.id, max_steps, "flood search hit its expansion cap");
    }
    best
}

/// Every anchor hex the unit can end a move on within its total points,
/// with the cheapest cost to get there. The start is not included.
pub fn reachable_hexes(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> BTreeMap<HexId, f32> {
    let start = anchor_of(unit);
    let budget = unit.total_points();
    let max_steps = config.max_steps(budget);
    let reachable: BTreeMap<HexId, f32> = flood(field, config, unit, budget, max_steps, true)
        .into_iter()
        .filter(|(hex, _)| *hex != start && destination_free(field, unit, *hex))
        .collect();
    debug!(unit = %unit.id, reachable = reachable.len(), "flooded reachable hexes");
    reachable
}

/// A* from the unit's anchor to `goal`, returning the hexes walked (start
/// and goal included) and the total cost.
///
/// Not limited by the unit's points; compare the cost against them to know
/// whether the path fits in one activation.
pub fn find_path(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
    goal: HexId,
) -> Option<(Vec<HexId>, f32)> {
    let start = anchor_of(unit);
    if start == goal {
        return Some((vec![start], 0.0));
    }
    if !destination_free(field, unit, goal) {
        return None;
    }

    let heuristic = |hex: HexId| hex.distance(&goal) as f32 * config.cheapest_step_cost;

    let mut open = BinaryHeap::new();
    let mut came_from: AHashMap<HexId, HexId> = AHashMap::new();
    let mut g_scores: AHashMap<HexId, f32> = AHashMap::new();

    g_scores.insert(start, 0.0);
    open.push(PathNode {
        hex: start,
        cost: 0.0,
        priority: OrderedFloat(heuristic(start)),
        steps: 0,
    });

    while let Some(current) = open.pop() {
        if current.hex == goal {
            return Some((reconstruct_path(&came_from, goal), current.cost));
        }
        if current.cost > g_scores.get(&current.hex).copied().unwrap_or(f32::INFINITY) {
            continue;
        }

        let previous = came_from.get(&current.hex).copied();
        for (_, next) in field.map.neighbors(current.hex) {
            let Some(step) = edge_cost(field, config, unit, current.hex, next, previous) else {
                continue;
            };
            let tentative = current.cost + step;
            if tentative < g_scores.get(&next).copied().unwrap_or(f32::INFINITY) {
                came_from.insert(next, current.hex);
                g_scores.insert(next, tentative);
                open.push(PathNode {
                    hex: next,
                    cost: tentative,
                    priority: OrderedFloat(tentative + heuristic(next)),
                    steps: current.steps + 1,
                });
            }
        }
    }

    None
}

fn reconstruct_path(came_from: &AHashMap<HexId, HexId>, mut current: HexId) -> Vec<HexId> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Hexes of the wing's retreat zone the unit can rout to.
///
/// `None` when the unit may not rout at all (formation, or no retreat zone).
pub fn allowed_rout_moves(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> Option<BTreeSet<HexId>> {
    if !is_allowed_to_rout(field, unit) {
        return None;
    }
    let zone = field.retreat_zone(unit)?;
    let moves: BTreeSet<HexId> = reachable_hexes(field, config, unit)
        .into_keys()
        .filter(|hex| zone.contains(hex))
        .collect();
    debug!(unit = %unit.id, legal = moves.len(), "enumerated rout moves");
    Some(moves)
}

/// Cheapest way out of the forward zones of every foe threatening the unit.
///
/// Unthreatened units get every free adjacent hex at budget 0. A threatened
/// unit with a safe free neighbour gets those neighbours at budget 0.
/// Otherwise the search floods past the foes' zones, regardless of the
/// unit's points, and returns the cheapest safe hexes with their cost. That
/// cost may exceed what the unit has left. No way out at all gives an empty
/// set.
pub fn allowed_move_away_moves(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> MoveAway {
    let threats = threatening_foes(field, unit);
    let start = anchor_of(unit);

    let is_safe = |anchor: HexId| {
        footprint(unit, anchor).into_iter().all(|hex| {
            !threats
                .iter()
                .any(|foe| is_in_forward_zone(&field.map, foe, hex))
        })
    };

    let adjacent_safe: BTreeSet<HexId> = field
        .map
        .neighbors(start)
        .map(|(_, hex)| hex)
        .filter(|hex| {
            edge_cost_inner(field, config, unit, start, *hex, None, false).is_some()
                && destination_free(field, unit, *hex)
                && is_safe(*hex)
        })
        .collect();

    if threats.is_empty() || !adjacent_safe.is_empty() {
        debug!(unit = %unit.id, threats = threats.len(), legal = adjacent_safe.len(), "move away next door");
        return MoveAway {
            max_remaining_points: 0.0,
            hex_locations: adjacent_safe,
        };
    }

    // Every hex of the map at most once per path
    let max_steps = (field.map.width as usize) * (field.map.height as usize);
    let candidates: Vec<(HexId, f32)> = flood(field, config, unit, f32::INFINITY, max_steps, false)
        .into_iter()
        .filter(|(hex, _)| *hex != start && destination_free(field, unit, *hex) && is_safe(*hex))
        .collect();

    let Some(cheapest) = candidates.iter().map(|(_, cost)| *cost).min_by(f32::total_cmp) else {
        debug!(unit = %unit.id, "no way out of contact");
        return MoveAway {
            max_remaining_points: 0.0,
            hex_locations: BTreeSet::new(),
        };
    };

    let hex_locations: BTreeSet<HexId> = candidates
        .into_iter()
        .filter(|(_, cost)| (cost - cheapest).abs() <= f32::EPSILON)
        .map(|(hex, _)| hex)
        .collect();
    debug!(unit = %unit.id, cost = cheapest, legal = hex_locations.len(), "move away through contact");
    MoveAway {
        max_remaining_points: cheapest,
        hex_locations,
    }
}

/// The unit standing on `anchor` could strike a foe hex: a troop by
/// turning to it, a formation with its current facing
fn engages_from(
    field: &Battlefield,
    unit: &BattleUnit,
    anchor: HexId,
    foe_hexes: &BTreeSet<HexId>,
) -> bool {
    if unit.is_formation() {
        forward_zone_at(&field.map, &placement_at(unit, anchor), unit.facing)
            .iter()
            .any(|zone| foe_hexes.contains(&zone.hex))
    } else {
        anchor.neighbors().iter().any(|hex| foe_hexes.contains(hex))
    }
}

/// Reachable hexes from which the unit can attack a foe.
///
/// `None` when the unit's wing has no retreat zone.
pub fn allowed_attack_moves(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> Option<BTreeSet<HexId>> {
    field.retreat_zone(unit)?;
    let foe_hexes = foes_hex_locations(field, unit);
    let moves: BTreeSet<HexId> = reachable_hexes(field, config, unit)
        .into_keys()
        .filter(|hex| engages_from(field, unit, *hex, &foe_hexes))
        .collect();
    debug!(unit = %unit.id, legal = moves.len(), "enumerated attack moves");
    Some(moves)
}

/// Reachable hexes within fire range of a foe and outside every foe's
/// forward and backward zone.
///
/// `None` when the unit's wing has no retreat zone. A unit without range
/// gets an empty set.
pub fn allowed_fire_moves(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> Option<BTreeSet<HexId>> {
    field.retreat_zone(unit)?;
    let range = unit.fire_range.unwrap_or(config.default_fire_range);
    if range == 0 {
        return Some(BTreeSet::new());
    }

    let in_range: BTreeSet<HexId> = foes_hex_locations(field, unit)
        .iter()
        .flat_map(|hex| hex.hexes_in_range(range))
        .collect();
    let mut excluded: BTreeSet<HexId> = BTreeSet::new();
    for foe in field.foes_of(unit).filter(|foe| !foe.is_routed()) {
        excluded.extend(
            forward_zone_at(&field.map, &foe.placement, foe.facing)
                .into_iter()
                .chain(backward_zone(&field.map, foe))
                .map(|zone| zone.hex),
        );
    }

    let moves: BTreeSet<HexId> = reachable_hexes(field, config, unit)
        .into_keys()
        .filter(|anchor| {
            let hexes = footprint(unit, *anchor);
            hexes.iter().all(|hex| !excluded.contains(hex))
                && hexes.iter().any(|hex| in_range.contains(hex))
        })
        .collect();
    debug!(unit = %unit.id, range, legal = moves.len(), "enumerated fire moves");
    Some(moves)
}

/// Reachable hexes where the whole unit stands inside its wing's retreat
/// zone. `None` when no retreat zone is configured.
pub fn allowed_retreat_moves(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> Option<BTreeSet<HexId>> {
    let zone = field.retreat_zone(unit)?;
    let moves: BTreeSet<HexId> = reachable_hexes(field, config, unit)
        .into_keys()
        .filter(|anchor| footprint(unit, *anchor).iter().all(|hex| zone.contains(hex)))
        .collect();
    debug!(unit = %unit.id, legal = moves.len(), "enumerated retreat moves");
    Some(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::battle_map::BattleMap;
    use crate::battle::hex::Angle;
    use crate::battle::terrain::{HexSideType, HexType};
    use crate::battle::units::Wing;
    use crate::core::types::{PlayerId, WingId};

    fn angle(degrees: i32) -> Angle {
        Angle::new(degrees).unwrap()
    }

    fn hex(col: i32, row: i32) -> HexId {
        HexId::new(col, row)
    }

    fn field() -> Battlefield {
        let mut field = Battlefield::new(BattleMap::new(12, 12));
        field.add_wing(Wing::new(WingId(1), PlayerId(1)));
        field.add_wing(Wing::new(WingId(2), PlayerId(2)));
        field
    }

    fn field_with_zone(zone: impl IntoIterator<Item = HexId>) -> Battlefield {
        let mut field = field();
        field.add_wing(Wing::new(WingId(1), PlayerId(1)).with_retreat_zone(zone));
        field
    }

    fn troop(col: i32, row: i32, facing: i32) -> BattleUnit {
        BattleUnit::troop(WingId(1), hex(col, row), angle(facing)).with_points(2.0, 1.0)
    }

    fn foe(col: i32, row: i32, facing: i32) -> BattleUnit {
        BattleUnit::troop(WingId(2), hex(col, row), angle(facing))
    }

    fn formation() -> BattleUnit {
        let side = HexSideId::new(hex(5, 7), hex(5, 8));
        BattleUnit::formation(WingId(1), side, angle(90)).with_points(2.0, 1.0)
    }

    #[test]
    fn test_edge_cost_terrain() {
        let mut field = field();
        let config = ArbiterConfig {
            minimal_move_cost: 1.5,
            ..ArbiterConfig::default()
        };
        let unit = troop(5, 5, 0);
        let origin = hex(5, 5);

        assert_eq!(edge_cost(&field, &config, &unit, origin, hex(5, 4), None), Some(1.0));

        field.map.set_hex_type(hex(5, 4), HexType::Impassable);
        assert_eq!(edge_cost(&field, &config, &unit, origin, hex(5, 4), None), None);

        field
            .map
            .set_hex_side_type(HexSideId::new(origin, hex(5, 6)), HexSideType::Climb);
        assert_eq!(edge_cost(&field, &config, &unit, origin, hex(5, 6), None), Some(1.5));

        field
            .map
            .set_hex_side_type(HexSideId::new(origin, hex(4, 5)), HexSideType::Easy);
        assert_eq!(edge_cost(&field, &config, &unit, origin, hex(4, 5), None), Some(0.5));
    }

    #[test]
    fn test_edge_cost_rejects_foes_and_gaps() {
        let mut field = field();
        field.add_unit(foe(5, 4, 0));
        let unit = troop(5, 5, 0);
        let config = ArbiterConfig::default();

        assert_eq!(edge_cost(&field, &config, &unit, hex(5, 5), hex(5, 4), None), None);
        assert_eq!(edge_cost(&field, &config, &unit, hex(5, 5), hex(5, 3), None), None);
    }

    #[test]
    fn test_edge_cost_stops_in_contact() {
        let mut field = field();
        // Zone covers (4,6), (5,6), (6,6)
        field.add_unit(foe(5, 5, 180));
        let unit = troop(5, 8, 0);
        let config = ArbiterConfig::default();

        let leaving_start = edge_cost(&field, &config, &unit, hex(5, 6), hex(4, 6), None);
        assert_eq!(leaving_start, Some(1.0));
        let walked_in = edge_cost(&field, &config, &unit, hex(5, 6), hex(4, 6), Some(hex(5, 7)));
        assert_eq!(walked_in, None);
    }

    #[test]
    fn test_formation_edge_checks_both_hexes() {
        let mut field = field();
        let unit = formation();
        let config = ArbiterConfig::default();
        let anchor = anchor_of(&unit);
        assert_eq!(anchor, hex(5, 8));

        assert_eq!(edge_cost(&field, &config, &unit, anchor, hex(6, 8), None), Some(1.0));

        field.add_unit(foe(6, 7, 0));
        assert_eq!(edge_cost(&field, &config, &unit, anchor, hex(6, 8), None), None);
    }

    #[test]
    fn test_reachable_on_open_ground() {
        let field = field();
        let unit = troop(5, 5, 0);
        let reachable = reachable_hexes(&field, &ArbiterConfig::default(), &unit);

        assert_eq!(reachable.len(), 36);
        assert!(!reachable.contains_key(&hex(5, 5)));
        assert_eq!(reachable[&hex(5, 2)], 3.0);
        assert!(reachable.keys().all(|h| h.distance(&hex(5, 5)) <= 3));
    }

    #[test]
    fn test_reachable_passes_friends_not_foes() {
        let mut field = field();
        field.add_unit(troop(5, 4, 0));
        let unit = troop(5, 5, 0);
        let reachable = reachable_hexes(&field, &ArbiterConfig::default(), &unit);

        assert!(!reachable.contains_key(&hex(5, 4)));
        assert_eq!(reachable[&hex(5, 3)], 2.0);
    }

    #[test]
    fn test_find_path_straight() {
        let field = field();
        let unit = troop(5, 5, 0);
        let (path, cost) = find_path(&field, &ArbiterConfig::default(), &unit, hex(5, 2)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(path.first(), Some(&hex(5, 5)));
        assert_eq!(path.last(), Some(&hex(5, 2)));
        assert_eq!(cost, 3.0);
    }

    #[test]
    fn test_find_path_around_obstacle() {
        let mut field = field();
        field.map.set_hex_type(hex(5, 4), HexType::Impassable);
        let unit = troop(5, 5, 0);
        let (path, cost) = find_path(&field, &ArbiterConfig::default(), &unit, hex(5, 3)).unwrap();
        assert!(!path.contains(&hex(5, 4)));
        assert_eq!(cost, 3.0);
    }

    #[test]
    fn test_find_path_to_self_and_occupied_goal() {
        let mut field = field();
        field.add_unit(troop(5, 2, 0));
        let unit = troop(5, 5, 0);
        let config = ArbiterConfig::default();

        assert_eq!(find_path(&field, &config, &unit, hex(5, 5)), Some((vec![hex(5, 5)], 0.0)));
        assert!(find_path(&field, &config, &unit, hex(5, 2)).is_none());
    }

    #[test]
    fn test_rout_moves_into_retreat_zone() {
        let row_zero: Vec<HexId> = (0..12).map(|col| hex(col, 0)).collect();
        let field = field_with_zone(row_zero);
        let unit = troop(5, 3, 0);

        let moves = allowed_rout_moves(&field, &ArbiterConfig::default(), &unit).unwrap();
        assert!(moves.contains(&hex(5, 0)));
        assert!(moves.iter().all(|h| h.row == 0));
    }

    #[test]
    fn test_rout_needs_retreat_zone_and_single_hex() {
        let field = field();
        let config = ArbiterConfig::default();
        assert!(allowed_rout_moves(&field, &config, &troop(5, 3, 0)).is_none());

        let field = field_with_zone([hex(5, 0)]);
        assert!(allowed_rout_moves(&field, &config, &formation()).is_none());
    }

    #[test]
    fn test_move_away_without_threats() {
        let field = field();
        let unit = troop(5, 5, 0);
        let away = allowed_move_away_moves(&field, &ArbiterConfig::default(), &unit);

        assert_eq!(away.max_remaining_points, 0.0);
        let expected: BTreeSet<HexId> = hex(5, 5).neighbors().into_iter().collect();
        assert_eq!(away.hex_locations, expected);
    }

    #[test]
    fn test_move_away_to_safe_neighbours() {
        let mut field = field();
        // Zone covers (6,5), (5,5), (4,5)
        field.add_unit(foe(5, 4, 180));
        let unit = troop(5, 5, 0);
        let away = allowed_move_away_moves(&field, &ArbiterConfig::default(), &unit);

        assert_eq!(away.max_remaining_points, 0.0);
        let expected: BTreeSet<HexId> = [hex(6, 6), hex(5, 6), hex(4, 6)].into_iter().collect();
        assert_eq!(away.hex_locations, expected);
    }

    #[test]
    fn test_move_away_through_contact() {
        let mut field = field();
        field.add_unit(foe(5, 4, 180));
        for blocked in [hex(6, 6), hex(5, 6), hex(4, 6)] {
            field.map.set_hex_type(blocked, HexType::Impassable);
        }
        let unit = troop(5, 5, 0);
        let away = allowed_move_away_moves(&field, &ArbiterConfig::default(), &unit);

        assert_eq!(away.max_remaining_points, 2.0);
        let expected: BTreeSet<HexId> = [
            hex(6, 4),
            hex(7, 4),
            hex(7, 5),
            hex(4, 4),
            hex(3, 4),
            hex(3, 5),
        ]
        .into_iter()
        .collect();
        assert_eq!(away.hex_locations, expected);
    }

    #[test]
    fn test_move_away_reports_cost_beyond_points() {
        let mut field = field();
        field.add_unit(foe(5, 4, 180));
        for blocked in [hex(6, 6), hex(5, 6), hex(4, 6)] {
            field.map.set_hex_type(blocked, HexType::Impassable);
        }
        let unit = troop(5, 5, 0).with_points(1.0, 0.0);
        let away = allowed_move_away_moves(&field, &ArbiterConfig::default(), &unit);

        assert_eq!(away.max_remaining_points, 2.0);
        assert!(away.max_remaining_points > unit.total_points());
        assert_eq!(away.hex_locations.len(), 6);
        assert!(away.hex_locations.contains(&hex(7, 5)));
        assert!(away.hex_locations.contains(&hex(3, 5)));
    }

    #[test]
    fn test_move_away_boxed_in() {
        let mut field = field();
        field.add_unit(foe(5, 4, 180));
        let around: Vec<HexId> = hex(5, 5).neighbors().into_iter().collect();
        for blocked in around.into_iter().filter(|h| *h != hex(5, 4)) {
            field.map.set_hex_type(blocked, HexType::Impassable);
        }
        let away = allowed_move_away_moves(&field, &ArbiterConfig::default(), &troop(5, 5, 0));
        assert!(away.hex_locations.is_empty());
    }

    #[test]
    fn test_attack_moves() {
        let mut field = field_with_zone([hex(0, 11)]);
        field.add_unit(foe(5, 4, 0));
        let unit = troop(5, 8, 0);

        let moves = allowed_attack_moves(&field, &ArbiterConfig::default(), &unit).unwrap();
        let expected: BTreeSet<HexId> = [hex(5, 5)].into_iter().collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_attack_needs_retreat_zone() {
        let mut field = field();
        field.add_unit(foe(5, 4, 0));
        assert!(allowed_attack_moves(&field, &ArbiterConfig::default(), &troop(5, 8, 0)).is_none());
    }

    #[test]
    fn test_fire_moves_in_range() {
        let mut field = field_with_zone([hex(0, 11)]);
        field.add_unit(foe(5, 4, 180));
        let config = ArbiterConfig::default();

        let unit = troop(5, 9, 0).with_fire_range(2);
        let moves = allowed_fire_moves(&field, &config, &unit).unwrap();
        let expected: BTreeSet<HexId> = [hex(5, 6)].into_iter().collect();
        assert_eq!(moves, expected);

        // Further in, the foe's front is excluded
        let unit = troop(5, 9, 0).with_points(4.0, 1.0).with_fire_range(2);
        let moves = allowed_fire_moves(&field, &config, &unit).unwrap();
        assert!(moves.contains(&hex(5, 6)));
        for front in [hex(4, 5), hex(5, 5), hex(6, 5)] {
            assert!(!moves.contains(&front));
        }
    }

    #[test]
    fn test_fire_without_range() {
        let mut field = field_with_zone([hex(0, 11)]);
        field.add_unit(foe(5, 4, 180));
        let moves = allowed_fire_moves(&field, &ArbiterConfig::default(), &troop(5, 9, 0));
        assert_eq!(moves, Some(BTreeSet::new()));
    }

    #[test]
    fn test_retreat_keeps_whole_formation_in_zone() {
        let field = field_with_zone([hex(5, 5), hex(5, 6)]);
        let moves = allowed_retreat_moves(&field, &ArbiterConfig::default(), &formation()).unwrap();
        let expected: BTreeSet<HexId> = [hex(5, 6)].into_iter().collect();
        assert_eq!(moves, expected);
    }

    #[test]
    fn test_retreat_unset_zone_differs_from_empty() {
        let config = ArbiterConfig::default();
        let unit = troop(5, 3, 0);
        assert_eq!(allowed_retreat_moves(&field(), &config, &unit), None);

        let far = field_with_zone([hex(11, 11)]);
        assert_eq!(allowed_retreat_moves(&far, &config, &unit), Some(BTreeSet::new()));
    }
}
