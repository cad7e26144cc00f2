//! Engagement reach: how many actions a foe needs before it threatens a unit
//!
//! Units engage when the target stands in their forward zone. A foe that is
//! not yet in contact walks its own legal moves and rotations, one action per
//! level, until it is. The search stops at the configured depth.

use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

use crate::battle::hex::Angle;
use crate::battle::movement::{allowed_moves, allowed_rotations, formation_allowed_turns};
use crate::battle::units::{BattleUnit, Battlefield, Placement};
use crate::battle::zone_of_control::{forward_zone_at, threatens};
use crate::core::config::ArbiterConfig;
use crate::core::types::UnitId;

/// Foes able to reach engagement at the lowest cost
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngagingFoes {
    /// Cost shared by every foe listed, `None` when the list is empty
    pub cost: Option<u32>,
    pub foes: Vec<UnitId>,
}

/// Points are not what limits an engagement chain, depth is
const UNBOUNDED_POINTS: f32 = 1.0e6;

fn poses_after_one_action(field: &Battlefield, foe: &BattleUnit) -> Vec<(Placement, Angle)> {
    let mut poses: Vec<(Placement, Angle)> = allowed_moves(field, foe, true)
        .into_values()
        .map(|m| (m.placement, m.facing))
        .collect();
    if foe.is_formation() {
        poses.extend(
            formation_allowed_turns(field, foe, true)
                .into_values()
                .map(|m| (m.placement, m.facing)),
        );
    }
    poses.extend(
        allowed_rotations(field, foe, true)
            .into_values()
            .map(|r| (foe.placement, r.facing)),
    );
    poses
}

fn reaches(field: &Battlefield, placement: &Placement, facing: Angle, target: &BattleUnit) -> bool {
    let zone = forward_zone_at(&field.map, placement, facing);
    target
        .hexes()
        .iter()
        .any(|hex| zone.iter().any(|z| z.hex == *hex))
}

/// Number of actions `foe` needs to engage `target`, counting the engaging
/// action itself.
///
/// A foe already adjacent and facing the target costs 1; each move or
/// rotation needed first adds 1. Returns `None` past
/// `config.max_engage_depth` actions, and for routed foes.
pub fn cost_to_engage(
    field: &Battlefield,
    config: &ArbiterConfig,
    foe: &BattleUnit,
    target: &BattleUnit,
) -> Option<u32> {
    if foe.is_routed() {
        return None;
    }
    if threatens(&field.map, foe, target) {
        return Some(1);
    }

    let mut walker = foe.clone().with_points(UNBOUNDED_POINTS, 0.0);
    let mut seen: HashSet<(Placement, Angle)> = HashSet::new();
    seen.insert((foe.placement, foe.facing));
    let mut frontier: VecDeque<(Placement, Angle, u32)> = VecDeque::new();
    frontier.push_back((foe.placement, foe.facing, 0));

    while let Some((placement, facing, depth)) = frontier.pop_front() {
        if depth >= config.max_engage_depth {
            continue;
        }
        walker.placement = placement;
        walker.facing = facing;

        for (next_placement, next_facing) in poses_after_one_action(field, &walker) {
            if !seen.insert((next_placement, next_facing)) {
                continue;
            }
            if reaches(field, &next_placement, next_facing, target) {
                return Some(depth + 2);
            }
            frontier.push_back((next_placement, next_facing, depth + 1));
        }
    }

    None
}

/// Foes of `unit` that can engage it at the lowest cost; ties are all kept,
/// in battlefield order
pub fn nearest_foes_that_can_join_and_engage(
    field: &Battlefield,
    config: &ArbiterConfig,
    unit: &BattleUnit,
) -> EngagingFoes {
    let mut best = EngagingFoes::default();

    for foe in field.foes_of(unit) {
        let Some(cost) = cost_to_engage(field, config, foe, unit) else {
            continue;
        };
        match best.cost {
            Some(current) if cost > current => {}
            Some(current) if cost == current => best.foes.push(foe.id),
            _ => {
                best.cost = Some(cost);
                best.foes = vec![foe.id];
            }
        }
    }

    debug!(unit = %unit.id, cost = ?best.cost, foes = best.foes.len(), "nearest engaging foes");
    best
}
