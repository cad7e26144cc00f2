//! The arbitration facade
//!
//! `Arbitrator` owns the engine tunables and answers every legality query
//! against a caller-supplied `Battlefield`. It holds no game state, so one
//! instance can serve any number of battles.

use std::collections::{BTreeMap, BTreeSet};

use crate::battle::engagement::{cost_to_engage, nearest_foes_that_can_join_and_engage, EngagingFoes};
use crate::battle::hex::HexId;
use crate::battle::movement::{
    allowed_moves, allowed_moves_back, allowed_rotations, formation_allowed_moves,
    formation_allowed_moves_back, formation_allowed_moves_back_turns, formation_allowed_turns,
    MoveMap, RotationMap,
};
use crate::battle::pathfinding::{
    allowed_attack_moves, allowed_fire_moves, allowed_move_away_moves, allowed_retreat_moves,
    allowed_rout_moves, edge_cost, find_path, reachable_hexes, MoveAway,
};
use crate::battle::units::{BattleUnit, Battlefield};
use crate::battle::zone_of_control::{
    backward_zone, controlled_hexes, foes_hex_locations, forward_zone, is_allowed_to_confront,
    is_allowed_to_rout, is_engaged, occupied_hexes, ZoneHex,
};
use crate::core::config::ArbiterConfig;
use crate::core::error::{ArbiterError, Result};
use crate::core::types::UnitId;

/// Single entry point for movement and engagement legality
#[derive(Debug, Clone, Default)]
pub struct Arbitrator {
    config: ArbiterConfig,
}

impl Arbitrator {
    pub fn new(config: ArbiterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    /// Look a unit up, failing with `UnitNotFound`
    pub fn unit<'a>(&self, field: &'a Battlefield, id: UnitId) -> Result<&'a BattleUnit> {
        field.unit(id).ok_or(ArbiterError::UnitNotFound(id))
    }

    // Zones

    pub fn forward_zone(&self, field: &Battlefield, unit: &BattleUnit) -> Vec<ZoneHex> {
        forward_zone(&field.map, unit)
    }

    pub fn backward_zone(&self, field: &Battlefield, unit: &BattleUnit) -> Vec<ZoneHex> {
        backward_zone(&field.map, unit)
    }

    pub fn is_engaged(&self, field: &Battlefield, unit: &BattleUnit) -> bool {
        is_engaged(field, unit)
    }

    pub fn is_allowed_to_rout(&self, field: &Battlefield, unit: &BattleUnit) -> bool {
        is_allowed_to_rout(field, unit)
    }

    pub fn is_allowed_to_confront(&self, field: &Battlefield, unit: &BattleUnit) -> bool {
        is_allowed_to_confront(field, unit)
    }

    pub fn occupied_hexes(&self, units: &[&BattleUnit]) -> BTreeSet<HexId> {
        occupied_hexes(units)
    }

    pub fn controlled_hexes(&self, field: &Battlefield, units: &[&BattleUnit]) -> BTreeSet<HexId> {
        controlled_hexes(&field.map, units)
    }

    pub fn foes_hex_locations(&self, field: &Battlefield, unit: &BattleUnit) -> BTreeSet<HexId> {
        foes_hex_locations(field, unit)
    }

    // Engagement

    pub fn cost_to_engage(
        &self,
        field: &Battlefield,
        foe: &BattleUnit,
        target: &BattleUnit,
    ) -> Option<u32> {
        cost_to_engage(field, &self.config, foe, target)
    }

    pub fn nearest_foes_that_can_join_and_engage(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
    ) -> EngagingFoes {
        nearest_foes_that_can_join_and_engage(field, &self.config, unit)
    }

    // Single actions

    pub fn allowed_moves(&self, field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
        allowed_moves(field, unit, first)
    }

    pub fn allowed_moves_back(&self, field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
        allowed_moves_back(field, unit, first)
    }

    pub fn allowed_rotations(&self, field: &Battlefield, unit: &BattleUnit, first: bool) -> RotationMap {
        allowed_rotations(field, unit, first)
    }

    pub fn formation_allowed_moves(&self, field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
        formation_allowed_moves(field, unit, first)
    }

    pub fn formation_allowed_moves_back(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
        first: bool,
    ) -> MoveMap {
        formation_allowed_moves_back(field, unit, first)
    }

    pub fn formation_allowed_turns(&self, field: &Battlefield, unit: &BattleUnit, first: bool) -> MoveMap {
        formation_allowed_turns(field, unit, first)
    }

    pub fn formation_allowed_moves_back_turns(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
        first: bool,
    ) -> MoveMap {
        formation_allowed_moves_back_turns(field, unit, first)
    }

    // Multi-step searches

    pub fn edge_cost(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
        from: HexId,
        to: HexId,
        previous: Option<HexId>,
    ) -> Option<f32> {
        edge_cost(field, &self.config, unit, from, to, previous)
    }

    pub fn reachable_hexes(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
    ) -> BTreeMap<HexId, f32> {
        reachable_hexes(field, &self.config, unit)
    }

    pub fn find_path(
        &self,
        field: &Battlefield,
        unit: &BattleUnit,
        goal: HexId,
    ) -> Option<(Vec<HexId>, f32)> {
        find_path(field, &self.config, unit, goal)
    }

    pub fn allowed_rout_moves(&self, field: &Battlefield, unit: &BattleUnit) -> Option<BTreeSet<HexId>> {
        allowed_rout_moves(field, &self.config, unit)
    }

    pub fn allowed_move_away_moves(&self, field: &Battlefield, unit: &BattleUnit) -> MoveAway {
        allowed_move_away_moves(field, &self.config, unit)
    }

    pub fn allowed_attack_moves(&self, field: &Battlefield, unit: &BattleUnit) -> Option<BTreeSet<HexId>> {
        allowed_attack_moves(field, &self.config, unit)
    }

    pub fn allowed_fire_moves(&self, field: &Battlefield, unit: &BattleUnit) -> Option<BTreeSet<HexId>> {
        allowed_fire_moves(field, &self.config, unit)
    }

    pub fn allowed_retreat_moves(&self, field: &Battlefield, unit: &BattleUnit) -> Option<BTreeSet<HexId>> {
        allowed_retreat_moves(field, &self.config, unit)
    }
}
