//! Command log of committed moves
//!
//! The arbiter never mutates a battlefield. Callers that commit an allowed
//! move or rotation record it here, which applies it and keeps enough to
//! take it back.

use serde::Serialize;
use tracing::debug;

use crate::battle::hex::Angle;
use crate::battle::move_profile::CostOutcome;
use crate::battle::movement::{AllowedMove, AllowedRotation, MovementClass};
use crate::battle::units::{BattleUnit, Battlefield, Placement};
use crate::core::error::{ArbiterError, Result};
use crate::core::types::UnitId;

/// Everything a committed action changes on a unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitPose {
    pub placement: Placement,
    pub facing: Angle,
    pub movement_points: f32,
    pub extended_movement_points: f32,
}

impl UnitPose {
    pub fn of(unit: &BattleUnit) -> Self {
        Self {
            placement: unit.placement,
            facing: unit.facing,
            movement_points: unit.movement_points,
            extended_movement_points: unit.extended_movement_points,
        }
    }

    fn apply_to(&self, unit: &mut BattleUnit) {
        unit.placement = self.placement;
        unit.facing = self.facing;
        unit.movement_points = self.movement_points;
        unit.extended_movement_points = self.extended_movement_points;
    }
}

/// Points left after paying `cost` from the pool `class` names.
///
/// Extended spending drains the normal pool first. A minimal move ends the
/// activation.
pub fn spend(unit: &BattleUnit, cost: CostOutcome, class: MovementClass) -> (f32, f32) {
    let value = cost.value().unwrap_or(0.0);
    match class {
        MovementClass::Normal => ((unit.movement_points - value).max(0.0), unit.extended_movement_points),
        MovementClass::Extended => {
            let overflow = (value - unit.movement_points).max(0.0);
            (0.0, (unit.extended_movement_points - overflow).max(0.0))
        }
        MovementClass::Minimal => (0.0, 0.0),
    }
}

/// One committed action on one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveCommand {
    pub unit: UnitId,
    pub before: UnitPose,
    pub after: UnitPose,
}

impl MoveCommand {
    /// Commit an allowed move or formation turn
    pub fn from_move(unit: &BattleUnit, allowed: &AllowedMove) -> Self {
        let (movement_points, extended_movement_points) = spend(unit, allowed.cost, allowed.class);
        Self {
            unit: unit.id,
            before: UnitPose::of(unit),
            after: UnitPose {
                placement: allowed.placement,
                facing: allowed.facing,
                movement_points,
                extended_movement_points,
            },
        }
    }

    /// Commit an allowed rotation
    pub fn from_rotation(unit: &BattleUnit, allowed: &AllowedRotation) -> Self {
        let (movement_points, extended_movement_points) = spend(unit, allowed.cost, allowed.class);
        Self {
            unit: unit.id,
            before: UnitPose::of(unit),
            after: UnitPose {
                placement: unit.placement,
                facing: allowed.facing,
                movement_points,
                extended_movement_points,
            },
        }
    }
}

/// Undo/redo history of committed actions
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    done: Vec<MoveCommand>,
    undone: Vec<MoveCommand>,
}

fn set_pose(field: &mut Battlefield, id: UnitId, pose: &UnitPose) -> Result<()> {
    let unit = field.unit_mut(id).ok_or(ArbiterError::UnitNotFound(id))?;
    pose.apply_to(unit);
    Ok(())
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` and append it. Anything undone is forgotten.
    pub fn record(&mut self, field: &mut Battlefield, command: MoveCommand) -> Result<()> {
        set_pose(field, command.unit, &command.after)?;
        debug!(unit = %command.unit, "recorded move");
        self.done.push(command);
        self.undone.clear();
        Ok(())
    }

    /// Take back the latest command; `None` when there is nothing to undo
    pub fn undo(&mut self, field: &mut Battlefield) -> Result<Option<UnitId>> {
        let Some(command) = self.done.pop() else {
            return Ok(None);
        };
        if let Err(err) = set_pose(field, command.unit, &command.before) {
            self.done.push(command);
            return Err(err);
        }
        let id = command.unit;
        debug!(unit = %id, "undid move");
        self.undone.push(command);
        Ok(Some(id))
    }

    /// Re-apply the latest undone command
    pub fn redo(&mut self, field: &mut Battlefield) -> Result<Option<UnitId>> {
        let Some(command) = self.undone.pop() else {
            return Ok(None);
        };
        if let Err(err) = set_pose(field, command.unit, &command.after) {
            self.undone.push(command);
            return Err(err);
        }
        let id = command.unit;
        debug!(unit = %id, "redid move");
        self.done.push(command);
        Ok(Some(id))
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Commands currently applied, oldest first
    pub fn commands(&self) -> &[MoveCommand] {
        &self.done
    }

    /// Nothing spent yet by `unit` in the recorded history
    pub fn is_first_action(&self, unit: UnitId) -> bool {
        !self.done.iter().any(|c| c.unit == unit)
    }
}
