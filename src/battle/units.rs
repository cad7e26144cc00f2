//! Units, wings and the battlefield snapshot the arbiter reads
//!
//! Troops and characters stand on one hex. Formations stand on a hex side
//! (two hexes) and face across their long edge.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::battle::battle_map::BattleMap;
use crate::battle::hex::{Angle, HexId, HexSideId};
use crate::battle::move_profile::MoveProfile;
use crate::core::types::{PlayerId, UnitId, WingId};

/// Kind of unit, which decides its footprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Troop,
    Character,
    Formation,
}

/// Cohesion state of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitStance {
    #[default]
    Good,
    Disrupted,
    Routed,
}

/// Where a unit stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Placement {
    Hex(HexId),
    Side(HexSideId),
}

impl Placement {
    /// Hexes covered by the placement
    pub fn hexes(&self) -> Vec<HexId> {
        match self {
            Placement::Hex(hex) => vec![*hex],
            Placement::Side(side) => {
                let (a, b) = side.hexes();
                vec![a, b]
            }
        }
    }

    pub fn contains(&self, hex: &HexId) -> bool {
        match self {
            Placement::Hex(own) => own == hex,
            Placement::Side(side) => side.contains(hex),
        }
    }
}

/// A unit on the battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleUnit {
    pub id: UnitId,
    pub kind: UnitKind,
    pub wing: WingId,

    // Position
    pub placement: Placement,
    pub facing: Angle,

    // Budget for the current activation
    pub movement_points: f32,
    pub extended_movement_points: f32,

    pub profile: MoveProfile,
    pub stance: UnitStance,
    /// Fire range in hexes; `None` falls back to the configured default
    pub fire_range: Option<u32>,
}

impl BattleUnit {
    fn new(kind: UnitKind, wing: WingId, placement: Placement, facing: Angle) -> Self {
        Self {
            id: UnitId::new(),
            kind,
            wing,
            placement,
            facing,
            movement_points: 2.0,
            extended_movement_points: 1.0,
            profile: MoveProfile::standard(),
            stance: UnitStance::default(),
            fire_range: None,
        }
    }

    pub fn troop(wing: WingId, hex: HexId, facing: Angle) -> Self {
        Self::new(UnitKind::Troop, wing, Placement::Hex(hex), facing)
    }

    pub fn character(wing: WingId, hex: HexId, facing: Angle) -> Self {
        Self::new(UnitKind::Character, wing, Placement::Hex(hex), facing)
    }

    /// A formation on `side`, facing across its long edge.
    ///
    /// Panics unless `facing` is perpendicular to the line joining the hexes.
    pub fn formation(wing: WingId, side: HexSideId, facing: Angle) -> Self {
        assert!(
            facing.turn_steps(side.axis()) == 3,
            "formation on axis {} cannot face {}",
            side.axis(),
            facing
        );
        Self::new(UnitKind::Formation, wing, Placement::Side(side), facing)
    }

    pub fn with_points(mut self, normal: f32, extended: f32) -> Self {
        self.movement_points = normal;
        self.extended_movement_points = extended;
        self
    }

    pub fn with_profile(mut self, profile: MoveProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_fire_range(mut self, range: u32) -> Self {
        self.fire_range = Some(range);
        self
    }

    pub fn hexes(&self) -> Vec<HexId> {
        self.placement.hexes()
    }

    pub fn occupies(&self, hex: &HexId) -> bool {
        self.placement.contains(hex)
    }

    pub fn is_formation(&self) -> bool {
        matches!(self.kind, UnitKind::Formation)
    }

    pub fn is_routed(&self) -> bool {
        matches!(self.stance, UnitStance::Routed)
    }

    /// Normal plus extended points still available
    pub fn total_points(&self) -> f32 {
        self.movement_points + self.extended_movement_points
    }
}

/// A group of units of one player sharing a retreat zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wing {
    pub id: WingId,
    pub player: PlayerId,
    pub retreat_zone: Option<BTreeSet<HexId>>,
}

impl Wing {
    pub fn new(id: WingId, player: PlayerId) -> Self {
        Self {
            id,
            player,
            retreat_zone: None,
        }
    }

    pub fn with_retreat_zone(mut self, zone: impl IntoIterator<Item = HexId>) -> Self {
        self.retreat_zone = Some(zone.into_iter().collect());
        self
    }
}

/// Snapshot of everything the arbiter may read: map, wings and units
#[derive(Debug, Clone)]
pub struct Battlefield {
    pub map: BattleMap,
    wings: BTreeMap<WingId, Wing>,
    units: Vec<BattleUnit>,
}

impl Battlefield {
    pub fn new(map: BattleMap) -> Self {
        Self {
            map,
            wings: BTreeMap::new(),
            units: Vec::new(),
        }
    }

    pub fn add_wing(&mut self, wing: Wing) {
        self.wings.insert(wing.id, wing);
    }

    pub fn wing(&self, id: WingId) -> Option<&Wing> {
        self.wings.get(&id)
    }

    pub fn wing_mut(&mut self, id: WingId) -> Option<&mut Wing> {
        self.wings.get_mut(&id)
    }

    /// Add a unit; returns its id
    pub fn add_unit(&mut self, unit: BattleUnit) -> UnitId {
        let id = unit.id;
        self.units.push(unit);
        id
    }

    pub fn unit(&self, id: UnitId) -> Option<&BattleUnit> {
        self.units.iter().find(|u| u.id == id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut BattleUnit> {
        self.units.iter_mut().find(|u| u.id == id)
    }

    pub fn units(&self) -> &[BattleUnit] {
        &self.units
    }

    /// Units standing on `hex`
    pub fn units_at(&self, hex: HexId) -> impl Iterator<Item = &BattleUnit> {
        self.units.iter().filter(move |u| u.occupies(&hex))
    }

    fn player_of(&self, unit: &BattleUnit) -> Option<PlayerId> {
        self.wing(unit.wing).map(|w| w.player)
    }

    /// Units of different players are foes. Units of unknown wings fall back
    /// to wing identity.
    pub fn is_foe(&self, a: &BattleUnit, b: &BattleUnit) -> bool {
        match (self.player_of(a), self.player_of(b)) {
            (Some(pa), Some(pb)) => pa != pb,
            _ => a.wing != b.wing,
        }
    }

    /// Foes of `unit` currently on the map
    pub fn foes_of<'a>(&'a self, unit: &'a BattleUnit) -> impl Iterator<Item = &'a BattleUnit> {
        self.units.iter().filter(move |other| self.is_foe(unit, other))
    }

    pub fn has_foe_at(&self, unit: &BattleUnit, hex: HexId) -> bool {
        self.units_at(hex).any(|other| self.is_foe(unit, other))
    }

    /// Any unit other than `unit` itself stands on `hex`
    pub fn has_other_unit_at(&self, unit: &BattleUnit, hex: HexId) -> bool {
        self.units_at(hex).any(|other| other.id != unit.id)
    }

    /// Retreat zone of the unit's wing, if one is configured
    pub fn retreat_zone(&self, unit: &BattleUnit) -> Option<&BTreeSet<HexId>> {
        self.wing(unit.wing).and_then(|w| w.retreat_zone.as_ref())
    }
}
