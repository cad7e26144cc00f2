//! Battle arbitration - legal moves, rotations and engagement on a hex grid
//!
//! Every query is a pure function of a `Battlefield` snapshot:
//! - Geometry and terrain are read, never cached
//! - Zones of control are recomputed from facing on each call
//! - Absent entries mean illegal, `None` means not applicable

pub mod arbitrator;
pub mod battle_map;
pub mod engagement;
pub mod hex;
pub mod history;
pub mod move_profile;
pub mod movement;
pub mod pathfinding;
pub mod terrain;
pub mod units;
pub mod zone_of_control;

// Re-exports for convenient access
pub use arbitrator::Arbitrator;
pub use battle_map::BattleMap;
pub use engagement::{cost_to_engage, nearest_foes_that_can_join_and_engage, EngagingFoes};
pub use hex::{Angle, HexId, HexSideId};
pub use history::{MoveCommand, MoveLog, UnitPose};
pub use move_profile::{load_profiles, CostOutcome, HexCosts, MoveProfile, ProfileRegistry, SideCosts};
pub use movement::{
    allowed_moves, allowed_moves_back, allowed_rotations, classify, formation_allowed_moves,
    formation_allowed_moves_back, formation_allowed_moves_back_turns, formation_allowed_turns,
    AllowedMove, AllowedRotation, MoveMap, MovementClass, RotationMap, RotationTarget,
};
pub use pathfinding::{
    allowed_attack_moves, allowed_fire_moves, allowed_move_away_moves, allowed_retreat_moves,
    allowed_rout_moves, edge_cost, find_path, reachable_hexes, MoveAway,
};
pub use terrain::{HexSideType, HexType};
pub use units::{BattleUnit, Battlefield, Placement, UnitKind, UnitStance, Wing};
pub use zone_of_control::{
    backward_zone, controlled_hexes, foes_hex_locations, forward_zone, is_allowed_to_confront,
    is_allowed_to_rout, is_engaged, occupied_hexes, threatening_foes, ZoneHex,
};
