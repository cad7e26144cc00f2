//! Arbiter query
//!
//! Places a troop on an open map, optionally with a foe, and prints what the
//! arbiter allows it to do as JSON.

use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hex_arbiter::battle::{
    Angle, Arbitrator, BattleMap, BattleUnit, Battlefield, EngagingFoes, HexId, MoveAway, MoveMap,
    RotationMap, Wing,
};
use hex_arbiter::battle::move_profile::load_profiles;
use hex_arbiter::core::{load_config, ArbiterConfig, ArbiterError, PlayerId, Result, UnitId, WingId};

/// Print the legal moves of a single unit as JSON
#[derive(Parser, Debug)]
#[command(name = "arbiter-query")]
#[command(about = "Print the moves, rotations and engagement of a single troop as JSON")]
struct Args {
    /// Map width in hexes
    #[arg(long, default_value_t = 12)]
    width: u32,

    /// Map height in hexes
    #[arg(long, default_value_t = 12)]
    height: u32,

    /// Unit column
    #[arg(long, default_value_t = 5)]
    col: i32,

    /// Unit row
    #[arg(long, default_value_t = 5)]
    row: i32,

    /// Unit facing in degrees (multiple of 30)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    facing: i32,

    /// Normal movement points
    #[arg(long, default_value_t = 2.0)]
    normal: f32,

    /// Extended movement points
    #[arg(long, default_value_t = 1.0)]
    extended: f32,

    /// Treat the unit as having spent nothing this activation
    #[arg(long)]
    first: bool,

    /// Foe as `col,row,facing`
    #[arg(long, value_delimiter = ',', num_args = 3)]
    foe: Option<Vec<i32>>,

    /// Engine config TOML
    #[arg(long)]
    config: Option<PathBuf>,

    /// Move profile registry TOML
    #[arg(long, requires = "profile")]
    profiles: Option<PathBuf>,

    /// Profile name to give the unit
    #[arg(long)]
    profile: Option<String>,
}

#[derive(Serialize)]
struct QueryReport {
    unit: UnitId,
    engaged: bool,
    moves: MoveMap,
    moves_back: MoveMap,
    rotations: RotationMap,
    move_away: MoveAway,
    nearest_foes: EngagingFoes,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hex_arbiter=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => ArbiterConfig::default(),
    };
    let arbiter = Arbitrator::new(config);

    let mut field = Battlefield::new(BattleMap::new(args.width, args.height));
    field.add_wing(Wing::new(WingId(1), PlayerId(1)));
    field.add_wing(Wing::new(WingId(2), PlayerId(2)));

    let hex = HexId::new(args.col, args.row);
    if !field.map.in_bounds(hex) {
        return Err(ArbiterError::InvalidConfig(format!(
            "unit hex {} is off a {}x{} map",
            hex, args.width, args.height
        )));
    }

    let mut subject = BattleUnit::troop(WingId(1), hex, Angle::try_from(args.facing)?)
        .with_points(args.normal, args.extended);
    if let (Some(path), Some(name)) = (&args.profiles, &args.profile) {
        let registry = load_profiles(path, arbiter.config())?;
        subject = subject.with_profile(registry.get(name)?.clone());
    }
    let subject_id = field.add_unit(subject);

    if let Some(foe) = &args.foe {
        let foe_hex = HexId::new(foe[0], foe[1]);
        field.add_unit(BattleUnit::troop(WingId(2), foe_hex, Angle::try_from(foe[2])?));
        tracing::info!(%foe_hex, "placed foe");
    }

    let unit = arbiter.unit(&field, subject_id)?;
    let report = QueryReport {
        unit: unit.id,
        engaged: arbiter.is_engaged(&field, unit),
        moves: arbiter.allowed_moves(&field, unit, args.first),
        moves_back: arbiter.allowed_moves_back(&field, unit, args.first),
        rotations: arbiter.allowed_rotations(&field, unit, args.first),
        move_away: arbiter.allowed_move_away_moves(&field, unit),
        nearest_foes: arbiter.nearest_foes_that_can_join_and_engage(&field, unit),
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
