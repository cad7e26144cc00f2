pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, ArbiterConfig};
pub use error::{ArbiterError, Result};
pub use types::{PlayerId, UnitId, WingId};
