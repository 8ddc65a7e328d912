pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::ServiceConfig;
pub use crate::core::{
    beacon::{BeaconPoller, HttpBeaconSource, PollerState},
    engine::MorseEngine,
    symbol_table::SymbolTable,
};
pub use utils::error::{MorseError, Result};
