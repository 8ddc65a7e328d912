pub mod beacon;
pub mod decoder;
pub mod engine;
pub mod flag_scanner;
pub mod symbol_table;

pub use crate::domain::model::{BeaconMessage, BeaconReport, DecodeRequest, DecodeResult};
pub use crate::domain::ports::{ConfigProvider, MessageSource};
pub use crate::utils::error::Result;
