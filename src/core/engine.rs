use crate::core::symbol_table::SymbolTable;
use crate::core::{decoder, flag_scanner};
use crate::domain::model::DecodeResult;
use std::sync::Arc;

/// Decoder and flag scanner bound to one shared symbol table.
///
/// Cloning is cheap; the HTTP handlers and the beacon poller each hold a
/// clone pointing at the same table.
#[derive(Debug, Clone)]
pub struct MorseEngine {
    table: Arc<SymbolTable>,
}

impl MorseEngine {
    pub fn new(table: Arc<SymbolTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn decode(&self, message: &str) -> String {
        decoder::decode(&self.table, message)
    }

    pub fn process(&self, message: &str) -> DecodeResult {
        let decoded = self.decode(message);
        let flag_found = flag_scanner::scan(&decoded);

        DecodeResult {
            decoded,
            original: message.to_string(),
            flag_found,
        }
    }
}
