use crate::core::symbol_table::SymbolTable;

/// Emitted for any token the table does not know.
pub const UNKNOWN_SYMBOL: char = '?';

pub const WORD_SEPARATOR: char = '/';

pub const LETTER_SEPARATOR: char = ' ';

/// Decodes a Morse message into text.
///
/// Words are separated by `/` and letters by a single space. Blank words are
/// dropped. Every token yields exactly one output character: its mapping, or
/// [`UNKNOWN_SYMBOL`]. Runs of spaces are not collapsed, so the empty tokens
/// between them decode to `?` as well.
pub fn decode(table: &SymbolTable, message: &str) -> String {
    let mut decoded = String::with_capacity(message.len() / 2);

    for word in message.split(WORD_SEPARATOR) {
        let word = word.trim();
        if word.is_empty() {
            continue;
        }

        for token in word.split(LETTER_SEPARATOR) {
            match table.lookup(token) {
                Some(character) => decoded.push_str(character),
                None => decoded.push(UNKNOWN_SYMBOL),
            }
        }
        decoded.push(' ');
    }

    if decoded.ends_with(' ') {
        decoded.pop();
    }
    decoded
}
